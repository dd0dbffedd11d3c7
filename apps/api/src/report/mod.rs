//! Report rendering seam.
//!
//! The renderer consumes already-rendered feedback strings plus two scores
//! and produces a downloadable document. `PlainTextRenderer` is the default
//! backend; a PDF backend would implement the same trait and swap in at
//! startup without touching the handler.

pub mod handlers;

use chrono::{DateTime, Utc};

/// Everything a renderer needs. Feedback lines arrive pre-rendered; the
/// renderer never sees structured turn records.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub candidate_name: String,
    pub domain: String,
    pub score_mcq: i64,
    pub score_interview: i64,
    pub feedback: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

pub trait ReportRenderer: Send + Sync {
    fn render(&self, input: &ReportInput) -> Vec<u8>;
    fn content_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
}

/// Structured text report backend.
pub struct PlainTextRenderer;

impl ReportRenderer for PlainTextRenderer {
    fn render(&self, input: &ReportInput) -> Vec<u8> {
        let mut out = String::new();
        out.push_str("INTERVIEW PERFORMANCE REPORT\n");
        out.push_str("============================\n\n");
        out.push_str(&format!("Candidate Name: {}\n", input.candidate_name));
        out.push_str(&format!("Domain: {}\n", input.domain));
        out.push_str(&format!(
            "Date: {}\n\n",
            input.generated_at.format("%Y-%m-%d %H:%M")
        ));
        out.push_str("Summary Scores\n");
        out.push_str("--------------\n");
        out.push_str(&format!("Technical/MCQ Score: {}\n", input.score_mcq));
        out.push_str(&format!(
            "AI Interview Score: {}/10\n\n",
            input.score_interview
        ));
        out.push_str("Interview Questions & Feedback\n");
        out.push_str("------------------------------\n");
        for (i, line) in input.feedback.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, line));
        }
        out.push_str("\nGenerated by Parley, the AI interview preparation assistant\n");
        out.into_bytes()
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}
