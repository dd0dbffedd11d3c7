//! Answer Evaluator — one question/answer pair in, critique and rating out.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm::parse::{slice_between, strip_code_fences};
use crate::llm::LlmGateway;

/// Feedback reported when evaluation fails in any way.
pub const FALLBACK_FEEDBACK: &str = "Good attempt. Try to structure your answer using the STAR method. Suggested Resources: 'Cracking the Coding Interview' or generic HR prep guides.";
/// Rating reported when evaluation fails in any way.
pub const FALLBACK_RATING: i64 = 6;
const EVALUATION_TEMPERATURE: f32 = 0.3;

/// Structured critique for one answered question. `rating` is nominally 0-10
/// but carried through unclamped from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub feedback: String,
    pub rating: i64,
}

/// Evaluates one answer. Never fails: an absent response, missing braces,
/// invalid JSON, or missing keys all yield the fixed fallback critique.
pub async fn evaluate_answer(llm: &LlmGateway, question: &str, answer: &str) -> Evaluation {
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);

    let Some(raw) = llm.generate_text(&prompt, EVALUATION_TEMPERATURE).await else {
        return fallback_evaluation();
    };
    match parse_evaluation(&raw) {
        Some(evaluation) => evaluation,
        None => {
            warn!("Evaluation response was not the expected JSON object, using fallback");
            fallback_evaluation()
        }
    }
}

pub fn fallback_evaluation() -> Evaluation {
    Evaluation {
        feedback: FALLBACK_FEEDBACK.to_string(),
        rating: FALLBACK_RATING,
    }
}

/// Cuts the JSON object out of the response and deserializes it.
fn parse_evaluation(raw: &str) -> Option<Evaluation> {
    let cleaned = strip_code_fences(raw);
    let json = slice_between(&cleaned, '{', '}')?;
    serde_json::from_str(json).ok()
}
