//! Résumé Analyzer — turns extracted résumé text into a skill list and an
//! ATS readiness score via the gateway, with strict fallback defaults.

pub mod prompts;

use tracing::warn;

use crate::llm::parse::{slice_between, strip_code_fences};
use crate::llm::LlmGateway;
use self::prompts::{ATS_SCORE_PROMPT, SKILL_EXTRACTION_PROMPT};

/// Skills reported when extraction fails in any way.
pub const FALLBACK_SKILLS: [&str; 3] = ["Python", "Problem Solving", "Technical Skills"];
/// Score reported when scoring fails in any way.
pub const FALLBACK_ATS_SCORE: i64 = 75;
/// Only the head of the résumé goes into the prompt.
const PROMPT_TEXT_LIMIT: usize = 4000;
const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Extracts a skill list from résumé text. Never fails: an absent or
/// unparseable response yields the fixed fallback list.
pub async fn extract_skills(llm: &LlmGateway, resume_text: &str) -> Vec<String> {
    let prompt = SKILL_EXTRACTION_PROMPT
        .replace("{resume_text}", head_chars(resume_text, PROMPT_TEXT_LIMIT));

    let Some(raw) = llm.generate_text(&prompt, ANALYSIS_TEMPERATURE).await else {
        return fallback_skills();
    };
    match parse_skill_list(&raw) {
        Some(skills) => skills,
        None => {
            warn!("Skill extraction returned unparseable output, using fallback list");
            fallback_skills()
        }
    }
}

/// Scores résumé text out of 100. Never fails: an absent response or one
/// without usable digits yields the fixed fallback score.
pub async fn score_resume(llm: &LlmGateway, resume_text: &str) -> i64 {
    let prompt = ATS_SCORE_PROMPT.replace("{resume_text}", head_chars(resume_text, PROMPT_TEXT_LIMIT));

    let Some(raw) = llm.generate_text(&prompt, ANALYSIS_TEMPERATURE).await else {
        return FALLBACK_ATS_SCORE;
    };
    match concat_digits(&raw) {
        Some(score) => score,
        None => {
            warn!("ATS score response carried no usable digits, using fallback score");
            FALLBACK_ATS_SCORE
        }
    }
}

pub fn fallback_skills() -> Vec<String> {
    FALLBACK_SKILLS.iter().map(|s| s.to_string()).collect()
}

/// First `limit` characters of `text`, cut on a char boundary.
fn head_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cuts the JSON array out of the response and parses it as a string list.
fn parse_skill_list(raw: &str) -> Option<Vec<String>> {
    let cleaned = strip_code_fences(raw);
    let json = slice_between(&cleaned, '[', ']')?;
    serde_json::from_str(json).ok()
}

/// Concatenates every ASCII digit of the response, in order of appearance,
/// and parses the result as one integer: "Score: 7/10 ... 82" becomes 71082.
/// Not a number finder; the order-preserving concatenation is the contract.
fn concat_digits(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ProviderError, TextProvider};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl TextProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(
            &self,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn canned(text: &'static str) -> LlmGateway {
        LlmGateway::new(vec![Arc::new(CannedProvider(text))])
    }

    #[test]
    fn test_concat_digits_preserves_order_of_appearance() {
        assert_eq!(concat_digits("Score: 7/10 ... 82"), Some(71082));
    }

    #[test]
    fn test_concat_digits_plain_number() {
        assert_eq!(concat_digits("85"), Some(85));
    }

    #[test]
    fn test_concat_digits_no_digits() {
        assert_eq!(concat_digits("no score here"), None);
    }

    #[test]
    fn test_head_chars_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(head_chars(text, 4), "héll");
        assert_eq!(head_chars(text, 100), text);
    }

    #[test]
    fn test_parse_skill_list_fenced_array() {
        let raw = "```json\n[\"Rust\", \"SQL\"]\n```";
        assert_eq!(
            parse_skill_list(raw),
            Some(vec!["Rust".to_string(), "SQL".to_string()])
        );
    }

    #[test]
    fn test_parse_skill_list_array_embedded_in_prose() {
        let raw = "Sure! Here are the skills: [\"Python\", \"Docker\"] Let me know.";
        assert_eq!(
            parse_skill_list(raw),
            Some(vec!["Python".to_string(), "Docker".to_string()])
        );
    }

    #[test]
    fn test_parse_skill_list_prose_is_none() {
        assert_eq!(parse_skill_list("The candidate knows Python and SQL."), None);
    }

    #[tokio::test]
    async fn test_extract_skills_without_provider_uses_fallback() {
        let llm = LlmGateway::new(vec![]);
        assert_eq!(
            extract_skills(&llm, "some resume text").await,
            vec!["Python", "Problem Solving", "Technical Skills"]
        );
    }

    #[tokio::test]
    async fn test_extract_skills_non_json_response_uses_fallback() {
        let llm = canned("I could not find any skills, sorry.");
        assert_eq!(
            extract_skills(&llm, "some resume text").await,
            vec!["Python", "Problem Solving", "Technical Skills"]
        );
    }

    #[tokio::test]
    async fn test_extract_skills_parses_model_array() {
        let llm = canned("[\"Rust\", \"Kubernetes\"]");
        assert_eq!(
            extract_skills(&llm, "some resume text").await,
            vec!["Rust", "Kubernetes"]
        );
    }

    #[tokio::test]
    async fn test_score_resume_digitless_response_uses_fallback() {
        let llm = canned("I cannot rate this resume.");
        assert_eq!(score_resume(&llm, "some resume text").await, 75);
    }

    #[tokio::test]
    async fn test_score_resume_without_provider_uses_fallback() {
        let llm = LlmGateway::new(vec![]);
        assert_eq!(score_resume(&llm, "some resume text").await, 75);
    }

    #[tokio::test]
    async fn test_score_resume_concatenates_digits() {
        let llm = canned("Score: 8/10, overall 82");
        assert_eq!(score_resume(&llm, "some resume text").await, 81082);
    }
}
