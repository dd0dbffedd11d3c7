//! Interview question selection — fixed pools first, remote generation when a
//! pool is exhausted or the context names an arbitrary technical domain.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::interview::prompts::QUESTION_PROMPT_TEMPLATE;
use crate::interview::question_bank::{eligible_resume_pool, HR_QUESTIONS, STRENGTHS_QUESTION};
use crate::llm::LlmGateway;
use crate::session::Turn;

/// Returned when remote generation is unavailable or produces junk.
pub const GENERIC_FALLBACK_QUESTION: &str = "Describe your professional background.";
/// Generated questions at or under this trimmed length are discarded as junk.
const MIN_GENERATED_LEN: usize = 5;
const GENERATION_TEMPERATURE: f32 = 0.85;

/// Picks the next question for a session.
///
/// Precedence: scripted strengths override (behavioral turn index 2), then
/// fixed pool minus history, then remote generation, then the generic
/// fallback. Total by construction: no failure escapes to the interview loop.
pub async fn generate_question(
    llm: &LlmGateway,
    skills: &[String],
    history: &[Turn],
    context: &str,
) -> String {
    let turn_count = history.len();

    let (role, task_instruction) = match context {
        "Resume" => {
            if let Some(q) = pick_resume_question(skills, history) {
                return q;
            }
            let focus: Vec<String> = skills.iter().take(5).cloned().collect();
            (
                "Hiring Manager".to_string(),
                format!("Ask a tough technical question about: {}", focus.join(", ")),
            )
        }
        "Common" | "HR" => {
            if turn_count == 2 {
                return STRENGTHS_QUESTION.to_string();
            }
            if let Some(q) = pick_behavioral_question(history) {
                return q;
            }
            (
                "HR Manager".to_string(),
                "Ask a behavioral interview question.".to_string(),
            )
        }
        domain => (
            format!("Principal {domain} Engineer"),
            format!("Ask a challenging technical domain question about {domain}."),
        ),
    };

    let prompt = QUESTION_PROMPT_TEMPLATE
        .replace("{role}", &role)
        .replace("{context}", context)
        .replace("{question_number}", &(turn_count + 1).to_string())
        .replace("{task_instruction}", &task_instruction)
        .replace("{history}", &render_history(history));

    match llm.generate_text(&prompt, GENERATION_TEMPERATURE).await {
        Some(text) if text.trim().len() > MIN_GENERATED_LEN => text.trim().to_string(),
        _ => GENERIC_FALLBACK_QUESTION.to_string(),
    }
}

/// Uniform pick from the skill-eligible pool, minus questions already asked
/// (exact string match). None means the pool is exhausted.
fn pick_resume_question(skills: &[String], history: &[Turn]) -> Option<String> {
    let pool = eligible_resume_pool(skills);
    let asked: HashSet<&str> = history.iter().map(|t| t.question.as_str()).collect();
    let available: Vec<&'static str> = pool.into_iter().filter(|q| !asked.contains(q)).collect();
    available
        .choose(&mut rand::thread_rng())
        .map(|q| q.to_string())
}

/// Uniform pick from the behavioral pool, minus the scripted strengths
/// question and anything already asked (trimmed, lowercased comparison).
fn pick_behavioral_question(history: &[Turn]) -> Option<String> {
    let asked: HashSet<String> = history
        .iter()
        .map(|t| t.question.trim().to_lowercase())
        .collect();
    let available: Vec<&'static str> = HR_QUESTIONS
        .iter()
        .copied()
        .filter(|q| *q != STRENGTHS_QUESTION)
        .filter(|q| !asked.contains(&q.to_lowercase()))
        .collect();
    available
        .choose(&mut rand::thread_rng())
        .map(|q| q.to_string())
}

/// History rendered as "Q: ...\nA: ..." pairs for the generation prompt.
fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|t| format!("Q: {}\nA: {}", t.question, t.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::evaluator::{evaluate_answer, FALLBACK_RATING};
    use crate::interview::question_bank::{JAVA_QUESTIONS, PYTHON_QUESTIONS};
    use crate::llm::{ProviderError, TextProvider};
    use crate::session::{InterviewSession, SessionStore};
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

    fn offline() -> LlmGateway {
        LlmGateway::new(vec![])
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn turn(question: &str) -> Turn {
        Turn {
            question: question.to_string(),
            answer: "an answer".to_string(),
            feedback: "fine".to_string(),
            rating: 7,
        }
    }

    #[tokio::test]
    async fn test_python_sessions_draw_from_python_pool_without_repeats() {
        let llm = offline();
        let py_skills = skills(&["Python"]);
        let mut history = Vec::new();

        for _ in 0..PYTHON_QUESTIONS.len() {
            let q = generate_question(&llm, &py_skills, &history, "Resume").await;
            assert!(
                PYTHON_QUESTIONS.contains(&q.as_str()),
                "expected a Python pool question, got {q:?}"
            );
            assert!(
                !history.iter().any(|t: &Turn| t.question == q),
                "question {q:?} repeated"
            );
            history.push(turn(&q));
        }
    }

    #[tokio::test]
    async fn test_java_pool_membership_until_exhaustion() {
        let llm = offline();
        let java_skills = skills(&["Java"]);
        let q1 = generate_question(&llm, &java_skills, &[], "Resume").await;
        let q2 = generate_question(&llm, &java_skills, &[], "Resume").await;
        assert!(JAVA_QUESTIONS.contains(&q1.as_str()));
        assert!(JAVA_QUESTIONS.contains(&q2.as_str()));
    }

    #[tokio::test]
    async fn test_strengths_question_exactly_at_turn_index_two() {
        let llm = offline();
        let history = vec![turn("Tell me about yourself."), turn("Why should we hire you?")];
        let q = generate_question(&llm, &skills(&["General"]), &history, "HR").await;
        assert_eq!(q, STRENGTHS_QUESTION);

        let q = generate_question(&llm, &skills(&["General"]), &history, "Common").await;
        assert_eq!(q, STRENGTHS_QUESTION);
    }

    #[tokio::test]
    async fn test_strengths_question_never_at_other_indices() {
        let llm = offline();
        let mut history = Vec::new();

        for index in 0..HR_QUESTIONS.len() {
            let q = generate_question(&llm, &skills(&["General"]), &history, "HR").await;
            if index == 2 {
                assert_eq!(q, STRENGTHS_QUESTION);
            } else {
                assert_ne!(q, STRENGTHS_QUESTION, "strengths leaked at index {index}");
            }
            history.push(turn(&q));
        }
    }

    #[tokio::test]
    async fn test_behavioral_dedup_ignores_case_and_whitespace() {
        let llm = offline();
        let mut history: Vec<Turn> = HR_QUESTIONS
            .iter()
            .take(2)
            .map(|q| turn(&format!("  {}  ", q.to_uppercase())))
            .collect();
        // skip past the scripted index
        history.push(turn(STRENGTHS_QUESTION));

        let q = generate_question(&llm, &skills(&["General"]), &history, "HR").await;
        assert!(HR_QUESTIONS.contains(&q.as_str()));
        assert!(!HR_QUESTIONS[..2].contains(&q.as_str()));
    }

    #[tokio::test]
    async fn test_exhausted_resume_pool_falls_back_offline() {
        let llm = offline();
        let py_skills = skills(&["Python"]);
        let history: Vec<Turn> = PYTHON_QUESTIONS.iter().map(|q| turn(q)).collect();
        let q = generate_question(&llm, &py_skills, &history, "Resume").await;
        assert_eq!(q, GENERIC_FALLBACK_QUESTION);
    }

    #[tokio::test]
    async fn test_domain_context_goes_remote() {
        let llm = LlmGateway::new(vec![Arc::new(CannedProvider(
            "  What is eventual consistency?  ",
        ))]);
        let q = generate_question(&llm, &skills(&["General"]), &[], "Distributed Systems").await;
        assert_eq!(q, "What is eventual consistency?");
    }

    #[tokio::test]
    async fn test_short_remote_output_is_discarded() {
        let llm = LlmGateway::new(vec![Arc::new(CannedProvider("ok"))]);
        let q = generate_question(&llm, &skills(&["General"]), &[], "Kubernetes").await;
        assert_eq!(q, GENERIC_FALLBACK_QUESTION);
    }

    #[tokio::test]
    async fn test_domain_context_offline_uses_generic_fallback() {
        let llm = offline();
        let q = generate_question(&llm, &skills(&["General"]), &[], "ML").await;
        assert_eq!(q, GENERIC_FALLBACK_QUESTION);
    }

    #[test]
    fn test_render_history_pairs() {
        let history = vec![turn("Q one"), turn("Q two")];
        let rendered = render_history(&history);
        assert_eq!(
            rendered,
            "Q: Q one\nA: an answer\nQ: Q two\nA: an answer"
        );
    }

    /// Full offline interview flow: upload-seeded session, five Python
    /// questions without repeats, evaluator fallback ratings, then the
    /// generic fallback once the pool is spent.
    #[tokio::test]
    async fn test_end_to_end_python_interview_flow() {
        let llm = offline();
        let store = SessionStore::new();
        let id = store
            .create(InterviewSession::new(
                skills(&["Python"]),
                80,
                "Resume".to_string(),
            ))
            .await;
        let cell = store.get(&id).await.unwrap();

        let mut asked: Vec<String> = Vec::new();
        for _ in 0..PYTHON_QUESTIONS.len() {
            let mut session = cell.lock().await;
            let q =
                generate_question(&llm, &session.skills, &session.history, &session.context).await;
            assert!(PYTHON_QUESTIONS.contains(&q.as_str()));
            assert!(!asked.contains(&q));

            let evaluation = evaluate_answer(&llm, &q, "my answer").await;
            assert_eq!(evaluation.rating, FALLBACK_RATING);
            assert!(!evaluation.feedback.is_empty());

            session.history.push(Turn {
                question: q.clone(),
                answer: "my answer".to_string(),
                feedback: evaluation.feedback,
                rating: evaluation.rating,
            });
            asked.push(q);
        }

        let session = cell.lock().await;
        let q6 =
            generate_question(&llm, &session.skills, &session.history, &session.context).await;
        assert_eq!(q6, GENERIC_FALLBACK_QUESTION);
    }
}
