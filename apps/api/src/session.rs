//! Session Store — process-wide keyed map of interview sessions.
//!
//! Requests for the same session id serialize on the per-session mutex;
//! handlers hold it across the whole read-decide-append cycle, so concurrent
//! submissions cannot drop or duplicate turns. Sessions live until removed or
//! process restart; there is no expiry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Skills for sessions created without an uploaded résumé.
pub const DEFAULT_SKILLS: [&str; 1] = ["General"];
/// Score for sessions created without an uploaded résumé.
pub const DEFAULT_SCORE: i64 = 70;
pub const DEFAULT_CONTEXT: &str = "Resume";

/// One question/answer/feedback/rating record. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub feedback: String,
    /// Nominally 0-10; carried through unclamped from the evaluator.
    pub rating: i64,
}

/// Per-candidate interview state. `skills` is fixed at creation; `context`
/// may be overwritten by each start-interview call; `history` is append-only
/// and its length is the zero-based turn count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub skills: Vec<String>,
    pub score: i64,
    pub context: String,
    pub history: Vec<Turn>,
}

impl InterviewSession {
    pub fn new(skills: Vec<String>, score: i64, context: String) -> Self {
        Self {
            skills,
            score,
            context,
            history: Vec::new(),
        }
    }

    /// Session shape used when interview-start arrives without a known id.
    pub fn unseeded(context: String) -> Self {
        Self::new(
            DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_SCORE,
            context,
        )
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<InterviewSession>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the session under a fresh opaque id and returns the id.
    pub async fn create(&self, session: InterviewSession) -> String {
        let id = Uuid::new_v4().to_string();
        self.inner
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// Hands out the per-session lock cell. Callers keep it locked for the
    /// whole read-decide-append cycle.
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<InterviewSession>>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.inner.write().await.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let store = SessionStore::new();
        let id = store
            .create(InterviewSession::new(
                vec!["Rust".to_string()],
                88,
                "Resume".to_string(),
            ))
            .await;

        let cell = store.get(&id).await.expect("session should exist");
        let session = cell.lock().await;
        assert_eq!(session.skills, vec!["Rust"]);
        assert_eq!(session.score, 88);
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = SessionStore::new();
        assert!(store.get("no-such-session").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_deletes_session() {
        let store = SessionStore::new();
        let id = store
            .create(InterviewSession::unseeded("HR".to_string()))
            .await;
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(!store.remove(&id).await);
    }

    #[tokio::test]
    async fn test_unseeded_session_defaults() {
        let session = InterviewSession::unseeded("Common".to_string());
        assert_eq!(session.skills, vec!["General"]);
        assert_eq!(session.score, DEFAULT_SCORE);
        assert_eq!(session.context, "Common");
    }

    #[tokio::test]
    async fn test_history_appends_in_order() {
        let store = SessionStore::new();
        let id = store
            .create(InterviewSession::unseeded("Resume".to_string()))
            .await;
        let cell = store.get(&id).await.unwrap();

        for i in 0..3 {
            let mut session = cell.lock().await;
            session.history.push(Turn {
                question: format!("q{i}"),
                answer: format!("a{i}"),
                feedback: "fine".to_string(),
                rating: i,
            });
        }

        let session = cell.lock().await;
        let questions: Vec<&str> = session.history.iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["q0", "q1", "q2"]);
    }

    #[tokio::test]
    async fn test_context_overwrite_preserves_history() {
        let store = SessionStore::new();
        let id = store
            .create(InterviewSession::unseeded("Resume".to_string()))
            .await;
        let cell = store.get(&id).await.unwrap();

        {
            let mut session = cell.lock().await;
            session.history.push(Turn {
                question: "q".to_string(),
                answer: "a".to_string(),
                feedback: "f".to_string(),
                rating: 5,
            });
            session.context = "HR".to_string();
        }

        let session = cell.lock().await;
        assert_eq!(session.context, "HR");
        assert_eq!(session.history.len(), 1);
    }
}
