//! Résumé upload and the interview question/answer loop.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzer;
use crate::errors::AppError;
use crate::interview::engine::generate_question;
use crate::interview::evaluator::evaluate_answer;
use crate::pdf;
use crate::session::{InterviewSession, Turn, DEFAULT_CONTEXT};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub skills: Vec<String>,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub session_id: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub question: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub session_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub feedback: String,
    pub rating: i64,
    pub next_question: String,
}

/// POST /api/upload — multipart `resume` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut resume_bytes: Option<bytes::Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("resume") {
            resume_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?,
            );
        }
    }
    let resume_bytes = resume_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;

    // A read failure and a readable-but-empty document are reported as
    // distinct conditions.
    let text = match pdf::extract_text(&resume_bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("Resume extraction failed: {e}");
            return Err(AppError::Validation(
                "Failed to read PDF document".to_string(),
            ));
        }
    };
    if text.is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from PDF".to_string(),
        ));
    }

    let skills = analyzer::extract_skills(&state.llm, &text).await;
    let score = analyzer::score_resume(&state.llm, &text).await;

    let session_id = state
        .sessions
        .create(InterviewSession::new(
            skills.clone(),
            score,
            DEFAULT_CONTEXT.to_string(),
        ))
        .await;
    info!(
        "Created interview session {session_id} ({} skills, score {score})",
        skills.len()
    );

    Ok(Json(UploadResponse {
        session_id,
        skills,
        score,
    }))
}

/// POST /api/interview/start
///
/// Unknown or absent session ids lazily create a session with default
/// skills; known ids have their context overwritten.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, AppError> {
    let context = req
        .context
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

    let existing = match &req.session_id {
        Some(id) => state.sessions.get(id).await.map(|cell| (id.clone(), cell)),
        None => None,
    };

    let (session_id, cell) = match existing {
        Some(found) => found,
        None => {
            let id = state
                .sessions
                .create(InterviewSession::unseeded(context.clone()))
                .await;
            info!("Lazily created interview session {id} (context: {context})");
            let cell = state
                .sessions
                .get(&id)
                .await
                .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;
            (id, cell)
        }
    };

    let question = {
        let mut session = cell.lock().await;
        session.context = context;
        generate_question(&state.llm, &session.skills, &session.history, &session.context).await
    };

    Ok(Json(StartResponse {
        question,
        session_id,
    }))
}

/// POST /api/interview/answer
///
/// Unknown session ids are the one user-visible error of the interview loop.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let cell = state
        .sessions
        .get(&req.session_id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    // Evaluate, append, and pick the next question as one critical section;
    // concurrent submissions for the same session serialize here.
    let mut session = cell.lock().await;

    let evaluation = evaluate_answer(&state.llm, &req.question, &req.answer).await;
    session.history.push(Turn {
        question: req.question,
        answer: req.answer,
        feedback: evaluation.feedback.clone(),
        rating: evaluation.rating,
    });

    info!(
        "Session {} turn {} recorded (context: {})",
        req.session_id,
        session.history.len(),
        session.context
    );

    let next_question =
        generate_question(&state.llm, &session.skills, &session.history, &session.context).await;

    Ok(Json(AnswerResponse {
        feedback: evaluation.feedback,
        rating: evaluation.rating,
        next_question,
    }))
}
