//! Chat endpoints — the Hebrew Q&A assistant.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::assistant;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
}

/// `POST /api/chat` — answer a business question from stored data.
///
/// Unrecognized questions get the fixed help text, never an error.
pub async fn ask(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty".into()));
    }

    let conn = ctx.state.open_db()?;
    let today = chrono::Local::now().date_naive();
    let answer = assistant::answer(&conn, &question, today)?;

    Ok(Json(ChatResponse { question, answer }))
}

#[derive(Serialize)]
pub struct ExamplesResponse {
    pub examples: Vec<&'static str>,
}

/// `GET /api/chat/examples` — the example questions shown next to the
/// chat box.
pub async fn examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: assistant::example_questions(),
    })
}
