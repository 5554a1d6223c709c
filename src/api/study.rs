//! Study Buddy 问答端点

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{AskRequest, AskResponse};
use crate::services::TutorService;
use crate::state::AppState;

/// 回答学生问题
async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("question is required".to_string()));
    }

    info!("Study buddy question received: {} chars", question.len());

    let tutor = TutorService::from_config(state.http.clone())?;
    let text = tutor.answer_question(question).await?;

    Ok(Json(AskResponse { text }))
}

/// 创建 Study Buddy 路由
pub fn study_routes() -> Router<Arc<AppState>> {
    Router::new().route("/studybuddy", post(ask))
}
