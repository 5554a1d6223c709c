//! 测验生成端点

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{QuizRequest, QuizResponse};
use crate::services::TutorService;
use crate::state::AppState;

/// 根据材料生成一道选择题
async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuizRequest>,
) -> AppResult<Json<QuizResponse>> {
    let material = req.text.trim();
    if material.is_empty() {
        return Err(AppError::BadRequest("text is required".to_string()));
    }

    info!("Quiz requested: {} chars", material.len());

    let tutor = TutorService::from_config(state.http.clone())?;
    let quiz = tutor.generate_quiz(material).await?;

    Ok(Json(quiz))
}

/// 创建测验路由
pub fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new().route("/quiz", post(get_quiz))
}
