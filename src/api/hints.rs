//! 题目提示端点

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{HintsRequest, HintsResponse};
use crate::services::TutorService;
use crate::state::AppState;

/// 为题目生成渐进式提示
async fn get_hints(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HintsRequest>,
) -> AppResult<Json<HintsResponse>> {
    let problem = req.text.trim();
    if problem.is_empty() {
        return Err(AppError::BadRequest("text is required".to_string()));
    }

    info!("Hints requested: {} chars", problem.len());

    let tutor = TutorService::from_config(state.http.clone())?;
    let hints = tutor.generate_hints(problem).await?;

    Ok(Json(HintsResponse { hints }))
}

/// 创建提示路由
pub fn hints_routes() -> Router<Arc<AppState>> {
    Router::new().route("/hints", post(get_hints))
}
