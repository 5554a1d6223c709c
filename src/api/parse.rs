//! 题目解析端点
//!
//! 目前是占位实现，原样回显收到的题目文本。

use axum::{routing::post, Json, Router};
use std::sync::Arc;

use crate::models::{ParseRequest, ParseResponse};
use crate::state::AppState;

/// 解析上传的题目
async fn parse_problem(Json(req): Json<ParseRequest>) -> Json<ParseResponse> {
    Json(ParseResponse {
        parsed: format!("Problem received: {}", req.text),
    })
}

/// 创建题目解析路由
pub fn parse_routes() -> Router<Arc<AppState>> {
    Router::new().route("/parse", post(parse_problem))
}
