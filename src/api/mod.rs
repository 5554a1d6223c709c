//! API 路由模块

mod config;
mod health;
mod hints;
mod parse;
mod quiz;
mod study;

pub use config::config_routes;
pub use health::health_routes;
pub use hints::hints_routes;
pub use parse::parse_routes;
pub use quiz::quiz_routes;
pub use study::study_routes;

use axum::Router;

use crate::state::AppState;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(config_routes())
        .merge(study_routes())
        .merge(hints_routes())
        .merge(quiz_routes())
        .merge(parse_routes())
        .with_state(state)
}
