//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// 应用共享状态
///
/// 使用 Arc 包裹以便在多个处理器之间安全共享。目前只持有复用的
/// HTTP 客户端，让所有 Gemini 调用共享同一个连接池。
#[derive(Clone)]
pub struct AppState {
    /// 复用的 HTTP 客户端
    pub http: Client,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new() -> Self {
        // 构建 HTTP 客户端（上游生成调用可能较慢，超时放宽到 120 秒）
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state() -> Arc<AppState> {
    Arc::new(AppState::new())
}
