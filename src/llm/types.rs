//! LLM 类型定义

/// 生成选项
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// 最大输出 token 数
    pub max_output_tokens: Option<u32>,
    /// 是否要求 JSON 格式响应（设置 responseMimeType）
    pub json_response: bool,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API 返回错误
    #[error("API 错误 ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 响应中没有可用文本（候选为空或被安全策略拦截）
    #[error("响应为空: {0}")]
    EmptyResponse(String),
}
