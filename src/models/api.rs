//! REST API 请求/响应模型
//!
//! 字段名与前端约定保持一致。

use serde::{Deserialize, Serialize};

/// Study Buddy 提问请求
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Study Buddy 回答响应
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// 格式化后的回答文本，前端按空行拆分为块渲染
    pub text: String,
}

/// 提示请求
#[derive(Debug, Deserialize)]
pub struct HintsRequest {
    pub text: String,
}

/// 提示响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HintsResponse {
    pub hints: Vec<String>,
}

/// 测验请求
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub text: String,
}

/// 测验响应
///
/// correct 必须是 options 中的一项，前端按字符串相等判分。
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
}

/// 题目解析请求
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// 题目解析响应
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub parsed: String,
}
