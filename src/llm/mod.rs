//! LLM 模块
//!
//! 提供 Google Generative Language API（Gemini）的非流式客户端。

mod client;
mod gemini;
mod types;

pub use client::GeminiClient;
pub use types::*;
