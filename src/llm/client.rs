//! Gemini 客户端
//!
//! 非流式调用 generateContent，返回完整文本。

use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, info};

use super::gemini::{
    build_generate_endpoint, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part,
};
use super::types::{GenerateOptions, LlmError};
use crate::utils::request_logger::{RequestLogger, REQUEST_LOGGER};

/// 错误响应体预览，最多 500 字节且不截断到多字节字符中间
fn error_body_preview(text: &str) -> &str {
    let mut end = text.len().min(500);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    ///
    /// 复用外部传入的 HTTP 客户端（共享连接池）。
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 调用 generateContent 并返回完整文本
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let endpoint = build_generate_endpoint(&self.base_url, model);
        info!("LLM request: model={}, endpoint={}", model, endpoint);

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
                response_mime_type: options
                    .json_response
                    .then(|| "application/json".to_string()),
            }),
        };

        // 记录请求日志
        let request_id = RequestLogger::generate_request_id();
        let entry = REQUEST_LOGGER.log_request(
            &request_id,
            &endpoint,
            model,
            prompt,
            options.temperature,
            options.max_output_tokens,
            &self.base_url,
            &self.api_key,
        );
        let start_time = Instant::now();

        debug!("Gemini API request: request_id={}, prompt_len={}", request_id, prompt.len());

        // 发送请求（密钥作为查询参数附加，不出现在日志里）
        let result = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                REQUEST_LOGGER.log_error(entry, start_time, "http_error", &e.to_string(), None);
                return Err(LlmError::HttpError(e));
            }
        };

        // 检查状态码
        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API error: status={}, body={}",
                status_code,
                error_body_preview(&error_text)
            );
            REQUEST_LOGGER.log_error(
                entry,
                start_time,
                "api_error",
                &error_text,
                Some(status_code),
            );
            return Err(LlmError::ApiError {
                status: status_code,
                message: error_text,
            });
        }

        // 解析响应
        let body: GenerateContentResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                REQUEST_LOGGER.log_error(entry, start_time, "http_error", &e.to_string(), None);
                return Err(LlmError::HttpError(e));
            }
        };

        match body.extract_text() {
            Some(text) => {
                REQUEST_LOGGER.log_success(entry, start_time, text.len(), &text);
                Ok(text)
            }
            None => {
                let reason = body.finish_reason().unwrap_or("unknown").to_string();
                REQUEST_LOGGER.log_error(entry, start_time, "empty_response", &reason, None);
                Err(LlmError::EmptyResponse(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_preview_short_text() {
        assert_eq!(error_body_preview("{\"error\": \"bad key\"}"), "{\"error\": \"bad key\"}");
    }

    #[test]
    fn test_error_body_preview_multibyte_boundary() {
        // 第 500 字节落在多字节字符中间时不应 panic
        let body = "错".repeat(400);
        let preview = error_body_preview(&body);
        assert!(preview.len() <= 500);
        assert!(body.starts_with(preview));
    }
}
