//! Gemini generateContent 载荷定义和端点构建工具

use serde::{Deserialize, Serialize};

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    // 修复双斜杠（跳过协议部分）
    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 generateContent 端点
///
/// API 密钥不放进 URL，由客户端作为查询参数单独附加，避免在日志中泄露。
pub fn build_generate_endpoint(base_url: &str, model: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/v1beta") {
        format!("{}/models/{}:generateContent", url, model)
    } else {
        format!("{}/v1beta/models/{}:generateContent", url, model)
    }
}

/// generateContent 请求载荷
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// 消息内容
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// 文本片段
#[derive(Serialize, Deserialize, Debug)]
pub struct Part {
    pub text: String,
}

/// 生成参数
#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// generateContent 响应载荷
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// 响应候选
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// 被安全策略拦截时 content 可能缺失
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// 提取第一个候选的全部文本片段，拼接为一个字符串
    pub fn extract_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }

    /// 第一个候选的完成原因
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com/"),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com//v1beta"),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_build_generate_endpoint() {
        assert_eq!(
            build_generate_endpoint("https://generativelanguage.googleapis.com", "gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            build_generate_endpoint("https://generativelanguage.googleapis.com/v1beta", "gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello"},{"text":" world"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.extract_text().as_deref(), Some("Hello world"));
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[test]
    fn test_extract_text_blocked_candidate() {
        // 安全拦截时没有 content
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(response.extract_text(), None);
        assert_eq!(response.finish_reason(), Some("SAFETY"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                max_output_tokens: Some(256),
                response_mime_type: Some("application/json".to_string()),
            }),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("generationConfig"));
        assert!(json.contains("maxOutputTokens"));
        assert!(json.contains("responseMimeType"));
    }
}
