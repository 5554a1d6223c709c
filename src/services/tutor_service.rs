//! 辅导服务
//!
//! 串联提示词构建、Gemini 调用、宽松 JSON 解析和回答格式化。
//! JSON 解析失败时按端点各自兜底，绝不把解析错误抛给前端。

use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::get_config;
use crate::error::{AppError, AppResult};
use crate::llm::{GeminiClient, GenerateOptions};
use crate::models::QuizResponse;
use crate::services::formatter::{format_answer, format_answer_with, SectionOrder, StructuredAnswer};
use crate::services::prompt_service::PromptService;

/// 辅导服务
pub struct TutorService {
    client: GeminiClient,
    prompts: PromptService,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
    formula_after_examples: bool,
}

impl TutorService {
    /// 从当前配置创建辅导服务
    ///
    /// 复用共享的 HTTP 客户端；未配置 API 密钥时直接报配置错误。
    pub fn from_config(http: Client) -> AppResult<Self> {
        let config = get_config();

        let client = GeminiClient::new(http, &config.api_key, &config.base_url).map_err(|_| {
            AppError::Config(
                "API Key not configured. Set GOOGLE_API_KEY or edit config.json.".to_string(),
            )
        })?;

        Ok(Self {
            client,
            prompts: PromptService::new(),
            model: config.model,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            formula_after_examples: config.formula_after_examples,
        })
    }

    /// 调用 Gemini 并返回原始文本（统一要求 JSON 响应）
    async fn generate_json(&self, prompt: &str) -> AppResult<String> {
        let options = GenerateOptions {
            temperature: Some(self.temperature),
            max_output_tokens: Some(self.max_output_tokens),
            json_response: true,
        };

        self.client
            .generate(&self.model, prompt, &options)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))
    }

    /// 回答学生问题，返回格式化后的文本
    pub async fn answer_question(&self, question: &str) -> AppResult<String> {
        let prompt = self.prompts.build_answer_prompt(question);
        let raw = self.generate_json(&prompt).await?;

        // 解析失败时把原始文本包成合成回答对象（definition 字段）
        let value = parse_loose_json(&raw).unwrap_or_else(|| {
            warn!("Answer was not valid JSON, wrapping raw text");
            json!({ "definition": raw })
        });

        let answer = StructuredAnswer::from_value(&value);
        let text = if self.formula_after_examples {
            format_answer_with(&answer, &SectionOrder::formula_after_examples())
        } else {
            format_answer(&answer)
        };
        Ok(text)
    }

    /// 为题目生成渐进式提示
    pub async fn generate_hints(&self, problem: &str) -> AppResult<Vec<String>> {
        let prompt = self.prompts.build_hints_prompt(problem);
        let raw = self.generate_json(&prompt).await?;

        let hints = parse_loose_json(&raw)
            .and_then(|value| extract_hints(&value))
            .unwrap_or_else(|| {
                warn!("Hints were not valid JSON, splitting raw text into lines");
                hints_from_lines(&raw)
            });

        Ok(hints)
    }

    /// 根据材料生成一道选择题
    pub async fn generate_quiz(&self, material: &str) -> AppResult<QuizResponse> {
        let prompt = self.prompts.build_quiz_prompt(material);
        let raw = self.generate_json(&prompt).await?;

        let quiz: QuizResponse = parse_loose_json(&raw)
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or_else(|| AppError::Llm("Quiz response was not in the expected format".to_string()))?;

        // correct 必须能和某个选项做字符串匹配，否则前端永远判错
        if !quiz.options.contains(&quiz.correct) {
            warn!("Quiz correct answer is not among options: {:?}", quiz.correct);
        }

        Ok(quiz)
    }
}

/// 去掉模型常加的 Markdown 代码围栏
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // 去掉语言标记（如 ```json）
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_start();
        if let Some(inner) = text.strip_suffix("```") {
            text = inner.trim_end();
        }
    }
    text
}

/// 宽松解析 JSON：先去围栏再解析，失败返回 None
fn parse_loose_json(raw: &str) -> Option<Value> {
    serde_json::from_str(strip_code_fences(raw)).ok()
}

/// 从 JSON 值中提取 hints 数组
fn extract_hints(value: &Value) -> Option<Vec<String>> {
    let items = value.get("hints")?.as_array()?;
    let hints: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if hints.is_empty() {
        None
    } else {
        Some(hints)
    }
}

/// 兜底：把原始文本的非空行当作提示
fn hints_from_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_parse_loose_json() {
        assert!(parse_loose_json("```json\n{\"hints\": []}\n```").is_some());
        assert!(parse_loose_json("{\"ok\": true}").is_some());
        assert!(parse_loose_json("I cannot answer that.").is_none());
    }

    #[test]
    fn test_extract_hints() {
        let value = json!({"hints": ["h1", " h2 ", ""]});
        assert_eq!(
            extract_hints(&value),
            Some(vec!["h1".to_string(), "h2".to_string()])
        );

        // hints 缺失或为空都算失败，走行拆分兜底
        assert_eq!(extract_hints(&json!({})), None);
        assert_eq!(extract_hints(&json!({"hints": []})), None);
        assert_eq!(extract_hints(&json!({"hints": "not a list"})), None);
    }

    #[test]
    fn test_hints_from_lines() {
        let raw = "- First hint\n\n* Second hint\n• Third hint\n";
        assert_eq!(
            hints_from_lines(raw),
            vec!["First hint", "Second hint", "Third hint"]
        );
    }
}
