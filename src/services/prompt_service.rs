//! Prompt 构建服务
//!
//! 为各个端点构建发送给 Gemini 的提示词，统一要求模型只返回 JSON。

/// Study Buddy 系统提示词
const ANSWER_PROMPT: &str = r#"You are a friendly study buddy helping a school student understand a concept.

Answer the student's question using ONLY a JSON object with this exact shape (every field is optional, omit fields that do not apply):
{
  "definition": "a precise one-or-two sentence definition",
  "simple_explanation": "an intuitive explanation a beginner can follow",
  "formula": "the key formula, if the topic has one, using plain text math",
  "examples": ["a short worked example", {"title": "name", "description": "details"}],
  "key_takeaways": ["the most important points to remember"]
}

Return ONLY the JSON object, no markdown fences, no commentary."#;

/// 提示生成提示词
const HINTS_PROMPT: &str = r#"You are a tutor helping a student solve a problem on their own.

Give exactly 3 progressive hints for the problem below. Start gentle, get more specific, but NEVER reveal the full solution.

Reply with ONLY a JSON object of this shape:
{"hints": ["first hint", "second hint", "third hint"]}"#;

/// 测验生成提示词
const QUIZ_PROMPT: &str = r#"You are a teacher writing a quick comprehension check.

Create one multiple-choice question based on the material below, with exactly 4 options and one correct answer.

Reply with ONLY a JSON object of this shape:
{"question": "...", "options": ["A", "B", "C", "D"], "correct": "the correct option copied verbatim from options"}"#;

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建 Study Buddy 回答提示词
    pub fn build_answer_prompt(&self, question: &str) -> String {
        format!("{}\n\nStudent's question:\n{}", ANSWER_PROMPT, question)
    }

    /// 构建提示生成提示词
    pub fn build_hints_prompt(&self, problem: &str) -> String {
        format!("{}\n\nProblem:\n{}", HINTS_PROMPT, problem)
    }

    /// 构建测验生成提示词
    pub fn build_quiz_prompt(&self, material: &str) -> String {
        format!("{}\n\nMaterial:\n{}", QUIZ_PROMPT, material)
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
