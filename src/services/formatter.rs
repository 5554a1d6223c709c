//! 回答格式化器
//!
//! 把 Gemini 返回的松散 JSON 回答整理为前端可渲染的文本块：
//! `**标签**` 开头的节，节之间用空行分隔，列表项用 `• ` 前缀。
//! 这是一个纯函数，对任何输入形状都不会失败。

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// 3 个以上连续换行折叠为 2 个
static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// 文本归一化：去除首尾空白，折叠换行串
///
/// 幂等：normalize(normalize(x)) == normalize(x)
pub fn normalize(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text.trim(), "\n\n").into_owned()
}

/// 输出节类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Definition,
    SimpleExplanation,
    Formula,
    Examples,
    KeyTakeaways,
}

impl Section {
    /// 节的显示标签
    pub fn label(self) -> &'static str {
        match self {
            Section::Definition => "Definition",
            Section::SimpleExplanation => "Simple Explanation",
            Section::Formula => "Formula",
            Section::Examples => "Examples",
            Section::KeyTakeaways => "Key Takeaways",
        }
    }
}

/// 节顺序策略
///
/// 顺序是策略而非定死的规则：默认公式在示例之前，
/// 另一个变体把公式放在示例之后。
#[derive(Debug, Clone)]
pub struct SectionOrder([Section; 5]);

impl SectionOrder {
    /// 默认顺序：Definition, Simple Explanation, Formula, Examples, Key Takeaways
    pub fn default_order() -> Self {
        Self([
            Section::Definition,
            Section::SimpleExplanation,
            Section::Formula,
            Section::Examples,
            Section::KeyTakeaways,
        ])
    }

    /// 变体顺序：公式放在示例之后
    pub fn formula_after_examples() -> Self {
        Self([
            Section::Definition,
            Section::SimpleExplanation,
            Section::Examples,
            Section::Formula,
            Section::KeyTakeaways,
        ])
    }

    /// 按顺序迭代各节
    pub fn iter(&self) -> impl Iterator<Item = Section> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self::default_order()
    }
}

/// 列表项的三种形态
///
/// 按形状显式区分，不做鸭子类型式的隐式处理。
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// 纯文本项
    Text(String),
    /// 带 title/description 的记录项
    Record {
        title: Option<String>,
        description: Option<String>,
    },
    /// 无法识别的项，按原始 JSON 渲染
    Unknown(Value),
}

impl ListItem {
    /// 根据 JSON 值的形状解析列表项
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => ListItem::Text(s.clone()),
            Value::Object(map) => {
                let title = map.get("title").and_then(populated_text);
                let description = map.get("description").and_then(populated_text);
                // 两个字段都没有内容时退回原始 JSON 渲染
                if title.is_none() && description.is_none() {
                    ListItem::Unknown(value.clone())
                } else {
                    ListItem::Record { title, description }
                }
            }
            other => ListItem::Unknown(other.clone()),
        }
    }

    /// 渲染为单行文本（不含前缀）
    fn render(&self) -> String {
        match self {
            ListItem::Text(text) => normalize(text),
            ListItem::Record { title, description } => match (title, description) {
                (Some(t), Some(d)) => format!("{}: {}", normalize(t), normalize(d)),
                (Some(t), None) => normalize(t),
                (None, Some(d)) => normalize(d),
                // from_value 保证至少一个字段有内容
                (None, None) => String::new(),
            },
            ListItem::Unknown(value) => normalize(&value.to_string()),
        }
    }
}

/// 结构化回答
///
/// 每个字段在入口处解析一次，带类型化的默认值；
/// 原始 JSON 保留用于兜底渲染。
#[derive(Debug, Clone)]
pub struct StructuredAnswer {
    definition: Option<String>,
    simple_explanation: Option<String>,
    formula: Option<String>,
    examples: Vec<ListItem>,
    key_takeaways: Vec<ListItem>,
    raw: Value,
}

impl StructuredAnswer {
    /// 从松散的 JSON 值解析结构化回答
    pub fn from_value(value: &Value) -> Self {
        Self {
            definition: field_text(value, "definition"),
            simple_explanation: field_text(value, "simple_explanation"),
            formula: field_text(value, "formula"),
            examples: field_items(value, "examples"),
            key_takeaways: field_items(value, "key_takeaways"),
            raw: value.clone(),
        }
    }
}

/// 提取文本字段；非字符串标量按其 JSON 形式转为文本
fn field_text(value: &Value, key: &str) -> Option<String> {
    coerce_text(value.get(key)?)
}

/// 提取列表字段；非数组值当作单项列表处理
fn field_items(value: &Value, key: &str) -> Vec<ListItem> {
    match value.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(ListItem::from_value).collect(),
        Some(other) => vec![ListItem::from_value(other)],
    }
}

/// 把任意 JSON 值强制转为文本，null 视为缺失
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 提取记录字段中有实际内容的文本
fn populated_text(value: &Value) -> Option<String> {
    let text = coerce_text(value)?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 按默认节顺序格式化回答
pub fn format_answer(answer: &StructuredAnswer) -> String {
    format_answer_with(answer, &SectionOrder::default())
}

/// 按指定节顺序格式化回答
///
/// 只输出非空的节；没有任何可用内容时，返回原始 JSON 的
/// 确定性 pretty-print 作为兜底。
pub fn format_answer_with(answer: &StructuredAnswer, order: &SectionOrder) -> String {
    let mut sections = Vec::new();

    for section in order.iter() {
        if let Some(block) = render_section(answer, section) {
            sections.push(block);
        }
    }

    if sections.is_empty() {
        return fallback_rendering(&answer.raw);
    }

    sections.join("\n\n")
}

/// 渲染单个节，内容为空时返回 None
fn render_section(answer: &StructuredAnswer, section: Section) -> Option<String> {
    let body = match section {
        Section::Definition => text_body(answer.definition.as_deref()),
        Section::SimpleExplanation => text_body(answer.simple_explanation.as_deref()),
        Section::Formula => text_body(answer.formula.as_deref()),
        Section::Examples => list_body(&answer.examples),
        Section::KeyTakeaways => list_body(&answer.key_takeaways),
    }?;

    Some(format!("**{}**\n{}", section.label(), body))
}

/// 归一化文本字段，空白内容视为缺失
fn text_body(text: Option<&str>) -> Option<String> {
    let normalized = normalize(text?);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// 逐项渲染列表，跳过空项
fn list_body(items: &[ListItem]) -> Option<String> {
    let lines: Vec<String> = items
        .iter()
        .filter_map(|item| {
            let rendered = item.render();
            if rendered.is_empty() {
                None
            } else {
                Some(format!("• {}", rendered))
            }
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// 兜底渲染：原始 JSON 的 pretty-print
fn fallback_rendering(raw: &Value) -> String {
    serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize("  hello  "), "hello");
        assert_eq!(normalize("\n\nhello\n"), "hello");
    }

    #[test]
    fn test_normalize_collapses_newline_runs() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        // 两个换行保持不变
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\nb"), "a\nb");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["  a\n\n\n\nb  ", "x", "", "\n\n\n"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_format_sections_in_declared_order() {
        let value = json!({
            "definition": "D",
            "examples": ["e1", "e2"],
            "key_takeaways": ["k1", "k2", "k3"]
        });
        let answer = StructuredAnswer::from_value(&value);
        let text = format_answer(&answer);

        let expected = "**Definition**\nD\n\n\
                        **Examples**\n• e1\n• e2\n\n\
                        **Key Takeaways**\n• k1\n• k2\n• k3";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_absent_fields_omit_labels() {
        let value = json!({ "definition": "only this" });
        let answer = StructuredAnswer::from_value(&value);
        let text = format_answer(&answer);

        assert!(text.contains("**Definition**"));
        assert!(!text.contains("**Simple Explanation**"));
        assert!(!text.contains("**Formula**"));
        assert!(!text.contains("**Examples**"));
        assert!(!text.contains("**Key Takeaways**"));
    }

    #[test]
    fn test_formula_position_is_a_policy() {
        let value = json!({
            "formula": "x = (-b ± √(b²-4ac)) / 2a",
            "examples": ["e1"]
        });
        let answer = StructuredAnswer::from_value(&value);

        let default_text = format_answer(&answer);
        assert!(default_text.find("**Formula**").unwrap() < default_text.find("**Examples**").unwrap());

        let alt_text = format_answer_with(&answer, &SectionOrder::formula_after_examples());
        assert!(alt_text.find("**Examples**").unwrap() < alt_text.find("**Formula**").unwrap());
    }

    #[test]
    fn test_record_item_rendering() {
        let both = ListItem::from_value(&json!({"title": "T", "description": "D"}));
        assert_eq!(both.render(), "T: D");

        let title_only = ListItem::from_value(&json!({"title": "T"}));
        assert_eq!(title_only.render(), "T");

        let description_only = ListItem::from_value(&json!({"description": "D"}));
        assert_eq!(description_only.render(), "D");
    }

    #[test]
    fn test_bare_string_item_takes_text_path() {
        let item = ListItem::from_value(&json!("abc"));
        assert_eq!(item, ListItem::Text("abc".to_string()));
        assert_eq!(item.render(), "abc");
    }

    #[test]
    fn test_record_without_populated_fields_renders_raw_json() {
        let value = json!({"note": "n"});
        let item = ListItem::from_value(&value);
        assert!(matches!(item, ListItem::Unknown(_)));
        assert_eq!(item.render(), r#"{"note":"n"}"#);
    }

    #[test]
    fn test_non_text_items_coerced_to_text() {
        let value = json!({ "examples": [42, true, ["nested"]] });
        let answer = StructuredAnswer::from_value(&value);
        let text = format_answer(&answer);

        assert!(text.contains("• 42"));
        assert!(text.contains("• true"));
        assert!(text.contains("• [\"nested\"]"));
    }

    #[test]
    fn test_empty_object_returns_deterministic_fallback() {
        let value = json!({});
        let answer = StructuredAnswer::from_value(&value);

        let first = format_answer(&answer);
        let second = format_answer(&answer);
        assert_eq!(first, second);
        assert_eq!(first, "{}");
    }

    #[test]
    fn test_unusable_fields_fall_back_to_pretty_json() {
        let value = json!({ "unrecognized": "content", "examples": [] });
        let answer = StructuredAnswer::from_value(&value);
        let text = format_answer(&answer);

        // 兜底输出是原始对象的 pretty-print
        assert!(text.contains("unrecognized"));
        assert_eq!(text, serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_wrong_types_do_not_panic() {
        let values = [
            json!({ "definition": 42 }),
            json!({ "definition": null, "examples": "not a list" }),
            json!({ "examples": { "deeply": { "nested": [1, 2, 3] } } }),
            json!({ "key_takeaways": [null, {}, [[]]] }),
            json!([1, 2, 3]),
            json!("just a string"),
            json!(null),
        ];
        for value in values {
            let answer = StructuredAnswer::from_value(&value);
            // 任何形状都必须得到输出而不是 panic
            let _ = format_answer(&answer);
        }
    }

    #[test]
    fn test_numeric_definition_coerced() {
        let value = json!({ "definition": 42 });
        let answer = StructuredAnswer::from_value(&value);
        assert_eq!(format_answer(&answer), "**Definition**\n42");
    }

    #[test]
    fn test_non_array_list_field_treated_as_single_item() {
        let value = json!({ "examples": "single example" });
        let answer = StructuredAnswer::from_value(&value);
        assert_eq!(format_answer(&answer), "**Examples**\n• single example");
    }

    #[test]
    fn test_whitespace_only_field_skipped() {
        let value = json!({ "definition": "   \n\n  ", "formula": "E = mc²" });
        let answer = StructuredAnswer::from_value(&value);
        let text = format_answer(&answer);

        assert!(!text.contains("**Definition**"));
        assert_eq!(text, "**Formula**\nE = mc²");
    }

    #[test]
    fn test_field_content_is_normalized() {
        let value = json!({ "definition": "  line one\n\n\n\n\nline two  " });
        let answer = StructuredAnswer::from_value(&value);
        assert_eq!(format_answer(&answer), "**Definition**\nline one\n\nline two");
    }
}
