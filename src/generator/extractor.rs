//! 结构化输出提取 - 从不同形态的模型输出中恢复出合法的创意对象

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::idea::IdeaRecord;

/// 文本恢复时最多尝试的 `{` 起点数
pub const MAX_OBJECT_STARTS: usize = 64;

/// Agent的原始输出形态
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    /// 已经是结构化对象
    Mapping(Map<String, Value>),
    /// 内容块列表
    Blocks(Vec<Value>),
    /// 纯文本，可能夹带JSON
    Text(String),
}

impl From<Value> for AgentOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => AgentOutput::Mapping(map),
            Value::Array(blocks) => AgentOutput::Blocks(blocks),
            Value::String(text) => AgentOutput::Text(text),
            other => AgentOutput::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("输出中没有可解析的JSON对象")]
    NoJsonObject,
    #[error("JSON对象缺少必需字段: {0}")]
    MissingFields(String),
}

/// 按 对象 → 内容块 → 文本 的顺序尝试，第一个命中的结果胜出
pub fn extract_idea(output: &AgentOutput) -> Result<IdeaRecord, ExtractError> {
    match output {
        AgentOutput::Mapping(map) => record_from(map),
        AgentOutput::Blocks(blocks) => {
            if let Some(record) = blocks
                .iter()
                .filter_map(Value::as_object)
                .find_map(IdeaRecord::from_object)
            {
                return Ok(record);
            }

            let joined: String = blocks.iter().map(block_text).collect();
            record_from_text(&joined)
        }
        AgentOutput::Text(text) => record_from_text(text),
    }
}

/// 文本中可能先出现格式示例之类的小对象，优先取第一个五个字段齐全的对象；
/// 都不齐全时按第一个对象报告缺失字段
fn record_from_text(text: &str) -> Result<IdeaRecord, ExtractError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        return record_from(&map);
    }

    let mut first = None;
    for object in json_objects(text) {
        if let Some(record) = IdeaRecord::from_object(&object) {
            return Ok(record);
        }
        first.get_or_insert(object);
    }

    match first {
        Some(object) => record_from(&object),
        None => Err(ExtractError::NoJsonObject),
    }
}

fn record_from(object: &Map<String, Value>) -> Result<IdeaRecord, ExtractError> {
    IdeaRecord::from_object(object).ok_or_else(|| {
        let missing: Vec<&str> = IdeaRecord::FIELDS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        ExtractError::MissingFields(missing.join(", "))
    })
}

/// 对象块取其text字段，其它块取字符串形式
fn block_text(block: &Value) -> String {
    match block {
        Value::Object(map) => map
            .get("text")
            .map(crate::types::idea::coerce_to_string)
            .unwrap_or_default(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// 先整体严格解析，失败再从文本中找JSON对象子串
pub fn parse_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        return Some(map);
    }
    find_json_object(text)
}

/// 从夹杂文字的文本中恢复JSON对象，返回第一个能解析为对象的括号配平子串
pub fn find_json_object(text: &str) -> Option<Map<String, Value>> {
    json_objects(text).next()
}

/// 依次尝试每个 `{` 起始的括号配平子串，产出能解析为对象的那些。
/// 最多尝试 [`MAX_OBJECT_STARTS`] 个起点，每个起点的扫描是线性的
fn json_objects(text: &str) -> impl Iterator<Item = Map<String, Value>> + '_ {
    text.match_indices('{')
        .take(MAX_OBJECT_STARTS)
        .filter_map(move |(start, _)| {
            let candidate = balanced_object_at(&text[start..])?;
            match serde_json::from_str::<Value>(candidate) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            }
        })
}

/// 从以 `{` 开头的文本中截出配平的对象，字符串字面量中的括号不计数
fn balanced_object_at(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=offset]);
                }
            }
            _ => {}
        }
    }

    None
}
