//! # 上游调用通用类型定义
//!
//! `contents` / `generationConfig` / `candidates` / `usageMetadata` 对代理来说是不透明的，
//! 统一用 `serde_json::Value` 表示并原样透传。

use crate::error::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// 文本生成接口的默认模型
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash-exp";
/// 结构化内容生成接口的默认模型
pub const DEFAULT_CONTENT_MODEL: &str = "gemini-1.5-pro-002";

/// 视为生成失败的 `finishReason`，其余原因（含 `OTHER`）照常返回已生成的文本
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// 发往上游的一次生成调用
///
/// 序列化结果即上游 `generateContent` 请求体，`model` 只用于拼接URL。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Value>,
}

impl GenerateContentRequest {
    /// 单轮文本生成：提示词作为唯一的用户输入
    #[must_use]
    pub fn single_turn(model: impl Into<String>, prompt: &str) -> Self {
        Self {
            model: model.into(),
            contents: vec![json!({
                "role": "user",
                "parts": [{ "text": prompt }],
            })],
            system_instruction: None,
            generation_config: None,
        }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: Option<Value>) -> Self {
        self.system_instruction = instruction;
        self
    }
}

/// 上游生成结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<Value>,
}

impl GenerationResult {
    /// 只有文本的结果（测试替身常用）
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            candidates: None,
            usage_metadata: None,
        }
    }

    /// 从上游 `generateContent` 响应中提取结果
    ///
    /// 文本取第一个候选的全部 text part 拼接；提示被拦截或首个候选因安全等原因终止时返回错误。
    pub fn from_response(response: Value) -> ProviderResult<Self> {
        let Value::Object(mut body) = response else {
            return Err(ProviderError::InvalidResponse {
                message: "response body is not a JSON object".to_string(),
            });
        };

        let candidates = body.remove("candidates");
        let usage_metadata = body.remove("usageMetadata");
        let first = candidates
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|list| list.first());

        let Some(first) = first else {
            if let Some(reason) = body
                .get("promptFeedback")
                .and_then(|feedback| feedback.get("blockReason"))
                .and_then(Value::as_str)
            {
                return Err(ProviderError::Blocked {
                    reason: reason.to_string(),
                });
            }
            return Ok(Self {
                text: String::new(),
                candidates,
                usage_metadata,
            });
        };

        if let Some(reason) = first.get("finishReason").and_then(Value::as_str) {
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                return Err(ProviderError::Blocked {
                    reason: reason.to_string(),
                });
            }
        }

        let text = first
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(Self {
            text,
            candidates,
            usage_metadata,
        })
    }
}

/// 把调用方给出的 systemInstruction 规范化为上游 Content
///
/// 字符串 → 单个 text part；数组 → 每个元素一个 part；对象原样透传；假值视为未提供。
#[must_use]
pub fn system_instruction_from_value(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) if !text.is_empty() => Some(json!({
            "role": "system",
            "parts": [{ "text": text }],
        })),
        Value::Array(items) if !items.is_empty() => {
            let parts: Vec<Value> = items
                .iter()
                .map(|item| match item {
                    Value::String(text) => json!({ "text": text }),
                    other => other.clone(),
                })
                .collect();
            Some(json!({ "role": "system", "parts": parts }))
        }
        Value::Object(_) => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_turn_request_body() {
        let request = GenerateContentRequest::single_turn(DEFAULT_TEXT_MODEL, "Say hi")
            .with_system_instruction(system_instruction_from_value(&json!("Be brief")));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Say hi" }] }],
                "systemInstruction": { "role": "system", "parts": [{ "text": "Be brief" }] },
            })
        );
    }

    #[test]
    fn test_text_joins_all_parts_of_first_candidate() {
        let response = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hello" }, { "text": " world" }] }, "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 3, "totalTokenCount": 5 }
        });

        let result = GenerationResult::from_response(response).unwrap();
        assert_eq!(result.text, "Hello world");
        assert_eq!(result.candidates.unwrap().as_array().unwrap().len(), 2);
        assert_eq!(result.usage_metadata.unwrap()["totalTokenCount"], 5);
    }

    #[test]
    fn test_blocked_prompt_is_an_error() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });

        let err = GenerationResult::from_response(response).unwrap_err();
        assert_eq!(err.to_string(), "Response was blocked due to SAFETY");
    }

    #[test]
    fn test_blocking_finish_reason_is_an_error() {
        let response = json!({
            "candidates": [{ "finishReason": "RECITATION", "content": { "parts": [] } }]
        });

        assert!(matches!(
            GenerationResult::from_response(response),
            Err(ProviderError::Blocked { .. })
        ));
    }

    #[test]
    fn test_other_finish_reasons_keep_text() {
        for reason in ["OTHER", "MAX_TOKENS", "BLOCKLIST"] {
            let response = json!({
                "candidates": [{ "finishReason": reason, "content": { "parts": [{ "text": "partial" }] } }]
            });

            let result = GenerationResult::from_response(response).unwrap();
            assert_eq!(result.text, "partial", "finishReason {reason}");
        }
    }

    #[test]
    fn test_no_candidates_yields_empty_text() {
        let result = GenerationResult::from_response(json!({})).unwrap();
        assert_eq!(result, GenerationResult::from_text(""));
    }

    #[test]
    fn test_non_object_response_is_invalid() {
        assert!(matches!(
            GenerationResult::from_response(json!([1, 2])),
            Err(ProviderError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_system_instruction_normalisation() {
        assert_eq!(system_instruction_from_value(&json!("")), None);
        assert_eq!(system_instruction_from_value(&Value::Null), None);
        assert_eq!(system_instruction_from_value(&json!(false)), None);

        let object = json!({ "parts": [{ "text": "You are a story editor" }] });
        assert_eq!(system_instruction_from_value(&object), Some(object.clone()));

        assert_eq!(
            system_instruction_from_value(&json!(["a", { "text": "b" }])),
            Some(json!({ "role": "system", "parts": [{ "text": "a" }, { "text": "b" }] }))
        );
    }

    #[test]
    fn test_result_serialisation_omits_absent_fields() {
        let body = serde_json::to_value(GenerationResult::from_text("hi")).unwrap();
        assert_eq!(body, json!({ "text": "hi" }));
    }
}
