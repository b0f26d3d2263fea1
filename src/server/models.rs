//! # 请求/响应模型
//!
//! 入站请求体先解析为 JSON 对象，再按字段宽松校验：缺失、假值或类型不符的必填字段
//! 一律视为未提供。

use super::response::categories;
use crate::providers::{
    DEFAULT_CONTENT_MODEL, DEFAULT_TEXT_MODEL, GenerateContentRequest,
    system_instruction_from_value,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// 请求校验失败；`Display` 即响应中的 `error` 类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("{}", categories::PROMPT_REQUIRED)]
    MissingPrompt,
    #[error("{}", categories::CONTENTS_REQUIRED)]
    MissingContents,
}

impl RequestValidationError {
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::MissingPrompt => categories::PROMPT_REQUIRED,
            Self::MissingContents => categories::CONTENTS_REQUIRED,
        }
    }
}

/// `POST /api/generate-text` 请求
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<Value>,
    pub model: String,
}

impl TextGenerationRequest {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, RequestValidationError> {
        let prompt = match body.get("prompt") {
            Some(Value::String(prompt)) if !prompt.is_empty() => prompt.clone(),
            _ => return Err(RequestValidationError::MissingPrompt),
        };

        Ok(Self {
            prompt,
            system_instruction: body
                .get("systemInstruction")
                .and_then(system_instruction_from_value),
            model: model_or_default(body.get("model"), DEFAULT_TEXT_MODEL),
        })
    }

    #[must_use]
    pub fn into_upstream(self) -> GenerateContentRequest {
        GenerateContentRequest::single_turn(self.model, &self.prompt)
            .with_system_instruction(self.system_instruction)
    }
}

/// `POST /api/generate-content` 请求
#[derive(Debug, Clone, PartialEq)]
pub struct ContentGenerationRequest {
    pub model: String,
    pub system_instruction: Option<Value>,
    pub contents: Vec<Value>,
    pub generation_config: Option<Value>,
}

impl ContentGenerationRequest {
    pub fn from_body(mut body: Map<String, Value>) -> Result<Self, RequestValidationError> {
        let contents = match body.remove("contents") {
            Some(Value::Array(contents)) => contents,
            _ => return Err(RequestValidationError::MissingContents),
        };

        Ok(Self {
            model: model_or_default(body.get("model"), DEFAULT_CONTENT_MODEL),
            system_instruction: body
                .get("systemInstruction")
                .and_then(system_instruction_from_value),
            contents,
            generation_config: body
                .remove("generationConfig")
                .filter(|config| !config.is_null()),
        })
    }

    #[must_use]
    pub fn into_upstream(self) -> GenerateContentRequest {
        GenerateContentRequest {
            model: self.model,
            contents: self.contents,
            system_instruction: self.system_instruction,
            generation_config: self.generation_config,
        }
    }
}

fn model_or_default(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(model)) if !model.trim().is_empty() => model.trim().to_string(),
        _ => default.to_string(),
    }
}

/// `POST /api/generate-text` 成功响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextResponse {
    pub text: String,
}

/// `GET /health` 响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
