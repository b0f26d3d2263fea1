//! # Google Gemini REST 客户端
//!
//! 调用 `POST {base}/v1beta/models/{model}:generateContent`，凭证通过 `x-goog-api-key` 头传递，
//! 不会出现在URL或日志中。

use super::traits::GenerativeModel;
use super::types::{GenerateContentRequest, GenerationResult};
use crate::config::UpstreamConfig;
use crate::error::{ProviderError, ProviderResult, ProxyError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini 客户端
///
/// 内部持有一个共享的 `reqwest::Client`，连接池在所有请求间复用。
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &UpstreamConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::network_with_source("Failed to build upstream HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// 生成接口地址
    ///
    /// 不含 `/` 的模型名补上 `models/` 前缀；`models/xxx`、`tunedModels/xxx` 等完整资源名原样使用，
    /// 只对各段单独编码。
    fn endpoint(&self, model: &str) -> String {
        let resource = if model.contains('/') {
            model
                .split('/')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect::<Vec<_>>()
                .join("/")
        } else {
            format!("models/{}", urlencoding::encode(model))
        };
        format!("{}/{API_VERSION}/{resource}:generateContent", self.base_url)
    }

    fn map_request_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            // 去掉URL，避免把内部地址带给客户端
            ProviderError::Request(err.without_url())
        }
    }
}

/// 从上游错误响应体中提取 `error.message`
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|message| !message.is_empty())
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> ProviderResult<GenerationResult> {
        let url = self.endpoint(&request.model);
        ldebug!(
            "system",
            LogStage::UpstreamRequest,
            LogComponent::Upstream,
            "generate_content",
            &format!(
                "POST {url} (contents={}, system_instruction={}, generation_config={})",
                request.contents.len(),
                request.system_instruction.is_some(),
                request.generation_config.is_some()
            )
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            lwarn!(
                "system",
                LogStage::UpstreamResponse,
                LogComponent::Upstream,
                "upstream_error_status",
                &format!("Upstream returned {status} for model {}", request.model)
            );
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
                message: e.to_string(),
            })?;

        GenerationResult::from_response(value)
    }
}
