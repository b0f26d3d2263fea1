//! # API 响应结构
//!
//! 成功响应直接返回数据本体；错误响应统一为 `{ error, message? }`，
//! 其中 `error` 是调用方可能据此分支的稳定类别字符串。

use crate::error::ProviderError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 稳定的错误类别字符串，跨版本不可更改
pub mod categories {
    pub const PROMPT_REQUIRED: &str = "Prompt is required";
    pub const CONTENTS_REQUIRED: &str = "Contents array is required";
    pub const FAILED_TO_GENERATE_TEXT: &str = "Failed to generate text";
    pub const FAILED_TO_GENERATE_CONTENT: &str = "Failed to generate content";
    pub const INVALID_JSON_BODY: &str = "Invalid JSON body";
    pub const BODY_TOO_LARGE: &str = "Request body too large";
    pub const NOT_FOUND: &str = "Not found";
}

/// # 标准错误响应
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Success(T),
    Error(StatusCode, &'static str, Option<String>),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Self::Error(status, category, message) => (
                status,
                Json(ErrorResponse {
                    error: category.to_string(),
                    message,
                }),
            )
                .into_response(),
        }
    }
}

/// # 便捷函数：成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    ApiResponse::Success(data).into_response()
}

/// # 便捷函数：仅含类别的错误响应
pub fn error(status: StatusCode, category: &'static str) -> Response {
    ApiResponse::<()>::Error(status, category, None).into_response()
}

/// # 便捷函数：带详情的错误响应
pub fn error_with_message(
    status: StatusCode,
    category: &'static str,
    message: impl Into<String>,
) -> Response {
    ApiResponse::<()>::Error(status, category, Some(message.into())).into_response()
}

/// # 便捷函数：上游失败统一转换为 500
pub fn upstream_error(category: &'static str, error: &ProviderError) -> Response {
    error_with_message(
        StatusCode::INTERNAL_SERVER_ERROR,
        category,
        error.client_message(),
    )
}

/// # 把请求体限制层产生的纯文本 413 统一为 JSON 错误
pub fn normalize_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return error_with_message(
            StatusCode::PAYLOAD_TOO_LARGE,
            categories::BODY_TOO_LARGE,
            "length limit exceeded",
        );
    }
    response
}
