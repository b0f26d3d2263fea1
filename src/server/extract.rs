//! # 请求体提取器
//!
//! 生成接口的请求体一律归一化为 JSON 对象：
//! 缺少 JSON Content-Type、空请求体以及非对象的合法 JSON 都视为空对象，
//! 交给字段校验返回对应的 400；只有无法解析的 JSON 才返回 `Invalid JSON body`。

use super::response::{self, categories};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use serde_json::{Map, Value};

/// 归一化后的 JSON 对象请求体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(request.headers());
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    response::error_with_message(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        categories::BODY_TOO_LARGE,
                        rejection.body_text(),
                    )
                } else {
                    response::error_with_message(
                        StatusCode::BAD_REQUEST,
                        categories::INVALID_JSON_BODY,
                        rejection.body_text(),
                    )
                }
            })?;

        parse_object(is_json, &bytes).map(Self)
    }
}

/// `application/json` 或 `application/*+json`
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn parse_object(is_json: bool, bytes: &[u8]) -> Result<Map<String, Value>, Response> {
    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(response::error_with_message(
            StatusCode::BAD_REQUEST,
            categories::INVALID_JSON_BODY,
            format!("Failed to parse the request body as JSON: {e}"),
        )),
    }
}
