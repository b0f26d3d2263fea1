//! # 请求关联ID
//!
//! 前置网关已分配 `x-request-id` 时沿用（仅接受短小的可见 ASCII 标识），否则生成 UUID v4。
//! ID 注入请求扩展供处理器日志使用，并写回响应头；同时记录请求起止与耗时。

use crate::ldebug;
use crate::logging::{LogComponent, LogStage};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// 请求ID响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 沿用的外部请求ID最大长度
const MAX_INBOUND_LEN: usize = 128;

/// 单个请求的关联ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// 新生成的 UUID v4
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 沿用请求头中的ID；缺失、过长或含非法字符时生成新ID
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| is_acceptable(id))
            .map_or_else(Self::new, |id| Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_INBOUND_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

/// 请求ID中间件
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    request.extensions_mut().insert(request_id.clone());

    ldebug!(
        request_id,
        LogStage::RequestStart,
        LogComponent::Middleware,
        "request_start",
        &format!("{method} {path}")
    );
    let started = Instant::now();

    let mut response = next.run(request).await;

    ldebug!(
        request_id,
        LogStage::Response,
        LogComponent::Middleware,
        "request_complete",
        &format!(
            "{method} {path} -> {} in {}ms",
            response.status().as_u16(),
            started.elapsed().as_millis()
        )
    );
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
