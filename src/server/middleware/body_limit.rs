//! # 请求体大小限制响应
//!
//! `RequestBodyLimitLayer` 按 `Content-Length` 直接拒绝时返回纯文本 413，
//! 这里把它改写为统一的 JSON 错误响应。

use crate::server::response::normalize_payload_too_large;
use axum::{extract::Request, middleware::Next, response::Response};

/// 请求体限制响应中间件，须位于 `RequestBodyLimitLayer` 外层
pub async fn body_limit_middleware(request: Request, next: Next) -> Response {
    normalize_payload_too_large(next.run(request).await)
}
