//! # 限流中间件
//!
//! 仅挂载在 API 前缀下的路由上。超限请求直接返回 429 纯文本，不进入处理器也不调用上游。

use super::client_ip::get_real_client_ip;
use crate::lwarn;
use crate::logging::{LogComponent, LogStage};
use crate::rate_limit::{RATE_LIMIT_MESSAGE, RateLimitOutcome};
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// 限流中间件
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = get_real_client_ip(&request, state.config.server.trust_proxy);

    let outcome = match state.rate_limiter.check(&client_ip.to_string()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            // 计数存储不可用时放行
            lwarn!(
                "system",
                LogStage::RateLimit,
                LogComponent::Middleware,
                "rate_limit_store_error",
                &format!("Rate limit check failed for {client_ip}, allowing request: {e}")
            );
            return next.run(request).await;
        }
    };

    if !outcome.allowed {
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            RATE_LIMIT_MESSAGE,
        )
            .into_response();
        apply_headers(response.headers_mut(), &outcome);
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(reset_secs(&outcome).max(1)),
        );
        return response;
    }

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), &outcome);
    response
}

fn apply_headers(headers: &mut HeaderMap, outcome: &RateLimitOutcome) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(outcome.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(outcome.remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(reset_at(outcome)));
}

/// 窗口重置时刻（Unix 时间戳，秒）
fn reset_at(outcome: &RateLimitOutcome) -> i64 {
    let remaining = i64::try_from(reset_secs(outcome)).unwrap_or(i64::MAX);
    Utc::now().timestamp().saturating_add(remaining)
}

/// 窗口剩余秒数，向上取整
fn reset_secs(outcome: &RateLimitOutcome) -> u64 {
    outcome.reset_after.as_secs() + u64::from(outcome.reset_after.subsec_nanos() > 0)
}
