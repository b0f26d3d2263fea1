//! # 生成接口处理器
//!
//! 两个接口共享同样的流程：解析请求体 -> 校验 -> 调用上游 -> 映射响应。
//! 校验失败时绝不调用上游。

use crate::logging::{LogComponent, LogStage};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::middleware::RequestId;
use crate::server::models::{ContentGenerationRequest, TextGenerationRequest, TextResponse};
use crate::server::response::{self, categories};
use crate::{ldebug, lerror, linfo};
use axum::{Extension, extract::State, http::StatusCode, response::Response};

/// `POST /api/generate-text`
pub async fn generate_text(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(body): JsonBody,
) -> Response {
    let request = match TextGenerationRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => {
            ldebug!(
                request_id,
                LogStage::Validation,
                LogComponent::Handler,
                "generate_text",
                &format!("Rejected request: {e}")
            );
            return response::error(StatusCode::BAD_REQUEST, e.category());
        }
    };

    let model = request.model.clone();
    match state.model.generate_content(request.into_upstream()).await {
        Ok(result) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Handler,
                "generate_text",
                &format!("Generated {} chars with {model}", result.text.len())
            );
            response::success(TextResponse { text: result.text })
        }
        Err(e) => {
            lerror!(
                request_id,
                LogStage::UpstreamResponse,
                LogComponent::Handler,
                "generate_text",
                &format!("Error generating text with {model}: {e}")
            );
            response::upstream_error(categories::FAILED_TO_GENERATE_TEXT, &e)
        }
    }
}

/// `POST /api/generate-content`
pub async fn generate_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(body): JsonBody,
) -> Response {
    let request = match ContentGenerationRequest::from_body(body) {
        Ok(request) => request,
        Err(e) => {
            ldebug!(
                request_id,
                LogStage::Validation,
                LogComponent::Handler,
                "generate_content",
                &format!("Rejected request: {e}")
            );
            return response::error(StatusCode::BAD_REQUEST, e.category());
        }
    };

    let model = request.model.clone();
    let turns = request.contents.len();
    match state.model.generate_content(request.into_upstream()).await {
        Ok(result) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Handler,
                "generate_content",
                &format!("Generated content from {turns} turns with {model}")
            );
            response::success(result)
        }
        Err(e) => {
            lerror!(
                request_id,
                LogStage::UpstreamResponse,
                LogComponent::Handler,
                "generate_content",
                &format!("Error generating content with {model}: {e}")
            );
            response::upstream_error(categories::FAILED_TO_GENERATE_CONTENT, &e)
        }
    }
}

/// 未匹配路由
pub async fn not_found() -> Response {
    response::error(StatusCode::NOT_FOUND, categories::NOT_FOUND)
}
