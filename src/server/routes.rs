//! # 路由配置
//!
//! 定义挂载在 API 前缀下的生成接口路由

use super::AppState;
use super::handlers;
use axum::Router;
use axum::routing::post;

/// 创建 API 路由（由上层嵌套到 API 前缀并挂载限流中间件）
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-text", post(handlers::generate_text))
        .route("/generate-content", post(handlers::generate_content))
        .fallback(handlers::not_found)
}
