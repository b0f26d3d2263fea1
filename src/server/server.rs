//! # HTTP 服务器
//!
//! 组装路由与中间件栈，并负责监听、优雅关闭以及限流计数清理任务的生命周期
#![allow(clippy::module_inception)]

use super::handlers;
use super::middleware::{
    body_limit_middleware, rate_limit_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::app::AppContext;
use crate::config::{AppConfig, HEALTH_PATH};
use crate::error::{ProxyError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::providers::GenerativeModel;
use crate::{lerror, linfo};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 构建完整路由
///
/// 中间件自外向内：请求ID -> 访问日志 -> 安全响应头 -> CORS -> 请求体大小限制，
/// 限流只作用于 API 前缀。
pub fn build_router(state: AppState) -> Router {
    let config = &state.config.server;

    let api_routes = super::routes::create_routes().layer(from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ));

    let middleware = ServiceBuilder::new()
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(config.allowed_origin.as_deref()))
        .layer(from_fn(body_limit_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size));

    Router::new()
        .route(HEALTH_PATH, get(handlers::health_check))
        .nest(&config.api_prefix, api_routes)
        .fallback(handlers::not_found)
        .layer(middleware)
        .with_state(state)
}

/// CORS：仅 GET/POST，允许携带凭证
///
/// 未配置来源时回显请求的 Origin，因为通配符 `*` 不能与凭证同时使用；
/// 配置了来源时，其他来源的响应不带 `Access-Control-Allow-Origin`。
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::list([origin]),
        _ => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// 生成代理服务器
pub struct GenerationServer {
    /// 配置
    config: Arc<AppConfig>,
    /// 应用状态
    state: AppState,
    /// 路由器
    router: Router,
}

impl GenerationServer {
    /// 创建新的服务器；配置无效时失败
    pub fn new(config: AppConfig, model: Arc<dyn GenerativeModel>) -> Result<Self> {
        config.validate()?;

        let context = Arc::new(AppContext::from_config(config, model));
        let state = AppState::new(context);
        let router = build_router(state.clone());

        Ok(Self {
            config: Arc::clone(&state.config),
            state,
            router,
        })
    }

    /// 路由器副本，便于测试直接驱动
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 启动服务器，直到收到关闭信号
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address()?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ProxyError::server_start_with_source(format!("Failed to bind {addr}"), e)
        })?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_ready",
            &format!(
                "Server running on {addr} (port {}), health check at http://{addr}{HEALTH_PATH}, upstream={}, API key configured: {}",
                self.config.server.port,
                self.state.model.name(),
                self.config.has_api_key()
            )
        );

        let shutdown = CancellationToken::new();
        let sweeper = self.state.rate_limiter.spawn_sweeper(shutdown.clone());

        let result = axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ProxyError::server_start_with_source("HTTP server terminated with error", e));

        shutdown.cancel();
        if let Err(e) = sweeper.await {
            lerror!(
                "system",
                LogStage::Shutdown,
                LogComponent::ServerSetup,
                "sweeper_join_failed",
                &format!("Rate limit sweeper panicked: {e:?}")
            );
        }

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stopped",
            "Server stopped"
        );
        result
    }
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            lerror!(
                "system",
                LogStage::Shutdown,
                LogComponent::ServerSetup,
                "ctrl_c_error",
                &format!("Failed to listen for Ctrl+C: {e:?}")
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                lerror!(
                    "system",
                    LogStage::Shutdown,
                    LogComponent::ServerSetup,
                    "sigterm_error",
                    &format!("Failed to listen for SIGTERM: {e:?}")
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let reason = tokio::select! {
        () = ctrl_c => "Ctrl+C signal",
        () = terminate => "SIGTERM signal",
    };

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::ServerSetup,
        "shutdown_initiated",
        &format!("Graceful shutdown: {reason}")
    );
}
