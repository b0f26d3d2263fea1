//! # 集成测试公共工具
//!
//! 提供可记录调用的上游替身，以及带 `ConnectInfo` 的请求构造函数
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use generation_proxy::config::AppConfig;
use generation_proxy::error::{ProviderError, ProviderResult};
use generation_proxy::providers::{GenerateContentRequest, GenerationResult, GenerativeModel};
use generation_proxy::GenerationServer;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// 上游替身：记录每次调用；模型名为 `broken-model` 时返回上游错误
#[derive(Default)]
pub struct StubModel {
    calls: Mutex<Vec<GenerateContentRequest>>,
}

impl StubModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<GenerateContentRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> ProviderResult<GenerationResult> {
        self.calls.lock().unwrap().push(request.clone());

        if request.model == "broken-model" {
            return Err(ProviderError::ApiError {
                status: 404,
                message: "models/broken-model is not found".to_string(),
            });
        }

        let prompt = request
            .contents
            .first()
            .and_then(|turn| turn.pointer("/parts/0/text"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let text = if prompt == "Say hi" {
            "Hello world".to_string()
        } else {
            format!("echo: {prompt}")
        };

        Ok(GenerationResult {
            text,
            candidates: Some(json!([{ "content": { "parts": [{ "text": "..." }] } }])),
            usage_metadata: Some(json!({ "totalTokenCount": 7 })),
        })
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::with_api_key("test-key")
}

/// 使用给定配置与替身构建路由
pub fn app_with(config: AppConfig, model: Arc<StubModel>) -> Router {
    GenerationServer::new(config, model)
        .expect("test config must be valid")
        .router()
}

pub fn app(model: Arc<StubModel>) -> Router {
    app_with(test_config(), model)
}

/// 构造带来源地址的请求
pub fn request_from(ip: [u8; 4], method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let mut request = builder.body(body).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    request
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    request_from([127, 0, 0, 1], "POST", uri, Some(body))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
