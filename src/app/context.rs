//! 应用上下文（DI 容器）
//!
//! 统一持有跨请求共享的只读配置、上游客户端和限流器，便于在测试中注入替身实现。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::providers::GenerativeModel;
use crate::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub model: Arc<dyn GenerativeModel>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        model: Arc<dyn GenerativeModel>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self { config, model, rate_limiter }
    }

    /// 按配置创建默认的进程内限流器
    pub fn from_config(config: AppConfig, model: Arc<dyn GenerativeModel>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        Self::new(Arc::new(config), model, rate_limiter)
    }
}
