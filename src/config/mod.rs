//! # 配置管理模块
//!
//! 启动时一次性从环境变量加载并验证配置；加载失败时进程在监听端口之前退出

mod app_config;
mod loader;

pub use app_config::{AppConfig, RateLimitConfig, ServerConfig, UpstreamConfig};
pub use app_config::{API_PREFIX, DEFAULT_PORT, HEALTH_PATH, MAX_BODY_SIZE};
pub use loader::{ENV_API_KEY, load_config, load_config_from};
