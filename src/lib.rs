//! # Generation Proxy Library
//!
//! 生成式语言模型代理服务核心库：请求校验、上游调用、响应整形以及限流/CORS/请求体限制等防护

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ProxyError, Result};
pub use server::GenerationServer;
