//! # 应用配置结构定义

use crate::error::{ProxyError, Result};
use crate::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3001;
/// 健康检查路径（不受限流约束）
pub const HEALTH_PATH: &str = "/health";
/// 受限流保护的API前缀
pub const API_PREFIX: &str = "/api";
/// 请求体大小上限：10MB
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// 应用主配置结构
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 上游服务凭证，永不序列化、永不打印
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 限流配置
    pub rate_limit: RateLimitConfig,
    /// 上游服务配置
    pub upstream: UpstreamConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 允许的 CORS 源；`None` 表示允许任意源
    pub allowed_origin: Option<String>,
    /// 受限流保护的 API 前缀
    pub api_prefix: String,
    /// 最大请求体大小（字节）
    pub max_body_size: usize,
    /// 是否信任 `X-Forwarded-For` / `X-Real-IP`
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            allowed_origin: None,
            api_prefix: API_PREFIX.to_string(),
            max_body_size: MAX_BODY_SIZE,
            trust_proxy: false,
        }
    }
}

/// 限流配置：固定窗口，按来源IP计数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// 窗口长度（秒）
    pub window_secs: u64,
    /// 每个窗口内每个IP允许的最大请求数
    pub max_requests: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// 上游生成服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API 基础地址
    pub base_url: String,
    /// 单次调用超时（秒）
    pub timeout_secs: u64,
    /// 建连超时（秒）
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// 使用给定凭证和默认值构造配置
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }

    /// 是否持有上游凭证
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self.server.host.parse::<IpAddr>().map_err(|e| {
            ProxyError::config_with_source(
                format!("Invalid bind address '{}'", self.server.host),
                e,
            )
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure!(self.has_api_key(), Config, "Upstream API key must be provided");
        ensure!(self.server.port > 0, Config, "Server port must be greater than 0");
        self.bind_address()?;

        let prefix = &self.server.api_prefix;
        ensure!(
            prefix.starts_with('/') && prefix.len() > 1,
            Config,
            "API prefix must start with '/' and be non-empty: '{}'",
            prefix
        );
        ensure!(
            self.server.max_body_size > 0,
            Config,
            "Max body size must be greater than 0"
        );
        if let Some(origin) = &self.server.allowed_origin {
            if axum::http::HeaderValue::from_str(origin).is_err() {
                bail!(Config, "Invalid allowed origin '{}'", origin);
            }
        }

        ensure!(
            self.rate_limit.window_secs > 0,
            Config,
            "Rate limit window must be greater than 0"
        );
        ensure!(
            self.rate_limit.max_requests > 0,
            Config,
            "Rate limit max_requests must be greater than 0"
        );

        url::Url::parse(&self.upstream.base_url).map_err(|e| {
            ProxyError::config_with_source(
                format!("Invalid upstream base URL '{}'", self.upstream.base_url),
                e,
            )
        })?;
        ensure!(
            self.upstream.timeout_secs > 0,
            Config,
            "Upstream timeout must be greater than 0"
        );

        Ok(())
    }

    /// 脱敏后的凭证，仅用于日志
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        mask_sensitive_info(&self.api_key)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.masked_api_key())
            .field("server", &self.server)
            .field("rate_limit", &self.rate_limit)
            .field("upstream", &self.upstream)
            .finish()
    }
}

/// 屏蔽敏感信息，只保留前4个字符
fn mask_sensitive_info(value: &str) -> String {
    if value.is_empty() {
        return "<unset>".to_string();
    }
    let visible: String = value.chars().take(4).collect();
    if value.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
