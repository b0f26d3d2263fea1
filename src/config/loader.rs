//! # 环境变量配置加载
//!
//! 空字符串视为未设置；可选变量格式错误与缺少凭证一样属于致命配置错误

use super::app_config::{AppConfig, RateLimitConfig, ServerConfig, UpstreamConfig};
use crate::error::{ProxyError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// 上游凭证（必需）
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// 监听端口
const ENV_PORT: &str = "PORT";
/// 监听地址
const ENV_HOST: &str = "HOST";
/// 允许的 CORS 源
const ENV_ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
const ENV_RATE_LIMIT_WINDOW: &str = "RATE_LIMIT_WINDOW_SECS";
const ENV_RATE_LIMIT_MAX: &str = "RATE_LIMIT_MAX_REQUESTS";
const ENV_TRUST_PROXY: &str = "TRUST_PROXY";
const ENV_UPSTREAM_BASE_URL: &str = "GEMINI_API_BASE_URL";
const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT_SECS";

/// 从进程环境变量加载配置
pub fn load_config() -> Result<AppConfig> {
    load_config_from(|key| env::var(key).ok())
}

/// 从任意键值来源加载配置
pub fn load_config_from<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let api_key = get(ENV_API_KEY).ok_or_else(|| {
        ProxyError::config(format!("{ENV_API_KEY} is not set in the environment"))
    })?;

    let server_defaults = ServerConfig::default();
    let rate_defaults = RateLimitConfig::default();
    let upstream_defaults = UpstreamConfig::default();

    let config = AppConfig {
        api_key,
        server: ServerConfig {
            host: get(ENV_HOST).unwrap_or(server_defaults.host),
            port: parse_var(&get, ENV_PORT, server_defaults.port)?,
            allowed_origin: get(ENV_ALLOWED_ORIGIN),
            api_prefix: server_defaults.api_prefix,
            max_body_size: server_defaults.max_body_size,
            trust_proxy: parse_flag(&get, ENV_TRUST_PROXY, server_defaults.trust_proxy)?,
        },
        rate_limit: RateLimitConfig {
            window_secs: parse_var(&get, ENV_RATE_LIMIT_WINDOW, rate_defaults.window_secs)?,
            max_requests: parse_var(&get, ENV_RATE_LIMIT_MAX, rate_defaults.max_requests)?,
        },
        upstream: UpstreamConfig {
            base_url: get(ENV_UPSTREAM_BASE_URL).unwrap_or(upstream_defaults.base_url),
            timeout_secs: parse_var(&get, ENV_UPSTREAM_TIMEOUT, upstream_defaults.timeout_secs)?,
            connect_timeout_secs: upstream_defaults.connect_timeout_secs,
        },
    };

    config.validate()?;
    debug!(config = ?config, "配置加载完成");
    Ok(config)
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(key).map_or(Ok(default), |raw| {
        raw.parse::<T>().map_err(|e| {
            ProxyError::config_with_source(format!("{key} has an invalid value: '{raw}'"), e)
        })
    })
}

fn parse_flag<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|raw| raw.to_ascii_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ProxyError::config(format!(
                "{key} must be a boolean flag, got '{raw}'"
            ))),
        },
    }
}
