//! # 错误处理测试

use crate::error::{ProviderError, ProxyError};
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = ProxyError::config("GEMINI_API_KEY 未设置");
    assert!(err.is_config());
    assert_eq!(err.to_string(), "配置错误: GEMINI_API_KEY 未设置");
}

#[test]
fn test_config_error_with_source() {
    let parse_err = "abc".parse::<u16>().unwrap_err();
    let err = ProxyError::config_with_source("PORT 不是合法端口", parse_err);

    assert!(err.is_config());
    assert!(err.to_string().contains("PORT 不是合法端口"));
    assert!(err.source().is_some());
}

#[test]
fn test_error_macro_formats_message() {
    let port = 0;
    let err = crate::error!(Config, "invalid port {}", port);
    assert_eq!(err.to_string(), "配置错误: invalid port 0");

    let err = crate::error!(Network, format!("bind failed on {}", "0.0.0.0:3001"));
    assert!(matches!(err, ProxyError::Network { .. }));
}

#[test]
fn test_ensure_macro_short_circuits() {
    fn check(limit: u64) -> crate::error::Result<u64> {
        crate::ensure!(limit > 0, Config, "limit must be positive");
        Ok(limit)
    }

    assert_eq!(check(5).unwrap(), 5);
    assert!(check(0).unwrap_err().is_config());
}

#[test]
fn test_bail_macro_returns_early() {
    fn reject(key: &str) -> crate::error::Result<()> {
        crate::bail!(RateLimit, "counter store unavailable for {}", key);
    }

    let err = reject("10.0.0.1").unwrap_err();
    assert!(matches!(err, ProxyError::RateLimit { .. }));
    assert_eq!(
        err.to_string(),
        "速率限制错误: counter store unavailable for 10.0.0.1"
    );
}

#[test]
fn test_provider_error_is_transparent() {
    let err: ProxyError = ProviderError::ApiError {
        status: 400,
        message: "API key not valid".to_string(),
    }
    .into();

    assert_eq!(
        err.to_string(),
        "Error fetching from upstream: [400] API key not valid"
    );
}

#[test]
fn test_provider_client_message_falls_back() {
    assert_eq!(ProviderError::general("").client_message(), "Unknown error");
    assert_eq!(
        ProviderError::Timeout { seconds: 30 }.client_message(),
        "Upstream request timed out after 30s"
    );
}
