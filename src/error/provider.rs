use thiserror::Error;

/// 上游生成服务调用失败
///
/// `Display` 输出即返回给客户端的 `message` 字段，不包含密钥等敏感信息。
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Error fetching from upstream: [{status}] {message}")]
    ApiError { status: u16, message: String },

    #[error("Upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Upstream request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Response was blocked due to {reason}")]
    Blocked { reason: String },

    #[error("Invalid response from upstream: {message}")]
    InvalidResponse { message: String },

    // Generic fallback for dynamic errors
    #[error("{message}")]
    General { message: String },
}

impl ProviderError {
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// 尽力提取的错误描述，空时回退为 `Unknown error`
    #[must_use]
    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }
}
