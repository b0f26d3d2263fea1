//! The unified error handling system for the application.

// 1. Core Types
pub use provider::ProviderError;
pub use types::ProxyError;

/// A unified `Result` type for the entire application.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Result of a single upstream generation call.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

// 2. Module declarations
pub mod macros;
pub mod provider;
pub mod types;

#[cfg(test)]
mod tests;
