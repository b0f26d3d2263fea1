//! # 上游生成服务模块
//!
//! 定义上游调用特征、透传类型以及 Google Gemini REST 客户端

pub mod gemini;
pub mod traits;
pub mod types;

pub use crate::error::{ProviderError, ProviderResult};
pub use gemini::GeminiClient;
pub use traits::GenerativeModel;
pub use types::{
    DEFAULT_CONTENT_MODEL, DEFAULT_TEXT_MODEL, GenerateContentRequest, GenerationResult,
    system_instruction_from_value,
};
