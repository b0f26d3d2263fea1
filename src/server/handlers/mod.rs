//! # 请求处理器

pub mod generation;
pub mod health;

pub use generation::{generate_content, generate_text, not_found};
pub use health::health_check;
