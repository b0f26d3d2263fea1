//! # 应用装配模块

pub mod context;

pub use context::AppContext;
