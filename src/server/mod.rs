//! # HTTP 服务模块
//!
//! 对外提供健康检查与两个生成接口

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{AppState, GenerationServer, build_router};
