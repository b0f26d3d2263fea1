//! # 服务器中间件
//!
//! 请求ID、安全响应头、请求体限制响应、限流和客户端IP解析

pub mod body_limit;
pub mod client_ip;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use body_limit::body_limit_middleware;
pub use client_ip::get_real_client_ip;
pub use rate_limit::rate_limit_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::{SECURITY_HEADERS, security_headers_middleware};
