//! # 客户端IP解析
//!
//! 限流以来源IP为键。默认只信任 TCP 对端地址；开启 `trust_proxy` 后优先使用转发头。

use axum::{extract::ConnectInfo, http::HeaderMap, http::Request};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// 获取真实客户端IP地址
///
/// 无法确定时返回 `0.0.0.0`，所有无法识别来源的请求共享同一个限流窗口。
pub fn get_real_client_ip<B>(request: &Request<B>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(ip) = forwarded_ip(request.headers()) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |connect_info| {
            connect_info.0.ip()
        })
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For 可能包含多个IP，取第一个
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
    {
        return Some(ip);
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<IpAddr>().ok())
}
