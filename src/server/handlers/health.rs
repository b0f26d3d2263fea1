//! # 健康检查处理器

use crate::server::models::HealthResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};

/// `GET /health`：不鉴权、不限流、不访问上游
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn test_health_timestamp_is_iso8601() {
        let Json(body) = health_check().await;

        assert_eq!(body.status, "ok");
        assert!(body.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
    }
}
