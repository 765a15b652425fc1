//! Health check endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// ISO-8601 UTC timestamp of the check
    pub timestamp: String,
    pub version: String,
    pub components: ComponentStatuses,
}

#[derive(Debug, Serialize)]
pub struct ComponentStatuses {
    pub database: HealthStatus,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// GET /health
///
/// 200 when a trivial query succeeds, 503 when it fails. Never errors
/// itself; a failing database is a report, not a failure.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.database.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => {
            error!(error = %e, "database health check failed");
            HealthStatus::Unhealthy
        }
    };

    let response = HealthResponse {
        status: database,
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: ComponentStatuses { database },
    };

    let status_code = match database {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Unhealthy,
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            version: "1.0.0".to_string(),
            components: ComponentStatuses {
                database: HealthStatus::Unhealthy,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["components"]["database"], "unhealthy");
        assert_eq!(json["timestamp"], "2026-01-01T00:00:00+00:00");
    }
}
