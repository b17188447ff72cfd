//! Health Check System
//!
//! Liveness, readiness, and a component report with a short cache so probes
//! do not hammer the database.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health checker configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual health checks
    pub check_timeout: Duration,
    /// Cache duration for health results
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

/// Health checker service
pub struct HealthChecker {
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
    pool: Option<PgPool>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Get cached health or perform checks
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("Returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedHealth {
                report: report.clone(),
                cached_at: Instant::now(),
            });
        }

        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let mut components = Vec::new();
        let mut overall_status = HealthStatus::Healthy;

        match self.pool {
            Some(ref pool) => {
                let component = self.check_database(pool).await;
                if component.status == HealthStatus::Unhealthy {
                    overall_status = HealthStatus::Unhealthy;
                }
                components.push(component);
            }
            None => {
                overall_status = HealthStatus::Degraded;
                components.push(ComponentHealth {
                    name: "database".into(),
                    status: HealthStatus::Degraded,
                    message: Some("Not configured".into()),
                    response_time_ms: 0,
                });
            }
        }

        HealthReport {
            status: overall_status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_database(&self, pool: &PgPool) -> ComponentHealth {
        let started = Instant::now();

        let ping = tokio::time::timeout(
            self.config.check_timeout,
            sqlx::query("SELECT 1").execute(pool),
        )
        .await;

        let elapsed = started.elapsed().as_millis() as u64;

        match ping {
            Ok(Ok(_)) => ComponentHealth {
                name: "database".into(),
                status: HealthStatus::Healthy,
                message: None,
                response_time_ms: elapsed,
            },
            Ok(Err(e)) => ComponentHealth {
                name: "database".into(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms: elapsed,
            },
            Err(_) => ComponentHealth {
                name: "database".into(),
                status: HealthStatus::Unhealthy,
                message: Some("Health check timed out".into()),
                response_time_ms: elapsed,
            },
        }
    }
}

/// Full health report
///
/// GET /health
pub async fn health(State(checker): State<Arc<HealthChecker>>) -> impl IntoResponse {
    let report = checker.check().await;
    (report.http_status(), Json(report))
}

/// Liveness probe: the process is running
///
/// GET /health/live
pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness probe: dependencies are reachable
///
/// GET /health/ready
pub async fn readiness(State(checker): State<Arc<HealthChecker>>) -> impl IntoResponse {
    let report = checker.check().await;
    let status = if report.status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(serde_json::json!({ "status": report.status })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_database_is_degraded() {
        let checker = HealthChecker::new(HealthConfig::default());
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.status.is_healthy());
        assert_eq!(report.http_status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_is_cached() {
        let checker = HealthChecker::new(HealthConfig::default());
        let first = checker.check().await;
        let second = checker.check().await;

        assert_eq!(first.timestamp, second.timestamp);
    }
}
