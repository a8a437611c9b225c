//! Liveness and readiness reporting.
//!
//! Liveness never looks at the database. Readiness probes it through a session handed in by the
//! caller and turns every probe failure into an `unhealthy` report instead of an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Settings;
use crate::db::Probe;
use crate::error::SetupFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    NotImplemented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseState {
    Connected,
    Disconnected,
}

/// Which step of a readiness check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStage {
    /// No session could be obtained
    Acquire,
    /// A session was obtained but the probe query failed
    Probe,
}

/// Outcome of a single health check
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseState>,
    /// Description of the fault when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<CheckStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthReport {
    fn new(status: HealthStatus) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            service: None,
            database: None,
            error: None,
            stage: None,
            message: None,
        }
    }

    fn disconnected(stage: CheckStage, error: String) -> Self {
        Self {
            database: Some(DatabaseState::Disconnected),
            error: Some(error),
            stage: Some(stage),
            ..Self::new(HealthStatus::Unhealthy)
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthReporter {
    service: String,
}

impl HealthReporter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            service: settings.project_name.clone(),
        }
    }

    pub fn liveness(&self) -> HealthReport {
        HealthReport {
            service: Some(self.service.clone()),
            ..HealthReport::new(HealthStatus::Healthy)
        }
    }

    /// Probe the store through `session`. Never fails.
    pub async fn readiness<S>(&self, session: &mut S) -> HealthReport
    where
        S: Probe,
    {
        match session.probe().await {
            Ok(()) => HealthReport {
                database: Some(DatabaseState::Connected),
                ..HealthReport::new(HealthStatus::Healthy)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Database readiness probe failed");
                HealthReport::disconnected(CheckStage::Probe, e.to_string())
            }
        }
    }

    /// Report for a readiness check that could not obtain a session.
    pub fn acquisition_failed(&self, fault: &SetupFault) -> HealthReport {
        match fault {
            SetupFault::NotConfigured => HealthReport {
                message: Some("No database is configured for this service".to_string()),
                ..HealthReport::new(HealthStatus::NotImplemented)
            },
            SetupFault::Unreachable(_) => {
                tracing::warn!(
                    error = %fault,
                    "Database readiness check could not acquire a session"
                );
                HealthReport::disconnected(CheckStage::Acquire, fault.to_string())
            }
        }
    }
}
