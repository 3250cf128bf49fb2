use serde::Deserialize;

use crate::client::{ApiError, HttpClient};

/// Client for the FreeNAS v1.0 REST API.
///
/// All endpoints live under `/api/v1.0/` and authenticate with HTTP Basic
/// credentials (handled by [`HttpClient`]).
#[derive(Debug, Clone)]
pub struct FreenasClient {
    http: HttpClient,
}

// --- Response types ---

/// A ZFS replication task as reported by `storage/replication/`.
///
/// The API reports no status at all for a task that has never run, so
/// `status` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicationTask {
    /// The replicated dataset, e.g. `tank/vms`.
    #[serde(rename = "repl_zfs")]
    pub dataset: String,
    #[serde(rename = "repl_status", default)]
    pub status: Option<String>,
}

impl ReplicationTask {
    /// Whether this task's last run is in a healthy state.
    ///
    /// Healthy statuses are `Succeeded`, `Up to date`, anything starting
    /// with `Sending` (a transfer in flight), or no status at all.
    pub fn is_healthy(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(s) => s == "Succeeded" || s == "Up to date" || s.starts_with("Sending"),
        }
    }
}

/// Severity of a system alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AlertLevel {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "CRIT")]
    Crit,
}

/// A system alert as reported by `system/alert/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    /// Set once an operator has acknowledged the alert in the UI.
    pub dismissed: bool,
}

impl FreenasClient {
    /// Create a new FreeNAS API client.
    ///
    /// `hostname` is the bare host (or `host:port`); the
    /// `http://{hostname}/api/v1.0/` prefix is built automatically.
    pub fn new(hostname: &str, user: &str, secret: &str) -> Result<Self, ApiError> {
        let url = format!("http://{}/api/v1.0/", hostname.trim_end_matches('/'));
        Ok(Self {
            http: HttpClient::new(&url, user, secret)?,
        })
    }

    /// GET `/api/v1.0/storage/replication/` — list all replication tasks.
    pub async fn replication_tasks(&self) -> Result<Vec<ReplicationTask>, ApiError> {
        self.http.get("storage/replication/").await
    }

    /// GET `/api/v1.0/system/alert/` — list all system alerts.
    pub async fn alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.http.get("system/alert/").await
    }

    /// GET `/api/v1.0/system/update/check/` — pending updates, if any.
    ///
    /// The response shape varies between appliance versions (an array of
    /// update items on some, an object or `null` on others), so the raw
    /// JSON value is returned for the caller to reduce.
    pub async fn update_check(&self) -> Result<serde_json::Value, ApiError> {
        self.http.get("system/update/check/").await
    }
}
