//! Typed client for the FreeNAS v1.0 management REST API.

mod client;
mod freenas;

pub use client::{ApiError, HttpClient};
pub use freenas::{Alert, AlertLevel, FreenasClient, ReplicationTask};
