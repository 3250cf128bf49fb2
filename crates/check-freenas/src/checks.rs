use freenas_api::{Alert, AlertLevel, ApiError, FreenasClient, ReplicationTask};
use serde_json::Value;
use tracing::debug;

use crate::status::CheckResult;

const REPL_HINT: &str =
    "Go to Storage > Replication Tasks > View Replication Tasks in FreeNAS for more details.";
const UPDATE_HINT: &str =
    "There are pending updates. Go to System > Update to apply pending updates.";

/// Check all ZFS replication tasks. Any task in an unhealthy state makes
/// the check WARNING; a transport or decode failure makes it UNKNOWN.
pub async fn replication(client: &FreenasClient) -> CheckResult {
    debug!("querying replication tasks");
    match client.replication_tasks().await {
        Ok(tasks) => classify_replication(&tasks),
        Err(e) => contact_failure(e),
    }
}

/// Check non-dismissed system alerts. Any CRIT alert makes the check
/// CRITICAL, otherwise any WARN alert makes it WARNING.
pub async fn alerts(client: &FreenasClient) -> CheckResult {
    debug!("querying system alerts");
    match client.alerts().await {
        Ok(alerts) => classify_alerts(&alerts),
        Err(e) => contact_failure(e),
    }
}

/// Check for pending system updates; any pending update is WARNING.
pub async fn updates(client: &FreenasClient) -> CheckResult {
    debug!("querying update status");
    match client.update_check().await {
        Ok(pending) => classify_updates(&pending),
        Err(e) => contact_failure(e),
    }
}

fn contact_failure(err: ApiError) -> CheckResult {
    CheckResult::unknown(format!("Error when contacting FreeNAS server: {err}"))
}

fn classify_replication(tasks: &[ReplicationTask]) -> CheckResult {
    let failing: Vec<String> = tasks
        .iter()
        .filter(|t| !t.is_healthy())
        .map(|t| format!("{} [{}]", t.dataset, t.status.as_deref().unwrap_or("unknown")))
        .collect();

    if failing.is_empty() {
        CheckResult::ok("No replication errors")
    } else {
        CheckResult::warning(format!("{}. {REPL_HINT}", failing.join(" ")))
    }
}

fn classify_alerts(alerts: &[Alert]) -> CheckResult {
    let mut warn = 0;
    let mut crit = 0;
    let mut msg = String::new();

    for alert in alerts.iter().filter(|a| !a.dismissed) {
        match alert.level {
            AlertLevel::Crit => {
                crit += 1;
                msg.push_str(&format!("- (C) {} ", flatten(&alert.message)));
            }
            AlertLevel::Warn => {
                warn += 1;
                msg.push_str(&format!("- (W) {} ", flatten(&alert.message)));
            }
            AlertLevel::Ok => {}
        }
    }

    let msg = msg.trim_end().to_string();
    if crit > 0 {
        CheckResult::critical(msg)
    } else if warn > 0 {
        CheckResult::warning(msg)
    } else {
        CheckResult::ok("No problem alerts")
    }
}

fn classify_updates(pending: &Value) -> CheckResult {
    if has_pending(pending) {
        CheckResult::warning(UPDATE_HINT)
    } else {
        CheckResult::ok("No pending updates.")
    }
}

/// Alert messages can span lines; the plugin line cannot.
fn flatten(message: &str) -> String {
    message.replace('\n', ". ")
}

/// JSON truthiness: the update endpoint reports "nothing pending" as null,
/// false, zero, or an empty string/array/object depending on the appliance
/// version.
fn has_pending(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use serde_json::json;

    fn task(dataset: &str, status: Option<&str>) -> ReplicationTask {
        serde_json::from_value(json!({
            "repl_zfs": dataset,
            "repl_status": status,
        }))
        .unwrap()
    }

    fn alert(level: &str, message: &str, dismissed: bool) -> Alert {
        serde_json::from_value(json!({
            "level": level,
            "message": message,
            "dismissed": dismissed,
        }))
        .unwrap()
    }

    // ---- classify_replication ----

    #[test]
    fn replication_empty_list_is_ok() {
        let result = classify_replication(&[]);
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.message, "No replication errors");
    }

    #[test]
    fn replication_all_healthy_is_ok() {
        let tasks = vec![
            task("tank/a", Some("Succeeded")),
            task("tank/b", Some("Up to date")),
            task("tank/c", Some("Sending tank/c@auto (12%)")),
            task("tank/d", None),
        ];
        assert_eq!(classify_replication(&tasks).status, Status::Ok);
    }

    #[test]
    fn replication_one_failure_is_warning_and_named() {
        let tasks = vec![
            task("tank/a", Some("Succeeded")),
            task("tank/b", Some("Failed")),
        ];
        let result = classify_replication(&tasks);
        assert_eq!(result.status, Status::Warning);
        assert!(result.message.contains("tank/b [Failed]"));
        assert!(!result.message.contains("tank/a"));
    }

    #[test]
    fn replication_every_failure_is_named() {
        let tasks = vec![
            task("tank/a", Some("Failed")),
            task("tank/b", Some("Error: broken pipe")),
        ];
        let result = classify_replication(&tasks);
        assert_eq!(result.status, Status::Warning);
        assert!(result.message.contains("tank/a [Failed]"));
        assert!(result.message.contains("tank/b [Error: broken pipe]"));
    }

    // ---- classify_alerts ----

    #[test]
    fn alerts_empty_list_is_ok() {
        let result = classify_alerts(&[]);
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.message, "No problem alerts");
    }

    #[test]
    fn alerts_crit_wins_over_warn() {
        let alerts = vec![
            alert("WARN", "volume at 81%", false),
            alert("WARN", "smart warning", false),
            alert("CRIT", "disk failed", false),
        ];
        let result = classify_alerts(&alerts);
        assert_eq!(result.status, Status::Critical);
        assert!(result.message.contains("(C) disk failed"));
        assert!(result.message.contains("(W) volume at 81%"));
    }

    #[test]
    fn alerts_warn_only_is_warning() {
        let alerts = vec![alert("WARN", "volume at 81%", false)];
        let result = classify_alerts(&alerts);
        assert_eq!(result.status, Status::Warning);
        assert!(result.message.contains("(W) volume at 81%"));
    }

    #[test]
    fn alerts_dismissed_are_ignored() {
        let alerts = vec![
            alert("CRIT", "disk failed", true),
            alert("WARN", "smart warning", true),
        ];
        assert_eq!(classify_alerts(&alerts).status, Status::Ok);
    }

    #[test]
    fn alerts_ok_level_is_ignored() {
        let alerts = vec![alert("OK", "pool is healthy", false)];
        assert_eq!(classify_alerts(&alerts).status, Status::Ok);
    }

    #[test]
    fn alerts_newlines_are_flattened() {
        let alerts = vec![alert("CRIT", "disk failed\nreplace ada0", false)];
        let result = classify_alerts(&alerts);
        assert_eq!(result.status, Status::Critical);
        assert!(result.message.contains("disk failed. replace ada0"));
        assert!(!result.message.contains('\n'));
    }

    // ---- classify_updates ----

    #[test]
    fn updates_empty_variants_are_ok() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            let result = classify_updates(&value);
            assert_eq!(result.status, Status::Ok, "value: {value}");
            assert_eq!(result.message, "No pending updates.");
        }
    }

    #[test]
    fn updates_pending_is_warning() {
        let result = classify_updates(&json!([{"name": "FreeNAS-9.10-STABLE"}]));
        assert_eq!(result.status, Status::Warning);
        assert!(result.message.contains("pending updates"));
    }

    #[test]
    fn updates_truthy_scalar_is_warning() {
        assert_eq!(classify_updates(&json!(true)).status, Status::Warning);
        assert_eq!(classify_updates(&json!(1)).status, Status::Warning);
    }
}
