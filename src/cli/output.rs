//! Output formatting for CLI commands

use serde::Serialize;

use crate::notification::DeliveryOutcome;

/// Pretty JSON, falling back to `{}` if serialization fails
pub fn to_pretty_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Format a delivery outcome as JSON or a single human-readable line
pub fn format_outcome(outcome: &DeliveryOutcome, json: bool) -> String {
    if json {
        to_pretty_json(outcome)
    } else {
        let mark = if outcome.success { "✅" } else { "❌" };
        format!("{} [{}] {}", mark, outcome.status, outcome.message)
    }
}
