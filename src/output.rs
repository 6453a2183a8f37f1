//! Console formatting shared by the prompts and report passes, plus
//! structured-log rendering of report summaries.

use serde::Serialize;
use tracing::{debug, warn};

/// Separator printed after the filter prompts and after every pass.
pub const RULE: &str = "----------------------------------------";

/// Renders a summary as compact JSON.
pub fn to_json<T: Serialize>(summary: &T) -> serde_json::Result<String> {
    serde_json::to_string(summary)
}

/// Records a pass summary in the debug log as JSON.
pub fn log_summary<T: Serialize>(pass: &str, summary: &T) {
    match to_json(summary) {
        Ok(json) => debug!(pass, summary = %json, "Report computed"),
        Err(e) => warn!(pass, error = %e, "Could not serialize report summary"),
    }
}
