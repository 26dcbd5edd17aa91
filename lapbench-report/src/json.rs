//! JSON report generation.

use crate::record::SuiteReport;

/// Serialize a report as pretty-printed JSON.
pub fn generate_json_report(report: &SuiteReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
