//! Serializable run records and the suite report structure.

use chrono::{DateTime, Utc};
use lapbench_core::{Run, RunHandle};
use serde::{Deserialize, Serialize};

/// Report schema version for compatibility checking.
pub const SCHEMA_VERSION: u32 = 1;

/// Snapshot of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Plain run name.
    pub name: String,
    /// Full hierarchical path.
    pub name_full: String,
    /// Hierarchy depth (0 for a root).
    pub level: usize,
    /// Workload executions performed.
    pub runs: u64,
    /// Total measured span in milliseconds.
    pub time_ms: Option<f64>,
    /// Compensated average per execution in milliseconds.
    pub avg_ms: Option<f64>,
}

impl From<&Run> for RunRecord {
    fn from(run: &Run) -> Self {
        Self {
            name: run.name().to_string(),
            name_full: run.name_full(),
            level: run.level(),
            runs: run.runs,
            time_ms: run.time(),
            avg_ms: run.avg,
        }
    }
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version.
    pub schema_version: u32,
    /// Version of the crate that produced the report.
    pub version: String,
    /// Generation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// A full suite report: metadata plus one record per completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Report metadata.
    pub meta: ReportMeta,
    /// Completed runs in execution order.
    pub records: Vec<RunRecord>,
}

impl SuiteReport {
    /// Build a report from completed run handles.
    pub fn from_runs<'a>(runs: impl IntoIterator<Item = &'a RunHandle>) -> Self {
        Self {
            meta: ReportMeta::default(),
            records: runs
                .into_iter()
                .map(|run| RunRecord::from(&*run.borrow()))
                .collect(),
        }
    }
}
