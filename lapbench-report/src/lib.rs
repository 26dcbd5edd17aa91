#![warn(missing_docs)]
//! Lapbench Report - Reporters and Report Generation
//!
//! Implements the core's [`Reporter`](lapbench_core::Reporter) interface
//! and produces output in two shapes:
//! - Live, line-per-run reporting: [`ConsoleReporter`] (stdout) and
//!   [`StringReporter`] (in-memory buffer)
//! - A machine-readable JSON report built from [`RunRecord`] snapshots

mod console;
mod format;
mod json;
mod record;
mod string;

pub use console::ConsoleReporter;
pub use format::format_ms;
pub use json::generate_json_report;
pub use record::{ReportMeta, RunRecord, SuiteReport, SCHEMA_VERSION};
pub use string::StringReporter;
