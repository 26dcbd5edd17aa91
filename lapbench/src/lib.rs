#![warn(missing_docs)]
//! # Lapbench
//!
//! Micro-framework for hierarchical, named tests and micro-benchmarks
//! with compensated wall-clock timing:
//!
//! - **Compensated precision**: per-strategy calibration subtracts the
//!   clock-read cost and the harness-loop overhead from every average
//! - **Pluggable runners**: fixed repetition count, or a wall-clock
//!   budget with adaptive batch doubling to amortize clock reads
//! - **Deoptimization pre-pass**: every benchmark runs once, cold and
//!   interleaved, before measurement, so back-to-back benchmarks don't
//!   bias each other
//! - **Hierarchical tests**: nested, named runs with full-path
//!   addressing and filtering
//!
//! ## Quick Start
//!
//! ```ignore
//! #[lapbench::bench(count = 4096)]
//! fn bench_sum() {
//!     let total: u64 = std::hint::black_box((0..100u64).sum());
//!     let _ = total;
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     lapbench::run()
//! }
//! ```
//!
//! ## Programmatic Use
//!
//! ```
//! use lapbench::{CountRunner, Registry, Session};
//!
//! let mut registry = Registry::new();
//! registry
//!     .bench_with("bench_noop", CountRunner::with_warmup(256, 32)?, || {})
//!     .unwrap();
//!
//! let mut session = Session::new();
//! let runs = session.run_suite(&mut registry)?;
//! assert_eq!(runs[0].borrow().runs, 256);
//! # Ok::<(), lapbench::Error>(())
//! ```

// Re-export core types
pub use lapbench_core::{
    clock_cost, now_ms, ActiveGuard, ActiveRun, Bench, BenchDef, Calibration, CalibrationCache,
    CountRunner, DeoptRunner, Error, ErrorKind, Filter, Registry, Reporter, Result, Run,
    RunHandle, Runner, RunnerSpec, Session, TimeRunner, BENCH_PREFIX, CLOCK_READS,
    PATH_SEPARATOR, QUICK_CLOCK_READS, TEST_PREFIX,
};

// Re-export macros
pub use lapbench_macros::bench;

// Re-export reporters and report generation
pub use lapbench_report::{
    format_ms, generate_json_report, ConsoleReporter, ReportMeta, RunRecord, StringReporter,
    SuiteReport, SCHEMA_VERSION,
};

// Re-export the CLI entry points
pub use lapbench_cli::{run, run_with_cli, Cli};

/// Internal re-exports for macro use.
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        bench, ConsoleReporter, CountRunner, Filter, Registry, Reporter, Runner, Session,
        TimeRunner,
    };
}
