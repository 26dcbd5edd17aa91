#![warn(missing_docs)]
//! Lapbench Core - The Benchmark Timing Engine
//!
//! This crate provides the measurement machinery for hierarchical tests
//! and micro-benchmarks:
//! - [`Run`] records: identity, timing span, repetition count, average
//! - [`Runner`] strategies: fixed-count, fixed-duration with adaptive
//!   batching, and a single-pass deoptimization strategy
//! - Per-strategy-class calibration of clock-read cost and harness
//!   overhead, cached in an explicit [`CalibrationCache`]
//! - A [`Session`] dispatcher with an explicit active-run context,
//!   reporter hooks, and regex-based selection
//!
//! Execution is single-threaded, synchronous, and cooperative: there is
//! no parallelism, no asynchronous suspension, and no cancellation of an
//! in-progress workload.

mod calibrate;
mod clock;
mod error;
mod filter;
mod registry;
mod reporter;
mod run;
mod runner;
mod session;

pub use calibrate::{clock_cost, Calibration, CalibrationCache, CLOCK_READS, QUICK_CLOCK_READS};
pub use clock::now_ms;
pub use error::{Error, ErrorKind, Result};
pub use filter::Filter;
pub use registry::{Bench, Registry, BENCH_PREFIX, TEST_PREFIX};
pub use reporter::Reporter;
pub use run::{Run, RunHandle, PATH_SEPARATOR};
pub use runner::{CountRunner, DeoptRunner, Runner, RunnerSpec, TimeRunner};
pub use session::{ActiveGuard, ActiveRun, Session};

/// Benchmark definition registered via the `#[bench]` attribute.
#[derive(Debug, Clone)]
pub struct BenchDef {
    /// Registered identifier; must carry the `bench_` prefix.
    pub name: &'static str,
    /// Optional bound runner override.
    pub runner: Option<RunnerSpec>,
    /// The workload to measure.
    pub workload: fn(),
    /// Source file of the definition.
    pub file: &'static str,
    /// Source line of the definition.
    pub line: u32,
}

inventory::collect!(BenchDef);

/// Anchor to prevent LTO from stripping inventory entries.
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<BenchDef> {}
};
