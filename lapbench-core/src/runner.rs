//! Execution strategies: how many times, and for how long, a workload
//! runs against a [`Run`].
//!
//! Three strategies implement the [`Runner`] interface: [`CountRunner`]
//! (fixed repetition count), [`TimeRunner`] (fixed wall-clock budget with
//! adaptive batching), and [`DeoptRunner`] (single uncalibrated pass).
//! Calibration state is threaded in through a [`CalibrationCache`] rather
//! than living in per-class statics.

use std::any::TypeId;

use crate::calibrate::{clock_cost, CalibrationCache, CLOCK_READS};
use crate::clock::now_ms;
use crate::error::{Error, Result};
use crate::run::Run;

/// Pluggable execution strategy: run a zero-argument workload some number
/// of times against a [`Run`], measuring total elapsed time and derived
/// average.
pub trait Runner {
    /// Execute `workload` per this strategy, writing the timing fields of
    /// `run`. Calibrates the strategy class through `cache` when needed.
    fn run(
        &self,
        workload: &mut dyn FnMut(),
        run: &mut Run,
        cache: &mut CalibrationCache,
    ) -> Result<()>;
}

/// Const-constructible runner selection carried by registered benchmark
/// definitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunnerSpec {
    /// Fixed repetition count.
    Count(u64),
    /// Fixed wall-clock budget in milliseconds.
    TimeMs(f64),
    /// Single uncalibrated pass.
    Deopt,
}

impl RunnerSpec {
    /// Build the boxed strategy this spec describes.
    pub fn instantiate(&self) -> Result<Box<dyn Runner>> {
        Ok(match *self {
            RunnerSpec::Count(count) => Box::new(CountRunner::new(count)?),
            RunnerSpec::TimeMs(budget_ms) => Box::new(TimeRunner::new(budget_ms)?),
            RunnerSpec::Deopt => Box::new(DeoptRunner),
        })
    }
}

// ─── CountRunner ─────────────────────────────────────────────────────────────

/// Fixed-repetition strategy: the workload runs exactly `count` times in
/// a tight sequence with no batching.
#[derive(Debug, Clone, Copy)]
pub struct CountRunner {
    count: u64,
    warmup_count: u64,
}

impl CountRunner {
    /// Default repetition count for production runs.
    pub const DEFAULT_COUNT: u64 = 100_000;

    /// Default repetition count for the calibration passes.
    pub const DEFAULT_WARMUP_COUNT: u64 = 10_000;

    /// Strategy with the given repetition count and the default warmup
    /// count. Rejects a count of zero with a contract error.
    pub fn new(count: u64) -> Result<Self> {
        Self::with_warmup(count, Self::DEFAULT_WARMUP_COUNT)
    }

    /// Strategy with explicit repetition and warmup counts, each
    /// overridable independently.
    pub fn with_warmup(count: u64, warmup_count: u64) -> Result<Self> {
        if count == 0 || warmup_count == 0 {
            return Err(Error::ZeroCount);
        }
        Ok(Self {
            count,
            warmup_count,
        })
    }

    /// The configured repetition count.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn warm_up(&self, cache: &mut CalibrationCache) -> Result<()> {
        let key = TypeId::of::<Self>();
        if !cache.begin(key) {
            return Ok(());
        }
        deopt_passes(|noop, scratch| run_counted(noop, scratch, cache, key, self.warmup_count))?;
        cache.set_now_avg(key, clock_cost(CLOCK_READS));
        let mut probe = Run::new("calibration")?;
        run_counted(&mut || {}, &mut probe, cache, key, self.warmup_count);
        cache.set_overhead(key, probe.avg.unwrap_or(0.0));
        Ok(())
    }
}

impl Default for CountRunner {
    fn default() -> Self {
        Self {
            count: Self::DEFAULT_COUNT,
            warmup_count: Self::DEFAULT_WARMUP_COUNT,
        }
    }
}

impl Runner for CountRunner {
    fn run(
        &self,
        workload: &mut dyn FnMut(),
        run: &mut Run,
        cache: &mut CalibrationCache,
    ) -> Result<()> {
        self.warm_up(cache)?;
        run_counted(workload, run, cache, TypeId::of::<Self>(), self.count);
        Ok(())
    }
}

// ─── TimeRunner ──────────────────────────────────────────────────────────────

/// Fixed-duration strategy with adaptive batching: clock reads are
/// amortized across doubling batches under a wall-clock budget.
#[derive(Debug, Clone, Copy)]
pub struct TimeRunner {
    budget_ms: f64,
    warmup_ms: f64,
}

impl TimeRunner {
    /// Default wall-clock budget for production runs, in milliseconds.
    pub const DEFAULT_BUDGET_MS: f64 = 100.0;

    /// Default budget for the calibration passes; smaller than the
    /// production default so calibration stays fast.
    pub const DEFAULT_WARMUP_MS: f64 = 25.0;

    /// Strategy with the given budget and the default warmup budget.
    /// Rejects a non-positive or non-finite budget with a contract error.
    pub fn new(budget_ms: f64) -> Result<Self> {
        Self::with_warmup(budget_ms, Self::DEFAULT_WARMUP_MS)
    }

    /// Strategy with explicit production and warmup budgets, each
    /// overridable independently.
    pub fn with_warmup(budget_ms: f64, warmup_ms: f64) -> Result<Self> {
        if !(budget_ms.is_finite() && budget_ms > 0.0) {
            return Err(Error::BadBudget(budget_ms));
        }
        if !(warmup_ms.is_finite() && warmup_ms > 0.0) {
            return Err(Error::BadBudget(warmup_ms));
        }
        Ok(Self {
            budget_ms,
            warmup_ms,
        })
    }

    /// The configured wall-clock budget in milliseconds.
    pub fn budget_ms(&self) -> f64 {
        self.budget_ms
    }

    fn warm_up(&self, cache: &mut CalibrationCache) -> Result<()> {
        let key = TypeId::of::<Self>();
        if !cache.begin(key) {
            return Ok(());
        }
        deopt_passes(|noop, scratch| run_timed(noop, scratch, cache, key, self.warmup_ms))?;
        cache.set_now_avg(key, clock_cost(CLOCK_READS));
        let mut probe = Run::new("calibration")?;
        run_timed(&mut || {}, &mut probe, cache, key, self.warmup_ms);
        cache.set_overhead(key, probe.avg.unwrap_or(0.0));
        Ok(())
    }
}

impl Default for TimeRunner {
    fn default() -> Self {
        Self {
            budget_ms: Self::DEFAULT_BUDGET_MS,
            warmup_ms: Self::DEFAULT_WARMUP_MS,
        }
    }
}

impl Runner for TimeRunner {
    fn run(
        &self,
        workload: &mut dyn FnMut(),
        run: &mut Run,
        cache: &mut CalibrationCache,
    ) -> Result<()> {
        self.warm_up(cache)?;
        run_timed(workload, run, cache, TypeId::of::<Self>(), self.budget_ms);
        Ok(())
    }
}

// ─── DeoptRunner ─────────────────────────────────────────────────────────────

/// Single uncalibrated pass: a fixed count of one with warmup disabled.
///
/// The suite dispatcher runs every selected benchmark through this
/// strategy once, interleaved, before real measurement, so speculative
/// specialization cannot bias benchmarks that would otherwise run back to
/// back while hot on one code shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeoptRunner;

impl Runner for DeoptRunner {
    fn run(
        &self,
        workload: &mut dyn FnMut(),
        run: &mut Run,
        cache: &mut CalibrationCache,
    ) -> Result<()> {
        // Calibration disabled: the class never warms, so overhead reads
        // zero and the clock cost falls back to the small-sample estimate.
        run_counted(workload, run, cache, TypeId::of::<Self>(), 1);
        Ok(())
    }
}

// ─── Shared measurement loops ────────────────────────────────────────────────

/// Fixed-count measurement loop shared by [`CountRunner`] and
/// [`DeoptRunner`].
fn run_counted(
    workload: &mut dyn FnMut(),
    run: &mut Run,
    cache: &CalibrationCache,
    key: TypeId,
    count: u64,
) {
    let start = now_ms();
    run.start = Some(start);
    for _ in 0..count {
        workload();
    }
    let end = now_ms();
    run.end = Some(end);
    run.runs = count;
    // One clock-read correction total: the loop reads the clock only at
    // the two boundaries, never per repetition.
    let avg =
        ((end - start - cache.now_avg(key)) / count as f64 - cache.overhead(key)).max(0.0);
    run.avg = Some(avg);
}

/// Adaptive-batch loop: `batch` workload calls per clock read, doubling
/// each round while the last reading is still before the deadline. The
/// final batch is at most the sum of all prior runs, so total wall time
/// stays under roughly twice the budget.
fn run_timed(
    workload: &mut dyn FnMut(),
    run: &mut Run,
    cache: &CalibrationCache,
    key: TypeId,
    budget_ms: f64,
) {
    let start = now_ms();
    run.start = Some(start);
    let deadline = start + budget_ms;

    let mut runs: u64 = 0;
    let mut nows: u64 = 0;
    let mut batch: u64 = 1;
    let mut last = start;
    while last < deadline {
        for _ in 0..batch {
            workload();
        }
        runs += batch;
        nows += 1;
        last = now_ms();
        batch *= 2;
    }

    // A fresh read after the loop exits, so the tail of the final round
    // falls inside the measured span.
    let end = now_ms();
    run.end = Some(end);
    run.runs = runs;
    // The clock correction scales with the reads actually performed.
    let avg = ((end - start - cache.now_avg(key) * nows as f64) / runs as f64
        - cache.overhead(key))
    .max(0.0);
    run.avg = Some(avg);
}

/// Four no-op passes using distinct function identities, run through the
/// strategy's own loop before measurement. Distinct identities keep the
/// dispatch site polymorphic while the class warms, so the subsequent
/// real measurement sees representative dispatch behavior.
fn deopt_passes(mut pass: impl FnMut(&mut dyn FnMut(), &mut Run)) -> Result<()> {
    fn noop_a() {}
    fn noop_b() {}
    fn noop_c() {}
    fn noop_d() {}

    let (mut a, mut b, mut c, mut d) = (noop_a, noop_b, noop_c, noop_d);
    let noops: [&mut dyn FnMut(); 4] = [&mut a, &mut b, &mut c, &mut d];
    for noop in noops {
        let mut scratch = Run::new("calibration")?;
        pass(noop, &mut scratch);
    }
    Ok(())
}
