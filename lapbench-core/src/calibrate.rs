//! Per-strategy-class calibration: clock-read cost and harness overhead.
//!
//! Two correction terms make an empty workload measure as close to zero
//! as possible: the mean cost of one clock read (`now_avg`) and the mean
//! cost of the harness loop itself (`overhead`). State lives in an
//! explicit [`CalibrationCache`] keyed by the concrete strategy type and
//! owned by the session, so the dependency is visible and testable
//! instead of hiding in per-class statics.

use std::any::TypeId;
use std::hint::black_box;

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::clock::now_ms;

/// Clock reads performed when estimating the cost of the timing
/// primitive.
pub const CLOCK_READS: u32 = 50_000;

/// Clock reads for the ad-hoc fallback estimate used before a class has
/// calibrated.
pub const QUICK_CLOCK_READS: u32 = 256;

/// Correction terms for one strategy class, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    /// Mean cost of a single clock read.
    pub now_avg: f64,
    /// Mean harness-loop cost per workload execution.
    pub overhead: f64,
}

/// Lazily populated calibration values, one slot per concrete strategy
/// class. Written at most once per class and read-only thereafter.
#[derive(Debug, Default)]
pub struct CalibrationCache {
    warmed: FxHashSet<TypeId>,
    values: FxHashMap<TypeId, Calibration>,
}

impl CalibrationCache {
    /// Empty cache; every class is cold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the class has begun (or finished) calibration.
    pub fn is_warm(&self, key: TypeId) -> bool {
        self.warmed.contains(&key)
    }

    /// Mark a class as warming. Returns `false` when calibration already
    /// ran (or is running) for the class — the guard short-circuits
    /// re-entrant calls, since calibration drives the strategy's own
    /// measurement loop.
    pub fn begin(&mut self, key: TypeId) -> bool {
        self.warmed.insert(key)
    }

    /// Record the measured clock-read cost for a class. Stored before the
    /// overhead pass so that pass already reads the calibrated value.
    pub fn set_now_avg(&mut self, key: TypeId, now_avg: f64) {
        self.values.entry(key).or_default().now_avg = now_avg;
    }

    /// Record the measured harness overhead for a class.
    pub fn set_overhead(&mut self, key: TypeId, overhead: f64) {
        let slot = self.values.entry(key).or_default();
        slot.overhead = overhead;
        debug!(?key, now_avg = slot.now_avg, overhead, "strategy class calibrated");
    }

    /// Calibrated overhead for a class, or zero when the class has not
    /// calibrated. A strategy that disables calibration therefore always
    /// reads zero here.
    pub fn overhead(&self, key: TypeId) -> f64 {
        self.values.get(&key).map_or(0.0, |cal| cal.overhead)
    }

    /// Calibrated clock-read cost for a class, or an ad-hoc small-sample
    /// estimate when the class has not calibrated.
    pub fn now_avg(&self, key: TypeId) -> f64 {
        match self.values.get(&key) {
            Some(cal) => cal.now_avg,
            None => clock_cost(QUICK_CLOCK_READS),
        }
    }

    /// The stored calibration for a class, if any.
    pub fn get(&self, key: TypeId) -> Option<Calibration> {
        self.values.get(&key).copied()
    }
}

/// Estimate the mean cost of one clock read by reading back-to-back
/// `reads` times and dividing the total span by the count.
pub fn clock_cost(reads: u32) -> f64 {
    let start = now_ms();
    let mut last = start;
    for _ in 0..reads {
        last = black_box(now_ms());
    }
    (last - start) / f64::from(reads)
}
