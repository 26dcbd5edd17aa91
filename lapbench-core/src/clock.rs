//! Monotonic clock readings in fractional milliseconds.
//!
//! Every timestamp in the engine comes from [`now_ms`]: milliseconds
//! elapsed since a lazily initialized process anchor. Readings are
//! monotonic and strictly positive once the anchor exists.

use std::sync::OnceLock;
use std::time::Instant;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Read the monotonic clock, in milliseconds since the process anchor.
#[inline(always)]
pub fn now_ms() -> f64 {
    ANCHOR.get_or_init(Instant::now).elapsed().as_secs_f64() * 1_000.0
}
