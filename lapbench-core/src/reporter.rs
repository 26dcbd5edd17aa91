//! Reporter capability consumed, not implemented, by the engine.

use crate::run::Run;

/// Receives start and end events for each dispatched run.
///
/// The session tolerates having no reporter configured; both hooks are
/// then no-ops. `report_end` fires only after the run passed its
/// consistency check, so implementations may rely on a populated run.
pub trait Reporter {
    /// A run was created and is about to execute.
    fn report_start(&mut self, run: &Run);

    /// A run completed.
    fn report_end(&mut self, run: &Run);
}
