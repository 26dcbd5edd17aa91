//! The `Run` record: one measured execution of a test or benchmark.
//!
//! A `Run` is created by the dispatcher immediately before a body
//! executes, mutated only by the owning runner or dispatcher during that
//! single execution, and read afterward by reporters and callers. It is
//! never reused across executions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::clock::now_ms;
use crate::error::{Error, Result};

/// Shared handle to a [`Run`], as passed between dispatcher and callers.
pub type RunHandle = Rc<RefCell<Run>>;

/// Separator used by [`Run::name_full`] to join ancestor names.
pub const PATH_SEPARATOR: char = '/';

/// One measured execution instance with identity, timing span,
/// repetition count, and computed average.
#[derive(Debug)]
pub struct Run {
    name: String,
    // Back-reference only: hierarchy depth and path naming. A run never
    // owns or mutates its parent.
    parent: Option<Weak<RefCell<Run>>>,
    /// Start timestamp in clock milliseconds; unset until measurement
    /// begins.
    pub start: Option<f64>,
    /// End timestamp in clock milliseconds; unset until measurement
    /// completes.
    pub end: Option<f64>,
    /// Number of workload executions performed against this run.
    pub runs: u64,
    /// Average cost per execution in milliseconds. Runner strategies may
    /// write a compensated value that differs from the raw
    /// `time() / runs` ratio.
    pub avg: Option<f64>,
}

impl Run {
    /// Root run with the given name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_parent(name, None)
    }

    /// Run parented to an enclosing run.
    ///
    /// Fails with a naming error when `name` is empty. The parent link is
    /// acyclic by construction: a parent must already exist before a
    /// child references it.
    pub fn with_parent(
        name: impl Into<String>,
        parent: Option<Weak<RefCell<Run>>>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            name,
            parent,
            start: None,
            end: None,
            runs: 0,
            avg: None,
        })
    }

    /// Plain run name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<RunHandle> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Number of ancestors; 0 for a root. A dropped parent terminates
    /// the walk.
    pub fn level(&self) -> usize {
        match self.parent() {
            Some(parent) => parent.borrow().level() + 1,
            None => 0,
        }
    }

    /// Ancestor names joined root-to-leaf with [`PATH_SEPARATOR`].
    pub fn name_full(&self) -> String {
        match self.parent() {
            Some(parent) => {
                let mut path = parent.borrow().name_full();
                path.push(PATH_SEPARATOR);
                path.push_str(&self.name);
                path
            }
            None => self.name.clone(),
        }
    }

    /// Total measured span, once both endpoints are set.
    pub fn time(&self) -> Option<f64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Time since `start`, using `end` if set, else the current clock
    /// reading. Supports inspecting an in-flight run.
    pub fn elapsed(&self) -> Option<f64> {
        self.start.map(|start| self.end.unwrap_or_else(now_ms) - start)
    }

    /// Complete this run: set `end` and `runs` and derive the raw
    /// average `time() / runs`.
    ///
    /// Rejects with a contract error — leaving prior state unchanged —
    /// when `end` is not positive finite, `runs` is zero, the run was
    /// never started, or `end` precedes `start`.
    pub fn done(&mut self, end: f64, runs: u64) -> Result<()> {
        if !(end.is_finite() && end > 0.0) {
            return Err(Error::BadEnd(end));
        }
        if runs == 0 {
            return Err(Error::ZeroCount);
        }
        let start = self.start.ok_or_else(|| Error::NotStarted(self.name.clone()))?;
        if end < start {
            return Err(Error::EndBeforeStart { start, end });
        }
        self.end = Some(end);
        self.runs = runs;
        self.avg = Some((end - start) / runs as f64);
        Ok(())
    }

    /// Consistency check used by the dispatcher to catch runner
    /// strategies that terminate without populating a run. Not a mutator;
    /// failures signal a defect in a runner implementation, not caller
    /// misuse.
    pub fn req_done(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(self.incomplete("no executions recorded"));
        }
        match self.end {
            Some(end) if end.is_finite() && end > 0.0 => {}
            _ => return Err(self.incomplete("end timestamp not set")),
        }
        match self.avg {
            Some(avg) if avg.is_finite() => {}
            _ => return Err(self.incomplete("average not finite")),
        }
        Ok(())
    }

    fn incomplete(&self, what: &'static str) -> Error {
        Error::Incomplete {
            name: self.name.clone(),
            what,
        }
    }

    /// Clear all measured fields back to the unset sentinel.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
        self.runs = 0;
        self.avg = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn handle(run: Run) -> RunHandle {
        Rc::new(RefCell::new(run))
    }

    #[test]
    fn rejects_empty_name() {
        let err = Run::new("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);
    }

    #[test]
    fn three_level_chain() {
        let top = handle(Run::new("top").unwrap());
        let mid = handle(Run::with_parent("mid", Some(Rc::downgrade(&top))).unwrap());
        let low = handle(Run::with_parent("low", Some(Rc::downgrade(&mid))).unwrap());

        assert_eq!(top.borrow().level(), 0);
        assert_eq!(mid.borrow().level(), 1);
        assert_eq!(low.borrow().level(), 2);
        assert_eq!(low.borrow().name_full(), "top/mid/low");
        assert_eq!(top.borrow().name_full(), "top");
    }

    #[test]
    fn dropped_parent_terminates_walk() {
        let top = handle(Run::new("top").unwrap());
        let mid = Run::with_parent("mid", Some(Rc::downgrade(&top))).unwrap();
        drop(top);

        assert_eq!(mid.level(), 0);
        assert_eq!(mid.name_full(), "mid");
    }

    #[test]
    fn done_computes_raw_average() {
        let mut run = Run::new("r").unwrap();
        run.start = Some(10.0);
        run.done(20.0, 4).unwrap();

        assert_eq!(run.end, Some(20.0));
        assert_eq!(run.runs, 4);
        assert_eq!(run.avg, Some(2.5));
        assert_eq!(run.time(), Some(10.0));
        run.req_done().unwrap();
    }

    #[test]
    fn done_rejects_bad_end() {
        let mut run = Run::new("r").unwrap();
        run.start = Some(10.0);

        for end in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
            let err = run.done(end, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Contract);
        }
        // Prior state unchanged on rejection.
        assert_eq!(run.end, None);
        assert_eq!(run.runs, 0);
        assert_eq!(run.avg, None);
    }

    #[test]
    fn done_rejects_zero_runs_and_unstarted() {
        let mut run = Run::new("r").unwrap();
        run.start = Some(10.0);
        assert_eq!(run.done(20.0, 0).unwrap_err().kind(), ErrorKind::Contract);

        let mut unstarted = Run::new("r").unwrap();
        assert_eq!(
            unstarted.done(20.0, 1).unwrap_err().kind(),
            ErrorKind::Contract
        );
    }

    #[test]
    fn done_rejects_end_before_start() {
        let mut run = Run::new("r").unwrap();
        run.start = Some(10.0);
        assert_eq!(run.done(5.0, 1).unwrap_err().kind(), ErrorKind::Contract);
        assert_eq!(run.end, None);
    }

    #[test]
    fn req_done_flags_incomplete_runs() {
        let run = Run::new("r").unwrap();
        let err = run.req_done().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let mut no_avg = Run::new("r").unwrap();
        no_avg.start = Some(1.0);
        no_avg.end = Some(2.0);
        no_avg.runs = 1;
        assert_eq!(no_avg.req_done().unwrap_err().kind(), ErrorKind::Internal);
    }

    #[test]
    fn elapsed_tracks_in_flight_run() {
        let mut run = Run::new("r").unwrap();
        assert_eq!(run.elapsed(), None);

        run.start = Some(now_ms());
        let first = run.elapsed().unwrap();
        assert!(first >= 0.0);

        run.end = Some(run.start.unwrap() + 5.0);
        assert_eq!(run.elapsed(), Some(5.0));
    }

    #[test]
    fn reset_clears_measured_fields() {
        let mut run = Run::new("r").unwrap();
        run.start = Some(10.0);
        run.done(20.0, 4).unwrap();

        run.reset();
        assert_eq!(run.start, None);
        assert_eq!(run.end, None);
        assert_eq!(run.runs, 0);
        assert_eq!(run.avg, None);
    }
}
