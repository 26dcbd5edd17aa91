//! Session: the explicit execution context for dispatching tests and
//! benchmarks.
//!
//! The session owns everything the strategies and the dispatcher need:
//! the calibration cache, the "currently active run" slot, the optional
//! reporter, the selection filter, and the process-default runner. The
//! active-run slot follows stack discipline through scoped guards, so the
//! previous binding is restored on every exit path — including unwinding
//! out of a failing workload.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::calibrate::CalibrationCache;
use crate::clock::now_ms;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::registry::{Bench, Registry, Test};
use crate::reporter::Reporter;
use crate::run::{Run, RunHandle, PATH_SEPARATOR};
use crate::runner::{DeoptRunner, Runner, TimeRunner};

/// The single "currently active run" slot, held behind a cheaply
/// clonable handle so scoped guards can restore it without borrowing the
/// session.
#[derive(Debug, Clone, Default)]
pub struct ActiveRun {
    slot: Rc<RefCell<Option<RunHandle>>>,
}

impl ActiveRun {
    /// The run currently bound as active, if any.
    pub fn get(&self) -> Option<RunHandle> {
        self.slot.borrow().clone()
    }

    /// Bind `run` as active. The returned guard restores the previous
    /// binding when dropped, on every exit path including unwinding.
    pub fn enter(&self, run: RunHandle) -> ActiveGuard {
        let prev = self.slot.borrow_mut().replace(run);
        ActiveGuard {
            slot: Rc::clone(&self.slot),
            prev,
        }
    }
}

/// Scoped binding of the active run; restores the previous binding on
/// drop.
#[must_use = "dropping the guard immediately would unbind the run"]
pub struct ActiveGuard {
    slot: Rc<RefCell<Option<RunHandle>>>,
    prev: Option<RunHandle>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        *self.slot.borrow_mut() = self.prev.take();
    }
}

/// Execution context owning the calibration cache, the active-run slot,
/// the reporter, the filter, and the process-default runner.
pub struct Session {
    cache: CalibrationCache,
    active: ActiveRun,
    reporter: Option<Box<dyn Reporter>>,
    filter: Filter,
    default_runner: Box<dyn Runner>,
    deopt_pass: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with a match-all filter, no reporter, the default
    /// [`TimeRunner`] strategy, and the deoptimization pre-pass enabled.
    pub fn new() -> Self {
        Self {
            cache: CalibrationCache::new(),
            active: ActiveRun::default(),
            reporter: None,
            filter: Filter::match_all(),
            default_runner: Box::new(TimeRunner::default()),
            deopt_pass: true,
        }
    }

    /// Replace the reporter.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Replace the selection filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the process-default runner.
    pub fn with_default_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.default_runner = Box::new(runner);
        self
    }

    /// Enable or disable the deoptimization pre-pass in [`run_suite`].
    ///
    /// [`run_suite`]: Session::run_suite
    pub fn with_deopt_pass(mut self, enabled: bool) -> Self {
        self.deopt_pass = enabled;
        self
    }

    /// Handle to the active-run slot.
    pub fn active(&self) -> &ActiveRun {
        &self.active
    }

    /// The calibration cache, for inspection.
    pub fn calibration(&self) -> &CalibrationCache {
        &self.cache
    }

    /// The selection filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Dispatch a single benchmark through `runner` — or the session
    /// default — and return the populated run.
    ///
    /// The run is parented to the active run, bound as active for the
    /// duration of the call, and checked for consistency before the
    /// reporter's end hook fires. A workload panic propagates unmodified;
    /// the previous active run is restored regardless.
    pub fn run_bench(
        &mut self,
        name: &str,
        runner: Option<&dyn Runner>,
        workload: &mut dyn FnMut(),
    ) -> Result<RunHandle> {
        let parent = self.active.get();
        let run = Rc::new(RefCell::new(Run::with_parent(
            name,
            parent.as_ref().map(Rc::downgrade),
        )?));
        drop(parent);

        self.report_start(&run);
        {
            let _guard = self.active.enter(Rc::clone(&run));
            let mut target = run.borrow_mut();
            let runner: &dyn Runner = match runner {
                Some(runner) => runner,
                None => self.default_runner.as_ref(),
            };
            runner.run(workload, &mut target, &mut self.cache)?;
        }
        run.borrow().req_done()?;
        self.report_end(&run);
        debug!(name, runs = run.borrow().runs, "benchmark complete");
        Ok(run)
    }

    /// Execute a test body immediately, parented to the active run.
    ///
    /// The body receives the session so it can nest further tests.
    /// Returns `Ok(None)` when the full path does not pass the filter —
    /// the body is then not executed. A body error or panic propagates
    /// unmodified; the previous active run is restored on every exit
    /// path.
    pub fn test<F>(&mut self, name: &str, body: F) -> Result<Option<RunHandle>>
    where
        F: FnOnce(&mut Session) -> Result<()>,
    {
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let parent = self.active.get();
        let full = match &parent {
            Some(parent) => {
                let mut path = parent.borrow().name_full();
                path.push(PATH_SEPARATOR);
                path.push_str(name);
                path
            }
            None => name.to_string(),
        };
        if !self.filter.matches_path(&full) {
            debug!(path = %full, "test skipped by filter");
            return Ok(None);
        }

        let run = Rc::new(RefCell::new(Run::with_parent(
            name,
            parent.as_ref().map(Rc::downgrade),
        )?));
        drop(parent);

        self.report_start(&run);
        run.borrow_mut().start = Some(now_ms());
        let guard = self.active.enter(Rc::clone(&run));
        body(self)?;
        drop(guard);
        run.borrow_mut().done(now_ms(), 1)?;
        self.report_end(&run);
        Ok(Some(run))
    }

    /// Run everything in `registry` that passes the filter: tests first
    /// in registration order, then the deoptimization pre-pass over the
    /// selected benchmarks, then the measured benchmark runs — strictly
    /// sequentially, in registration order.
    ///
    /// Returns the handles of the measured runs (tests report through
    /// the reporter; benchmarks additionally come back for inspection).
    pub fn run_suite(&mut self, registry: &mut Registry) -> Result<Vec<RunHandle>> {
        let (tests, benches) = registry.parts_mut();

        for test in tests.iter_mut() {
            let Test { name, body } = test;
            self.test(name, |session| body(session))?;
        }

        if self.deopt_pass {
            // One uncalibrated execution of every selected benchmark,
            // interleaved, before any real measurement.
            let deopt = DeoptRunner;
            for bench in benches.iter_mut() {
                if !self.filter.matches_name(&bench.name) {
                    continue;
                }
                let mut scratch = Run::new(bench.name.as_str())?;
                deopt.run(bench.workload.as_mut(), &mut scratch, &mut self.cache)?;
            }
        }

        let mut results = Vec::new();
        for bench in benches.iter_mut() {
            let Bench {
                name,
                runner,
                workload,
            } = bench;
            if !self.filter.matches_name(name) {
                continue;
            }
            let run = self.run_bench(name, runner.as_deref(), workload.as_mut())?;
            results.push(run);
        }
        Ok(results)
    }

    fn report_start(&mut self, run: &RunHandle) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report_start(&run.borrow());
        }
    }

    fn report_end(&mut self, run: &RunHandle) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report_end(&run.borrow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runner::CountRunner;
    use std::cell::Cell;

    #[derive(Clone, Default)]
    struct Recording {
        starts: Rc<RefCell<Vec<String>>>,
        ends: Rc<RefCell<Vec<String>>>,
    }

    impl Reporter for Recording {
        fn report_start(&mut self, run: &Run) {
            self.starts.borrow_mut().push(run.name_full());
        }

        fn report_end(&mut self, run: &Run) {
            self.ends.borrow_mut().push(run.name_full());
        }
    }

    fn fast_count(count: u64) -> CountRunner {
        CountRunner::with_warmup(count, 32).unwrap()
    }

    #[test]
    fn run_bench_populates_and_reports() {
        let recording = Recording::default();
        let mut session = Session::new().with_reporter(recording.clone());

        let run = session
            .run_bench("bench_noop", Some(&fast_count(100)), &mut || {})
            .unwrap();

        assert_eq!(run.borrow().runs, 100);
        run.borrow().req_done().unwrap();
        assert_eq!(*recording.starts.borrow(), ["bench_noop"]);
        assert_eq!(*recording.ends.borrow(), ["bench_noop"]);
        assert!(session.active().get().is_none());
    }

    #[test]
    fn nested_tests_report_full_paths() {
        let recording = Recording::default();
        let mut session = Session::new().with_reporter(recording.clone());

        session
            .test("top", |session| {
                session.test("mid", |session| {
                    session.test("low", |_| Ok(()))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        assert_eq!(*recording.starts.borrow(), ["top", "top/mid", "top/mid/low"]);
        // Children complete before their ancestors.
        assert_eq!(*recording.ends.borrow(), ["top/mid/low", "top/mid", "top"]);
        assert!(session.active().get().is_none());
    }

    #[test]
    fn path_filter_skips_sibling_bodies() {
        let mut session =
            Session::new().with_filter(Filter::new("top/mid/low").unwrap());
        let hits = Rc::new(RefCell::new(Vec::new()));

        let h = Rc::clone(&hits);
        session
            .test("top", move |session| {
                h.borrow_mut().push("top");
                let hm = Rc::clone(&h);
                session.test("mid", move |session| {
                    hm.borrow_mut().push("mid");
                    let hl = Rc::clone(&hm);
                    session.test("low", move |_| {
                        hl.borrow_mut().push("low");
                        Ok(())
                    })?;
                    Ok(())
                })?;
                let hs = Rc::clone(&h);
                session.test("sibling", move |_| {
                    hs.borrow_mut().push("sibling");
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        assert_eq!(*hits.borrow(), ["top", "mid", "low"]);
    }

    #[test]
    fn active_run_restored_when_body_panics() {
        let mut session = Session::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = session.test("outer", |_| panic!("workload exploded"));
        }));

        assert!(result.is_err());
        assert!(session.active().get().is_none());
    }

    #[test]
    fn active_run_restored_when_body_errors() {
        let mut session = Session::new();

        let err = session
            .test("outer", |session| {
                session.test("inner", |_| Err(Error::EmptyName))?;
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Naming);
        assert!(session.active().get().is_none());
    }

    #[test]
    fn incomplete_runner_is_an_internal_error() {
        struct Broken;
        impl Runner for Broken {
            fn run(
                &self,
                _workload: &mut dyn FnMut(),
                _run: &mut Run,
                _cache: &mut CalibrationCache,
            ) -> Result<()> {
                // Returns without populating the run.
                Ok(())
            }
        }

        let mut session = Session::new();
        let err = session
            .run_bench("bench_broken", Some(&Broken), &mut || {})
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(session.active().get().is_none());
    }

    #[test]
    fn run_suite_interleaves_deopt_pass_before_measurement() {
        let calls = Rc::new(Cell::new(0u64));
        let mut registry = Registry::new();
        let c = Rc::clone(&calls);
        registry
            .bench_with("bench_counted", fast_count(10), move || {
                c.set(c.get() + 1)
            })
            .unwrap();

        let mut session = Session::new();
        let runs = session.run_suite(&mut registry).unwrap();

        // One deopt execution plus the measured repetitions.
        assert_eq!(calls.get(), 11);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].borrow().runs, 10);
    }

    #[test]
    fn run_suite_can_skip_deopt_pass() {
        let calls = Rc::new(Cell::new(0u64));
        let mut registry = Registry::new();
        let c = Rc::clone(&calls);
        registry
            .bench_with("bench_counted", fast_count(10), move || {
                c.set(c.get() + 1)
            })
            .unwrap();

        let mut session = Session::new().with_deopt_pass(false);
        session.run_suite(&mut registry).unwrap();

        assert_eq!(calls.get(), 10);
    }

    #[test]
    fn run_suite_filters_benchmarks_by_plain_name() {
        let mut registry = Registry::new();
        registry
            .bench_with("bench_alloc", fast_count(5), || {})
            .unwrap();
        registry
            .bench_with("bench_parse", fast_count(5), || {})
            .unwrap();

        let mut session = Session::new().with_filter(Filter::new("alloc").unwrap());
        let runs = session.run_suite(&mut registry).unwrap();

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].borrow().name(), "bench_alloc");
    }
}
