//! String-accumulating reporter for programmatic inspection.

use std::cell::RefCell;
use std::rc::Rc;

use lapbench_core::{Reporter, Run};

use crate::format::{end_line, start_line};

/// Collects the same lines the console reporter prints into a shared
/// buffer.
///
/// Clone the reporter before handing it to a session to keep a handle on
/// the output:
///
/// ```
/// use lapbench_core::Session;
/// use lapbench_report::StringReporter;
///
/// let reporter = StringReporter::new();
/// let mut session = Session::new().with_reporter(reporter.clone());
/// let _ = session.test("smoke", |_| Ok(()));
/// assert!(reporter.contents().contains("smoke"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringReporter {
    buf: Rc<RefCell<String>>,
}

impl StringReporter {
    /// New reporter with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accumulated output.
    pub fn contents(&self) -> String {
        self.buf.borrow().clone()
    }

    /// Number of lines accumulated so far.
    pub fn line_count(&self) -> usize {
        self.buf.borrow().lines().count()
    }
}

impl Reporter for StringReporter {
    fn report_start(&mut self, run: &Run) {
        let mut buf = self.buf.borrow_mut();
        buf.push_str(&start_line(run));
        buf.push('\n');
    }

    fn report_end(&mut self, run: &Run) {
        let mut buf = self.buf.borrow_mut();
        buf.push_str(&end_line(run));
        buf.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_start_and_end_lines() {
        let reporter = StringReporter::new();
        let mut sink = reporter.clone();

        let mut run = Run::new("bench_x").unwrap();
        sink.report_start(&run);
        run.start = Some(1.0);
        run.done(2.0, 2).unwrap();
        sink.report_end(&run);

        let out = reporter.contents();
        assert_eq!(reporter.line_count(), 2);
        assert!(out.contains("▸ bench_x"));
        assert!(out.contains("✓ bench_x"));
        assert!(out.contains("2 runs"));
    }
}
