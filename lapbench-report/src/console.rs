//! Human-readable console reporter.

use lapbench_core::{Reporter, Run};

use crate::format::{end_line, start_line};

/// Prints one indented line when a run starts and one when it completes.
///
/// Children of a hierarchical test complete before their ancestors, so
/// completion lines read leaf-first under the announcing header.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report_start(&mut self, run: &Run) {
        println!("{}", start_line(run));
    }

    fn report_end(&mut self, run: &Run) {
        println!("{}", end_line(run));
    }
}
