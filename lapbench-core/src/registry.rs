//! Named benchmark and test registration.
//!
//! Registered identifiers must carry an agreed prefix — `bench_` for
//! benchmarks, `test_` for tests. The constraint is deliberate: it keeps
//! name-based filtering and editor search trivial.

use tracing::debug;

use crate::error::{Error, Result};
use crate::runner::Runner;
use crate::session::Session;
use crate::BenchDef;

/// Required prefix for registered benchmark identifiers.
pub const BENCH_PREFIX: &str = "bench_";

/// Required prefix for registered test identifiers.
pub const TEST_PREFIX: &str = "test_";

/// A registered benchmark: a name-bearing workload plus an optional
/// bound runner override.
pub struct Bench {
    pub(crate) name: String,
    pub(crate) runner: Option<Box<dyn Runner>>,
    pub(crate) workload: Box<dyn FnMut()>,
}

impl Bench {
    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this benchmark carries its own runner override.
    pub fn has_runner(&self) -> bool {
        self.runner.is_some()
    }
}

/// A registered top-level test; executes immediately when dispatched,
/// receiving the session so it can nest further tests.
pub(crate) struct Test {
    pub(crate) name: String,
    pub(crate) body: Box<dyn FnMut(&mut Session) -> Result<()>>,
}

/// Holds named benchmarks and tests in registration order.
#[derive(Default)]
pub struct Registry {
    benches: Vec<Bench>,
    tests: Vec<Test>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a benchmark to run under the session default runner.
    pub fn bench(&mut self, name: &str, workload: impl FnMut() + 'static) -> Result<()> {
        self.push_bench(name, None, Box::new(workload))
    }

    /// Register a benchmark with its own bound runner.
    pub fn bench_with(
        &mut self,
        name: &str,
        runner: impl Runner + 'static,
        workload: impl FnMut() + 'static,
    ) -> Result<()> {
        self.push_bench(name, Some(Box::new(runner)), Box::new(workload))
    }

    fn push_bench(
        &mut self,
        name: &str,
        runner: Option<Box<dyn Runner>>,
        workload: Box<dyn FnMut()>,
    ) -> Result<()> {
        require_prefix(name, BENCH_PREFIX)?;
        debug!(name, "registered benchmark");
        self.benches.push(Bench {
            name: name.to_string(),
            runner,
            workload,
        });
        Ok(())
    }

    /// Register a top-level test.
    pub fn test(
        &mut self,
        name: &str,
        body: impl FnMut(&mut Session) -> Result<()> + 'static,
    ) -> Result<()> {
        require_prefix(name, TEST_PREFIX)?;
        debug!(name, "registered test");
        self.tests.push(Test {
            name: name.to_string(),
            body: Box::new(body),
        });
        Ok(())
    }

    /// Collect every benchmark definition submitted through the
    /// `#[bench]` attribute, validating names the same way as runtime
    /// registration. Definitions are ordered by source location for
    /// deterministic execution.
    pub fn from_inventory() -> Result<Self> {
        let mut defs: Vec<&'static BenchDef> = inventory::iter::<BenchDef>.into_iter().collect();
        defs.sort_by_key(|def| (def.file, def.line));

        let mut registry = Self::new();
        for def in defs {
            let runner = match def.runner {
                Some(spec) => Some(spec.instantiate()?),
                None => None,
            };
            let workload = def.workload;
            registry.push_bench(def.name, runner, Box::new(move || workload()))?;
        }
        Ok(registry)
    }

    /// Registered benchmarks in registration order.
    pub fn benches(&self) -> &[Bench] {
        &self.benches
    }

    /// Number of registered benchmarks.
    pub fn bench_count(&self) -> usize {
        self.benches.len()
    }

    /// Number of registered tests.
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Test], &mut [Bench]) {
        (&mut self.tests, &mut self.benches)
    }
}

fn require_prefix(name: &str, prefix: &'static str) -> Result<()> {
    if name.is_empty() || !name.starts_with(prefix) {
        return Err(Error::MissingPrefix {
            name: name.to_string(),
            prefix,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runner::CountRunner;

    #[test]
    fn accepts_prefixed_names() {
        let mut registry = Registry::new();
        registry.bench("bench_alloc", || {}).unwrap();
        registry
            .bench_with("bench_parse", CountRunner::new(10).unwrap(), || {})
            .unwrap();
        registry.test("test_roundtrip", |_| Ok(())).unwrap();

        assert_eq!(registry.bench_count(), 2);
        assert_eq!(registry.test_count(), 1);
        assert_eq!(registry.benches()[0].name(), "bench_alloc");
        assert!(registry.benches()[1].has_runner());
    }

    #[test]
    fn rejects_missing_prefix() {
        let mut registry = Registry::new();

        let err = registry.bench("alloc", || {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);

        let err = registry.bench("", || {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);

        // Prefixes are not interchangeable between kinds.
        let err = registry.bench("test_alloc", || {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);
        let err = registry.test("bench_roundtrip", |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = Registry::new();
        for name in ["bench_c", "bench_a", "bench_b"] {
            registry.bench(name, || {}).unwrap();
        }
        let names: Vec<_> = registry.benches().iter().map(Bench::name).collect();
        assert_eq!(names, ["bench_c", "bench_a", "bench_b"]);
    }
}
