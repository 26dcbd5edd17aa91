//! Scaled duration display.

use lapbench_core::Run;

/// Format a millisecond quantity with an appropriate unit (ns, µs, ms,
/// s).
pub fn format_ms(ms: f64) -> String {
    if !ms.is_finite() {
        return "-".to_string();
    }
    let ns = ms * 1_000_000.0;
    if ns < 1_000.0 {
        format!("{:.1} ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else {
        format!("{:.2} s", ns / 1_000_000_000.0)
    }
}

/// One-line start summary shared by the console and string reporters.
pub(crate) fn start_line(run: &Run) -> String {
    format!("{:indent$}▸ {}", "", run.name(), indent = run.level() * 2)
}

/// One-line completion summary shared by the console and string
/// reporters.
pub(crate) fn end_line(run: &Run) -> String {
    let avg = run.avg.map(format_ms).unwrap_or_else(|| "-".to_string());
    let total = run.time().map(format_ms).unwrap_or_else(|| "-".to_string());
    format!(
        "{:indent$}✓ {}: avg {} ({} runs, {} total)",
        "",
        run.name(),
        avg,
        run.runs,
        total,
        indent = run.level() * 2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_units() {
        assert_eq!(format_ms(0.0000005), "0.5 ns");
        assert_eq!(format_ms(0.0025), "2.50 µs");
        assert_eq!(format_ms(3.5), "3.50 ms");
        assert_eq!(format_ms(12_500.0), "12.50 s");
    }

    #[test]
    fn non_finite_is_a_dash() {
        assert_eq!(format_ms(f64::NAN), "-");
        assert_eq!(format_ms(f64::INFINITY), "-");
    }

    #[test]
    fn end_line_indents_by_level() {
        let mut run = Run::new("bench_x").unwrap();
        run.start = Some(1.0);
        run.done(2.0, 4).unwrap();

        let line = end_line(&run);
        assert!(line.starts_with("✓ bench_x: avg "));
        assert!(line.contains("4 runs"));
    }
}
