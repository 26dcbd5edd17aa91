//! Lapbench Example Benchmarks
//!
//! Demonstrates lapbench usage and serves as a template for your own
//! benchmark binary.
//!
//! Run with:
//!   cargo run --release --example benchmarks                 # Run everything
//!   cargo run --release --example benchmarks -- --list       # List benchmarks
//!   cargo run --release --example benchmarks -- string       # Filter by name
//!   cargo run --release --example benchmarks -- --count 4096 # Fixed-count runner

use std::hint::black_box;

// ============================================================================
// Basic Benchmarks
// ============================================================================

/// Simple arithmetic benchmark
#[lapbench::bench]
fn bench_addition() {
    let x = 42u64;
    let y = 17u64;
    black_box(black_box(x) + black_box(y));
}

/// Vector sum benchmark
#[lapbench::bench]
fn bench_vector_sum() {
    let data: Vec<i64> = (0..1000).collect();
    black_box(data.iter().sum::<i64>());
}

// ============================================================================
// String Benchmarks
// ============================================================================

/// String concatenation benchmark, bound to a fixed repetition count
#[lapbench::bench(count = 4096)]
fn bench_string_concat() {
    let mut s = String::new();
    for i in 0..100 {
        s.push_str(&i.to_string());
    }
    black_box(s);
}

/// String parsing benchmark, bound to a 50ms wall-clock budget
#[lapbench::bench(time_ms = 50.0)]
fn bench_string_parse() {
    let sum: i64 = ["12", "34", "56", "78"]
        .iter()
        .filter_map(|s| s.parse::<i64>().ok())
        .sum();
    black_box(sum);
}

// ============================================================================
// Computation Benchmarks
// ============================================================================

/// Fibonacci (iterative)
#[lapbench::bench]
fn bench_fibonacci_iter() {
    fn fib(n: u32) -> u64 {
        let mut a = 0u64;
        let mut b = 1u64;
        for _ in 0..n {
            let tmp = a;
            a = b;
            b += tmp;
        }
        a
    }

    black_box(fib(40));
}

// ============================================================================
// Main Entry Point - Uses the Lapbench CLI
// ============================================================================

fn main() {
    // All benchmarks defined above are discovered via inventory.
    if let Err(e) = lapbench::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
