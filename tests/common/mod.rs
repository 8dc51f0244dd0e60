// tests/common/mod.rs
//! Shared helpers for the integration suites.

pub mod temp;

#[allow(unused_imports)]
pub use temp::Scratch;

/// `n` lines of varying width, including some empty ones.
#[allow(dead_code)]
pub fn sample_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            if i % 7 == 3 { String::new() } else { format!("line {i}: {}", "abc".repeat(i % 11)) }
        })
        .collect()
}
