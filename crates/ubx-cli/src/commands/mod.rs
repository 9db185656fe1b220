//! Command handler modules for the `ubx` CLI.
//!
//! Handlers print `key=value` lines on stdout.

pub mod counter;
pub mod db;
pub mod order;

/// Format an amount without a trailing `.0` for whole values.
pub fn amount(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
