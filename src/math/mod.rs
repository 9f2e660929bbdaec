//! Mathematical utilities: least squares and linear trend fitting.

pub mod ols;

pub use ols::*;
