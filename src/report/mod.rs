//! Reporting utilities: per-product totals, leaderboards, and formatted
//! terminal output.
//!
//! Formatting lives next to the aggregation so that output changes stay
//! localized and the analytics code stays free of presentation concerns.

pub mod format;
pub mod totals;

pub use format::*;
pub use totals::*;
