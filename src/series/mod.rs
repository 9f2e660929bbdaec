//! Monthly time-series construction.
//!
//! Raw daily observations are reduced to one representative point per
//! calendar month (`bucket`), which is what charts and the forecaster consume.

pub mod bucket;

pub use bucket::*;
