//! `sales-overview` library crate.
//!
//! The binary (`sov`) is a thin wrapper around this library so that:
//!
//! - the analytics pipeline is testable without spawning processes
//! - the store and pipeline can be embedded behind other front-ends
//!   (an HTTP handler only needs `DatasetStore` + `app::pipeline`)

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod report;
pub mod series;
pub mod store;
