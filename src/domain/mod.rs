//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw per-product observations (`Observation`)
//! - derived analytics (`ProductTotal`, `MonthlyPoint`, `Series`, `Forecast`)
//! - the composed overview and its wire form (`OverviewResult`, `OverviewResponse`)
//! - the coercion rules applied to untrusted cells (`coerce`)

pub mod coerce;
pub mod types;

pub use coerce::*;
pub use types::*;
