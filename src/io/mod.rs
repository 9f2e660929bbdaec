//! Input/output helpers.
//!
//! - wide-table CSV ingest (`ingest`)
//! - overview and leaderboard exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
