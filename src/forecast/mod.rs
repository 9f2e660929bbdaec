//! Short-horizon sales forecasting.
//!
//! Only a straight-line trend over the monthly series is supported; there is
//! no seasonal or multi-variate modelling.

pub mod trend;

pub use trend::*;
