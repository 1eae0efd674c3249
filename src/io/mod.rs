//! Input/output helpers.
//!
//! - CSV dataset load/store (`dataset`)

pub mod dataset;

pub use dataset::*;
