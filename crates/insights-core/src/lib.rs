//! Shared building blocks for campaign insights.
//!
//! Holds the campaign record model, the error type, statistics kernels,
//! number formatting helpers, profitability thresholds and the CLI settings
//! used by the data, report and binary crates.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod thresholds;
