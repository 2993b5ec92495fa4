//! Data layer for campaign insights.
//!
//! Loads the campaign CSV into a typed table, profiles its columns,
//! aggregates campaign KPIs per dimension and runs the top-level analysis
//! pipeline consumed by the report and chart renderers.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod reader;

pub use insights_core as core;
