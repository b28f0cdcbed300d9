//! Performance appraisal scoring: per-row target/actual calculation, the
//! six-band weight scale, section subtotals, the 70/30 overall rating, and
//! a flat-table import/export codec.

pub mod config;
pub mod error;
pub mod scoring;
pub mod tabular;
pub mod telemetry;
