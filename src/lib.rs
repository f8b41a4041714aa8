//! Funeral Charts - survey and lobbying disclosure chart generator
//!
//! Loads funeral-home pricing data and lobbying spending records, cleans them
//! with Polars and renders static PNG charts with plotters.

pub mod charts;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod stats;
