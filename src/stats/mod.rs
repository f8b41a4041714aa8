//! Stats module - descriptive statistics

mod calculator;

pub use calculator::{CategorySummary, Histogram, LinearFit, StatsCalculator};
