//! Charts module - Chart rendering

pub mod format;
mod hybrid;
mod renderer;
mod theme;

pub use hybrid::{
    beeswarm_positions, draw_hybrid, Annotation, CategoryLabels, HybridPlan, Violin,
};
pub use renderer::{
    render_png, HistogramStyle, HueScale, LineStyle, ScatterStyle, StaticChartRenderer,
};
pub use theme::{Theme, DARK_GREEN, FIREBRICK, SKY_BLUE, TEAL};

use crate::data::ProcessorError;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing error: {0}")]
    Drawing(String),
    #[error("Chart data error: {0}")]
    Data(#[from] ProcessorError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

/// Title and axis descriptions of one chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartText<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}
