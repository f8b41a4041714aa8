//! Survey and lobbying chart pipelines.
//!
//! Each run loads its data once, prepares it, and renders every chart in a
//! fixed order. A failure stops the run; charts already written stay on disk.

use crate::charts::{
    draw_hybrid, render_png, CategoryLabels, ChartError, ChartText, HistogramStyle, HueScale,
    HybridPlan, LineStyle, ScatterStyle, StaticChartRenderer, Theme, SKY_BLUE, TEAL,
};
use crate::data::lobbying::{self, LobbyingConfig, LOBBYING_CSV};
use crate::data::{clean_columns, cleaned_name, DataLoader, DataProcessor};
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SURVEY_INPUT: &str = "oct10-fh-data.csv";
pub const LOBBYING_CHART_FILE: &str = "spending_over_time_portrait.png";
const LOBBYING_CHART_SIZE: (u32, u32) = (800, 1000);

/// Inputs of the survey pipeline.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub input_path: PathBuf,
    /// Raw columns that get a `<col>_cleaned` numeric counterpart.
    pub columns_to_clean: Vec<String>,
    pub category_column: String,
    pub labels: CategoryLabels,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(SURVEY_INPUT),
            columns_to_clean: [
                "Latitude",
                "Longitude",
                "BasicServicesFee",
                "DirectCremationLowestPrice",
                "DirectCremation_Pct_Change",
                "ImmediateBurialLowestPrice",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            category_column: "Ownership".to_string(),
            labels: CategoryLabels::default(),
        }
    }
}

/// What a survey chart plots. Column names refer to cleaned columns.
#[derive(Debug, Clone)]
pub enum ChartKind {
    Scatter {
        x: String,
        y: String,
        style: ScatterStyle,
    },
    Histogram {
        column: String,
        style: HistogramStyle,
    },
    Hybrid {
        column: String,
    },
}

/// One output image of the survey pipeline.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub size: (u32, u32),
    pub title: &'static str,
    pub x_desc: String,
    pub y_desc: &'static str,
    pub empty_message: &'static str,
    pub kind: ChartKind,
}

impl ChartSpec {
    fn text(&self) -> ChartText<'_> {
        ChartText {
            title: self.title,
            x_desc: &self.x_desc,
            y_desc: self.y_desc,
        }
    }
}

/// The eight survey charts, in output order.
pub fn survey_charts(config: &SurveyConfig, theme: &Theme) -> Vec<ChartSpec> {
    let category = config.category_column.clone();
    let histogram = |color| HistogramStyle {
        bins: 25,
        color,
        currency_axis: true,
    };

    vec![
        ChartSpec {
            file_name: "geographic_distribution.png",
            size: (1000, 800),
            title: "Geographic Distribution of Funeral Homes by Ownership",
            x_desc: "Longitude".into(),
            y_desc: "Latitude",
            empty_message: "No data for Geographic Distribution plot.",
            kind: ChartKind::Scatter {
                x: cleaned_name("Longitude"),
                y: cleaned_name("Latitude"),
                style: ScatterStyle {
                    hue: HueScale::Qualitative,
                    marker_size: 4,
                    opacity: 0.7,
                    currency_axes: false,
                    fit_line: false,
                },
            },
        },
        ChartSpec {
            file_name: "cremation_price_distribution.png",
            size: (1000, 600),
            title: "Distribution of Direct Cremation Lowest Price",
            x_desc: "Price ($)".into(),
            y_desc: "Number of Funeral Homes",
            empty_message: "No data for Direct Cremation Price plot.",
            kind: ChartKind::Histogram {
                column: cleaned_name("DirectCremationLowestPrice"),
                style: histogram(theme.category_color(0)),
            },
        },
        ChartSpec {
            file_name: "immediate_burial_price_distribution.png",
            size: (1000, 600),
            title: "Distribution of Immediate Burial Lowest Price",
            x_desc: "Price ($)".into(),
            y_desc: "Number of Funeral Homes",
            empty_message: "No data for Immediate Burial Price plot.",
            kind: ChartKind::Histogram {
                column: cleaned_name("ImmediateBurialLowestPrice"),
                style: histogram(TEAL),
            },
        },
        ChartSpec {
            file_name: "basic_services_fee_hybrid_plot.png",
            size: (1200, 800),
            title: "Distribution of Basic Services Fee by Ownership Type",
            x_desc: category.clone(),
            y_desc: "Basic Services Fee ($)",
            empty_message: "",
            kind: ChartKind::Hybrid {
                column: cleaned_name("BasicServicesFee"),
            },
        },
        ChartSpec {
            file_name: "direct_cremation_hybrid_plot.png",
            size: (1200, 800),
            title: "Distribution of Direct Cremation Price by Ownership Type",
            x_desc: category.clone(),
            y_desc: "Direct Cremation Lowest Price ($)",
            empty_message: "",
            kind: ChartKind::Hybrid {
                column: cleaned_name("DirectCremationLowestPrice"),
            },
        },
        ChartSpec {
            file_name: "immediate_burial_hybrid_plot.png",
            size: (1200, 800),
            title: "Distribution of Immediate Burial Price by Ownership Type",
            x_desc: category,
            y_desc: "Immediate Burial Lowest Price ($)",
            empty_message: "",
            kind: ChartKind::Hybrid {
                column: cleaned_name("ImmediateBurialLowestPrice"),
            },
        },
        ChartSpec {
            file_name: "cremation_percentage_change.png",
            size: (1000, 600),
            title: "Distribution of Percentage Change in Direct Cremation Price",
            x_desc: "Percentage Change (%)".into(),
            y_desc: "Number of Funeral Homes",
            empty_message: "No data for Cremation Pct. Change plot.",
            kind: ChartKind::Histogram {
                column: cleaned_name("DirectCremation_Pct_Change"),
                style: HistogramStyle {
                    currency_axis: false,
                    ..histogram(SKY_BLUE)
                },
            },
        },
        ChartSpec {
            file_name: "fee_vs_cremation_price.png",
            size: (1100, 700),
            title: "Basic Services Fee vs. Direct Cremation Price by Ownership",
            x_desc: "Direct Cremation Lowest Price ($)".into(),
            y_desc: "Basic Services Fee ($)",
            empty_message: "No data for Fee vs. Cremation Price plot.",
            kind: ChartKind::Scatter {
                x: cleaned_name("DirectCremationLowestPrice"),
                y: cleaned_name("BasicServicesFee"),
                style: ScatterStyle {
                    hue: HueScale::Sequential,
                    marker_size: 4,
                    opacity: 0.8,
                    currency_axes: true,
                    fit_line: true,
                },
            },
        },
    ]
}

/// Load, clean and render every survey chart into `out_dir`.
///
/// Missing cleaning columns are reported on stdout and skipped.
pub fn run_survey(config: &SurveyConfig, theme: &Theme, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut loader = DataLoader::new();
    loader.load_csv(&config.input_path)?;
    if let Some(path) = loader.get_file_path() {
        info!(
            path = %path.display(),
            rows = loader.get_row_count(),
            "loaded survey data"
        );
    }

    let mut df = loader.into_dataframe()?;
    DataProcessor::strip_whitespace(&mut df)?;

    for column in clean_columns(&mut df, &config.columns_to_clean)? {
        println!("Warning: Column '{column}' not found in the CSV file.");
    }

    let mut written = Vec::new();
    for spec in survey_charts(config, theme) {
        let path = out_dir.join(spec.file_name);
        render_survey_chart(&df, &spec, config, theme, &path)
            .with_context(|| format!("failed to render {}", spec.file_name))?;
        info!(file = spec.file_name, "chart saved");
        written.push(path);
    }

    Ok(written)
}

fn render_survey_chart(
    df: &DataFrame,
    spec: &ChartSpec,
    config: &SurveyConfig,
    theme: &Theme,
    path: &Path,
) -> Result<(), ChartError> {
    let text = spec.text();

    match &spec.kind {
        ChartKind::Scatter { x, y, style } => {
            let rows = DataProcessor::categorized_points(df, x, y, &config.category_column)?;
            debug!(file = spec.file_name, rows = rows.len(), "scatter rows");
            render_png(path, spec.size, |area| {
                StaticChartRenderer::draw_category_scatter(
                    area,
                    &rows,
                    &text,
                    style,
                    theme,
                    spec.empty_message,
                )
            })
        }
        ChartKind::Histogram { column, style } => {
            let values = DataProcessor::numeric_values(df, column)?;
            debug!(file = spec.file_name, values = values.len(), "histogram");
            render_png(path, spec.size, |area| {
                StaticChartRenderer::draw_histogram(
                    area,
                    &values,
                    &text,
                    style,
                    theme,
                    spec.empty_message,
                )
            })
        }
        ChartKind::Hybrid { column } => {
            let plan = HybridPlan::from_frame(df, column, &config.category_column, &config.labels)?;
            debug!(
                file = spec.file_name,
                categories = plan.as_ref().map_or(0, |p| p.categories.len()),
                "hybrid plan"
            );
            render_png(path, spec.size, |area| {
                draw_hybrid(area, plan.as_ref(), &text, theme)
            })
        }
    }
}

/// Aggregate the embedded lobbying data and render the spending chart.
pub fn run_lobbying(config: &LobbyingConfig, theme: &Theme, out_dir: &Path) -> Result<PathBuf> {
    let mut loader = DataLoader::new();
    loader.load_csv_str(LOBBYING_CSV)?;
    let df = loader.into_dataframe()?;

    let rows = lobbying::aggregate(&df, config)?;
    info!(
        years = rows.len(),
        first = config.first_year,
        last = config.last_year,
        "aggregated lobbying spending"
    );

    let text = ChartText {
        title: "Lobbying Spending by Funeral vs. Cemetery Groups per Year",
        x_desc: "Year",
        y_desc: "Total Spending ($)",
    };
    let path = out_dir.join(LOBBYING_CHART_FILE);
    render_png(&path, LOBBYING_CHART_SIZE, |area| {
        StaticChartRenderer::draw_spending_lines(area, &rows, &text, &LineStyle::default(), theme)
    })
    .with_context(|| format!("failed to render {LOBBYING_CHART_FILE}"))?;
    info!(file = LOBBYING_CHART_FILE, "chart saved");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_distinct_survey_outputs() {
        let charts = survey_charts(&SurveyConfig::default(), &Theme::default());
        assert_eq!(charts.len(), 8);

        let mut names: Vec<&str> = charts.iter().map(|c| c.file_name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert!(names.iter().all(|n| n.ends_with(".png")));
    }

    #[test]
    fn hybrid_charts_use_category_column_as_x_label() {
        let config = SurveyConfig {
            category_column: "Owner".into(),
            ..SurveyConfig::default()
        };
        let charts = survey_charts(&config, &Theme::default());
        let hybrids: Vec<&ChartSpec> = charts
            .iter()
            .filter(|c| matches!(c.kind, ChartKind::Hybrid { .. }))
            .collect();
        assert_eq!(hybrids.len(), 3);
        assert!(hybrids.iter().all(|c| c.x_desc == "Owner"));
    }

    #[test]
    fn survey_columns_are_cleaned_counterparts() {
        let config = SurveyConfig::default();
        let cleaned: Vec<String> = config
            .columns_to_clean
            .iter()
            .map(|c| cleaned_name(c))
            .collect();

        for chart in survey_charts(&config, &Theme::default()) {
            let used = match &chart.kind {
                ChartKind::Scatter { x, y, .. } => vec![x.clone(), y.clone()],
                ChartKind::Histogram { column, .. } | ChartKind::Hybrid { column } => {
                    vec![column.clone()]
                }
            };
            assert!(used.iter().all(|c| cleaned.contains(c)), "{used:?}");
        }
    }
}
