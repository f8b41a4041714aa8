//! Hybrid violin/swarm chart with min, median and max annotations.
//!
//! Layout:
//! 1. Categories along x in lexicographic order, one unit apart
//! 2. Density (violin) shape behind the reserved category only
//! 3. Every row as a point, spread sideways where values collide
//! 4. Per category: median tick and label, max label above, min label below
//!
//! Building a [`HybridPlan`] is separate from drawing it, so the annotation
//! rules can be checked without a bitmap.

use crate::charts::format::{category_tick_label, format_currency};
use crate::charts::renderer::StaticChartRenderer;
use crate::charts::{ChartError, ChartText, Theme};
use crate::data::{CategorizedValue, DataProcessor};
use crate::stats::{CategorySummary, StatsCalculator};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::VPos;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::ops::Range;

/// Widest violin half-width, in category units.
const VIOLIN_HALF_WIDTH: f64 = 0.4;
/// Bandwidths the density extends past the data on each side.
const VIOLIN_CUT: f64 = 2.0;
const VIOLIN_GRID_POINTS: usize = 100;
/// Total horizontal room for a swarm column.
const SWARM_WIDTH: f64 = 0.8;
/// Spacing between neighbouring points in a crowded swarm row.
const SWARM_STEP: f64 = 0.04;
/// Values closer than span / SWARM_ROWS are treated as colliding.
const SWARM_ROWS: f64 = 60.0;
const MEDIAN_TICK_HALF_WIDTH: f64 = 0.2;

/// Category labels that change how a category is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLabels {
    /// Gets the density shape in addition to its points.
    pub reserved: String,
    /// Labeled with its single value when it has exactly one distinct value.
    pub single_value: String,
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            reserved: "Independent".to_string(),
            single_value: "FPG Beers & Story".to_string(),
        }
    }
}

/// Text drawn for one category.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// A single `$value` label above the point.
    Single { x: f64, value: f64 },
    /// Median tick and label plus max/min labels.
    Summary { x: f64, summary: CategorySummary },
}

/// Density outline of the reserved category.
#[derive(Debug, Clone, PartialEq)]
pub struct Violin {
    pub center: f64,
    pub values: Vec<f64>,
    /// `(y, half_width)` samples; empty when the density is undefined.
    pub profile: Vec<(f64, f64)>,
}

impl Violin {
    fn build(center: f64, values: Vec<f64>) -> Self {
        let profile = match StatsCalculator::scott_bandwidth(&values) {
            Some(bandwidth) => {
                let (min, max) = value_bounds(values.iter().copied());
                let lo = min - VIOLIN_CUT * bandwidth;
                let hi = max + VIOLIN_CUT * bandwidth;
                let curve = StatsCalculator::kde_curve(&values, lo, hi, VIOLIN_GRID_POINTS);
                let peak = curve.iter().map(|&(_, d)| d).fold(0.0, f64::max);
                if peak > 0.0 {
                    curve
                        .into_iter()
                        .map(|(y, d)| (y, d / peak * VIOLIN_HALF_WIDTH))
                        .collect()
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };

        Self {
            center,
            values,
            profile,
        }
    }

    /// Closed polygon: right side bottom-up, then left side top-down.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let right = self.profile.iter().map(|&(y, w)| (self.center + w, y));
        let left = self.profile.iter().rev().map(|&(y, w)| (self.center - w, y));
        right.chain(left).collect()
    }
}

/// Everything needed to draw the hybrid chart.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridPlan {
    pub categories: Vec<String>,
    /// `(x, y)` per row, x already spread by the swarm layout.
    pub points: Vec<(f64, f64)>,
    pub violin: Option<Violin>,
    pub annotations: Vec<Annotation>,
}

impl HybridPlan {
    /// Plan from the rows of `df`; `None` when no row has both fields.
    pub fn from_frame(
        df: &DataFrame,
        value_col: &str,
        category_col: &str,
        labels: &CategoryLabels,
    ) -> Result<Option<Self>, ChartError> {
        let rows = DataProcessor::categorized_values(df, value_col, category_col)?;
        Ok(Self::from_rows(&rows, labels))
    }

    /// Plan from already-filtered rows; `None` when `rows` is empty.
    pub fn from_rows(rows: &[CategorizedValue], labels: &CategoryLabels) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let categories = DataProcessor::sorted_categories(rows.iter().map(|r| r.category.as_str()));
        let mut by_category: HashMap<&str, Vec<f64>> = HashMap::new();
        for row in rows {
            by_category
                .entry(row.category.as_str())
                .or_default()
                .push(row.value);
        }

        let (lo, hi) = value_bounds(rows.iter().map(|r| r.value));
        let resolution = if hi > lo { (hi - lo) / SWARM_ROWS } else { 1.0 };

        let mut points = Vec::with_capacity(rows.len());
        let mut annotations = Vec::with_capacity(categories.len());
        let mut violin = None;

        for (i, category) in categories.iter().enumerate() {
            let x = i as f64;
            let values = by_category
                .get(category.as_str())
                .cloned()
                .unwrap_or_default();

            let xs = beeswarm_positions(&values, x, SWARM_WIDTH, resolution);
            points.extend(xs.into_iter().zip(values.iter().copied()));

            if *category == labels.reserved {
                violin = Some(Violin::build(x, values.clone()));
            }

            let Some(summary) = StatsCalculator::summarize(&values) else {
                continue;
            };
            if *category == labels.single_value && summary.distinct == 1 {
                annotations.push(Annotation::Single {
                    x,
                    value: summary.min,
                });
            } else {
                annotations.push(Annotation::Summary { x, summary });
            }
        }

        Some(Self {
            categories,
            points,
            violin,
            annotations,
        })
    }

    /// Y axis range covering points and violin, padded for the labels.
    pub fn y_range(&self) -> Range<f64> {
        let violin_ys = self
            .violin
            .iter()
            .flat_map(|v| v.profile.iter().map(|&(y, _)| y));
        let (lo, hi) = value_bounds(self.points.iter().map(|&(_, y)| y).chain(violin_ys));

        if hi > lo {
            let pad = (hi - lo) * 0.1;
            (lo - pad)..(hi + pad)
        } else {
            let pad = (lo.abs() * 0.1).max(1.0);
            (lo - pad)..(hi + pad)
        }
    }
}

fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Spread points whose values fall in the same `resolution` bucket
/// symmetrically around `center`, never wider than `width`.
pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64, resolution: f64) -> Vec<f64> {
    let n = y_values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut positions = vec![center; n];

    let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, &y) in y_values.iter().enumerate() {
        let key = (y / resolution).round() as i64;
        value_indices.entry(key).or_default().push(i);
    }

    for indices in value_indices.values() {
        if indices.len() > 1 {
            let count = indices.len();
            let step = (width / (count - 1) as f64).min(SWARM_STEP);
            let start = center - step * (count - 1) as f64 / 2.0;

            for (i, &idx) in indices.iter().enumerate() {
                positions[idx] = start + i as f64 * step;
            }
        }
    }

    positions
}

type CategoryChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw `plan` onto `area`, or the "no data" placeholder when there is none.
pub fn draw_hybrid<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plan: Option<&HybridPlan>,
    text: &ChartText<'_>,
    theme: &Theme,
) -> Result<(), ChartError> {
    area.fill(&theme.background)?;

    let Some(plan) = plan else {
        return StaticChartRenderer::draw_placeholder(
            area,
            &format!("No data available for {}", text.title),
            theme,
        );
    };

    let categories = &plan.categories;
    let n = categories.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(text.title, theme.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(-0.5..n - 0.5, plan.y_range())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(theme.grid_color.stroke_width(1))
        .light_line_style(theme.background.stroke_width(0))
        .x_labels(categories.len() + 1)
        .x_label_formatter(&|x| category_tick_label(categories, *x))
        .y_label_formatter(&|y| format_currency(*y))
        .x_desc(text.x_desc)
        .y_desc(text.y_desc)
        .axis_desc_style(theme.axis_font())
        .label_style(theme.tick_font())
        .draw()?;

    if let Some(violin) = &plan.violin {
        draw_violin(&mut chart, violin, theme)?;
    }

    chart.draw_series(plan.points.iter().map(|&(x, y)| {
        Circle::new(
            (x, y),
            theme.point_radius,
            theme.point_color.mix(0.7).filled(),
        )
    }))?;

    for annotation in &plan.annotations {
        match annotation {
            Annotation::Single { x, value } => {
                let style = theme.annotation_style(&theme.median_color, true, VPos::Bottom);
                annotate(
                    &mut chart,
                    (*x, *value),
                    format_currency(*value),
                    (0, -6),
                    style,
                )?;
            }
            Annotation::Summary { x, summary } => {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![
                        (x - MEDIAN_TICK_HALF_WIDTH, summary.median),
                        (x + MEDIAN_TICK_HALF_WIDTH, summary.median),
                    ],
                    theme.median_color.stroke_width(3),
                )))?;

                let median = theme.annotation_style(&theme.median_color, true, VPos::Bottom);
                annotate(
                    &mut chart,
                    (*x, summary.median),
                    format!("Median: {}", format_currency(summary.median)),
                    (0, -6),
                    median,
                )?;

                let high = theme.annotation_style(&theme.high_color, false, VPos::Bottom);
                annotate(
                    &mut chart,
                    (*x, summary.max),
                    format_currency(summary.max),
                    (0, -6),
                    high,
                )?;

                let low = theme.annotation_style(&theme.low_color, false, VPos::Top);
                annotate(
                    &mut chart,
                    (*x, summary.min),
                    format_currency(summary.min),
                    (0, 12),
                    low,
                )?;
            }
        }
    }

    Ok(())
}

fn draw_violin<DB: DrawingBackend>(
    chart: &mut CategoryChart<'_, DB>,
    violin: &Violin,
    theme: &Theme,
) -> Result<(), ChartError> {
    if violin.profile.is_empty() {
        // No spread: a flat bar at the shared value.
        if let Some(&y) = violin.values.first() {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![
                    (violin.center - VIOLIN_HALF_WIDTH, y),
                    (violin.center + VIOLIN_HALF_WIDTH, y),
                ],
                theme.violin_fill.stroke_width(3),
            )))?;
        }
        return Ok(());
    }

    let outline = violin.outline();
    chart.draw_series(std::iter::once(Polygon::new(
        outline.clone(),
        theme.violin_fill.filled(),
    )))?;

    let mut closed = outline;
    if let Some(&first) = closed.first() {
        closed.push(first);
    }
    chart.draw_series(std::iter::once(PathElement::new(
        closed,
        theme.point_color.stroke_width(2),
    )))?;

    Ok(())
}

fn annotate<DB: DrawingBackend>(
    chart: &mut CategoryChart<'_, DB>,
    at: (f64, f64),
    label: String,
    offset: (i32, i32),
    style: TextStyle<'_>,
) -> Result<(), ChartError> {
    chart.draw_series(std::iter::once(
        EmptyElement::at(at) + Text::new(label, offset, style),
    ))?;
    Ok(())
}
