//! Static Chart Renderer
//! Draws the scatter, histogram and line charts onto plotters drawing areas.
//!
//! Every chart fills its area first and falls back to a centered message when
//! it has nothing to plot. Writing the PNG is left to [`render_png`].

use crate::charts::format::{format_currency, format_dollars, format_number, integer_tick_label};
use crate::charts::{ChartError, ChartText, Theme};
use crate::data::lobbying::{SpendingRow, CEMETERY_SERIES, FUNERAL_SERIES};
use crate::data::{CategorizedPoint, DataProcessor};
use crate::stats::StatsCalculator;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

/// Samples along a fitted line and its confidence band.
const FIT_SAMPLES: usize = 50;
/// Dashes along a fitted line.
const FIT_DASHES: usize = 24;
const FIT_CONFIDENCE: f64 = 0.95;
const KDE_SAMPLES: usize = 200;
/// Dashes along each grid line of the spending chart.
const GRID_DASHES: usize = 40;

/// How category hues are picked for a scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueScale {
    Qualitative,
    Sequential,
}

/// Scatter chart options.
#[derive(Debug, Clone, Copy)]
pub struct ScatterStyle {
    pub hue: HueScale,
    pub marker_size: u32,
    pub opacity: f64,
    /// Both axes show `$1,234` labels.
    pub currency_axes: bool,
    /// Overlay a dashed least-squares line with its 95% band.
    pub fit_line: bool,
}

/// Histogram options.
#[derive(Debug, Clone, Copy)]
pub struct HistogramStyle {
    pub bins: usize,
    pub color: RGBColor,
    pub currency_axis: bool,
}

/// Line chart options for the lobbying spending chart.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub y_max: f64,
    pub funeral_color: RGBColor,
    pub cemetery_color: RGBColor,
    pub marker_size: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            y_max: 100_000.0,
            funeral_color: BLUE,
            cemetery_color: RED,
            marker_size: 5,
        }
    }
}

/// Create a PNG at `path`, let `draw` paint it, then write it out.
pub fn render_png<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), ChartError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), ChartError>,
{
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw(&root)?;
    root.present()?;
    Ok(())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Centered message in place of a chart.
    pub fn draw_placeholder<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        message: &str,
        theme: &Theme,
    ) -> Result<(), ChartError> {
        let (w, h) = area.dim_in_pixel();
        let style = theme
            .axis_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw_text(message, &style, ((w / 2) as i32, (h / 2) as i32))?;
        Ok(())
    }

    /// Scatter of (x, y) rows colored by category, with a legend.
    pub fn draw_category_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        rows: &[CategorizedPoint],
        text: &ChartText<'_>,
        style: &ScatterStyle,
        theme: &Theme,
        empty_message: &str,
    ) -> Result<(), ChartError> {
        area.fill(&theme.background)?;
        if rows.is_empty() {
            return Self::draw_placeholder(area, empty_message, theme);
        }

        let categories = DataProcessor::sorted_categories(rows.iter().map(|r| r.category.as_str()));
        let x_range = padded_range(rows.iter().map(|r| r.x));
        let y_range = padded_range(rows.iter().map(|r| r.y));

        let mut chart = ChartBuilder::on(area)
            .caption(text.title, theme.title_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(x_range, y_range)?;

        let currency = |v: &f64| format_currency(*v);
        let plain = |v: &f64| format_number(*v);
        let axis_format: &dyn Fn(&f64) -> String = if style.currency_axes {
            &currency
        } else {
            &plain
        };

        chart
            .configure_mesh()
            .bold_line_style(theme.grid_color.stroke_width(1))
            .light_line_style(theme.background.stroke_width(0))
            .x_label_formatter(axis_format)
            .y_label_formatter(axis_format)
            .x_desc(text.x_desc)
            .y_desc(text.y_desc)
            .axis_desc_style(theme.axis_font())
            .label_style(theme.tick_font())
            .draw()?;

        if style.fit_line {
            let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.x, r.y)).collect();
            if let Some(fit) = StatsCalculator::linear_fit(&points) {
                let (x0, x1) = bounds(rows.iter().map(|r| r.x));
                let xs: Vec<f64> = (0..=FIT_SAMPLES)
                    .map(|i| x0 + (x1 - x0) * i as f64 / FIT_SAMPLES as f64)
                    .collect();

                let band: Option<Vec<(f64, f64)>> = xs
                    .iter()
                    .map(|&x| fit.confidence_half_width(x, FIT_CONFIDENCE).map(|h| (x, h)))
                    .collect();
                if let Some(band) = band {
                    let upper = band.iter().map(|&(x, h)| (x, fit.predict(x) + h));
                    let lower = band.iter().rev().map(|&(x, h)| (x, fit.predict(x) - h));
                    chart.draw_series(std::iter::once(Polygon::new(
                        upper.chain(lower).collect::<Vec<_>>(),
                        BLACK.mix(0.12).filled(),
                    )))?;
                }

                let from = (x0, fit.predict(x0));
                let to = (x1, fit.predict(x1));
                chart.draw_series(
                    dashed_segments(from, to, FIT_DASHES)
                        .into_iter()
                        .map(|segment| PathElement::new(segment, BLACK.stroke_width(2))),
                )?;
            }
        }

        for (idx, category) in categories.iter().enumerate() {
            let color = match style.hue {
                HueScale::Qualitative => theme.category_color(idx),
                HueScale::Sequential => theme.sequential_color(idx, categories.len()),
            };
            let size = style.marker_size;
            let fill = color.mix(style.opacity).filled();

            chart
                .draw_series(
                    rows.iter()
                        .filter(|r| &r.category == category)
                        .map(|r| Circle::new((r.x, r.y), size, fill)),
                )?
                .label(category.as_str())
                .legend(move |(x, y)| Circle::new((x, y), size, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(theme.background.mix(0.8))
            .border_style(BLACK)
            .label_font(theme.tick_font())
            .draw()?;

        Ok(())
    }

    /// Histogram of `values` with a KDE curve scaled to counts.
    pub fn draw_histogram<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        values: &[f64],
        text: &ChartText<'_>,
        style: &HistogramStyle,
        theme: &Theme,
        empty_message: &str,
    ) -> Result<(), ChartError> {
        area.fill(&theme.background)?;
        let Some(histogram) = StatsCalculator::histogram(values, style.bins) else {
            return Self::draw_placeholder(area, empty_message, theme);
        };

        let (lo, hi) = (histogram.start, histogram.end());
        let scale = values.len() as f64 * histogram.bin_width;
        let curve: Vec<(f64, f64)> = StatsCalculator::kde_curve(values, lo, hi, KDE_SAMPLES)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();

        let peak = curve
            .iter()
            .map(|&(_, y)| y)
            .fold(histogram.max_count() as f64, f64::max);
        let pad = (hi - lo) * 0.02;

        let mut chart = ChartBuilder::on(area)
            .caption(text.title, theme.title_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((lo - pad)..(hi + pad), 0.0..peak * 1.05)?;

        let currency = |v: &f64| format_currency(*v);
        let plain = |v: &f64| format_number(*v);
        let axis_format: &dyn Fn(&f64) -> String = if style.currency_axis {
            &currency
        } else {
            &plain
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(theme.grid_color.stroke_width(1))
            .light_line_style(theme.background.stroke_width(0))
            .x_label_formatter(axis_format)
            .y_label_formatter(&|v| format_number(*v))
            .x_desc(text.x_desc)
            .y_desc(text.y_desc)
            .axis_desc_style(theme.axis_font())
            .label_style(theme.tick_font())
            .draw()?;

        chart.draw_series(histogram.bins().map(|(x0, x1, count)| {
            Rectangle::new(
                [(x0, 0.0), (x1, count as f64)],
                style.color.mix(0.6).filled(),
            )
        }))?;
        chart.draw_series(histogram.bins().map(|(x0, x1, count)| {
            Rectangle::new(
                [(x0, 0.0), (x1, count as f64)],
                theme.background.stroke_width(1),
            )
        }))?;

        if !curve.is_empty() {
            chart.draw_series(LineSeries::new(curve, style.color.stroke_width(3)))?;
        }

        Ok(())
    }

    /// Funeral vs. cemetery spending per year, markers on each point.
    pub fn draw_spending_lines<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        rows: &[SpendingRow],
        text: &ChartText<'_>,
        style: &LineStyle,
        theme: &Theme,
    ) -> Result<(), ChartError> {
        area.fill(&theme.background)?;
        if rows.is_empty() {
            return Self::draw_placeholder(area, "No lobbying data in range", theme);
        }

        let (first, last) = bounds(rows.iter().map(|r| r.year as f64));

        let mut chart = ChartBuilder::on(area)
            .caption(text.title, theme.title_font())
            .margin(25)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d((first - 0.5)..(last + 0.5), 0.0..style.y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(rows.len() + 1)
            .x_label_formatter(&|v| integer_tick_label(*v))
            .y_label_formatter(&|v| format_dollars(*v))
            .x_desc(text.x_desc)
            .y_desc(text.y_desc)
            .axis_desc_style(theme.axis_font())
            .label_style(theme.tick_font())
            .draw()?;

        let grid = BLACK.mix(0.2).stroke_width(1);
        chart.draw_series(
            spending_grid(rows, style.y_max)
                .into_iter()
                .flat_map(|(from, to)| dashed_segments(from, to, GRID_DASHES))
                .map(|segment| PathElement::new(segment, grid)),
        )?;

        let funeral: Vec<(f64, f64)> = rows.iter().map(|r| (r.year as f64, r.funeral)).collect();
        let cemetery: Vec<(f64, f64)> = rows.iter().map(|r| (r.year as f64, r.cemetery)).collect();
        let series = [
            (FUNERAL_SERIES, style.funeral_color, funeral),
            (CEMETERY_SERIES, style.cemetery_color, cemetery),
        ];

        for (name, color, points) in series {
            let size = style.marker_size;
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(name)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, size, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(theme.background.mix(0.8))
            .border_style(BLACK)
            .label_font(theme.tick_font())
            .draw()?;

        Ok(())
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Data range widened by 5% each side, or by one unit when flat.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = bounds(values);
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad)..(hi + pad)
    } else {
        (lo - 1.0)..(hi + 1.0)
    }
}

/// Horizontal lines at tenths of `y_max` and a vertical line per year.
fn spending_grid(rows: &[SpendingRow], y_max: f64) -> Vec<((f64, f64), (f64, f64))> {
    let (first, last) = bounds(rows.iter().map(|r| r.year as f64));
    let horizontal = (1..=10).map(|i| {
        let y = y_max * i as f64 / 10.0;
        ((first - 0.5, y), (last + 0.5, y))
    });
    let vertical = rows.iter().map(|r| {
        let x = r.year as f64;
        ((x, 0.0), (x, y_max))
    });
    horizontal.chain(vertical).collect()
}

/// Every other piece of `from → to` split into `2 * dashes` pieces.
fn dashed_segments(from: (f64, f64), to: (f64, f64), dashes: usize) -> Vec<Vec<(f64, f64)>> {
    let pieces = dashes * 2;
    let at = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    (0..pieces)
        .step_by(2)
        .map(|i| {
            let t0 = i as f64 / pieces as f64;
            let t1 = (i + 1) as f64 / pieces as f64;
            vec![at(t0), at(t1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_flat_data() {
        assert_eq!(padded_range([5.0, 5.0].into_iter()), 4.0..6.0);
        let r = padded_range([0.0, 100.0].into_iter());
        assert_eq!(r, -5.0..105.0);
    }

    #[test]
    fn dashes_cover_alternate_pieces() {
        let dashes = dashed_segments((0.0, 0.0), (8.0, 8.0), 2);
        assert_eq!(
            dashes,
            vec![vec![(0.0, 0.0), (2.0, 2.0)], vec![(4.0, 4.0), (6.0, 6.0)]]
        );
    }

    #[test]
    fn spending_grid_covers_years_and_tenths() {
        let rows: Vec<SpendingRow> = (2017..=2019)
            .map(|year| SpendingRow {
                year,
                funeral: 0.0,
                cemetery: 0.0,
            })
            .collect();
        let grid = spending_grid(&rows, 100_000.0);

        assert_eq!(grid.len(), 13);
        assert_eq!(grid[0], ((2016.5, 10_000.0), (2019.5, 10_000.0)));
        assert_eq!(grid[9], ((2016.5, 100_000.0), (2019.5, 100_000.0)));
        assert_eq!(grid[10], ((2017.0, 0.0), (2017.0, 100_000.0)));
    }
}
