//! Statistics Calculator Module
//! Handles per-category summaries, kernel density estimates, histogram
//! binning and least-squares fits.

use statrs::distribution::{Continuous, ContinuousCDF, Normal, StudentsT};

/// Min/median/max summary of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub count: usize,
    /// Number of distinct values.
    pub distinct: usize,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Equal-width bins starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `(left edge, right edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let lo = self.start + i as f64 * self.bin_width;
            (lo, lo + self.bin_width, count)
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.counts.len() as f64 * self.bin_width
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
    x_mean: f64,
    sxx: f64,
    residual_std: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Half-width of the confidence interval for the mean response at `x`.
    ///
    /// `None` with fewer than three points (no residual degrees of freedom).
    pub fn confidence_half_width(&self, x: f64, level: f64) -> Option<f64> {
        if self.n < 3 {
            return None;
        }
        let dist = StudentsT::new(0.0, 1.0, (self.n - 2) as f64).ok()?;
        let t = dist.inverse_cdf(0.5 + level / 2.0);
        let leverage = 1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx;
        Some(t * self.residual_std * leverage.sqrt())
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarize a category; `None` when it has no values.
    pub fn summarize(values: &[f64]) -> Option<CategorySummary> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let mut distinct = sorted.clone();
        distinct.dedup();

        Some(CategorySummary {
            count: sorted.len(),
            distinct: distinct.len(),
            min: sorted[0],
            median: Self::median(&sorted),
            max: sorted[sorted.len() - 1],
        })
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Median of an already-sorted, non-empty slice.
    pub fn median(sorted: &[f64]) -> f64 {
        let n = sorted.len();
        if n == 0 {
            return f64::NAN;
        }
        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }

    /// Scott's rule bandwidth, `None` for fewer than two points or zero spread.
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        let std = Self::std_dev(values);
        if values.len() < 2 || std <= 0.0 || !std.is_finite() {
            return None;
        }
        Some(std * (values.len() as f64).powf(-0.2))
    }

    /// Gaussian KDE sampled at `points` evenly spaced positions in `lo..=hi`.
    ///
    /// Empty when the bandwidth is undefined.
    pub fn kde_curve(values: &[f64], lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        let Some(bandwidth) = Self::scott_bandwidth(values) else {
            return Vec::new();
        };
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };
        if points < 2 || hi <= lo {
            return Vec::new();
        }

        let n = values.len() as f64;
        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density = values
                    .iter()
                    .map(|v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    / (n * bandwidth);
                (x, density)
            })
            .collect()
    }

    /// Bin values into `bins` equal-width bins spanning their range.
    ///
    /// A zero-width range is widened to `value ± 0.5`; the last bin includes
    /// its right edge.
    pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let sorted = Self::sorted(values);
        let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }

        let bin_width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = (((v - lo) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram {
            start: lo,
            bin_width,
            counts,
        })
    }

    /// Least-squares fit; `None` when x has no spread.
    pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
        let n = points.len();
        if n < 2 {
            return None;
        }

        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let sxx: f64 = points.iter().map(|p| (p.0 - x_mean).powi(2)).sum();
        let sxy: f64 = points
            .iter()
            .map(|p| (p.0 - x_mean) * (p.1 - y_mean))
            .sum();
        if sxx <= 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let residual_std = if n > 2 {
            let sse: f64 = points
                .iter()
                .map(|p| (p.1 - (intercept + slope * p.0)).powi(2))
                .sum();
            (sse / (n - 2) as f64).sqrt()
        } else {
            0.0
        };

        Some(LinearFit {
            slope,
            intercept,
            n,
            x_mean,
            sxx,
            residual_std,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_odd_and_even_counts() {
        let odd = StatsCalculator::summarize(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!((odd.min, odd.median, odd.max), (1.0, 3.0, 5.0));
        assert_eq!(odd.distinct, 3);

        let even = StatsCalculator::summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.count, 4);
    }

    #[test]
    fn summary_counts_distinct_values() {
        let s = StatsCalculator::summarize(&[2495.0, 2495.0, 2495.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.distinct, 1);
        assert!(StatsCalculator::summarize(&[]).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 6.0];
        let curve = StatsCalculator::kde_curve(&values, -10.0, 20.0, 601);
        let step = 30.0 / 600.0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area was {area}");
    }

    #[test]
    fn kde_is_empty_without_spread() {
        assert!(StatsCalculator::kde_curve(&[3.0, 3.0], 0.0, 6.0, 10).is_empty());
        assert!(StatsCalculator::kde_curve(&[3.0], 0.0, 6.0, 10).is_empty());
    }

    #[test]
    fn histogram_places_max_in_last_bin() {
        let h = StatsCalculator::histogram(&[0.0, 1.0, 2.0, 10.0], 5).unwrap();
        assert_eq!(h.bin_width, 2.0);
        assert_eq!(h.counts, vec![2, 1, 0, 0, 1]);
        assert_eq!(h.end(), 10.0);
        assert_eq!(h.max_count(), 2);
    }

    #[test]
    fn histogram_of_constant_values() {
        let h = StatsCalculator::histogram(&[7.0, 7.0], 25).unwrap();
        assert_eq!(h.start, 6.5);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn linear_fit_recovers_line() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 3.0 + 2.0 * i as f64)).collect();
        let fit = StatsCalculator::linear_fit(&points).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.predict(20.0) - 43.0).abs() < 1e-9);
        assert!(fit.confidence_half_width(5.0, 0.95).unwrap() < 1e-6);
    }

    #[test]
    fn confidence_band_widens_away_from_mean() {
        let points = [(1.0, 2.0), (2.0, 4.5), (3.0, 5.5), (4.0, 8.5), (5.0, 9.0)];
        let fit = StatsCalculator::linear_fit(&points).unwrap();
        let center = fit.confidence_half_width(3.0, 0.95).unwrap();
        let edge = fit.confidence_half_width(5.0, 0.95).unwrap();
        assert!(center > 0.0);
        assert!(edge > center);
    }

    #[test]
    fn linear_fit_needs_x_spread() {
        assert!(StatsCalculator::linear_fit(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
        let pair = StatsCalculator::linear_fit(&[(1.0, 2.0), (2.0, 3.0)]).unwrap();
        assert!(pair.confidence_half_width(1.5, 0.95).is_none());
    }
}
