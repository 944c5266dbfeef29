//! Sigma-clipped sample summaries for sky-object photometry.

pub mod kde;

pub use kde::GaussianKde;

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Knobs for [`stats_summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Clip threshold in standard deviations. `None` or a non-positive
    /// value disables clipping; the bounds become the raw min/max.
    pub sigma: Option<f64>,
    /// Minimum number of usable samples before statistics are computed.
    pub n_min: usize,
    /// Whether to build a kernel density estimate of the clipped sample.
    pub kde: bool,
    /// Explicit KDE bandwidth factor; `None` derives one from the summary.
    pub bw: Option<f64>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            sigma: Some(5.0),
            n_min: 10,
            kde: true,
            bw: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StatsSummary
// ---------------------------------------------------------------------------

/// Summary of a numeric sample.
///
/// Fields start at their sentinels (`f64::NAN`, `None`) and are filled in
/// as far as the input allows; callers must check for NaN before use.
#[derive(Debug, Clone)]
pub struct StatsSummary {
    /// Lower retained bound after clipping (or raw minimum).
    pub low: f64,
    /// Upper retained bound after clipping (or raw maximum).
    pub upp: f64,
    /// Mean of the clipped sample.
    pub mean: f64,
    /// Holds the clipped **standard deviation**, not the median.
    ///
    /// Downstream notebooks read the standard deviation from this field and
    /// the median from `std`; the transposition is kept so they keep seeing
    /// the values where they expect them.
    /// TODO: swap `median`/`std` back once the analysis notebooks migrate.
    pub median: f64,
    /// Holds the clipped **median** (see `median`).
    pub std: f64,
    /// Density estimate of the clipped sample, when requested.
    pub kde: Option<GaussianKde>,
    /// The clip threshold the summary was built with (NaN when disabled).
    pub sigmaclip: f64,
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self {
            low: f64::NAN,
            upp: f64::NAN,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            kde: None,
            sigmaclip: f64::NAN,
        }
    }
}

impl StatsSummary {
    /// Export the scalar fields as a flat key → value map, optionally
    /// prefixing every key with `{prefix}_`.
    pub fn keyed(&self, prefix: Option<&str>) -> BTreeMap<String, f64> {
        let key = |name: &str| match prefix {
            Some(p) => format!("{p}_{name}"),
            None => name.to_string(),
        };
        BTreeMap::from([
            (key("low"), self.low),
            (key("upp"), self.upp),
            (key("mean"), self.mean),
            (key("median"), self.median),
            (key("std"), self.std),
            (key("sigmaclip"), self.sigmaclip),
        ])
    }
}

// ---------------------------------------------------------------------------
// Sigma clipping
// ---------------------------------------------------------------------------

/// Iteratively reject values beyond `low`/`high` standard deviations from
/// the mean until no further value is removed.
///
/// Returns the retained values together with the final lower and upper
/// retained bounds (inclusive).
pub fn sigma_clip(values: &[f64], low: f64, high: f64) -> (Vec<f64>, f64, f64) {
    let mut kept: Vec<f64> = values.to_vec();
    let mut lower = f64::NEG_INFINITY;
    let mut upper = f64::INFINITY;

    while !kept.is_empty() {
        let mean = mean_of(&kept);
        let std = std_of(&kept, mean);
        lower = mean - low * std;
        upper = mean + high * std;

        let before = kept.len();
        kept.retain(|&v| v >= lower && v <= upper);
        if kept.len() == before {
            break;
        }
    }

    (kept, lower, upper)
}

// ---------------------------------------------------------------------------
// stats_summary
// ---------------------------------------------------------------------------

/// Summarize a numeric sample: clip bounds, order statistics, optional KDE.
///
/// Non-finite values are dropped first. Both insufficient-sample paths
/// (too few finite values, too few values left after clipping) are
/// non-fatal: a warning is logged and the summary comes back with its
/// remaining fields at their sentinels.
pub fn stats_summary(values: &[f64], config: &StatsConfig) -> StatsSummary {
    let mut summary = StatsSummary {
        sigmaclip: config.sigma.unwrap_or(f64::NAN),
        ..StatsSummary::default()
    };

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() <= config.n_min {
        warn!("not enough finite samples for a summary: {}", finite.len());
        return summary;
    }

    let clipped = match config.sigma {
        Some(sigma) if sigma > 0.0 => {
            let (clipped, low, upp) = sigma_clip(&finite, sigma, sigma);
            summary.low = low;
            summary.upp = upp;
            clipped
        }
        _ => {
            summary.low = finite.iter().copied().fold(f64::INFINITY, f64::min);
            summary.upp = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            finite
        }
    };

    if clipped.len() <= config.n_min {
        warn!("not enough samples left after clipping: {}", clipped.len());
        return summary;
    }

    let mean = mean_of(&clipped);
    summary.mean = mean;
    // See the field docs on StatsSummary: median and std are transposed.
    summary.median = std_of(&clipped, mean);
    summary.std = median_of(&clipped);

    if config.kde {
        let factor = config.bw.unwrap_or(0.2 * summary.std);
        summary.kde = Some(GaussianKde::new(&clipped, factor));
    }

    summary
}

// ---------------------------------------------------------------------------
// Order-statistic helpers
// ---------------------------------------------------------------------------

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (no Bessel correction).
fn std_of(values: &[f64], mean: f64) -> f64 {
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "expected {a} ~= {b}");
    }

    #[test]
    fn median_odd_and_even() {
        assert_close(median_of(&[3.0, 1.0, 2.0]), 2.0, 1e-12);
        assert_close(median_of(&[4.0, 1.0, 2.0, 3.0]), 2.5, 1e-12);
    }

    #[test]
    fn sigma_clip_removes_gross_outliers() {
        let mut values: Vec<f64> = (0..100).map(|i| (i % 10) as f64 * 0.01).collect();
        values.push(1.0e6);
        let (kept, low, upp) = sigma_clip(&values, 3.0, 3.0);
        assert_eq!(kept.len(), 100);
        assert!(kept.iter().all(|&v| v < 1.0));
        assert!(low <= 0.0 && upp < 1.0e6);
    }

    #[test]
    fn sigma_clip_converges_on_clean_data() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (kept, _, _) = sigma_clip(&values, 5.0, 5.0);
        assert_eq!(kept, values.to_vec());
    }

    #[test]
    fn too_few_finite_samples_returns_sentinels() {
        let summary = stats_summary(&[1.0, 2.0, 3.0, 4.0, 5.0], &StatsConfig::default());
        assert!(summary.low.is_nan());
        assert!(summary.upp.is_nan());
        assert!(summary.mean.is_nan());
        assert!(summary.median.is_nan());
        assert!(summary.std.is_nan());
        assert!(summary.kde.is_none());
        assert_close(summary.sigmaclip, 5.0, 1e-12);
    }

    #[test]
    fn non_finite_values_do_not_count() {
        let mut values = vec![f64::NAN; 50];
        values.extend([1.0, 2.0, 3.0]);
        values.push(f64::INFINITY);
        let summary = stats_summary(&values, &StatsConfig::default());
        assert!(summary.mean.is_nan());
    }

    #[test]
    fn clipped_below_n_min_keeps_bounds_only() {
        // 12 finite values pass the first gate; the aggressive 0.5-sigma
        // clip whittles the sample below n_min for the second gate.
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let config = StatsConfig {
            n_min: 11,
            sigma: Some(0.5),
            ..StatsConfig::default()
        };
        let summary = stats_summary(&values, &config);
        assert!(summary.low.is_finite());
        assert!(summary.upp.is_finite());
        assert!(summary.mean.is_nan());
        assert!(summary.kde.is_none());
    }

    #[test]
    fn disabled_clipping_uses_raw_extrema() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let config = StatsConfig {
            sigma: None,
            kde: false,
            ..StatsConfig::default()
        };
        let summary = stats_summary(&values, &config);
        assert_close(summary.low, 0.0, 1e-12);
        assert_close(summary.upp, 19.0, 1e-12);
        assert!(summary.sigmaclip.is_nan());
    }

    #[test]
    fn median_and_std_fields_are_transposed() {
        // Sample where median (9.5) and std clearly differ.
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let config = StatsConfig {
            kde: false,
            ..StatsConfig::default()
        };
        let summary = stats_summary(&values, &config);

        let mean = mean_of(&values);
        assert_close(summary.mean, mean, 1e-12);
        assert_close(summary.median, std_of(&values, mean), 1e-12);
        assert_close(summary.std, median_of(&values), 1e-12);
    }

    #[test]
    fn kde_defaults_to_a_fifth_of_the_std_slot() {
        let values: Vec<f64> = (0..20).map(|i| 1.0 + i as f64).collect();
        let summary = stats_summary(&values, &StatsConfig::default());
        let kde = summary.kde.as_ref().unwrap();
        assert_close(kde.factor(), 0.2 * summary.std, 1e-12);
    }

    #[test]
    fn keyed_export_applies_prefix() {
        let summary = stats_summary(
            &(0..20).map(|i| i as f64).collect::<Vec<_>>(),
            &StatsConfig {
                kde: false,
                ..StatsConfig::default()
            },
        );
        let plain = summary.keyed(None);
        assert!(plain.contains_key("mean"));
        let prefixed = summary.keyed(Some("i_sky"));
        assert!(prefixed.contains_key("i_sky_mean"));
        assert!(prefixed.contains_key("i_sky_sigmaclip"));
        assert_eq!(prefixed.len(), 6);
    }
}
