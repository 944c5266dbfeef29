//! One-dimensional Gaussian kernel density estimation.

use std::f64::consts::TAU;

// ---------------------------------------------------------------------------
// GaussianKde
// ---------------------------------------------------------------------------

/// Gaussian kernel density estimate of a one-dimensional sample.
///
/// The kernel width is `factor × s`, where `s` is the sample standard
/// deviation, matching the scalar-bandwidth convention of the usual
/// estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    dataset: Vec<f64>,
    factor: f64,
    bandwidth: f64,
}

impl GaussianKde {
    /// Build an estimate with an explicit bandwidth factor.
    pub fn new(dataset: &[f64], factor: f64) -> Self {
        let bandwidth = factor * sample_std(dataset);
        Self {
            dataset: dataset.to_vec(),
            factor,
            bandwidth,
        }
    }

    /// Build an estimate with the Scott's-rule factor `n^(-1/5)`.
    pub fn scotts(dataset: &[f64]) -> Self {
        let factor = (dataset.len().max(1) as f64).powf(-0.2);
        Self::new(dataset, factor)
    }

    /// The bandwidth factor the estimate was built with.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The effective kernel standard deviation (`factor × sample std`).
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of samples behind the estimate.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Evaluate the estimated density at each point.
    pub fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        if self.dataset.is_empty() {
            return vec![0.0; points.len()];
        }
        // A degenerate sample collapses the kernel width to zero; clamp so
        // the evaluation stays finite.
        let h = self.bandwidth.max(f64::MIN_POSITIVE);
        let norm = 1.0 / (self.dataset.len() as f64 * h * TAU.sqrt());

        points
            .iter()
            .map(|&x| {
                let sum: f64 = self
                    .dataset
                    .iter()
                    .map(|&xi| (-((x - xi) / h).powi(2) / 2.0).exp())
                    .sum();
                norm * sum
            })
            .collect()
    }
}

/// Sample standard deviation with Bessel's correction, as the covariance
/// estimate underlying the bandwidth.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_integrates_to_one() {
        let dataset: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let kde = GaussianKde::scotts(&dataset);

        // Riemann sum over a grid comfortably wider than the data.
        let step = 0.01;
        let grid: Vec<f64> = (-1000..1000).map(|i| i as f64 * step).collect();
        let total: f64 = kde.evaluate(&grid).iter().sum::<f64>() * step;
        assert!((total - 1.0).abs() < 0.01, "integral was {total}");
    }

    #[test]
    fn density_peaks_near_the_sample_mode() {
        let dataset = vec![0.0, 0.1, -0.1, 0.05, -0.05, 5.0];
        let kde = GaussianKde::new(&dataset, 0.2);
        let at = kde.evaluate(&[0.0, 2.5, 5.0]);
        assert!(at[0] > at[2], "cluster should outweigh the lone point");
        assert!(at[1] < at[0] && at[1] < at[2]);
    }

    #[test]
    fn empty_dataset_evaluates_to_zero() {
        let kde = GaussianKde::new(&[], 0.2);
        assert!(kde.is_empty());
        assert_eq!(kde.evaluate(&[0.0, 1.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn bandwidth_scales_with_sample_std() {
        let narrow = GaussianKde::new(&[0.0, 1.0, 2.0, 3.0], 0.5);
        let wide = GaussianKde::new(&[0.0, 10.0, 20.0, 30.0], 0.5);
        assert!(wide.bandwidth() > narrow.bandwidth());
        assert!((narrow.factor() - 0.5).abs() < 1e-12);
    }
}
