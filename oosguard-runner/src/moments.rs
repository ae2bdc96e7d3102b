//! Higher moments of a return series — skewness and raw kurtosis.
//!
//! Both are computed from biased (population) central moments:
//! - skew = m3 / m2^1.5
//! - kurtosis = m4 / m2^2 (raw, not excess: a normal sample sits near 3.0)
//!
//! No smoothing or outlier trimming. These feed the non-normality correction
//! in the PSR/DSR z-statistic, which expects exactly these moments.

use oosguard_core::{Statistic, UnavailableReason};
use serde::{Deserialize, Serialize};

/// Third and fourth standardized moments of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HigherMoments {
    pub skew: f64,
    /// Raw (non-excess) kurtosis.
    pub kurtosis: f64,
}

impl HigherMoments {
    /// Moments of a normal distribution.
    pub const NORMAL: Self = Self {
        skew: 0.0,
        kurtosis: 3.0,
    };

    pub fn excess_kurtosis(&self) -> f64 {
        self.kurtosis - 3.0
    }
}

/// Compute skewness and raw kurtosis of a return series.
///
/// Unavailable when fewer than 2 returns are given, when any return is
/// non-finite, or when the sample variance is zero.
pub fn compute_higher_moments(returns: &[f64]) -> Statistic<HigherMoments> {
    let n = returns.len();
    if n < 2 {
        return Statistic::Unavailable(UnavailableReason::InsufficientData);
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Statistic::Unavailable(UnavailableReason::NonFinite);
    }

    let n_f = n as f64;
    let mean = returns.iter().sum::<f64>() / n_f;

    let (mut m2, mut m3, mut m4) = (0.0_f64, 0.0_f64, 0.0_f64);
    for &r in returns {
        let d = r - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n_f;
    m3 /= n_f;
    m4 /= n_f;

    if m2 == 0.0 {
        return Statistic::Unavailable(UnavailableReason::ZeroVariance);
    }

    Statistic::Computed(HigherMoments {
        skew: m3 / m2.powf(1.5),
        kurtosis: m4 / (m2 * m2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_returns_unavailable() {
        assert_eq!(
            compute_higher_moments(&[]).reason(),
            Some(UnavailableReason::InsufficientData)
        );
        assert_eq!(
            compute_higher_moments(&[0.01]).reason(),
            Some(UnavailableReason::InsufficientData)
        );
    }

    #[test]
    fn constant_returns_unavailable() {
        assert_eq!(
            compute_higher_moments(&[0.02, 0.02, 0.02]).reason(),
            Some(UnavailableReason::ZeroVariance)
        );
    }

    #[test]
    fn nan_input_unavailable() {
        assert_eq!(
            compute_higher_moments(&[0.01, f64::NAN, 0.03]).reason(),
            Some(UnavailableReason::NonFinite)
        );
    }

    #[test]
    fn two_point_sample() {
        // Symmetric two-point distribution: skew 0, kurtosis exactly 1.
        let m = compute_higher_moments(&[-1.0, 1.0]).value().unwrap();
        assert!(m.skew.abs() < 1e-12);
        assert!((m.kurtosis - 1.0).abs() < 1e-12);
    }

    #[test]
    fn right_skewed_sample_has_positive_skew() {
        let returns = [0.0, 0.0, 0.0, 0.0, 1.0];
        let m = compute_higher_moments(&returns).value().unwrap();
        // mean 0.2, m2 = 0.16, m3 = 0.096, m4 = 0.0832
        assert!((m.skew - 0.096 / 0.16_f64.powf(1.5)).abs() < 1e-12);
        assert!((m.kurtosis - 3.25).abs() < 1e-9);
        assert!(m.skew > 0.0);
    }

    #[test]
    fn excess_kurtosis_of_normal_is_zero() {
        assert_eq!(HigherMoments::NORMAL.excess_kurtosis(), 0.0);
    }
}
