//! ReturnSeries — chronological periodic returns, usually monthly.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::statistic::{Statistic, UnavailableReason};

/// Ordered sequence of periodic returns (fractions, not percent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries(Vec<f64>);

impl ReturnSeries {
    pub fn new(returns: Vec<f64>) -> Self {
        Self(returns)
    }

    /// Resample an equity curve to month-end values and take simple returns
    /// between consecutive month ends.
    ///
    /// Points must be chronological. The last point of each calendar month
    /// (UTC) is that month's close. The first month only supplies the base,
    /// so `n` consecutive months yield `n - 1` returns. A month whose previous
    /// close is not positive is skipped. A return that would span a missing
    /// calendar month is skipped too, so every return covers exactly one month.
    pub fn monthly_from_equity(points: &[(DateTime<Utc>, f64)]) -> Self {
        let mut month_closes: Vec<(i64, f64)> = Vec::new();
        for (ts, equity) in points {
            let key = i64::from(ts.year()) * 12 + i64::from(ts.month0());
            match month_closes.last_mut() {
                Some((last_key, close)) if *last_key == key => *close = *equity,
                _ => month_closes.push((key, *equity)),
            }
        }

        let returns = month_closes
            .windows(2)
            .filter(|w| w[1].0 - w[0].0 == 1 && w[0].1 > 0.0)
            .map(|w| w[1].1 / w[0].1 - 1.0)
            .collect();
        Self(returns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn mean(&self) -> Statistic {
        if self.0.is_empty() {
            return Statistic::Unavailable(UnavailableReason::InsufficientData);
        }
        Statistic::finite(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(&self) -> Statistic {
        let n = self.0.len();
        if n < 2 {
            return Statistic::Unavailable(UnavailableReason::InsufficientData);
        }
        self.mean().and_then(|mean| {
            let var = self.0.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Statistic::finite(var.sqrt())
        })
    }

    /// Per-period (non-annualized) Sharpe ratio: mean / sample std.
    ///
    /// This is the Sharpe ratio on the same scale as the number of
    /// observations, which is what the PSR/DSR formulas expect.
    pub fn sharpe(&self) -> Statistic {
        self.std_dev().and_then(|std| {
            if std == 0.0 {
                return Statistic::Unavailable(UnavailableReason::ZeroVariance);
            }
            self.mean().and_then(|mean| Statistic::finite(mean / std))
        })
    }

    /// Sharpe ratio scaled by sqrt(periods_per_year).
    pub fn annualized_sharpe(&self, periods_per_year: u32) -> Statistic {
        self.sharpe()
            .map(|sr| sr * f64::from(periods_per_year).sqrt())
    }
}

impl From<Vec<f64>> for ReturnSeries {
    fn from(returns: Vec<f64>) -> Self {
        Self(returns)
    }
}

impl AsRef<[f64]> for ReturnSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn monthly_resample_uses_last_point_per_month() {
        let points = vec![
            (ts(2024, 1, 2), 100.0),
            (ts(2024, 1, 31), 110.0),
            (ts(2024, 2, 15), 105.0),
            (ts(2024, 2, 29), 121.0),
            (ts(2024, 3, 29), 108.9),
        ];
        let series = ReturnSeries::monthly_from_equity(&points);
        assert_eq!(series.len(), 2);
        assert!((series.as_slice()[0] - 0.1).abs() < 1e-12);
        assert!((series.as_slice()[1] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn missing_month_breaks_the_chain() {
        let points = vec![
            (ts(2024, 1, 31), 100.0),
            (ts(2024, 2, 29), 110.0),
            // no March
            (ts(2024, 4, 30), 132.0),
            (ts(2024, 5, 31), 118.8),
        ];
        let series = ReturnSeries::monthly_from_equity(&points);
        assert_eq!(series.len(), 2);
        assert!((series.as_slice()[0] - 0.1).abs() < 1e-12);
        assert!((series.as_slice()[1] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn year_boundary_is_consecutive() {
        let points = vec![(ts(2023, 12, 29), 100.0), (ts(2024, 1, 31), 105.0)];
        let series = ReturnSeries::monthly_from_equity(&points);
        assert_eq!(series.len(), 1);
        assert!((series.as_slice()[0] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn single_month_yields_no_returns() {
        let points = vec![(ts(2024, 1, 2), 100.0), (ts(2024, 1, 20), 101.0)];
        assert!(ReturnSeries::monthly_from_equity(&points).is_empty());
    }

    #[test]
    fn sharpe_unavailable_for_constant_returns() {
        let series = ReturnSeries::new(vec![0.01, 0.01, 0.01]);
        assert_eq!(
            series.sharpe().reason(),
            Some(UnavailableReason::ZeroVariance)
        );
    }

    #[test]
    fn sharpe_unavailable_for_short_series() {
        let series = ReturnSeries::new(vec![0.02]);
        assert_eq!(
            series.sharpe().reason(),
            Some(UnavailableReason::InsufficientData)
        );
    }

    #[test]
    fn sharpe_matches_hand_computation() {
        let series = ReturnSeries::new(vec![0.01, 0.03, -0.01, 0.05]);
        // mean = 0.02, sample var = (1+1+9+9)e-4 / 3
        let expected = 0.02 / (20e-4_f64 / 3.0).sqrt();
        assert!((series.sharpe().value().unwrap() - expected).abs() < 1e-12);

        let annual = series.annualized_sharpe(12).value().unwrap();
        assert!((annual - expected * 12f64.sqrt()).abs() < 1e-12);
    }
}
