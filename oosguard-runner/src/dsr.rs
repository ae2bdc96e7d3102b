//! Deflated Sharpe Ratio — Sharpe significance after multiple-trial search.
//!
//! Implements Bailey & López de Prado (2014):
//! - Expected maximum Sharpe ratio across N independent trials (the
//!   "expected maximum of N i.i.d. Gaussians" approximation)
//! - Probabilistic Sharpe Ratio (PSR) with skew/kurtosis correction
//! - Deflated Sharpe Ratio: PSR against the expected-maximum benchmark
//! - Ranking of an optimizer trial set by DSR
//!
//! All Sharpe ratios here are per-period (not annualized) and on the same
//! scale as `n_observations`.

use std::cmp::Ordering;
use std::f64::consts::E;

use oosguard_core::math::{norm_cdf, norm_ppf};
use oosguard_core::{
    DsrTrial, OptunaTrial, ReturnSeries, SourceRecord, Statistic, TrialNumber, UnavailableReason,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::moments::{compute_higher_moments, HigherMoments};

/// Euler–Mascheroni constant.
pub const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

// ─── Closed-form statistics ──────────────────────────────────────────

/// Expected maximum Sharpe ratio observed by chance across `n_trials`.
///
/// `E[max SR] = mean + std * ((1 - γ) Φ⁻¹(1 - 1/N) + γ Φ⁻¹(1 - 1/(N e)))`
///
/// Strictly increasing in `n_trials` for `sr_std > 0`. With one trial (or
/// none) there is no selection effect and `sr_mean` is returned.
pub fn expected_max_sharpe(sr_mean: f64, sr_std: f64, n_trials: u64) -> f64 {
    if n_trials <= 1 {
        return sr_mean;
    }
    let n = n_trials as f64;
    let z = (1.0 - EULER_MASCHERONI) * norm_ppf(1.0 - 1.0 / n)
        + EULER_MASCHERONI * norm_ppf(1.0 - 1.0 / (n * E));
    sr_mean + sr_std * z
}

/// Probabilistic Sharpe Ratio: P(true SR > `benchmark_sr`).
///
/// `Φ((SR - SR*) √(T - 1) / √(1 - γ3 SR + (γ4 - 1)/4 SR²))` with γ3 the skew
/// and γ4 the raw kurtosis.
///
/// Unavailable when `n_observations < 2`, when an input is non-finite, or
/// when the variance term under the square root is not positive.
pub fn probabilistic_sharpe_ratio(
    observed_sr: f64,
    benchmark_sr: f64,
    skew: f64,
    kurtosis: f64,
    n_observations: u64,
) -> Statistic {
    if n_observations < 2 {
        return Statistic::Unavailable(UnavailableReason::InsufficientData);
    }
    if ![observed_sr, benchmark_sr, skew, kurtosis]
        .iter()
        .all(|v| v.is_finite())
    {
        return Statistic::Unavailable(UnavailableReason::NonFinite);
    }

    let variance_term =
        1.0 - skew * observed_sr + (kurtosis - 1.0) / 4.0 * observed_sr * observed_sr;
    if variance_term <= 0.0 {
        return Statistic::Unavailable(UnavailableReason::DegenerateDenominator);
    }

    let z = (observed_sr - benchmark_sr) * ((n_observations - 1) as f64).sqrt()
        / variance_term.sqrt();
    Statistic::finite(norm_cdf(z))
}

/// Deflated Sharpe Ratio: PSR against the Sharpe ratio expected by chance
/// from `n_trials` searches with cross-trial dispersion `sr_std_across_trials`.
///
/// With zero dispersion there is nothing to deflate by and the unadjusted
/// PSR (benchmark 0) is reported. A negative dispersion is unavailable, since
/// it would pull the benchmark below zero. For a fixed observed SR above the
/// benchmark, DSR increases with `n_observations`.
pub fn calculate_dsr(
    observed_sr: f64,
    sr_std_across_trials: f64,
    skew: f64,
    kurtosis: f64,
    n_observations: u64,
    n_trials: u64,
) -> Statistic {
    if !sr_std_across_trials.is_finite() {
        return Statistic::Unavailable(UnavailableReason::NonFinite);
    }
    if sr_std_across_trials < 0.0 {
        return Statistic::Unavailable(UnavailableReason::InvalidInput);
    }
    let benchmark = if sr_std_across_trials == 0.0 {
        0.0
    } else {
        expected_max_sharpe(0.0, sr_std_across_trials, n_trials)
    };
    probabilistic_sharpe_ratio(observed_sr, benchmark, skew, kurtosis, n_observations)
}

/// Inputs to the DSR for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpeStatistics {
    pub observed_sr: f64,
    pub n_observations: u64,
    pub skew: f64,
    pub kurtosis: f64,
    pub n_trials: u64,
}

impl SharpeStatistics {
    /// Derive Sharpe ratio and moments from a return series.
    pub fn from_returns(returns: &ReturnSeries, n_trials: u64) -> Statistic<Self> {
        returns.sharpe().and_then(|observed_sr| {
            compute_higher_moments(returns.as_slice()).map(|m| Self {
                observed_sr,
                n_observations: returns.len() as u64,
                skew: m.skew,
                kurtosis: m.kurtosis,
                n_trials,
            })
        })
    }

    pub fn psr(&self, benchmark_sr: f64) -> Statistic {
        probabilistic_sharpe_ratio(
            self.observed_sr,
            benchmark_sr,
            self.skew,
            self.kurtosis,
            self.n_observations,
        )
    }

    pub fn deflated(&self, sr_std_across_trials: f64) -> Statistic {
        calculate_dsr(
            self.observed_sr,
            sr_std_across_trials,
            self.skew,
            self.kurtosis,
            self.n_observations,
            self.n_trials,
        )
    }
}

// ─── Trial-set ranking ───────────────────────────────────────────────

/// One optimizer trial together with its periodic (monthly) returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialReturns {
    pub trial: OptunaTrial,
    pub returns: ReturnSeries,
}

/// DSR evaluation of one trial within a trial set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrEvaluation {
    pub trial_number: TrialNumber,
    pub sharpe: Statistic,
    pub moments: Statistic<HigherMoments>,
    pub dsr: Statistic,
    pub n_observations: u64,
}

/// Sample standard deviation of the computed trial Sharpe ratios.
///
/// Zero when fewer than two trials have a Sharpe ratio, which makes the
/// DSR fall back to the unadjusted PSR.
pub fn cross_trial_sharpe_std(sharpes: &[f64]) -> f64 {
    let n = sharpes.len();
    if n < 2 {
        return 0.0;
    }
    let mean = sharpes.iter().sum::<f64>() / n as f64;
    let var = sharpes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Evaluate every trial's DSR, with `n_trials` equal to the full trial count.
///
/// Trials are evaluated in parallel; output order matches input order.
pub fn evaluate_trials(trials: &[TrialReturns]) -> Vec<DsrEvaluation> {
    let n_trials = trials.len() as u64;
    let sharpes: Vec<Statistic> = trials.par_iter().map(|t| t.returns.sharpe()).collect();
    let computed: Vec<f64> = sharpes.iter().filter_map(|s| s.value()).collect();
    let sr_std = cross_trial_sharpe_std(&computed);

    tracing::debug!(
        n_trials,
        with_sharpe = computed.len(),
        sr_std,
        "evaluating trial set for DSR"
    );

    trials
        .par_iter()
        .zip(sharpes)
        .map(|(t, sharpe)| {
            let moments = compute_higher_moments(t.returns.as_slice());
            let n_observations = t.returns.len() as u64;
            let dsr = sharpe.and_then(|sr| {
                moments.and_then(|m| {
                    calculate_dsr(sr, sr_std, m.skew, m.kurtosis, n_observations, n_trials)
                })
            });
            DsrEvaluation {
                trial_number: t.trial.trial_number(),
                sharpe,
                moments,
                dsr,
                n_observations,
            }
        })
        .collect()
}

/// Rank a trial set by DSR and keep the best `top_k` as DSR records.
///
/// Shorthand for [`evaluate_trials`] followed by [`rank_evaluations`].
pub fn rank_trials_by_dsr(trials: &[TrialReturns], top_k: usize) -> Vec<DsrTrial> {
    let evaluations = evaluate_trials(trials);
    rank_evaluations(trials, &evaluations, top_k)
}

/// Rank already-evaluated trials by DSR, descending, and keep the first
/// `top_k`.
///
/// `evaluations` must be the output of [`evaluate_trials`] for `trials`, in
/// the same order. Trials whose DSR is unavailable rank after every computed
/// DSR; ties keep input order. Ranks start at 1. Each output record carries
/// the trial's original fields plus `dsr` (null when unavailable),
/// `sharpe_ratio_periodic`, `skew`, `kurtosis` and `n_observations`. An
/// unavailable DSR also records its reason under `dsr_unavailable`.
pub fn rank_evaluations(
    trials: &[TrialReturns],
    evaluations: &[DsrEvaluation],
    top_k: usize,
) -> Vec<DsrTrial> {
    debug_assert_eq!(trials.len(), evaluations.len());

    let mut ranked: Vec<(&TrialReturns, &DsrEvaluation)> =
        trials.iter().zip(evaluations).collect();

    let unavailable = ranked.iter().filter(|(_, e)| e.dsr.is_unavailable()).count();
    if unavailable > 0 {
        tracing::debug!(unavailable, "trials without a DSR ranked last");
    }

    // Stable sort keeps input order among equal keys.
    ranked.sort_by(|a, b| match (a.1.dsr.value(), b.1.dsr.value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(i, (t, e))| {
            let mut record = DsrTrial::new(t.trial.trial_number(), i as u32 + 1);
            record.fields = t.trial.fields.clone();
            record = record
                .with_field("dsr", e.dsr.value())
                .with_field("n_observations", e.n_observations);
            if let Some(reason) = e.dsr.reason() {
                record = record.with_field("dsr_unavailable", reason.as_str());
            }
            if let Some(sr) = e.sharpe.value() {
                record = record.with_field("sharpe_ratio_periodic", sr);
            }
            if let Some(m) = e.moments.value() {
                record = record
                    .with_field("skew", m.skew)
                    .with_field("kurtosis", m.kurtosis);
            }
            record
        })
        .collect()
}
