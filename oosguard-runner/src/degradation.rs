//! IS → FT degradation — how much of the in-sample edge survives forward testing.
//!
//! Profit figures for windows of different lengths are only comparable as
//! rates, so profit degradation compares daily profit rates:
//! `(ft_profit / ft_days) / (is_profit / is_days)`. A ratio of 1.0 means the
//! forward test kept the in-sample pace exactly.
//!
//! Metric deltas are plain signed differences, FT minus IS, with no
//! normalization or clamping. For drawdown a positive change is worse; for
//! everything else a positive change is an improvement.

use std::cmp::Ordering;

use oosguard_core::{ForwardTestTrial, MetricsBag, Statistic, TrialNumber, UnavailableReason};
use serde::{Deserialize, Serialize};

/// Calendar days used to annualize a profit rate.
pub const DAYS_PER_YEAR: f64 = 365.0;

// ─── Profit rates ────────────────────────────────────────────────────

/// Scale a window's profit to a calendar-year rate.
pub fn annualize_profit(profit_pct: f64, days: i64) -> Statistic {
    if days <= 0 {
        return Statistic::Unavailable(UnavailableReason::DegenerateDenominator);
    }
    Statistic::finite(profit_pct / days as f64 * DAYS_PER_YEAR)
}

/// Ratio of FT daily profit rate to IS daily profit rate.
///
/// Unavailable when either day count is not positive or the IS rate is zero.
pub fn calculate_profit_degradation(
    is_profit_pct: f64,
    ft_profit_pct: f64,
    is_days: i64,
    ft_days: i64,
) -> Statistic {
    if is_days <= 0 || ft_days <= 0 {
        return Statistic::Unavailable(UnavailableReason::DegenerateDenominator);
    }
    let is_rate = is_profit_pct / is_days as f64;
    let ft_rate = ft_profit_pct / ft_days as f64;
    if is_rate == 0.0 {
        return Statistic::Unavailable(UnavailableReason::DegenerateDenominator);
    }
    Statistic::finite(ft_rate / is_rate)
}

// ─── Side-by-side comparison ─────────────────────────────────────────

/// FT − IS deltas for one trial, plus the rate-based profit comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub profit_degradation: Statistic,
    pub is_annualized_profit_pct: Statistic,
    pub ft_annualized_profit_pct: Statistic,
    pub net_profit_change: f64,
    /// Positive = deeper drawdown in the forward test.
    pub max_dd_change: f64,
    pub romad_change: f64,
    pub sharpe_change: f64,
    pub pf_change: f64,
    /// Present only when both windows report a win rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate_change: Option<f64>,
}

/// Compare IS and FT metrics for the same trial.
pub fn calculate_comparison_metrics(
    is_metrics: &MetricsBag,
    ft_metrics: &MetricsBag,
    is_days: i64,
    ft_days: i64,
) -> ComparisonResult {
    ComparisonResult {
        profit_degradation: calculate_profit_degradation(
            is_metrics.net_profit_pct,
            ft_metrics.net_profit_pct,
            is_days,
            ft_days,
        ),
        is_annualized_profit_pct: annualize_profit(is_metrics.net_profit_pct, is_days),
        ft_annualized_profit_pct: annualize_profit(ft_metrics.net_profit_pct, ft_days),
        net_profit_change: ft_metrics.net_profit_pct - is_metrics.net_profit_pct,
        max_dd_change: ft_metrics.max_drawdown_pct - is_metrics.max_drawdown_pct,
        romad_change: ft_metrics.romad - is_metrics.romad,
        sharpe_change: ft_metrics.sharpe_ratio - is_metrics.sharpe_ratio,
        pf_change: ft_metrics.profit_factor - is_metrics.profit_factor,
        win_rate_change: match (is_metrics.win_rate, ft_metrics.win_rate) {
            (Some(is_wr), Some(ft_wr)) => Some(ft_wr - is_wr),
            _ => None,
        },
    }
}

// ─── Forward-test ranking ────────────────────────────────────────────

/// Metric used to order forward-test results, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FtSortMetric {
    #[default]
    ProfitDegradation,
    FtRomad,
    FtNetProfit,
    FtSharpe,
}

impl FtSortMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfitDegradation => "profit_degradation",
            Self::FtRomad => "ft_romad",
            Self::FtNetProfit => "ft_net_profit",
            Self::FtSharpe => "ft_sharpe",
        }
    }

    fn key(&self, eval: &ForwardTestEvaluation, comparison: &ComparisonResult) -> Option<f64> {
        let value = match self {
            Self::ProfitDegradation => comparison.profit_degradation.value()?,
            Self::FtRomad => eval.ft_metrics.romad,
            Self::FtNetProfit => eval.ft_metrics.net_profit_pct,
            Self::FtSharpe => eval.ft_metrics.sharpe_ratio,
        };
        value.is_finite().then_some(value)
    }
}

/// One trial evaluated on both the IS and the FT window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardTestEvaluation {
    pub trial_number: TrialNumber,
    pub is_metrics: MetricsBag,
    pub ft_metrics: MetricsBag,
}

/// Order forward-test evaluations by `metric` (descending) and assign
/// `ft_rank` 1..n.
///
/// Trials whose sort key is unavailable or non-finite go last. Ties keep
/// input order. Each record carries the FT metrics and IS → FT deltas.
pub fn rank_forward_tests(
    evaluations: &[ForwardTestEvaluation],
    is_days: i64,
    ft_days: i64,
    metric: FtSortMetric,
) -> Vec<ForwardTestTrial> {
    let mut keyed: Vec<(&ForwardTestEvaluation, ComparisonResult, Option<f64>)> = evaluations
        .iter()
        .map(|e| {
            let comparison =
                calculate_comparison_metrics(&e.is_metrics, &e.ft_metrics, is_days, ft_days);
            let key = metric.key(e, &comparison);
            (e, comparison, key)
        })
        .collect();

    keyed.sort_by(|a, b| match (a.2, b.2) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    tracing::debug!(
        trials = keyed.len(),
        ?metric,
        "ranked forward-test results"
    );

    keyed
        .into_iter()
        .enumerate()
        .map(|(i, (e, c, _))| {
            ForwardTestTrial::new(e.trial_number, i as u32 + 1)
                .with_field("is_net_profit_pct", e.is_metrics.net_profit_pct)
                .with_field("ft_net_profit_pct", e.ft_metrics.net_profit_pct)
                .with_field("ft_max_drawdown_pct", e.ft_metrics.max_drawdown_pct)
                .with_field("ft_romad", e.ft_metrics.romad)
                .with_field("ft_sharpe_ratio", e.ft_metrics.sharpe_ratio)
                .with_field("ft_profit_factor", e.ft_metrics.profit_factor)
                .with_field("profit_degradation", c.profit_degradation.value())
                .with_field("max_dd_change", c.max_dd_change)
                .with_field("romad_change", c.romad_change)
                .with_field("sharpe_change", c.sharpe_change)
                .with_field("pf_change", c.pf_change)
        })
        .collect()
}
