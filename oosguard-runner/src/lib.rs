//! OOSGuard Runner — statistical validation and OOS candidate selection.
//!
//! This crate builds on `oosguard-core` to provide:
//! - Higher moments (skew, raw kurtosis) of return series
//! - Deflated Sharpe Ratio: expected max Sharpe, PSR, DSR, trial-set ranking
//! - Walk-forward IS/FT date split
//! - IS → FT degradation analysis and forward-test ranking
//! - OOS source selection (stress test → forward test → DSR → optimizer)
//! - TOML-backed validation config and an end-to-end pipeline

pub mod config;
pub mod degradation;
pub mod dsr;
pub mod moments;
pub mod pipeline;
pub mod selection;
pub mod walk_forward;

pub use config::{ConfigError, ValidationConfig};
pub use degradation::{
    annualize_profit, calculate_comparison_metrics, calculate_profit_degradation,
    rank_forward_tests, ComparisonResult, ForwardTestEvaluation, FtSortMetric,
};
pub use dsr::{
    calculate_dsr, evaluate_trials, expected_max_sharpe, probabilistic_sharpe_ratio,
    rank_evaluations, rank_trials_by_dsr, DsrEvaluation, SharpeStatistics, TrialReturns,
};
pub use moments::{compute_higher_moments, HigherMoments};
pub use pipeline::{run_validation, PipelineError, TrialSummary, ValidationInput, ValidationReport};
pub use selection::{select_oos_source_candidates, OosSelection, OosSource, TrialSources};
pub use walk_forward::{calculate_ft_dates, DateSplit, ValidationError};
