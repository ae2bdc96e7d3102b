//! Validation pipeline — from raw trial results to the canonical OOS set.
//!
//! Stages, in order:
//! 1. Walk-forward split of the full date range.
//! 2. DSR evaluation of every optimizer trial, done once; the top-k by DSR
//!    become DSR records and every trial gets a summary.
//! 3. Forward-test ranking of IS/FT evaluations, if any were run.
//! 4. OOS source selection over optimizer, DSR, forward-test and
//!    stress-test lists.
//!
//! Every stage is a pure transform of the input snapshot.

use chrono::{DateTime, Utc};
use oosguard_core::{
    DsrTrial, ForwardTestTrial, OptunaTrial, SourceRecord, Statistic, StressTestTrial, TrialNumber,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, ValidationConfig};
use crate::degradation::{rank_forward_tests, ForwardTestEvaluation};
use crate::dsr::{evaluate_trials, rank_evaluations, TrialReturns};
use crate::selection::{select_oos_source_candidates, OosSelection, TrialSources};
use crate::walk_forward::{calculate_ft_dates, DateSplit, ValidationError};

/// Everything upstream stages hand to the validation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationInput {
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    /// Optimizer trials in optimizer output order, with monthly returns.
    pub trials: Vec<TrialReturns>,
    #[serde(default)]
    pub forward_tests: Vec<ForwardTestEvaluation>,
    /// `None` when the stress-test pass did not run.
    #[serde(default)]
    pub stress_test: Option<Vec<StressTestTrial>>,
}

/// Per-trial statistics for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trial_number: TrialNumber,
    pub annualized_sharpe: Statistic,
    pub dsr: Statistic,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Fingerprint of the configuration the report was produced with.
    pub config_id: String,
    pub split: DateSplit,
    pub trial_summaries: Vec<TrialSummary>,
    pub dsr_results: Vec<DsrTrial>,
    pub ft_results: Vec<ForwardTestTrial>,
    pub selection: OosSelection,
}

/// Errors from the validation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Run every stage and assemble the report.
pub fn run_validation(
    input: &ValidationInput,
    config: &ValidationConfig,
) -> Result<ValidationReport, PipelineError> {
    config.validate()?;

    let split = calculate_ft_dates(input.range_start, input.range_end, config.ft_days)?;

    let evaluations = evaluate_trials(&input.trials);
    let trial_summaries = input
        .trials
        .iter()
        .zip(&evaluations)
        .map(|(t, e)| TrialSummary {
            trial_number: t.trial.trial_number(),
            annualized_sharpe: t.returns.annualized_sharpe(config.periods_per_year),
            dsr: e.dsr,
        })
        .collect();

    let dsr_results = rank_evaluations(&input.trials, &evaluations, config.dsr_top_k);
    let ft_results = rank_forward_tests(
        &input.forward_tests,
        split.is_days,
        split.ft_days,
        config.ft_sort_metric,
    );

    let optuna: Vec<OptunaTrial> = input.trials.iter().map(|t| t.trial.clone()).collect();
    let stress_test = input.stress_test.as_deref().unwrap_or(&[]);
    let selection = select_oos_source_candidates(&TrialSources {
        optuna: &optuna,
        dsr: &dsr_results,
        forward_test: &ft_results,
        stress_test,
        stress_test_ran: input.stress_test.is_some(),
    });

    tracing::info!(
        trials = input.trials.len(),
        dsr_kept = dsr_results.len(),
        forward_tests = ft_results.len(),
        source = %selection.source,
        candidates = selection.candidates.len(),
        "validation complete"
    );

    Ok(ValidationReport {
        config_id: config.config_id(),
        split,
        trial_summaries,
        dsr_results,
        ft_results,
        selection,
    })
}
