//! OOS candidate selection — pick one trial list as the canonical OOS set.
//!
//! Sources are tried in trust order and the first applicable one wins, even
//! if it ends up with zero candidates after filtering:
//!
//! 1. **Stress test** — whenever the stress-test pass ran. Only `ok` trials
//!    survive.
//! 2. **Forward test** — real held-out data, if any results exist.
//! 3. **DSR** — statistically corrected search results, if any exist.
//! 4. **Optuna** — raw optimizer output, the fallback. Input order is kept
//!    exactly; no re-sorting by score.
//!
//! Within every source the input order is preserved.

use std::fmt;

use oosguard_core::{
    CandidateRecord, DsrTrial, ForwardTestTrial, OptunaTrial, SourceRecord, StressTestTrial,
};
use serde::{Deserialize, Serialize};

// ─── Inputs / outputs ────────────────────────────────────────────────

/// The four upstream trial lists, as fully materialized snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialSources<'a> {
    pub optuna: &'a [OptunaTrial],
    pub dsr: &'a [DsrTrial],
    pub forward_test: &'a [ForwardTestTrial],
    pub stress_test: &'a [StressTestTrial],
    /// Whether a stress-test pass was executed at all, independent of
    /// whether it produced any records.
    pub stress_test_ran: bool,
}

/// Which trial list was promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OosSource {
    StressTest,
    ForwardTest,
    Dsr,
    Optuna,
}

impl OosSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StressTest => "stress_test",
            Self::ForwardTest => "forward_test",
            Self::Dsr => "dsr",
            Self::Optuna => "optuna",
        }
    }
}

impl fmt::Display for OosSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The selected source and its candidates, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OosSelection {
    pub source: OosSource,
    pub candidates: Vec<CandidateRecord>,
    /// Records of the selected source that were filtered out.
    pub dropped: usize,
}

// ─── Cascade ─────────────────────────────────────────────────────────

/// One step of the cascade: when it applies and how it extracts candidates.
struct SourceRule {
    source: OosSource,
    applies: fn(&TrialSources<'_>) -> bool,
    extract: fn(&TrialSources<'_>) -> (Vec<CandidateRecord>, usize),
}

/// Priority order, strongest evidence first.
static CASCADE: [SourceRule; 4] = [
    SourceRule {
        source: OosSource::StressTest,
        applies: stress_test_ran,
        extract: stress_test_candidates,
    },
    SourceRule {
        source: OosSource::ForwardTest,
        applies: has_forward_test,
        extract: forward_test_candidates,
    },
    SourceRule {
        source: OosSource::Dsr,
        applies: has_dsr,
        extract: dsr_candidates,
    },
    SourceRule {
        source: OosSource::Optuna,
        applies: always,
        extract: optuna_candidates,
    },
];

fn stress_test_ran(s: &TrialSources<'_>) -> bool {
    s.stress_test_ran
}

fn has_forward_test(s: &TrialSources<'_>) -> bool {
    !s.forward_test.is_empty()
}

fn has_dsr(s: &TrialSources<'_>) -> bool {
    !s.dsr.is_empty()
}

fn always(_: &TrialSources<'_>) -> bool {
    true
}

fn stress_test_candidates(s: &TrialSources<'_>) -> (Vec<CandidateRecord>, usize) {
    extract_stress_test(s.stress_test)
}

fn forward_test_candidates(s: &TrialSources<'_>) -> (Vec<CandidateRecord>, usize) {
    (normalize(s.forward_test), 0)
}

fn dsr_candidates(s: &TrialSources<'_>) -> (Vec<CandidateRecord>, usize) {
    (normalize(s.dsr), 0)
}

fn optuna_candidates(s: &TrialSources<'_>) -> (Vec<CandidateRecord>, usize) {
    (normalize(s.optuna), 0)
}

fn normalize<R: SourceRecord>(records: &[R]) -> Vec<CandidateRecord> {
    records.iter().map(SourceRecord::to_candidate).collect()
}

/// Keep `ok` stress-test records in input order; report how many were dropped.
fn extract_stress_test(records: &[StressTestTrial]) -> (Vec<CandidateRecord>, usize) {
    let mut candidates = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for record in records {
        if record.status.is_ok() {
            candidates.push(record.to_candidate());
            continue;
        }
        dropped += 1;
        if record.status.is_recognized() {
            tracing::debug!(
                trial = record.trial_number,
                status = %record.status,
                "stress-test trial not eligible"
            );
        } else {
            tracing::warn!(
                trial = record.trial_number,
                status = %record.status,
                "unrecognized stress-test status; trial excluded"
            );
        }
    }
    (candidates, dropped)
}

/// Select the canonical OOS candidate list from the available sources.
pub fn select_oos_source_candidates(sources: &TrialSources<'_>) -> OosSelection {
    let rule = CASCADE
        .iter()
        .find(|rule| (rule.applies)(sources))
        .unwrap_or(&CASCADE[CASCADE.len() - 1]);

    let (candidates, dropped) = (rule.extract)(sources);

    tracing::info!(
        source = %rule.source,
        candidates = candidates.len(),
        dropped,
        "selected OOS source"
    );

    OosSelection {
        source: rule.source,
        candidates,
        dropped,
    }
}
