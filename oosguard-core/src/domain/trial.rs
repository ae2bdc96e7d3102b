//! Trial records — one record shape per validation source.
//!
//! Upstream passes (optimizer search, DSR filtering, forward test, stress test)
//! each emit their own record shape with a source-specific rank field. Every
//! shape implements `SourceRecord`, which normalizes it into the common
//! `CandidateRecord` consumed by OOS selection and reporting.
//!
//! Fields a record does not name explicitly are kept verbatim in `fields`
//! so that downstream export sees the original upstream payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one parameter configuration evaluated by a pass.
pub type TrialNumber = u64;

/// Remaining upstream fields of a record, preserved as-is.
pub type Fields = serde_json::Map<String, serde_json::Value>;

// ─── Stress-test status ──────────────────────────────────────────────

/// Outcome of a stress-test pass for one trial.
///
/// The set is closed. Statuses not known to this crate deserialize into
/// `Unrecognized` so they are flagged explicitly instead of being treated as
/// passing or silently merged into a known failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StressStatus {
    Ok,
    SkippedBadBase,
    InsufficientData,
    Unrecognized(String),
}

impl StressStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ok" => Self::Ok,
            "skipped_bad_base" => Self::SkippedBadBase,
            "insufficient_data" => Self::InsufficientData,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::SkippedBadBase => "skipped_bad_base",
            Self::InsufficientData => "insufficient_data",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Only `Ok` trials are eligible as OOS candidates.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for StressStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<StressStatus> for String {
    fn from(status: StressStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Normalized candidate ────────────────────────────────────────────

/// A trial promoted into the OOS candidate list, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub trial_number: TrialNumber,
    /// Rank assigned by the selected source; absent for raw optimizer output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_rank: Option<u32>,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Common view over the per-source record shapes.
pub trait SourceRecord {
    fn trial_number(&self) -> TrialNumber;

    /// The source-specific rank (`st_rank`, `ft_rank`, `dsr_rank`), if the
    /// source ranks its output.
    fn source_rank(&self) -> Option<u32>;

    fn fields(&self) -> &Fields;

    /// The record's own typed keys (rank key, status) that should survive
    /// normalization alongside the open `fields`.
    fn source_fields(&self) -> Fields {
        Fields::new()
    }

    fn to_candidate(&self) -> CandidateRecord {
        let mut fields = self.fields().clone();
        fields.extend(self.source_fields());
        CandidateRecord {
            trial_number: self.trial_number(),
            source_rank: self.source_rank(),
            fields,
        }
    }
}

fn rank_field(key: &str, rank: u32) -> Fields {
    let mut fields = Fields::new();
    fields.insert(key.to_string(), rank.into());
    fields
}

// ─── Per-source records ──────────────────────────────────────────────

/// Raw optimizer output. Numbered by the optimizer, never ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptunaTrial {
    pub optuna_trial_number: TrialNumber,
    #[serde(flatten)]
    pub fields: Fields,
}

impl OptunaTrial {
    pub fn new(optuna_trial_number: TrialNumber) -> Self {
        Self {
            optuna_trial_number,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl SourceRecord for OptunaTrial {
    fn trial_number(&self) -> TrialNumber {
        self.optuna_trial_number
    }

    fn source_rank(&self) -> Option<u32> {
        None
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// A trial that survived Deflated-Sharpe filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrTrial {
    pub trial_number: TrialNumber,
    pub dsr_rank: u32,
    #[serde(flatten)]
    pub fields: Fields,
}

impl DsrTrial {
    pub fn new(trial_number: TrialNumber, dsr_rank: u32) -> Self {
        Self {
            trial_number,
            dsr_rank,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl SourceRecord for DsrTrial {
    fn trial_number(&self) -> TrialNumber {
        self.trial_number
    }

    fn source_rank(&self) -> Option<u32> {
        Some(self.dsr_rank)
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn source_fields(&self) -> Fields {
        rank_field("dsr_rank", self.dsr_rank)
    }
}

/// A trial re-evaluated on the held-out forward-test window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardTestTrial {
    pub trial_number: TrialNumber,
    pub ft_rank: u32,
    #[serde(flatten)]
    pub fields: Fields,
}

impl ForwardTestTrial {
    pub fn new(trial_number: TrialNumber, ft_rank: u32) -> Self {
        Self {
            trial_number,
            ft_rank,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl SourceRecord for ForwardTestTrial {
    fn trial_number(&self) -> TrialNumber {
        self.trial_number
    }

    fn source_rank(&self) -> Option<u32> {
        Some(self.ft_rank)
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn source_fields(&self) -> Fields {
        rank_field("ft_rank", self.ft_rank)
    }
}

/// A trial put through the adversarial stress-test pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestTrial {
    pub trial_number: TrialNumber,
    pub st_rank: u32,
    pub status: StressStatus,
    #[serde(flatten)]
    pub fields: Fields,
}

impl StressTestTrial {
    pub fn new(trial_number: TrialNumber, st_rank: u32, status: StressStatus) -> Self {
        Self {
            trial_number,
            st_rank,
            status,
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

impl SourceRecord for StressTestTrial {
    fn trial_number(&self) -> TrialNumber {
        self.trial_number
    }

    fn source_rank(&self) -> Option<u32> {
        Some(self.st_rank)
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn source_fields(&self) -> Fields {
        let mut fields = rank_field("st_rank", self.st_rank);
        fields.insert("status".to_string(), self.status.as_str().into());
        fields
    }
}
