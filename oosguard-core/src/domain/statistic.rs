//! Statistic — a computed value, or an explicit reason it is unavailable.
//!
//! Degenerate inputs (too few observations, zero variance, zero day counts)
//! are expected during early-sample or single-trial runs. They are reported
//! as `Unavailable` instead of NaN, zero, or an error, so callers cannot
//! mistake a missing statistic for a real number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Fewer observations than the statistic needs.
    InsufficientData,
    /// Sample variance is exactly zero.
    ZeroVariance,
    /// A denominator (day count, IS rate, PSR variance term) is zero or negative.
    DegenerateDenominator,
    /// An input or the result was NaN or infinite.
    NonFinite,
    /// An input is outside its domain, such as a negative dispersion.
    InvalidInput,
}

impl UnavailableReason {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::ZeroVariance => "zero_variance",
            Self::DegenerateDenominator => "degenerate_denominator",
            Self::NonFinite => "non_finite",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InsufficientData => "insufficient data",
            Self::ZeroVariance => "zero variance",
            Self::DegenerateDenominator => "degenerate denominator",
            Self::NonFinite => "non-finite value",
            Self::InvalidInput => "input out of domain",
        };
        f.write_str(s)
    }
}

/// A statistic that is either computed or explicitly unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Statistic<T = f64> {
    Computed(T),
    Unavailable(UnavailableReason),
}

impl<T> Statistic<T> {
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn is_unavailable(&self) -> bool {
        !self.is_computed()
    }

    /// The unavailable reason, if any.
    pub fn reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Computed(_) => None,
            Self::Unavailable(reason) => Some(*reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Statistic<U> {
        match self {
            Self::Computed(v) => Statistic::Computed(f(v)),
            Self::Unavailable(reason) => Statistic::Unavailable(reason),
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Statistic<U>>(self, f: F) -> Statistic<U> {
        match self {
            Self::Computed(v) => f(v),
            Self::Unavailable(reason) => Statistic::Unavailable(reason),
        }
    }

    /// Convert into an `Option`, discarding the reason.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Computed(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }
}

impl<T: Copy> Statistic<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Computed(v) => Some(*v),
            Self::Unavailable(_) => None,
        }
    }
}

impl Statistic<f64> {
    /// Wrap a raw float, mapping NaN/infinity to `Unavailable(NonFinite)`.
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Self::Computed(value)
        } else {
            Self::Unavailable(UnavailableReason::NonFinite)
        }
    }
}

impl fmt::Display for Statistic<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computed(v) => write!(f, "{v:.6}"),
            Self::Unavailable(reason) => write!(f, "unavailable ({reason})"),
        }
    }
}
