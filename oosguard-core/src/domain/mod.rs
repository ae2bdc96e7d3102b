//! Domain types for OOSGuard

pub mod metrics;
pub mod returns;
pub mod statistic;
pub mod trial;

pub use metrics::MetricsBag;
pub use returns::ReturnSeries;
pub use statistic::{Statistic, UnavailableReason};
pub use trial::{
    CandidateRecord, DsrTrial, Fields, ForwardTestTrial, OptunaTrial, SourceRecord, StressStatus,
    StressTestTrial, TrialNumber,
};
