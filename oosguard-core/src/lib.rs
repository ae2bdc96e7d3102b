//! OOSGuard Core — domain records and numeric primitives.
//!
//! This crate holds the value types shared by the validation pipeline:
//! - `Statistic<T>`: a computed value or an explicit "unavailable" reason
//! - Per-source trial records (optimizer, DSR, forward test, stress test)
//! - Normalized OOS candidate records
//! - Per-window metric bags and monthly return series
//! - Standard-normal CDF and quantile function

pub mod domain;
pub mod math;

pub use domain::{
    CandidateRecord, DsrTrial, Fields, ForwardTestTrial, MetricsBag, OptunaTrial, ReturnSeries,
    SourceRecord, Statistic, StressStatus, StressTestTrial, TrialNumber, UnavailableReason,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all domain value types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Statistic>();
        require_sync::<Statistic>();
        require_send::<UnavailableReason>();
        require_sync::<UnavailableReason>();
        require_send::<OptunaTrial>();
        require_sync::<OptunaTrial>();
        require_send::<DsrTrial>();
        require_sync::<DsrTrial>();
        require_send::<ForwardTestTrial>();
        require_sync::<ForwardTestTrial>();
        require_send::<StressTestTrial>();
        require_sync::<StressTestTrial>();
        require_send::<StressStatus>();
        require_sync::<StressStatus>();
        require_send::<CandidateRecord>();
        require_sync::<CandidateRecord>();
        require_send::<MetricsBag>();
        require_sync::<MetricsBag>();
        require_send::<ReturnSeries>();
        require_sync::<ReturnSeries>();
    }

    /// Every source record normalizes through the same trait object.
    #[test]
    fn source_records_share_the_normalization_seam() {
        let records: Vec<Box<dyn SourceRecord>> = vec![
            Box::new(OptunaTrial::new(4)),
            Box::new(DsrTrial::new(5, 1)),
            Box::new(ForwardTestTrial::new(6, 2)),
            Box::new(StressTestTrial::new(7, 3, StressStatus::Ok)),
        ];
        let numbers: Vec<TrialNumber> = records
            .iter()
            .map(|r| r.to_candidate().trial_number)
            .collect();
        assert_eq!(numbers, vec![4, 5, 6, 7]);
    }
}
