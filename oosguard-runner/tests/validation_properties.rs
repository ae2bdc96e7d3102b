//! Property tests for the statistical guards and the selection cascade.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use oosguard_core::{OptunaTrial, StressStatus, StressTestTrial, TrialNumber};
use oosguard_runner::{
    calculate_dsr, calculate_ft_dates, compute_higher_moments, expected_max_sharpe,
    select_oos_source_candidates, OosSource, TrialSources,
};

/// Box–Muller standard normal draws from a seeded RNG.
fn normal_draws(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let u1: f64 = 1.0 - rng.gen::<f64>();
            let u2: f64 = rng.gen::<f64>();
            (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
        })
        .collect()
}

#[test]
fn normal_sample_moments_near_gaussian() {
    for seed in [1, 42, 2024] {
        let draws = normal_draws(1000, seed);
        let m = compute_higher_moments(&draws).value().unwrap();
        assert!(m.skew.abs() < 0.5, "seed {seed}: skew {}", m.skew);
        assert!(
            m.kurtosis > 2.0 && m.kurtosis < 4.5,
            "seed {seed}: kurtosis {}",
            m.kurtosis
        );
    }
}

#[test]
fn expected_max_sharpe_grows_with_search_size() {
    let e10 = expected_max_sharpe(0.0, 1.0, 10);
    let e100 = expected_max_sharpe(0.0, 1.0, 100);
    let e1000 = expected_max_sharpe(0.0, 1.0, 1000);
    assert!(e10 < e100 && e100 < e1000, "{e10} {e100} {e1000}");
}

#[test]
fn longer_track_record_raises_dsr() {
    let short = calculate_dsr(2.0, 0.5, 0.0, 3.0, 12, 10).value().unwrap();
    let long = calculate_dsr(2.0, 0.5, 0.0, 3.0, 36, 10).value().unwrap();
    assert!(long > short, "{long} <= {short}");
}

#[test]
fn ft_split_example() {
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
    let split = calculate_ft_dates(start, end, 30).unwrap();
    assert_eq!(split.ft_end, end);
    assert_eq!(
        split.ft_start,
        Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap()
    );
    assert_eq!(split.is_end, split.ft_start);
    assert_eq!(split.ft_days, 30);
    assert_eq!(split.is_days, 93);
}

fn arb_status() -> impl Strategy<Value = StressStatus> {
    prop_oneof![
        Just(StressStatus::Ok),
        Just(StressStatus::SkippedBadBase),
        Just(StressStatus::InsufficientData),
        "[a-z_]{3,12}".prop_map(|s| StressStatus::parse(&s)),
    ]
}

proptest! {
    /// More trials can only raise the chance-expected maximum Sharpe.
    #[test]
    fn expected_max_strictly_increasing(
        n in 2u64..5000,
        extra in 1u64..500,
        sr_mean in -1.0f64..1.0,
        sr_std in 0.01f64..2.0,
    ) {
        let fewer = expected_max_sharpe(sr_mean, sr_std, n);
        let more = expected_max_sharpe(sr_mean, sr_std, n + extra);
        prop_assert!(more > fewer, "n={} -> {}, n={} -> {}", n, fewer, n + extra, more);
    }

    /// For a Sharpe ratio above the deflation benchmark, a longer track
    /// record never lowers the DSR.
    #[test]
    fn dsr_non_decreasing_in_track_length(
        sr in 0.2f64..3.0,
        sr_std in 0.01f64..0.5,
        n_trials in 2u64..200,
        n_obs in 2u64..120,
        extra in 1u64..120,
    ) {
        prop_assume!(sr > expected_max_sharpe(0.0, sr_std, n_trials));
        let short = calculate_dsr(sr, sr_std, 0.0, 3.0, n_obs, n_trials).value().unwrap();
        let long = calculate_dsr(sr, sr_std, 0.0, 3.0, n_obs + extra, n_trials).value().unwrap();
        prop_assert!(long >= short);
        prop_assert!((0.0..=1.0).contains(&long));
    }

    /// The optimizer fallback never re-sorts its input.
    #[test]
    fn optuna_order_preserved(numbers in prop::collection::vec(0u64..10_000, 0..50)) {
        let optuna: Vec<OptunaTrial> = numbers.iter().map(|&n| OptunaTrial::new(n)).collect();
        let sel = select_oos_source_candidates(&TrialSources {
            optuna: &optuna,
            ..Default::default()
        });
        prop_assert_eq!(sel.source, OosSource::Optuna);
        let out: Vec<TrialNumber> = sel.candidates.iter().map(|c| c.trial_number).collect();
        prop_assert_eq!(out, numbers);
    }

    /// Stress-test selection is exactly the ok-subsequence of its input.
    #[test]
    fn stress_selection_is_ok_subsequence(
        records in prop::collection::vec((0u64..1000, 1u32..100, arb_status()), 0..40),
    ) {
        let st: Vec<StressTestTrial> = records
            .iter()
            .map(|(n, rank, status)| StressTestTrial::new(*n, *rank, status.clone()))
            .collect();
        let sel = select_oos_source_candidates(&TrialSources {
            stress_test: &st,
            stress_test_ran: true,
            ..Default::default()
        });

        let expected: Vec<(TrialNumber, Option<u32>)> = st
            .iter()
            .filter(|r| r.status.is_ok())
            .map(|r| (r.trial_number, Some(r.st_rank)))
            .collect();
        let got: Vec<(TrialNumber, Option<u32>)> = sel
            .candidates
            .iter()
            .map(|c| (c.trial_number, c.source_rank))
            .collect();

        prop_assert_eq!(sel.source, OosSource::StressTest);
        prop_assert_eq!(sel.dropped, st.len() - expected.len());
        prop_assert_eq!(got, expected);
    }

    /// IS and FT day counts always add up to the full range.
    #[test]
    fn split_days_partition_the_range(total in 2i64..3000, ft_frac in 0.01f64..0.99) {
        let ft_days = ((total as f64 * ft_frac) as i64).clamp(1, total - 1);
        let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let end = start + chrono::Duration::days(total);
        let split = calculate_ft_dates(start, end, ft_days).unwrap();
        prop_assert_eq!(split.is_days + split.ft_days, total);
        prop_assert_eq!(split.is_end, split.ft_start);
        prop_assert!(split.is_days > 0);
    }
}
