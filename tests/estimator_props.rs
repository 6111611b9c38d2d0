use proptest::prelude::*;

use vitals::metrics::cpu::CpuEstimator;
use vitals::system::{CoreTicks, CpuTickSample};

fn sample(user: u64, system: u64, idle: u64) -> CpuTickSample {
    CpuTickSample {
        ticks: CoreTicks {
            user,
            system,
            idle,
            ..CoreTicks::default()
        },
        frequency_mhz: 0,
        model: String::new(),
    }
}

proptest! {
    #[test]
    fn first_call_always_returns_zero(
        user in 0u64..1_000_000,
        system in 0u64..1_000_000,
        idle in 0u64..1_000_000,
    ) {
        let mut est = CpuEstimator::new();
        prop_assert_eq!(est.estimate(&[sample(user, system, idle)]), 0);
    }

    #[test]
    fn usage_matches_truncated_delta_formula(
        user in 0u64..1_000_000,
        system in 0u64..1_000_000,
        idle in 0u64..1_000_000,
        busy_delta in 0u64..1_000_000,
        idle_delta in 0u64..1_000_000,
    ) {
        prop_assume!(busy_delta + idle_delta > 0);

        let first = sample(user, system, idle);
        let second = sample(user + busy_delta, system, idle + idle_delta);

        let mut est = CpuEstimator::new();
        est.estimate(&[first]);
        let usage = est.estimate(&[second]);

        let total_delta = (busy_delta + idle_delta) as f64;
        let expected = 100 - (100.0 * idle_delta as f64 / total_delta).trunc() as i64;
        prop_assert_eq!(usage, expected);
        prop_assert!((0..=100).contains(&usage));
    }

    #[test]
    fn recomputation_of_the_same_pair_is_stable(
        user in 0u64..1_000_000,
        idle in 0u64..1_000_000,
        busy_delta in 1u64..1_000_000,
        idle_delta in 0u64..1_000_000,
    ) {
        let first = sample(user, 0, idle);
        let second = sample(user + busy_delta, 0, idle + idle_delta);

        let run = || {
            let mut est = CpuEstimator::new();
            est.estimate(&[first.clone()]);
            est.estimate(&[second.clone()])
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn monotone_counters_average_cleanly_across_cores(
        idle_a in 0u64..1_000_000,
        idle_b in 0u64..1_000_000,
        busy in 1u64..1_000_000,
    ) {
        let mut est = CpuEstimator::new();
        est.estimate(&[sample(0, 0, 0), sample(0, 0, 0)]);
        let usage = est.estimate(&[sample(busy, 0, idle_a), sample(0, 0, idle_b)]);
        prop_assert!((0..=100).contains(&usage));
    }
}

#[test]
fn identical_consecutive_readings_report_100() {
    // total_delta == 0: the truncated term of the non-finite ratio is 0, so
    // the historical formula reports 100. Preserved, not clamped.
    let mut est = CpuEstimator::new();
    est.estimate(&[sample(5, 5, 5)]);
    assert_eq!(est.estimate(&[sample(5, 5, 5)]), 100);
}
