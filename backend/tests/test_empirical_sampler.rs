//! Empirical sampler tests
//!
//! Inverse-CDF sampling must be deterministic given the source state and
//! converge to the configured probabilities.

use cohort_simulator_core_rs::rng::UniformSource;
use cohort_simulator_core_rs::sampling::{EmpiricalDistribution, SamplingError};
use cohort_simulator_core_rs::RngManager;
use proptest::prelude::*;

/// Replays a fixed list of draws
struct Scripted {
    draws: Vec<f64>,
    next: usize,
}

impl UniformSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        let u = self.draws[self.next];
        self.next += 1;
        u
    }
}

#[test]
fn test_fixed_seed_gives_fixed_index_sequence() {
    let dist = EmpiricalDistribution::new(vec![0.75, 0.15, 0.0, 0.1]).unwrap();

    let mut rng1 = RngManager::new(7);
    let mut rng2 = RngManager::new(7);
    let first: Vec<usize> = (0..500).map(|_| dist.sample(&mut rng1)).collect();
    let second: Vec<usize> = (0..500).map(|_| dist.sample(&mut rng2)).collect();

    assert_eq!(first, second);
}

#[test]
fn test_one_draw_per_sample() {
    let dist = EmpiricalDistribution::new(vec![0.5, 0.5]).unwrap();
    let mut source = Scripted {
        draws: vec![0.1, 0.9, 0.5],
        next: 0,
    };

    assert_eq!(dist.sample(&mut source), 0);
    assert_eq!(dist.sample(&mut source), 1);
    // Tie at C[0] = 0.5 goes to the next index
    assert_eq!(dist.sample(&mut source), 1);
    assert_eq!(source.next, 3);
}

#[test]
fn test_frequencies_converge() {
    let probabilities = vec![0.75, 0.15, 0.0, 0.1];
    let dist = EmpiricalDistribution::new(probabilities.clone()).unwrap();
    let mut rng = RngManager::new(2024);

    let draws = 200_000;
    let mut counts = [0usize; 4];
    for _ in 0..draws {
        counts[dist.sample(&mut rng)] += 1;
    }

    assert_eq!(counts[2], 0, "zero-probability category was sampled");
    for (i, &p) in probabilities.iter().enumerate() {
        let freq = counts[i] as f64 / draws as f64;
        assert!(
            (freq - p).abs() < 0.005,
            "category {}: frequency {} too far from {}",
            i,
            freq,
            p
        );
    }
}

#[test]
fn test_unnormalized_row_fails_fast() {
    let err = EmpiricalDistribution::new(vec![0.0, 0.25, 0.55, 0.1]).unwrap_err();
    match err {
        SamplingError::BadSum { sum, .. } => assert!((sum - 0.9).abs() < 1e-12),
        other => panic!("expected BadSum, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn prop_sample_within_support(
        weights in prop::collection::vec(0.0f64..10.0, 1..8),
        seed in any::<u64>(),
    ) {
        let total: f64 = weights.iter().sum();
        prop_assume!(total > 0.0);
        let probabilities: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let dist = EmpiricalDistribution::new(probabilities.clone()).unwrap();

        let mut rng = RngManager::new(seed);
        for _ in 0..64 {
            let index = dist.sample(&mut rng);
            prop_assert!(index < probabilities.len());
            prop_assert!(probabilities[index] > 0.0);
        }
    }

    #[test]
    fn prop_index_is_first_cumulative_above_draw(u in 0.0f64..1.0) {
        let dist = EmpiricalDistribution::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let index = dist.index_for(u);
        let cumulative = dist.cumulative();
        prop_assert!(u < cumulative[index] || index == 3);
        if index > 0 {
            prop_assert!(u >= cumulative[index - 1]);
        }
    }
}
