mod test_utils;

use ndarray::{array, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use symnmf::similarity::norm;
use symnmf::symnmf::{factorize, initialize_membership, symnmf, SymNmfConfig};
use symnmf::{argmax_rows, ClusterError};
use test_utils::*;

fn fixed_h0() -> Array2<f64> {
    array![[0.1, 0.6], [0.2, 0.5], [0.6, 0.1], [0.5, 0.2]]
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_initial_membership_shape_and_range() {
    let (points, _) = grid_clusters(3, 5, 2, 4.0);
    let a = norm(&points).unwrap();
    let k = 3;
    let upper = 2.0 * (a.mean().unwrap() / k as f64).sqrt();

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let h0 = initialize_membership(&a, k, &mut rng).unwrap();

    assert_eq!(h0.dim(), (15, 3));
    assert!(h0.iter().all(|&v| v >= 0.0 && v < upper));
}

#[test]
fn test_initial_membership_is_seeded() {
    let a = norm(&two_pairs()).unwrap();

    let h1 = initialize_membership(&a, 2, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let h2 = initialize_membership(&a, 2, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let h3 = initialize_membership(&a, 2, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();

    assert_eq!(h1, h2);
    assert_ne!(h1, h3);
}

// ============================================================================
// Factorization
// ============================================================================

#[test]
fn test_step_size_non_increasing_after_first_iteration() {
    let a = norm(&two_pairs()).unwrap();

    let outcome = factorize(&a, fixed_h0(), &SymNmfConfig::default()).unwrap();

    assert!(outcome.converged);
    assert!(outcome.deltas.len() >= 3);
    for w in outcome.deltas[1..].windows(2) {
        assert!(w[1] <= w[0], "step grew from {} to {}", w[0], w[1]);
    }
    assert!(outcome.last_delta().unwrap() < 1e-4);
}

#[test]
fn test_fixed_start_separates_two_pairs() {
    let a = norm(&two_pairs()).unwrap();

    let outcome = factorize(&a, fixed_h0(), &SymNmfConfig::default()).unwrap();
    let labels = argmax_rows(&outcome.membership);

    assert_eq!(labels.as_slice(), &[1, 1, 0, 0]);
}

#[test]
fn test_membership_stays_non_negative() {
    let (points, _) = grid_clusters(2, 8, 3, 10.0);
    let outcome = symnmf(&points, 2, &SymNmfConfig::default()).unwrap();

    assert!(outcome.membership.iter().all(|&v| v >= 0.0 && v.is_finite()));
}

#[test]
fn test_undamped_update_may_stop_at_max_iter() {
    // With beta = 1 this start oscillates instead of settling; hitting the
    // cap still returns a result.
    let a = norm(&two_pairs()).unwrap();
    let cfg = SymNmfConfig::default().with_beta(1.0);

    let outcome = factorize(&a, fixed_h0(), &cfg).unwrap();

    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 300);
    assert_eq!(outcome.deltas.len(), 300);
}

#[test]
fn test_pipeline_separates_two_pairs() {
    let outcome = symnmf(&two_pairs(), 2, &SymNmfConfig::default()).unwrap();
    let labels = argmax_rows(&outcome.membership);

    assert_eq!(outcome.membership.dim(), (4, 2));
    assert!(same_partition(labels.as_slice(), &[0, 0, 1, 1]));
}

#[test]
fn test_pipeline_recovers_grid_clusters() {
    let (points, true_labels) = grid_clusters(2, 8, 3, 10.0);

    let outcome = symnmf(&points, 2, &SymNmfConfig::default()).unwrap();
    let labels = argmax_rows(&outcome.membership);

    assert!(same_partition(labels.as_slice(), &true_labels));
}

#[test]
fn test_pipeline_is_reproducible() {
    let (points, _) = grid_clusters(3, 4, 2, 3.0);
    let cfg = SymNmfConfig::default().with_seed(42);

    let first = symnmf(&points, 3, &cfg).unwrap();
    let second = symnmf(&points, 3, &cfg).unwrap();

    assert_eq!(first.membership, second.membership);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn test_k_boundaries_run_to_completion() {
    let points = two_pairs();
    for k in [2, 3] {
        let outcome = symnmf(&points, k, &SymNmfConfig::default())
            .unwrap_or_else(|e| panic!("k={} failed: {}", k, e));
        assert_eq!(outcome.membership.dim(), (4, k));
        assert!(outcome.iterations >= 1);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_rejects_degenerate_k() {
    let points = two_pairs();
    for k in [0, 1, 4, 5] {
        assert!(
            matches!(
                symnmf(&points, k, &SymNmfConfig::default()),
                Err(ClusterError::InvalidParameter(_))
            ),
            "k={} should be rejected",
            k
        );
    }
}

#[test]
fn test_factorize_rejects_mismatched_membership() {
    let a = norm(&two_pairs()).unwrap();
    let h0 = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];

    assert!(matches!(
        factorize(&a, h0, &SymNmfConfig::default()),
        Err(ClusterError::InvalidParameter(_))
    ));
}

#[test]
fn test_factorize_rejects_negative_start() {
    let a = norm(&two_pairs()).unwrap();
    let mut h0 = fixed_h0();
    h0[(2, 1)] = -0.1;

    assert!(matches!(
        factorize(&a, h0, &SymNmfConfig::default()),
        Err(ClusterError::InvalidParameter(_))
    ));
}

#[test]
fn test_non_finite_input_is_numerical_instability() {
    let mut a = norm(&two_pairs()).unwrap();
    a[(0, 1)] = f64::NAN;

    assert!(matches!(
        factorize(&a, fixed_h0(), &SymNmfConfig::default()),
        Err(ClusterError::NumericalInstability(_))
    ));
}

#[test]
fn test_overflowing_iterate_is_numerical_instability() {
    // H^T H overflows to infinity and meets the zero entries as 0 * inf.
    let a = norm(&two_pairs()).unwrap();
    let h0 = array![[0.0, 1e200], [1e200, 0.0], [1e200, 1e200], [0.0, 1e200]];

    assert!(matches!(
        factorize(&a, h0, &SymNmfConfig::default()),
        Err(ClusterError::NumericalInstability(_))
    ));
}

#[test]
fn test_rejects_invalid_config() {
    let a = norm(&two_pairs()).unwrap();
    let bad = [
        SymNmfConfig::default().with_max_iter(1),
        SymNmfConfig::default().with_max_iter(1000),
        SymNmfConfig::default().with_beta(0.0),
        SymNmfConfig::default().with_beta(1.5),
        SymNmfConfig::default().with_epsilon(0.0),
    ];
    for cfg in bad {
        assert!(matches!(
            factorize(&a, fixed_h0(), &cfg),
            Err(ClusterError::InvalidParameter(_))
        ));
    }
}
