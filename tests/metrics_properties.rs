//! Property-based tests for the citation metrics.

use harvester_core::{calculate_g_index, calculate_h_index, calculate_metrics};
use proptest::prelude::*;

mod index_monotonicity_props {
    use super::*;

    proptest! {
        #[test]
        fn test_h_index_never_decreases_when_a_publication_is_added(
            counts in prop::collection::vec(0u64..500, 0..60),
            extra in 0u64..500,
        ) {
            let before = calculate_h_index(&counts);
            let mut grown = counts.clone();
            grown.push(extra);
            prop_assert!(calculate_h_index(&grown) >= before);
        }

        #[test]
        fn test_g_index_never_decreases_when_a_publication_is_added(
            counts in prop::collection::vec(0u64..500, 0..60),
            extra in 0u64..500,
        ) {
            let before = calculate_g_index(&counts);
            let mut grown = counts.clone();
            grown.push(extra);
            prop_assert!(calculate_g_index(&grown) >= before);
        }

        #[test]
        fn test_indices_ignore_input_order(counts in prop::collection::vec(0u64..1000, 0..40)) {
            let mut reversed = counts.clone();
            reversed.reverse();
            prop_assert_eq!(calculate_metrics(&counts), calculate_metrics(&reversed));
        }

        #[test]
        fn test_indices_bounded_by_publication_count(counts in prop::collection::vec(0u64..10_000, 0..40)) {
            let metrics = calculate_metrics(&counts);
            prop_assert!(metrics.h_index <= counts.len());
            prop_assert!(metrics.g_index <= counts.len());
            prop_assert_eq!(metrics.total_citations, counts.iter().sum::<u64>());
        }
    }
}

#[test]
fn test_reference_sequence() {
    let counts = [10, 8, 5, 4, 3];
    assert_eq!(calculate_h_index(&counts), 4);
    assert_eq!(calculate_g_index(&counts), 5);

    let metrics = calculate_metrics(&counts);
    assert_eq!(metrics.total_publications, 5);
    assert_eq!(metrics.total_citations, 30);
    assert!((metrics.avg_citations - 6.0).abs() < f64::EPSILON);
}

#[test]
fn test_empty_input_is_all_zero() {
    let metrics = calculate_metrics(&[]);
    assert_eq!(metrics.total_publications, 0);
    assert_eq!(metrics.total_citations, 0);
    assert_eq!(metrics.h_index, 0);
    assert_eq!(metrics.g_index, 0);
    assert!(metrics.avg_citations.abs() < f64::EPSILON);
    assert_eq!(calculate_h_index(&[]), 0);
    assert_eq!(calculate_g_index(&[]), 0);
}
