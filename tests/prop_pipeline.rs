//! Property tests for node statistics, features, scaling and training.

use cci_baseline::classifier::{sigmoid, train};
use cci_baseline::features::{aggregate_node_stats, build_feature_matrix, edge_features};
use cci_baseline::{Edge, FEATURE_WIDTH, Label, Standardizer, TrainConfig};
use proptest::prelude::*;

fn edge_strategy() -> impl Strategy<Value = Edge> {
    (0u64..12, 0u64..12, any::<bool>()).prop_map(|(s, t, positive)| {
        Edge::labeled(s, t, if positive { Label::Positive } else { Label::Negative })
    })
}

fn edges_strategy() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec(edge_strategy(), 1..40)
}

proptest! {
    #[test]
    fn endpoint_counts_sum_to_twice_the_edges(edges in edges_strategy()) {
        let stats = aggregate_node_stats(&edges).unwrap();
        let visits: u64 = stats.iter().map(|(_, s)| s.total).sum();
        prop_assert_eq!(visits, 2 * edges.len() as u64);
        for (_, s) in stats.iter() {
            prop_assert_eq!(s.positive + s.negative, s.total);
            prop_assert!((s.positive_ratio + s.negative_ratio - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn features_are_finite_and_deterministic(edges in edges_strategy(), s in 0u64..20, t in 0u64..20) {
        let stats = aggregate_node_stats(&edges).unwrap();
        let key = Edge::unlabeled(s, t).key();
        let a = edge_features(key, &stats);
        let b = edge_features(key, &stats);
        prop_assert_eq!(a.len(), FEATURE_WIDTH);
        prop_assert!(a.iter().all(|v| v.is_finite()));
        prop_assert_eq!(a, b);
        prop_assert_eq!(a[16], if s == t { 1.0 } else { 0.0 });
    }

    #[test]
    fn unseen_edges_do_not_change_statistics(edges in edges_strategy(), extra in edges_strategy()) {
        let stats = aggregate_node_stats(&edges).unwrap();
        let before = stats.clone();
        let _ = build_feature_matrix(&extra, &stats);
        prop_assert_eq!(stats, before);
    }

    #[test]
    fn standardized_columns_are_centered(edges in edges_strategy()) {
        let stats = aggregate_node_stats(&edges).unwrap();
        let features = build_feature_matrix(&edges, &stats);
        let (scaler, scaled) = Standardizer::fit_transform(&features).unwrap();
        prop_assert_eq!(scaler.width(), FEATURE_WIDTH);
        let n = scaled.len() as f64;
        for j in 0..FEATURE_WIDTH {
            let mean: f64 = scaled.iter().map(|row| row[j]).sum::<f64>() / n;
            prop_assert!(mean.abs() < 1e-9, "column {} mean {}", j, mean);
            prop_assert!(scaler.std()[j] > 0.0);
        }
    }

    #[test]
    fn training_is_deterministic(edges in edges_strategy(), epochs in 0usize..30) {
        let labels: Vec<Label> = edges.iter().filter_map(|e| e.label).collect();
        let stats = aggregate_node_stats(&edges).unwrap();
        let (_, scaled) = Standardizer::fit_transform(&build_feature_matrix(&edges, &stats)).unwrap();
        let config = TrainConfig::default().with_epochs(epochs);

        let a = train(&scaled, &labels, &config).unwrap();
        let b = train(&scaled, &labels, &config).unwrap();
        prop_assert_eq!(a.losses.len(), epochs);
        prop_assert!(a.losses.iter().all(|l| l.is_finite() && *l > -1e-6));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn sigmoid_stays_in_unit_interval(z in -1e6f64..1e6) {
        let p = sigmoid(z);
        prop_assert!((0.0..=1.0).contains(&p));
        prop_assert!((sigmoid(-z) - (1.0 - p)).abs() < 1e-12);
    }
}
