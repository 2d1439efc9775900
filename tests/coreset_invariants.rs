use std::collections::HashSet;

use lightweight_coreset::{
    CoresetConfig, CoresetError, DeviationProfile, InMemorySource, Record, RecordSource,
    RecordStore, build_coreset, mean_vector, probability_distribution, sampling_weights,
};

fn build_record(idx: usize) -> Record {
    let x = idx as f64;
    Record::new(
        (idx / 5) as i64,
        10_000 + idx as i64,
        (idx % 3 == 0) as i64,
        vec![x * 0.5, (x * 1.7).cos() * 3.0, (idx % 4) as f64, -x],
    )
}

fn build_store(count: usize) -> RecordStore {
    InMemorySource::new("invariants", (0..count).map(build_record).collect())
        .load()
        .unwrap()
}

#[test]
fn mean_equals_column_average() {
    let store = build_store(41);
    let mean = mean_vector(&store).unwrap();
    for (feature, value) in mean.iter().enumerate() {
        let column: Vec<f64> = store
            .iter()
            .map(|record| record.features[feature])
            .collect();
        let expected = column.iter().sum::<f64>() / column.len() as f64;
        assert!((value - expected).abs() < 1e-9, "feature {feature}");
    }
}

#[test]
fn total_deviation_squares_the_summed_deviation() {
    let store = build_store(77);
    let mean = mean_vector(&store).unwrap();
    let profile = DeviationProfile::compute(&store, &mean);
    let summed: f64 = profile.dev_sums.iter().sum();
    let relative = (profile.total_deviation - summed * summed).abs() / (summed * summed);
    assert!(relative < 1e-12);

    let per_feature: f64 = profile.per_feature_totals.iter().sum();
    assert!((per_feature - summed).abs() / summed < 1e-12);
}

#[test]
fn distribution_is_positive_for_non_degenerate_data() {
    let store = build_store(25);
    let mean = mean_vector(&store).unwrap();
    let q = probability_distribution(&DeviationProfile::compute(&store, &mean)).unwrap();
    assert!(q.iter().all(|value| *value > 0.0));
    let uniform = 0.5 / store.len() as f64;
    assert!(q.iter().all(|value| *value >= uniform));
}

#[test]
fn full_dataset_when_target_covers_everything() {
    let store = build_store(12);
    for target in [12, 13, usize::MAX] {
        let coreset = build_coreset(&store, &CoresetConfig::new(target).with_seed(3)).unwrap();
        assert_eq!(coreset.indices, (0..12).collect::<Vec<_>>());
    }
}

#[test]
fn partial_selection_is_distinct_and_in_range() {
    let store = build_store(200);
    for seed in 0..20u64 {
        let coreset = build_coreset(&store, &CoresetConfig::new(50).with_seed(seed)).unwrap();
        assert_eq!(coreset.len(), 50);
        let unique: HashSet<usize> = coreset.indices.iter().copied().collect();
        assert_eq!(unique.len(), 50);
        assert!(coreset.indices.iter().all(|idx| *idx < store.len()));
    }
}

#[test]
fn selection_draws_every_record_when_one_short_of_full() {
    let store = build_store(30);
    let coreset = build_coreset(&store, &CoresetConfig::new(29).with_seed(8)).unwrap();
    let unique: HashSet<usize> = coreset.indices.iter().copied().collect();
    assert_eq!(unique.len(), 29);
}

#[test]
fn fixed_seed_is_reproducible() {
    let store = build_store(150);
    let config = CoresetConfig::new(40).with_seed(90210);
    let runs: Vec<_> = (0..3)
        .map(|_| build_coreset(&store, &config).unwrap())
        .collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

#[test]
fn coreset_weights_match_inverse_probabilities() {
    let store = build_store(60);
    let target = 15;
    let mean = mean_vector(&store).unwrap();
    let q = probability_distribution(&DeviationProfile::compute(&store, &mean)).unwrap();
    let weights = sampling_weights(&q, target);
    let coreset = build_coreset(&store, &CoresetConfig::new(target).with_seed(4)).unwrap();
    for (index, weight) in coreset.entries() {
        assert_eq!(weight, weights[index]);
        assert!((weight * target as f64 * q[index] - 1.0).abs() < 1e-12);
    }
}

#[test]
fn precondition_violations_are_typed_errors() {
    let empty = RecordStore::new();
    assert!(matches!(
        build_coreset(&empty, &CoresetConfig::new(1)),
        Err(CoresetError::EmptyDataset)
    ));

    let flat = RecordStore::from_records(vec![
        Record::new(1, 1, 0, vec![1.0, 2.0]),
        Record::new(1, 2, 1, vec![1.0, 2.0]),
    ])
    .unwrap();
    assert!(matches!(
        build_coreset(&flat, &CoresetConfig::new(1)),
        Err(CoresetError::DegenerateDataset)
    ));

    assert!(matches!(
        build_coreset(&build_store(5), &CoresetConfig::new(0)),
        Err(CoresetError::InvalidTargetSize(0))
    ));
}
