use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{RecordIndex, RecordStore};
use crate::types::Label;

/// Per-label count and share of a record selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: Label,
    pub count: usize,
    pub share: f64,
}

/// Label balance of a selection, sorted by label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelBalance {
    pub total: usize,
    pub per_label: Vec<LabelShare>,
}

impl LabelBalance {
    /// Share for `label`, or 0.0 when the label is absent.
    pub fn share_of(&self, label: Label) -> f64 {
        self.per_label
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.share)
            .unwrap_or(0.0)
    }
}

/// Label balance over the records at `indices`. Out-of-range indices are ignored.
pub fn label_balance<I>(store: &RecordStore, indices: I) -> LabelBalance
where
    I: IntoIterator<Item = RecordIndex>,
{
    let mut counts: BTreeMap<Label, usize> = BTreeMap::new();
    for index in indices {
        if let Some(record) = store.get(index) {
            *counts.entry(record.label).or_insert(0) += 1;
        }
    }
    let total: usize = counts.values().sum();
    let per_label = counts
        .into_iter()
        .map(|(label, count)| LabelShare {
            label,
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect();
    LabelBalance { total, per_label }
}

/// Label balance of the whole store.
pub fn dataset_label_balance(store: &RecordStore) -> LabelBalance {
    label_balance(store, 0..store.len())
}

/// Outcome of one coreset run, serializable for `--summary`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoresetSummary {
    pub source: String,
    pub records: usize,
    pub features: usize,
    pub target_size: usize,
    pub selected: usize,
    pub seed: u64,
    pub dataset_labels: LabelBalance,
    pub coreset_labels: LabelBalance,
    pub elapsed_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn labeled_store(labels: &[Label]) -> RecordStore {
        RecordStore::from_records(
            labels
                .iter()
                .enumerate()
                .map(|(idx, label)| Record::new(1, idx as i64, *label, vec![idx as f64]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn label_balance_reports_shares() {
        let store = labeled_store(&[0, 0, 0, 1]);
        let balance = dataset_label_balance(&store);
        assert_eq!(balance.total, 4);
        assert_eq!(balance.per_label.len(), 2);
        assert_eq!(balance.per_label[0].label, 0);
        assert_eq!(balance.per_label[0].count, 3);
        assert!((balance.share_of(0) - 0.75).abs() < 1e-12);
        assert!((balance.share_of(1) - 0.25).abs() < 1e-12);
        assert_eq!(balance.share_of(7), 0.0);
    }

    #[test]
    fn label_balance_of_selection_skips_invalid_indices() {
        let store = labeled_store(&[0, 1, 1]);
        let balance = label_balance(&store, [2, 1, 9]);
        assert_eq!(balance.total, 2);
        assert_eq!(balance.per_label.len(), 1);
        assert_eq!(balance.per_label[0].label, 1);
        assert!((balance.share_of(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_selection_has_no_labels() {
        let store = labeled_store(&[0]);
        let balance = label_balance(&store, Vec::new());
        assert_eq!(balance.total, 0);
        assert!(balance.per_label.is_empty());
    }
}
