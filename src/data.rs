
use crate::errors::CoresetError;

pub use crate::types::{ExampleId, FeatureValue, GroupId, Label, RecordIndex};

/// One input row: group, example id, class label, and feature vector.
///
/// Only `features` participates in coreset construction; the other fields are
/// carried through to the export untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Block identifier (multiple rows per block).
    pub group_id: GroupId,
    /// Example identifier (unique per row).
    pub example_id: ExampleId,
    /// Class label.
    pub label: Label,
    /// Feature values, fixed width across a store.
    pub features: Vec<FeatureValue>,
}

impl Record {
    pub fn new(
        group_id: GroupId,
        example_id: ExampleId,
        label: Label,
        features: Vec<FeatureValue>,
    ) -> Self {
        Self {
            group_id,
            example_id,
            label,
            features,
        }
    }
}

/// Ordered, index-addressable record collection with a fixed feature width.
///
/// The width is taken from the first record pushed; later records must match it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
    feature_count: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, enforcing a constant feature width.
    pub fn from_records(records: Vec<Record>) -> Result<Self, CoresetError> {
        let mut store = Self {
            records: Vec::with_capacity(records.len()),
            feature_count: 0,
        };
        for record in records {
            store.push(record)?;
        }
        Ok(store)
    }

    /// Append a record. Rejects a record whose width differs from the first one.
    ///
    /// Mismatches report the 1-based position the record would occupy.
    pub fn push(&mut self, record: Record) -> Result<(), CoresetError> {
        if self.records.is_empty() {
            self.feature_count = record.features.len();
        } else if record.features.len() != self.feature_count {
            return Err(CoresetError::ShapeMismatch {
                line: self.records.len() + 1,
                expected: self.feature_count,
                found: record.features.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Feature width `F` (0 for an empty store).
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: RecordIndex) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Selected record indices in selection order, each with its sampling weight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coreset {
    /// Indices into the source `RecordStore`, in the order they were drawn.
    pub indices: Vec<RecordIndex>,
    /// Sampling weight `1 / (m * q)` of each selected index (1.0 when the
    /// whole dataset is returned).
    pub weights: Vec<f64>,
}

impl Coreset {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(index, weight)` pairs in selection order.
    pub fn entries(&self) -> impl Iterator<Item = (RecordIndex, f64)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }
}
