//! Dataset source interfaces.
//!
//! A `RecordSource` produces a complete `RecordStore` in input order. The
//! coreset builder only ever sees the store, never the source.

use crate::constants::source::IN_MEMORY_SOURCE_ID;
use crate::data::{Record, RecordStore};
use crate::errors::CoresetError;
use crate::types::SourceId;

/// Source implementation modules.
pub mod sources;

pub use sources::file_source::{FileSource, FileSourceConfig, parse_record_line};

/// Loader-facing dataset interface.
///
/// Implementations must preserve input order and guarantee a constant feature
/// width across records.
pub trait RecordSource {
    /// Stable source identifier used in logs and summaries.
    fn id(&self) -> &str;
    /// Load every record into a store.
    fn load(&self) -> Result<RecordStore, CoresetError>;
}

/// Source backed by prebuilt records.
pub struct InMemorySource {
    id: SourceId,
    records: Vec<Record>,
}

impl InMemorySource {
    /// Create an in-memory source from prebuilt records.
    pub fn new(id: impl Into<SourceId>, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }
}

impl From<Vec<Record>> for InMemorySource {
    fn from(records: Vec<Record>) -> Self {
        Self::new(IN_MEMORY_SOURCE_ID, records)
    }
}

impl RecordSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<RecordStore, CoresetError> {
        RecordStore::from_records(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_preserves_order() {
        let source = InMemorySource::from(vec![
            Record::new(2, 7, 1, vec![0.5]),
            Record::new(1, 3, 0, vec![1.5]),
        ]);
        assert_eq!(source.id(), IN_MEMORY_SOURCE_ID);
        let store = source.load().unwrap();
        let ids: Vec<i64> = store.iter().map(|record| record.example_id).collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn in_memory_source_reports_shape_mismatch() {
        let source = InMemorySource::new(
            "ragged",
            vec![Record::new(1, 1, 0, vec![0.5, 1.0]), Record::new(1, 2, 0, vec![1.5])],
        );
        assert!(matches!(
            source.load(),
            Err(CoresetError::ShapeMismatch {
                line: 2,
                expected: 2,
                found: 1
            })
        ));
    }
}
