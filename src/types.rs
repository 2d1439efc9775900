/// Block identifier grouping related rows (multiple rows per group).
/// Example: `279` (a native protein sequence block in the KDD set)
pub type GroupId = i64;
/// Per-row example identifier, unique within a dataset file.
/// Example: `261532`
pub type ExampleId = i64;
/// Class label carried through sampling untouched.
/// Examples: `0`, `1`
pub type Label = i64;
/// A single feature value.
/// Examples: `52.0`, `-0.87`, `1e-05`
pub type FeatureValue = f64;
/// Position of a record within its `RecordStore` (input order).
pub type RecordIndex = usize;
/// Identifier for the source that produced a record store.
/// Examples: `bio_train.dat`, `in_memory`
pub type SourceId = String;
