#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner and one-call pipeline.
pub mod app;
/// Coreset and export configuration types.
pub mod config;
/// Centralized constants used across construction, loading, and export.
pub mod constants;
/// Coreset construction: mean, deviation profile, distribution, and sampling.
pub mod coreset;
/// Record, record store, and coreset types.
pub mod data;
/// Label balance metrics and run summaries.
pub mod metrics;
/// Dataset source traits and built-in sources.
pub mod source;
/// Export transports (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Value formatting helpers.
pub mod utils;

mod errors;

pub use config::{CoresetConfig, ExportOptions};
pub use coreset::{
    CoresetBuilder, CumulativeWeightSampler, DeviationProfile, build_coreset, mean_vector,
    probability_distribution, sampling_weights,
};
pub use data::{Coreset, Record, RecordStore};
pub use errors::CoresetError;
pub use metrics::{CoresetSummary, LabelBalance, LabelShare};
pub use source::{FileSource, FileSourceConfig, InMemorySource, RecordSource};
pub use transport::{export_coreset, write_coreset};
pub use types::{ExampleId, FeatureValue, GroupId, Label, RecordIndex, SourceId};
