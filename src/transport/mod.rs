/// Filesystem export of selected records.
pub mod fs;

pub use fs::{export_coreset, write_coreset};
