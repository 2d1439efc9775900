/// Whitespace-delimited tabular file source implementation.
pub mod file_source;
