/// Constants used by coreset construction.
pub mod coreset {
    /// Share of each record's probability mass drawn from the uniform component.
    pub const UNIFORM_SHARE: f64 = 0.5;
    /// Share of each record's probability mass drawn from the deviation component.
    pub const DEVIATION_SHARE: f64 = 0.5;
    /// Sampling weight assigned to every record when the whole dataset is returned.
    pub const UNIT_WEIGHT: f64 = 1.0;
    /// Default RNG seed when none is configured.
    pub const DEFAULT_SEED: u64 = 42;
    /// Default coreset size when none is configured.
    pub const DEFAULT_TARGET_SIZE: usize = 1000;
}

/// Constants used by dataset loading.
pub mod source {
    /// Number of leading metadata columns (group id, example id, label).
    pub const METADATA_COLUMNS: usize = 3;
    /// Source id reported by in-memory stores.
    pub const IN_MEMORY_SOURCE_ID: &str = "in_memory";
}

/// Constants used by coreset export.
pub mod transport {
    /// Column delimiter for exported rows.
    pub const FIELD_DELIMITER: char = '\t';
    /// Row separator for exported rows (written between rows, never trailing).
    pub const ROW_SEPARATOR: char = '\n';
    /// Default export filename.
    pub const DEFAULT_EXPORT_FILENAME: &str = "export.dat";
}

/// Constants used by sampler test fixtures.
#[cfg(test)]
pub mod coreset_tests {
    /// Seeded repetitions used by frequency assertions.
    pub const FREQUENCY_TRIALS: u64 = 4000;
    /// Absolute tolerance for floating-point comparisons in tests.
    pub const EPSILON: f64 = 1e-9;
}
