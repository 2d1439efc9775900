use crate::constants::coreset::{DEFAULT_SEED, DEFAULT_TARGET_SIZE};

/// Coreset construction configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoresetConfig {
    /// Number of records to select (`m`). Values at or above the dataset size
    /// select the whole dataset.
    pub target_size: usize,
    /// RNG seed that controls deterministic selection order.
    pub seed: u64,
}

impl Default for CoresetConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

impl CoresetConfig {
    /// Create a config for an explicit target size with the default seed.
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size,
            ..Self::default()
        }
    }

    /// Override the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the target size.
    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }
}

/// Controls the exported row layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Append each row's sampling weight as a trailing column.
    pub include_weights: bool,
}

impl ExportOptions {
    pub fn with_weights(mut self, include_weights: bool) -> Self {
        self.include_weights = include_weights;
        self
    }
}
