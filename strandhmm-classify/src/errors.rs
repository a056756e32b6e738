use strandhmm_core::DataShapeError;
use strandhmm_hmm::HmmError;
use strandhmm_stats::ConfigurationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures that stop the whole run.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Shape(#[from] DataShapeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "Cannot build the transition model from {n_good_bins} good bins with expected_events = {expected_events} \
         (lower expected_events in the config): {source}"
    )]
    Transition {
        n_good_bins: usize,
        expected_events: f64,
        #[source]
        source: HmmError,
    },
}

/// Failures confined to one cell; other cells are still classified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("Cell {cell} has a median bin count of zero and cannot be normalized")]
    ZeroMedian { cell: String },

    #[error("Cell {cell} (sample {sample}): {source}")]
    Configuration {
        cell: String,
        sample: String,
        #[source]
        source: ConfigurationError,
    },
}

impl CellError {
    pub fn cell(&self) -> &str {
        match self {
            CellError::ZeroMedian { cell } => cell,
            CellError::Configuration { cell, .. } => cell,
        }
    }
}
