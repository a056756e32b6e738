use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} has no SM tag in its read groups")]
    MissingSample { path: PathBuf },

    #[error("{path} names more than one sample in its read groups: {samples:?}")]
    AmbiguousSample { path: PathBuf, samples: Vec<String> },

    #[error("None of the reference sequences of {path} matches a binned chromosome")]
    NoSharedChromosomes { path: PathBuf },
}

impl CountError {
    /// The read groups do not name exactly one sample, so the cell cannot be assigned.
    pub fn is_sample_error(&self) -> bool {
        matches!(
            self,
            CountError::MissingSample { .. } | CountError::AmbiguousSample { .. }
        )
    }
}
