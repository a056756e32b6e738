use thiserror::Error;

/// Invalid parameters handed to a count model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Dispersion parameter p must lie in (0, 1), got {0}")]
    InvalidDispersion(f64),

    #[error("Rate argument r must be positive and finite, got {0}")]
    InvalidRate(f64),

    #[error("Negative binomial backend rejected parameters: {0}")]
    Distribution(String),
}
