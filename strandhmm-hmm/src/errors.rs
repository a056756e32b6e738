use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HmmError {
    #[error("State change probability must lie in [0, 0.5], got {0}")]
    InvalidTransition(f64),

    #[error("Cannot derive transition probabilities from zero bins")]
    NoBins,
}
