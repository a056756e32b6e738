//! Statistical building blocks for strand state classification.
//!
//! This crate holds the pieces every other strandhmm crate leans on:
//!
//! - [`MeanVarAccumulator`]: running mean and population variance in O(1) memory
//! - [`MedianAccumulator`]: exact median over buffered observations
//! - [`NegativeBinomial`]: the count distribution of one strand channel
//! - [`Emission`] / [`IndependentChannels`]: joint probability of a vector of channel
//!   observations, built as a product of independent per-channel models
//!
//! # Example
//!
//! ```
//! use strandhmm_stats::{Emission, IndependentChannels, NegativeBinomial};
//!
//! let crick = NegativeBinomial::new(0.5, 50.0).unwrap();
//! let watson = NegativeBinomial::new(0.5, 0.5).unwrap();
//! let model = IndependentChannels::new(vec![crick, watson]);
//!
//! let ln_p = model.ln_prob(&[48, 1]);
//! assert!(ln_p.is_finite());
//! ```

pub mod accumulators;
pub mod emission;
pub mod errors;
pub mod negative_binomial;

// re-exports
pub use accumulators::{MeanVarAccumulator, MedianAccumulator};
pub use emission::{ChannelModel, Emission, IndependentChannels};
pub use errors::ConfigurationError;
pub use negative_binomial::NegativeBinomial;
