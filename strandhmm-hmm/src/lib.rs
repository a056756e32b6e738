//! # Strand state hidden Markov model
//!
//! A three state chain over {CC, WC, WW} with a uniform start distribution, one
//! symmetric transition matrix shared by every cell and chromosome, and per-cell
//! emissions that model the (crick, watson) counts of a bin as two independent
//! negative binomial channels.
//!
//! ```
//! use strandhmm_core::StrandState;
//! use strandhmm_hmm::{StrandStateHmm, TransitionModel, strand_emissions};
//!
//! let transitions = TransitionModel::new(0.01).unwrap();
//! let emissions = strand_emissions(100.0, 0.5, 0.5).unwrap();
//! let hmm = StrandStateHmm::new(transitions, emissions);
//!
//! let path = hmm.decode(&[[0u32, 48], [1, 52], [0, 50]]);
//! assert_eq!(path, vec![StrandState::WW; 3]);
//! ```
pub mod emissions;
pub mod errors;
pub mod hmm;
pub mod transitions;

// re-exports
pub use emissions::{StrandEmission, strand_emissions};
pub use errors::HmmError;
pub use hmm::{N_STATES, StrandStateHmm};
pub use transitions::TransitionModel;
