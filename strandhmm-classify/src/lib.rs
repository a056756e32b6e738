//! # Strand state classification of single-cell Strand-seq libraries
//!
//! The pipeline runs in three steps:
//!
//! 1. [`filter_bins`] normalizes every cell by its median bin count and drops bins
//!    whose mean count across cells is too low or too high.
//! 2. [`SampleRegistry::build`] fits one negative binomial dispersion `p` per sample
//!    from the mean and variance of each cell's counts over the retained bins.
//! 3. [`classify`] builds per-cell emissions and decodes every chromosome of every
//!    cell independently, in parallel.
//!
//! ```no_run
//! use strandhmm_classify::{ClassifierConfig, classify};
//! # fn load() -> (strandhmm_core::GenomeBins, Vec<strandhmm_core::CellCounts>) { unimplemented!() }
//!
//! let (bins, cells) = load();
//! let result = classify(&bins, &cells, &ClassifierConfig::default()).unwrap();
//! for outcome in &result.cells {
//!     if let Err(e) = &outcome.labels {
//!         eprintln!("{}", e);
//!     }
//! }
//! ```
pub mod config;
pub mod dispersion;
pub mod errors;
pub mod filter;
pub mod pipeline;

// re-exports
pub use config::{ClassifierConfig, ConfigError};
pub use dispersion::{CellMoments, SampleInfo, SampleRegistry, estimate_dispersion};
pub use errors::{CellError, ClassifyError};
pub use filter::{BinFilterOutcome, BinQuality, GoodBinSet, filter_bins};
pub use pipeline::{
    CellLabels, CellOutcome, Classification, LabeledBin, Rows, classify, decode_cells, validate_filter,
    validate_inputs,
};
