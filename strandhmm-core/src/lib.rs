//! # Core data model for strand state classification.
//!
//! Genomic windows ([`Bin`]) are grouped per chromosome by [`GenomeBins`], which also
//! owns the chromosome boundary map used everywhere downstream. Every sequencing
//! library contributes one [`CellCounts`]: its [`CellInfo`] plus one [`StrandCount`]
//! per bin. Classification assigns each retained bin a [`StrandState`].
//!
//! The [`binning`] module builds bin sets from a reference (fixed width windows
//! with exclusions, or BED defined intervals).
//!
pub mod binning;
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use errors::{BinningError, DataShapeError};
pub use models::{
    Bin, CellCounts, CellInfo, GenomeBins, ReadStats, StrandCount, StrandState,
};
