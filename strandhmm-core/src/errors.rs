use thiserror::Error;

/// Inputs whose shape violates the contract between pipeline stages.
///
/// These are never recoverable locally: an upstream stage handed over
/// inconsistent data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataShapeError {
    #[error("Cell {cell} has {found} count entries, expected one per bin ({expected})")]
    CountLengthMismatch {
        cell: String,
        expected: usize,
        found: usize,
    },

    #[error("Boundary map has {found} entries, expected {expected} (one per chromosome plus sentinel)")]
    BoundaryLength { expected: usize, found: usize },

    #[error("Boundary map decreases at chromosome {chrom}")]
    NonMonotonicBoundary { chrom: usize },

    #[error("Boundary map sentinel is {found}, expected {expected}")]
    BoundarySentinel { expected: usize, found: usize },

    #[error("Bin {index} lies on chromosome {found} but the boundary map places it on {expected}")]
    BinOutsideChromosome {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Bin {index} refers to chromosome {chrom} which is not in the reference")]
    UnknownChromosome { index: usize, chrom: usize },

    #[error("Bin {index} is empty or reversed: [{start}, {end})")]
    InvalidBin { index: usize, start: u32, end: u32 },

    #[error("Bins are not sorted by (chromosome, start) at index {index}")]
    UnsortedBins { index: usize },

    #[error("Bin {index} overlaps the previous bin")]
    OverlappingBins { index: usize },

    #[error("Bin index {index} is out of range for {total} bins")]
    BinIndexOutOfRange { index: usize, total: usize },

    #[error("Filter outcome covers {found} bins, the bin sequence has {expected}")]
    FilterLength { expected: usize, found: usize },

    #[error("Bin indices are not strictly increasing at position {position}")]
    UnorderedBinIndices { position: usize },
}

/// Failures while building a bin set.
#[derive(Error, Debug)]
pub enum BinningError {
    #[error("Window size must be positive")]
    InvalidWindow,

    #[error("Error parsing line {line} of {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("No bins could be created")]
    EmptyBinSet,

    #[error(transparent)]
    Shape(#[from] DataShapeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
