pub mod bin;
pub mod cell;
pub mod counts;
pub mod genome_bins;
pub mod state;

// re-export for cleaner imports
pub use self::bin::Bin;
pub use self::cell::{CellCounts, CellInfo, ReadStats};
pub use self::counts::StrandCount;
pub use self::genome_bins::{GenomeBins, boundary_map, validate_boundary_map};
pub use self::state::StrandState;
