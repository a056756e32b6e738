//! # Strand specific read counting
//!
//! Every BAM file holds one single-cell library. Reads are filtered, assigned to
//! the bin containing their alignment start and counted on the Watson strand when
//! reverse complemented, on the Crick strand otherwise.
pub mod counter;
pub mod errors;
pub mod header;

// re-exports
pub use counter::{ReadCounter, ReadCounts, count_cells, count_reads};
pub use errors::CountError;
pub use header::BamHeaderInfo;
