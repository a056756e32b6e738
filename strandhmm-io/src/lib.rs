//! # Reports of a classification run
//!
//! All reports are tab separated text. A path ending in `.gz` is written gzip
//! compressed. Each report comes as a `write_*` function over any [`std::io::Write`]
//! and a `save_*` function that opens the file.
//!
pub mod bins;
pub mod counts;
pub mod summaries;

pub use bins::{save_removed_bins, write_removed_bins};
pub use counts::{COUNT_TABLE_HEADER, EXCLUDED_LABEL, save_count_table, write_count_table};
pub use summaries::{save_cell_summary, save_sample_summary, write_cell_summary, write_sample_summary};
