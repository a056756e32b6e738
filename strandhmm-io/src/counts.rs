use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use strandhmm_classify::Classification;
use strandhmm_core::utils::get_dynamic_writer;
use strandhmm_core::{CellCounts, GenomeBins};

pub const COUNT_TABLE_HEADER: &str = "chrom\tstart\tend\tsample\tcell\tc\tw\tclass";

/// Label written for bins that were excluded from decoding.
pub const EXCLUDED_LABEL: &str = "None";

///
/// Write the labeled count table: one row per bin and classified cell, ordered by
/// bin then cell.
///
/// # Arguments
/// - writer: destination
/// - bins: the bins the run was given
/// - cells: the cells the run was given, in the same order
/// - classification: result of the run
///
pub fn write_count_table<W: Write>(
    writer: &mut W,
    bins: &GenomeBins,
    cells: &[CellCounts],
    classification: &Classification,
) -> std::io::Result<()> {
    writeln!(writer, "{}", COUNT_TABLE_HEADER)?;
    for row in classification.rows(bins, cells) {
        let label = row.label.map(|s| s.as_str()).unwrap_or(EXCLUDED_LABEL);
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.chrom_name,
            row.bin.start,
            row.bin.end,
            row.cell.sample_name,
            row.cell.name,
            row.count.crick,
            row.count.watson,
            label
        )?;
    }
    Ok(())
}

/// [`write_count_table`] into a file.
pub fn save_count_table<P: AsRef<Path>>(
    path: P,
    bins: &GenomeBins,
    cells: &[CellCounts],
    classification: &Classification,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = get_dynamic_writer(path)?;
    write_count_table(&mut writer, bins, cells, classification)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write count table: {:?}", path))
}
