use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use strandhmm_classify::SampleRegistry;
use strandhmm_core::CellCounts;
use strandhmm_core::utils::get_dynamic_writer;

const CELL_SUMMARY_PREAMBLE: &[&str] = &[
    "# medbin:  Median total count (w+c) per bin",
    "# mapped:  Total number of reads seen",
    "# suppl:   Supplementary, secondary or QC-failed reads (filtered out)",
    "# dupl:    Reads filtered out as PCR duplicates",
    "# mapq:    Reads filtered out due to low mapping quality",
    "# read2:   Reads filtered out as 2nd read of pair",
    "# good:    Reads used for counting.",
];

///
/// Write one line of read statistics per cell, sorted by sample and then by the
/// position of the cell in the input.
///
pub fn write_cell_summary<W: Write>(writer: &mut W, cells: &[CellCounts]) -> std::io::Result<()> {
    for line in CELL_SUMMARY_PREAMBLE {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer, "sample\tcell\tmedbin\tmapped\tsuppl\tdupl\tmapq\tread2\tgood")?;

    let mut sorted: Vec<&CellCounts> = cells.iter().collect();
    sorted.sort_by(|a, b| {
        a.info
            .sample_name
            .cmp(&b.info.sample_name)
            .then(a.info.id.cmp(&b.info.id))
    });

    for cell in sorted {
        let stats = &cell.info.read_stats;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            cell.info.sample_name,
            cell.info.name,
            cell.info.median_bin_count,
            stats.n_mapped,
            stats.n_supplementary,
            stats.n_pcr_dups,
            stats.n_low_mapq,
            stats.n_read2s,
            stats.n_counted
        )?;
    }
    Ok(())
}

/// [`write_cell_summary`] into a file.
pub fn save_cell_summary<P: AsRef<Path>>(path: P, cells: &[CellCounts]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = get_dynamic_writer(path)?;
    write_cell_summary(&mut writer, cells)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write cell summary: {:?}", path))
}

fn join(values: impl Iterator<Item = f64>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

///
/// Write the fitted dispersion of every sample together with the per-cell means
/// and variances it was fitted from.
///
pub fn write_sample_summary<W: Write>(writer: &mut W, samples: &SampleRegistry) -> std::io::Result<()> {
    writeln!(writer, "sample\tcells\tp\tmeans\tvars")?;
    for sample in samples.iter() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            sample.name,
            sample.cells.len(),
            sample.p,
            join(sample.means()),
            join(sample.variances())
        )?;
    }
    Ok(())
}

/// [`write_sample_summary`] into a file.
pub fn save_sample_summary<P: AsRef<Path>>(path: P, samples: &SampleRegistry) -> Result<()> {
    let path = path.as_ref();
    let mut writer = get_dynamic_writer(path)?;
    write_sample_summary(&mut writer, samples)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write sample summary: {:?}", path))
}
