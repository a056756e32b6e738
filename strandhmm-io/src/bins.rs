use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use strandhmm_classify::BinFilterOutcome;
use strandhmm_core::GenomeBins;
use strandhmm_core::utils::get_dynamic_writer;

///
/// Write the bins dropped by the quality filter as BED with a fourth column
/// holding the tag (`l` or `h`), in ascending bin order.
///
pub fn write_removed_bins<W: Write>(
    writer: &mut W,
    bins: &GenomeBins,
    filter: &BinFilterOutcome,
) -> std::io::Result<()> {
    for (index, tag) in filter.excluded_bins() {
        let Some(bin) = bins.bin(index) else {
            continue;
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            bins.chrom_name(bin.chrom).unwrap_or_default(),
            bin.start,
            bin.end,
            tag
        )?;
    }
    Ok(())
}

/// [`write_removed_bins`] into a file.
pub fn save_removed_bins<P: AsRef<Path>>(path: P, bins: &GenomeBins, filter: &BinFilterOutcome) -> Result<()> {
    let path = path.as_ref();
    let mut writer = get_dynamic_writer(path)?;
    write_removed_bins(&mut writer, bins, filter)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write removed bins: {:?}", path))
}
