use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use noodles::bam;
use noodles::sam::alignment::record::Flags;
use rayon::prelude::*;

use strandhmm_core::{CellCounts, GenomeBins, ReadStats, StrandCount};

use crate::errors::CountError;
use crate::header::BamHeaderInfo;

///
/// Accumulates strand counts of one library, one alignment record at a time.
///
/// Records are checked in this order, and the first failing check decides which
/// counter the read ends up in: unmapped (not counted at all), secondary,
/// supplementary or QC-failed, duplicate, mapping quality, second read of a pair.
///
pub struct ReadCounter<'a> {
    bins: &'a GenomeBins,
    chrom_map: Vec<Option<usize>>,
    min_mapq: u8,
    counts: Vec<StrandCount>,
    stats: ReadStats,
}

impl<'a> ReadCounter<'a> {
    ///
    /// # Arguments
    /// - bins: the bins to count into
    /// - chrom_map: bin chromosome of every reference sequence id, `None` to skip
    /// - min_mapq: reads below this mapping quality are dropped
    ///
    pub fn new(bins: &'a GenomeBins, chrom_map: Vec<Option<usize>>, min_mapq: u8) -> Self {
        ReadCounter {
            bins,
            chrom_map,
            min_mapq,
            counts: vec![StrandCount::default(); bins.len()],
            stats: ReadStats::default(),
        }
    }

    ///
    /// Count one record.
    ///
    /// # Arguments
    /// - flags: SAM flags
    /// - reference_sequence_id: index into the header's reference sequences
    /// - start: 0-based alignment start
    /// - mapq: mapping quality, `None` when missing (treated as 0)
    ///
    pub fn observe(
        &mut self,
        flags: Flags,
        reference_sequence_id: Option<usize>,
        start: Option<usize>,
        mapq: Option<u8>,
    ) {
        if flags.is_unmapped() {
            return;
        }
        self.stats.n_mapped += 1;

        if flags.is_secondary() || flags.is_supplementary() || flags.is_qc_fail() {
            self.stats.n_supplementary += 1;
            return;
        }
        if flags.is_duplicate() {
            self.stats.n_pcr_dups += 1;
            return;
        }
        if mapq.unwrap_or(0) < self.min_mapq {
            self.stats.n_low_mapq += 1;
            return;
        }
        if flags.is_last_segment() {
            self.stats.n_read2s += 1;
            return;
        }

        let Some(chrom) = reference_sequence_id
            .and_then(|id| self.chrom_map.get(id).copied())
            .flatten()
        else {
            return;
        };
        let Some(pos) = start.and_then(|s| u32::try_from(s).ok()) else {
            return;
        };
        let Some(bin) = self.bins.find_bin(chrom, pos) else {
            return;
        };

        if flags.is_reverse_complemented() {
            self.counts[bin].watson += 1;
        } else {
            self.counts[bin].crick += 1;
        }
        self.stats.n_counted += 1;
    }

    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    pub fn finish(self) -> (Vec<StrandCount>, ReadStats) {
        (self.counts, self.stats)
    }
}

/// Counts of one BAM file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadCounts {
    pub header: BamHeaderInfo,
    pub counts: Vec<StrandCount>,
    pub stats: ReadStats,
}

///
/// Stream a BAM file and count its reads into `bins`.
///
/// # Arguments
/// - path: path to the BAM file
/// - bins: bins to count into
/// - min_mapq: minimum mapping quality
///
pub fn count_reads<P: AsRef<Path>>(
    path: P,
    bins: &GenomeBins,
    min_mapq: u8,
) -> Result<ReadCounts, CountError> {
    let path = path.as_ref();
    let io_err = |source| CountError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = bam::io::reader::Builder::default()
        .build_from_path(path)
        .map_err(io_err)?;
    let sam_header = reader.read_header().map_err(io_err)?;
    let header = BamHeaderInfo::from_header(&sam_header, path)?;

    let chrom_map = header.chrom_map(bins);
    if chrom_map.iter().all(Option::is_none) {
        return Err(CountError::NoSharedChromosomes {
            path: path.to_path_buf(),
        });
    }

    let mut counter = ReadCounter::new(bins, chrom_map, min_mapq);
    let mut record = bam::Record::default();
    loop {
        match reader.read_record(&mut record) {
            Ok(0) => break,
            Ok(_) => {
                let reference_sequence_id = record.reference_sequence_id().transpose().map_err(io_err)?;
                let start = record
                    .alignment_start()
                    .transpose()
                    .map_err(io_err)?
                    .map(|p| p.get() - 1);
                let mapq = record.mapping_quality().map(|q| q.get());
                counter.observe(record.flags(), reference_sequence_id, start, mapq);
            }
            Err(e) => return Err(io_err(e)),
        }
    }

    let (counts, stats) = counter.finish();
    Ok(ReadCounts {
        header,
        counts,
        stats,
    })
}

fn cell_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

///
/// Count every BAM file in parallel, one cell per file.
///
/// Files that cannot be read are dropped with a warning. A file whose read groups
/// do not name exactly one sample fails the whole call. The id of each returned
/// cell is the position of its file in `paths`.
///
/// # Arguments
/// - paths: one BAM file per cell
/// - bins: bins to count into
/// - min_mapq: minimum mapping quality
/// - progress: show a progress bar on stderr
///
pub fn count_cells(
    paths: &[PathBuf],
    bins: &GenomeBins,
    min_mapq: u8,
    progress: bool,
) -> Result<Vec<CellCounts>, CountError> {
    let pb = if progress {
        ProgressBar::new(paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("counting reads");

    let counted: Result<Vec<Option<CellCounts>>, CountError> = paths
        .par_iter()
        .enumerate()
        .map(|(id, path)| {
            let result = count_reads(path, bins, min_mapq);
            pb.inc(1);
            match result {
                Ok(rc) => Ok(Some(
                    CellCounts::new(id, cell_name(path), rc.header.sample_name, rc.counts)
                        .with_read_stats(rc.stats),
                )),
                Err(e) if e.is_sample_error() => Err(e),
                Err(e) => {
                    warn!("Ignoring cell: {}", e);
                    Ok(None)
                }
            }
        })
        .collect();

    let cells: Vec<CellCounts> = match counted {
        Ok(cells) => cells.into_iter().flatten().collect(),
        Err(e) => {
            pb.abandon_with_message("counting failed");
            return Err(e);
        }
    };

    pb.finish_with_message(format!("counted {} cells", cells.len()));
    info!("Counted reads of {} out of {} files", cells.len(), paths.len());
    Ok(cells)
}
