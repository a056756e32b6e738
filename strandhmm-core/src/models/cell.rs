use strandhmm_stats::MedianAccumulator;

use crate::models::counts::StrandCount;

/// Read level bookkeeping of the counting stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Mapped reads seen
    pub n_mapped: u64,
    /// Secondary, supplementary or QC-failed reads (filtered out)
    pub n_supplementary: u64,
    /// Reads flagged as PCR duplicates (filtered out)
    pub n_pcr_dups: u64,
    /// Reads below the mapping quality threshold (filtered out)
    pub n_low_mapq: u64,
    /// Second reads of a pair (filtered out)
    pub n_read2s: u64,
    /// Reads that ended up in a bin
    pub n_counted: u64,
}

///
/// One sequencing library.
///
/// `median_bin_count` is the median of crick + watson across all bins and is
/// used to normalize the cell's counts.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CellInfo {
    pub id: usize,
    pub name: String,
    pub sample_name: String,
    pub median_bin_count: f64,
    pub read_stats: ReadStats,
}

/// A cell together with its per-bin strand counts, aligned with the global bin sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCounts {
    pub info: CellInfo,
    pub counts: Vec<StrandCount>,
}

impl CellCounts {
    ///
    /// Create a cell from its counts, computing `median_bin_count`.
    ///
    /// # Arguments
    /// - id: position of the cell in the input
    /// - name: cell identifier
    /// - sample_name: sample the cell belongs to
    /// - counts: one entry per bin
    ///
    pub fn new(
        id: usize,
        name: impl Into<String>,
        sample_name: impl Into<String>,
        counts: Vec<StrandCount>,
    ) -> Self {
        let median_bin_count = median_total(&counts);
        CellCounts {
            info: CellInfo {
                id,
                name: name.into(),
                sample_name: sample_name.into(),
                median_bin_count,
                read_stats: ReadStats::default(),
            },
            counts,
        }
    }

    pub fn with_read_stats(mut self, read_stats: ReadStats) -> Self {
        self.info.read_stats = read_stats;
        self
    }

    /// Override the median used for normalization.
    pub fn with_median_bin_count(mut self, median_bin_count: f64) -> Self {
        self.info.median_bin_count = median_bin_count;
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn sample_name(&self) -> &str {
        &self.info.sample_name
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

///
/// Median of crick + watson over all bins, 0.0 for an empty count vector.
///
pub fn median_total(counts: &[StrandCount]) -> f64 {
    let mut acc = MedianAccumulator::with_capacity(counts.len());
    acc.extend(counts.iter().map(|c| c.total() as f64));
    acc.median().unwrap_or(0.0)
}
