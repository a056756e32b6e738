use std::fmt::Display;
use std::ops::Range;

use strandhmm_core::models::boundary_map;
use strandhmm_core::{CellCounts, DataShapeError, GenomeBins};
use strandhmm_stats::MeanVarAccumulator;

use crate::config::ClassifierConfig;

/// Outcome of the quality check for a single bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinQuality {
    Good,
    /// Mean normalized count at or below the coverage floor
    Low,
    /// Mean normalized count at or above the outlier threshold
    High,
}

impl BinQuality {
    /// Tag written next to excluded bins; `None` for good bins.
    pub fn tag(&self) -> Option<char> {
        match self {
            BinQuality::Good => None,
            BinQuality::Low => Some('l'),
            BinQuality::High => Some('h'),
        }
    }

    pub fn is_good(&self) -> bool {
        matches!(self, BinQuality::Good)
    }
}

impl Display for BinQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "{}", tag),
            None => write!(f, "good"),
        }
    }
}

///
/// Ascending indices of the bins kept for decoding, grouped by chromosome.
///
/// `chrom_boundary[c]` is the position within `indices` of the first good bin on
/// chromosome `c`; the last entry is `indices.len()`. A chromosome without good
/// bins has an empty range.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodBinSet {
    indices: Vec<usize>,
    chrom_boundary: Vec<usize>,
}

impl GoodBinSet {
    ///
    /// Build the set from ascending bin indices.
    ///
    /// # Arguments
    /// - bins: the full bin sequence the indices refer to
    /// - indices: strictly increasing indices into `bins`
    ///
    pub fn from_indices(bins: &GenomeBins, indices: Vec<usize>) -> Result<Self, DataShapeError> {
        for (position, pair) in indices.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(DataShapeError::UnorderedBinIndices { position: position + 1 });
            }
        }
        if let Some(&last) = indices.last() {
            if last >= bins.len() {
                return Err(DataShapeError::BinIndexOutOfRange {
                    index: last,
                    total: bins.len(),
                });
            }
        }

        let all = bins.bins();
        let chrom_boundary = boundary_map(bins.n_chroms(), indices.len(), |i| all[indices[i]].chrom);
        Ok(GoodBinSet {
            indices,
            chrom_boundary,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn chrom_boundary(&self) -> &[usize] {
        &self.chrom_boundary
    }

    pub fn n_chroms(&self) -> usize {
        self.chrom_boundary.len().saturating_sub(1)
    }

    /// Positions within [`GoodBinSet::indices`] covering one chromosome.
    pub fn chrom_range(&self, chrom: usize) -> Range<usize> {
        match (self.chrom_boundary.get(chrom), self.chrom_boundary.get(chrom + 1)) {
            (Some(&start), Some(&end)) => start..end,
            _ => 0..0,
        }
    }

    /// Bin indices of the good bins on one chromosome.
    pub fn chrom_indices(&self, chrom: usize) -> &[usize] {
        &self.indices[self.chrom_range(chrom)]
    }
}

///
/// Everything the quality filter computed.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinFilterOutcome {
    /// Mean of the normalized total count per bin, across cells
    pub bin_means: Vec<f64>,
    /// Population variance of the normalized total count per bin, across cells
    pub bin_variances: Vec<f64>,
    /// Mean of `bin_means`
    pub mean_of_means: f64,
    /// Standard deviation of `bin_means`
    pub sd_of_means: f64,
    /// Bins at or above this mean are tagged high
    pub upper_threshold: f64,
    pub qualities: Vec<BinQuality>,
    pub good_bins: GoodBinSet,
}

impl BinFilterOutcome {
    /// Excluded bins in ascending order together with their tag.
    pub fn excluded_bins(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.qualities
            .iter()
            .enumerate()
            .filter_map(|(i, q)| q.tag().map(|tag| (i, tag)))
    }

    pub fn n_excluded(&self) -> usize {
        self.qualities.len() - self.good_bins.len()
    }
}

///
/// Flag bins whose coverage across cells is too low or suspiciously high.
///
/// Each cell's counts are divided by its median bin count, so every cell
/// contributes on the same scale. Cells without a positive median do not
/// contribute. A bin is good iff its mean normalized count is above
/// `min_bin_mean` and below `mean + max_sd_above_mean * sd` of all bin means.
///
/// # Arguments
/// - bins: the bin sequence all count vectors are aligned to
/// - cells: cells to take into account
/// - config: thresholds
///
pub fn filter_bins<'a, I>(
    bins: &GenomeBins,
    cells: I,
    config: &ClassifierConfig,
) -> Result<BinFilterOutcome, DataShapeError>
where
    I: IntoIterator<Item = &'a CellCounts>,
{
    let mut per_bin = vec![MeanVarAccumulator::new(); bins.len()];

    for cell in cells {
        if cell.counts.len() != bins.len() {
            return Err(DataShapeError::CountLengthMismatch {
                cell: cell.name().to_string(),
                expected: bins.len(),
                found: cell.counts.len(),
            });
        }
        let median = cell.info.median_bin_count;
        if !(median.is_finite() && median > 0.0) {
            continue;
        }
        for (acc, count) in per_bin.iter_mut().zip(&cell.counts) {
            acc.push(count.watson as f64 / median + count.crick as f64 / median);
        }
    }

    let bin_means: Vec<f64> = per_bin.iter().map(|acc| acc.mean()).collect();
    let bin_variances: Vec<f64> = per_bin.iter().map(|acc| acc.variance()).collect();

    let across: MeanVarAccumulator = bin_means.iter().copied().collect();
    let mean_of_means = across.mean();
    let sd_of_means = across.std_dev();
    let upper_threshold = mean_of_means + config.max_sd_above_mean * sd_of_means;

    let qualities: Vec<BinQuality> = bin_means
        .iter()
        .map(|&m| {
            if m <= config.min_bin_mean {
                BinQuality::Low
            } else if m >= upper_threshold {
                BinQuality::High
            } else {
                BinQuality::Good
            }
        })
        .collect();

    let indices = qualities
        .iter()
        .enumerate()
        .filter(|(_, q)| q.is_good())
        .map(|(i, _)| i)
        .collect();
    let good_bins = GoodBinSet::from_indices(bins, indices)?;

    Ok(BinFilterOutcome {
        bin_means,
        bin_variances,
        mean_of_means,
        sd_of_means,
        upper_threshold,
        qualities,
        good_bins,
    })
}
