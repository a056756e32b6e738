use std::ops::Range;

use strandhmm_stats::MedianAccumulator;

use crate::errors::DataShapeError;
use crate::models::bin::Bin;

///
/// The ordered bin sequence of a reference genome.
///
/// Bins are sorted by (chromosome, start). `chrom_boundary[c]` is the index of the
/// first bin of chromosome `c`; the trailing sentinel equals the number of bins, so
/// the bins of chromosome `c` are `chrom_boundary[c]..chrom_boundary[c + 1]`.
/// Chromosomes without bins map to the boundary of the next chromosome.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeBins {
    chrom_names: Vec<String>,
    bins: Vec<Bin>,
    chrom_boundary: Vec<usize>,
}

impl GenomeBins {
    ///
    /// Create a bin set, deriving the chromosome boundary map.
    ///
    /// # Arguments
    /// - chrom_names: names of the reference chromosomes, indexed by `Bin::chrom`
    /// - bins: bins sorted by (chromosome, start), non-overlapping
    ///
    pub fn new(chrom_names: Vec<String>, bins: Vec<Bin>) -> Result<Self, DataShapeError> {
        validate_bins(&bins, chrom_names.len())?;
        let chrom_boundary = boundary_map(chrom_names.len(), bins.len(), |i| bins[i].chrom);

        Ok(GenomeBins {
            chrom_names,
            bins,
            chrom_boundary,
        })
    }

    ///
    /// Create a bin set from a boundary map produced elsewhere.
    ///
    /// The map is checked against the bins: it must be non-decreasing, carry the
    /// sentinel, and place every bin on its own chromosome.
    ///
    pub fn from_parts(
        chrom_names: Vec<String>,
        bins: Vec<Bin>,
        chrom_boundary: Vec<usize>,
    ) -> Result<Self, DataShapeError> {
        validate_bins(&bins, chrom_names.len())?;
        validate_boundary_map(&chrom_boundary, chrom_names.len(), bins.len())?;

        for chrom in 0..chrom_names.len() {
            for index in chrom_boundary[chrom]..chrom_boundary[chrom + 1] {
                if bins[index].chrom != chrom {
                    return Err(DataShapeError::BinOutsideChromosome {
                        index,
                        expected: chrom,
                        found: bins[index].chrom,
                    });
                }
            }
        }

        Ok(GenomeBins {
            chrom_names,
            bins,
            chrom_boundary,
        })
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn n_chroms(&self) -> usize {
        self.chrom_names.len()
    }

    pub fn chrom_names(&self) -> &[String] {
        &self.chrom_names
    }

    pub fn chrom_name(&self, chrom: usize) -> Option<&str> {
        self.chrom_names.get(chrom).map(String::as_str)
    }

    /// Index of a chromosome by name.
    pub fn chrom_index(&self, name: &str) -> Option<usize> {
        self.chrom_names.iter().position(|c| c == name)
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin(&self, index: usize) -> Option<&Bin> {
        self.bins.get(index)
    }

    pub fn chrom_boundary(&self) -> &[usize] {
        &self.chrom_boundary
    }

    /// Bin indices of one chromosome; empty for unknown chromosomes.
    pub fn chrom_range(&self, chrom: usize) -> Range<usize> {
        if chrom >= self.n_chroms() {
            return 0..0;
        }
        self.chrom_boundary[chrom]..self.chrom_boundary[chrom + 1]
    }

    ///
    /// Find the bin containing a 0-based position.
    ///
    /// Binary search within the chromosome's range, `None` when the position
    /// falls into a gap or outside the chromosome.
    ///
    pub fn find_bin(&self, chrom: usize, pos: u32) -> Option<usize> {
        let range = self.chrom_range(chrom);
        let bins = &self.bins[range.clone()];

        // first bin whose end is past pos
        let idx = bins.partition_point(|b| b.end <= pos);
        match bins.get(idx) {
            Some(bin) if bin.contains(pos) => Some(range.start + idx),
            _ => None,
        }
    }

    /// Median bin width, `None` for an empty bin set.
    pub fn median_bin_width(&self) -> Option<f64> {
        let acc: MedianAccumulator = self.bins.iter().map(|b| b.width() as f64).collect();
        acc.median()
    }
}

///
/// Build a boundary map over a sorted sequence by a single forward scan.
///
/// # Arguments
/// - n_chroms: number of chromosomes in the reference
/// - len: number of items in the sequence
/// - chrom_of: chromosome of the item at a position, non-decreasing in the position
///
/// Entry `c` is the position of the first item on chromosome `c` or later; the
/// last entry is the sentinel `len`.
///
pub fn boundary_map<F>(n_chroms: usize, len: usize, chrom_of: F) -> Vec<usize>
where
    F: Fn(usize) -> usize,
{
    let mut map = Vec::with_capacity(n_chroms + 1);
    let mut pos = 0;
    for chrom in 0..n_chroms {
        while pos < len && chrom_of(pos) < chrom {
            pos += 1;
        }
        map.push(pos);
    }
    map.push(len);
    map
}

///
/// Check a boundary map: `n_chroms + 1` entries, non-decreasing, sentinel equal
/// to `total`.
///
pub fn validate_boundary_map(
    boundary: &[usize],
    n_chroms: usize,
    total: usize,
) -> Result<(), DataShapeError> {
    if boundary.len() != n_chroms + 1 {
        return Err(DataShapeError::BoundaryLength {
            expected: n_chroms + 1,
            found: boundary.len(),
        });
    }
    for (chrom, pair) in boundary.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(DataShapeError::NonMonotonicBoundary { chrom: chrom + 1 });
        }
    }
    let sentinel = boundary[n_chroms];
    if sentinel != total {
        return Err(DataShapeError::BoundarySentinel {
            expected: total,
            found: sentinel,
        });
    }
    Ok(())
}

fn validate_bins(bins: &[Bin], n_chroms: usize) -> Result<(), DataShapeError> {
    for (index, bin) in bins.iter().enumerate() {
        if bin.chrom >= n_chroms {
            return Err(DataShapeError::UnknownChromosome {
                index,
                chrom: bin.chrom,
            });
        }
        if bin.start >= bin.end {
            return Err(DataShapeError::InvalidBin {
                index,
                start: bin.start,
                end: bin.end,
            });
        }
        if index > 0 {
            let prev = &bins[index - 1];
            if (prev.chrom, prev.start) > (bin.chrom, bin.start) {
                return Err(DataShapeError::UnsortedBins { index });
            }
            if prev.chrom == bin.chrom && prev.end > bin.start {
                return Err(DataShapeError::OverlappingBins { index });
            }
        }
    }
    Ok(())
}
