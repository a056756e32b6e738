use std::cmp::Ordering;

///
/// Bin struct, one genomic window on a chromosome of the reference
///
/// Half open: `start` is inclusive, `end` exclusive. Bins order by
/// (chromosome index, start, end).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Bin {
    pub chrom: usize,
    pub start: u32,
    pub end: u32,
}

impl Bin {
    pub fn new(chrom: usize, start: u32, end: u32) -> Self {
        Bin { chrom, start, end }
    }

    ///
    /// Get width of the bin
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check whether a 0-based position on the same chromosome falls into the bin
    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two bins on the same chromosome overlap
    #[inline]
    pub fn overlap(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }
}

impl Ord for Bin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Bin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
