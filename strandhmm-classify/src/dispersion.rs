use std::collections::BTreeMap;

use log::warn;
use strandhmm_core::CellCounts;
use strandhmm_stats::MeanVarAccumulator;

use crate::filter::GoodBinSet;

/// Mean and population variance of one cell's total counts over the good bins.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMoments {
    pub cell_id: usize,
    pub cell_name: String,
    pub mean: f64,
    pub variance: f64,
}

impl CellMoments {
    ///
    /// Compute the moments of crick + watson over the good bins. Counts are not
    /// normalized.
    ///
    pub fn from_cell(cell: &CellCounts, good_bins: &GoodBinSet) -> Self {
        let acc: MeanVarAccumulator = good_bins
            .indices()
            .iter()
            .filter_map(|&b| cell.counts.get(b))
            .map(|count| count.total() as f64)
            .collect();
        CellMoments {
            cell_id: cell.info.id,
            cell_name: cell.info.name.clone(),
            mean: acc.mean(),
            variance: acc.variance(),
        }
    }
}

///
/// Method of moments estimate of the negative binomial `p` shared by a group of cells:
/// `sum(mean^2) / sum(mean * var)`.
///
/// For a single cell this reduces to `mean / var`. The result is not clamped; see
/// [`SampleInfo::is_degenerate`].
///
pub fn estimate_dispersion(moments: &[CellMoments]) -> f64 {
    let (num, denom) = moments.iter().fold((0.0, 0.0), |(num, denom), m| {
        (num + m.mean * m.mean, denom + m.mean * m.variance)
    });
    num / denom
}

/// All cells of one sample together with the sample's dispersion.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleInfo {
    pub name: String,
    pub cells: Vec<CellMoments>,
    pub p: f64,
}

impl SampleInfo {
    /// `p` outside (0, 1), e.g. when all counts are zero or have no variance.
    pub fn is_degenerate(&self) -> bool {
        !(self.p.is_finite() && self.p > 0.0 && self.p < 1.0)
    }

    pub fn means(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().map(|m| m.mean)
    }

    pub fn variances(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().map(|m| m.variance)
    }
}

///
/// Samples of one run, keyed by name.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRegistry {
    samples: BTreeMap<String, SampleInfo>,
}

impl SampleRegistry {
    ///
    /// Group cells by sample and fit one dispersion per sample. Degenerate
    /// samples are kept and logged.
    ///
    /// # Arguments
    /// - cells: cells to group, in input order
    /// - good_bins: the bins the moments are computed over
    ///
    pub fn build<'a, I>(cells: I, good_bins: &GoodBinSet) -> Self
    where
        I: IntoIterator<Item = &'a CellCounts>,
    {
        let mut grouped: BTreeMap<String, Vec<CellMoments>> = BTreeMap::new();
        for cell in cells {
            grouped
                .entry(cell.info.sample_name.clone())
                .or_default()
                .push(CellMoments::from_cell(cell, good_bins));
        }

        let samples = grouped
            .into_iter()
            .map(|(name, cells)| {
                let p = estimate_dispersion(&cells);
                let info = SampleInfo { name: name.clone(), cells, p };
                if info.is_degenerate() {
                    warn!(
                        "Sample {} ({} cells) has a degenerate dispersion estimate p = {}",
                        name,
                        info.cells.len(),
                        p
                    );
                }
                (name, info)
            })
            .collect();

        SampleRegistry { samples }
    }

    /// Override the dispersion of a sample that is already registered.
    pub fn set_dispersion(&mut self, name: &str, p: f64) -> bool {
        match self.samples.get_mut(name) {
            Some(info) => {
                info.p = p;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&SampleInfo> {
        self.samples.get(name)
    }

    pub fn dispersion(&self, name: &str) -> Option<f64> {
        self.samples.get(name).map(|s| s.p)
    }

    /// Samples sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &SampleInfo> {
        self.samples.values()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
