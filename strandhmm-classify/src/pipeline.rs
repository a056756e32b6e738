use log::{debug, error, info, warn};
use rayon::prelude::*;

use strandhmm_core::models::validate_boundary_map;
use strandhmm_core::{Bin, CellCounts, CellInfo, DataShapeError, GenomeBins, StrandCount, StrandState};
use strandhmm_hmm::{StrandStateHmm, TransitionModel, strand_emissions};

use crate::config::ClassifierConfig;
use crate::dispersion::SampleRegistry;
use crate::errors::{CellError, ClassifyError};
use crate::filter::{BinFilterOutcome, GoodBinSet, filter_bins};

/// Per-bin labels of one cell: `Some(state)` for good bins, `None` for excluded bins.
pub type CellLabels = Vec<Option<StrandState>>;

/// Result for one input cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellOutcome {
    pub cell_id: usize,
    pub cell_name: String,
    pub sample_name: String,
    pub labels: Result<CellLabels, CellError>,
}

impl CellOutcome {
    pub fn is_ok(&self) -> bool {
        self.labels.is_ok()
    }
}

///
/// Everything one classification run produced.
///
/// `cells` follows the order of the input cells.
///
#[derive(Debug, Clone)]
pub struct Classification {
    pub filter: BinFilterOutcome,
    pub samples: SampleRegistry,
    /// `None` when no bin survived filtering
    pub transitions: Option<TransitionModel>,
    pub cells: Vec<CellOutcome>,
}

impl Classification {
    pub fn good_bins(&self) -> &GoodBinSet {
        &self.filter.good_bins
    }

    pub fn n_failed(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_ok()).count()
    }

    ///
    /// Labeled counts, one row per (bin, classified cell), ordered by bin then cell.
    /// Cells whose classification failed are left out.
    ///
    /// # Arguments
    /// - bins: the bin sequence the run was given
    /// - cells: the cells the run was given, in the same order
    ///
    pub fn rows<'a>(&'a self, bins: &'a GenomeBins, cells: &'a [CellCounts]) -> Rows<'a> {
        let classified = cells
            .iter()
            .zip(&self.cells)
            .filter_map(|(cell, outcome)| {
                outcome
                    .labels
                    .as_ref()
                    .ok()
                    .map(|labels| (cell, labels.as_slice()))
            })
            .collect();
        Rows {
            bins,
            classified,
            bin: 0,
            cell: 0,
        }
    }
}

/// One row of the labeled count table.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBin<'a> {
    pub index: usize,
    pub bin: &'a Bin,
    pub chrom_name: &'a str,
    pub cell: &'a CellInfo,
    pub count: StrandCount,
    pub label: Option<StrandState>,
}

/// Iterator returned by [`Classification::rows`].
pub struct Rows<'a> {
    bins: &'a GenomeBins,
    classified: Vec<(&'a CellCounts, &'a [Option<StrandState>])>,
    bin: usize,
    cell: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = LabeledBin<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.classified.is_empty() {
            return None;
        }
        if self.cell == self.classified.len() {
            self.cell = 0;
            self.bin += 1;
        }
        let bin = self.bins.bin(self.bin)?;
        let (cell, labels) = self.classified[self.cell];
        self.cell += 1;

        Some(LabeledBin {
            index: self.bin,
            bin,
            chrom_name: self.bins.chrom_name(bin.chrom).unwrap_or_default(),
            cell: &cell.info,
            count: *cell.counts.get(self.bin)?,
            label: labels.get(self.bin).copied().flatten(),
        })
    }
}

fn has_positive_median(cell: &CellCounts) -> bool {
    let median = cell.info.median_bin_count;
    median.is_finite() && median > 0.0
}

///
/// Check that the bins and every cell agree on the shape of the data.
///
pub fn validate_inputs(bins: &GenomeBins, cells: &[CellCounts]) -> Result<(), DataShapeError> {
    validate_boundary_map(bins.chrom_boundary(), bins.n_chroms(), bins.len())?;
    for cell in cells {
        if cell.counts.len() != bins.len() {
            return Err(DataShapeError::CountLengthMismatch {
                cell: cell.name().to_string(),
                expected: bins.len(),
                found: cell.counts.len(),
            });
        }
    }
    Ok(())
}

///
/// Check that a filter outcome was computed for this bin sequence.
///
/// Every per-bin vector must have one entry per bin, and the good bins must index
/// into `bins` with a boundary map over the same chromosomes.
///
pub fn validate_filter(bins: &GenomeBins, filter: &BinFilterOutcome) -> Result<(), DataShapeError> {
    if filter.qualities.len() != bins.len() {
        return Err(DataShapeError::FilterLength {
            expected: bins.len(),
            found: filter.qualities.len(),
        });
    }

    let good_bins = &filter.good_bins;
    validate_boundary_map(good_bins.chrom_boundary(), bins.n_chroms(), good_bins.len())?;

    let all = bins.bins();
    for chrom in 0..bins.n_chroms() {
        for &index in good_bins.chrom_indices(chrom) {
            let bin = all.get(index).ok_or(DataShapeError::BinIndexOutOfRange {
                index,
                total: bins.len(),
            })?;
            if bin.chrom != chrom {
                return Err(DataShapeError::BinOutsideChromosome {
                    index,
                    expected: chrom,
                    found: bin.chrom,
                });
            }
        }
    }
    Ok(())
}

///
/// Run the whole classification: filter bins, fit per-sample dispersions and
/// decode every cell.
///
/// Shape violations and an impossible transition probability fail the run.
/// Problems of a single cell end up in that cell's [`CellOutcome`].
///
/// # Arguments
/// - bins: the bin sequence
/// - cells: one entry per library, counts aligned with `bins`
/// - config: model constants
///
pub fn classify(
    bins: &GenomeBins,
    cells: &[CellCounts],
    config: &ClassifierConfig,
) -> Result<Classification, ClassifyError> {
    config.validate()?;
    validate_inputs(bins, cells)?;

    let usable: Vec<&CellCounts> = cells
        .iter()
        .filter(|cell| {
            let ok = has_positive_median(cell);
            if !ok {
                warn!(
                    "Ignoring cell {} of sample {}: median bin count is zero",
                    cell.name(),
                    cell.sample_name()
                );
            }
            ok
        })
        .collect();

    let filter = filter_bins(bins, usable.iter().copied(), config)?;
    info!(
        "Bin means across {} cells: mean {:.4}, sd {:.4}; excluding {} of {} bins",
        usable.len(),
        filter.mean_of_means,
        filter.sd_of_means,
        filter.n_excluded(),
        bins.len()
    );

    let samples = SampleRegistry::build(usable.iter().copied(), &filter.good_bins);
    for sample in samples.iter() {
        debug!("Sample {}: {} cells, p = {}", sample.name, sample.cells.len(), sample.p);
    }

    decode_cells(bins, cells, config, filter, samples)
}

///
/// Decode every cell given an already computed filter outcome and sample registry.
///
/// This is the second half of [`classify`]; calling it directly allows replacing
/// the fitted dispersions before decoding.
///
pub fn decode_cells(
    bins: &GenomeBins,
    cells: &[CellCounts],
    config: &ClassifierConfig,
    filter: BinFilterOutcome,
    samples: SampleRegistry,
) -> Result<Classification, ClassifyError> {
    validate_inputs(bins, cells)?;
    validate_filter(bins, &filter)?;
    let good_bins = &filter.good_bins;

    let transitions = if good_bins.is_empty() {
        warn!("No bin passed the quality filter, nothing will be classified");
        None
    } else {
        let model = TransitionModel::from_expected_events(config.expected_events, good_bins.len())
            .map_err(|source| ClassifyError::Transition {
                n_good_bins: good_bins.len(),
                expected_events: config.expected_events,
                source,
            })?;
        info!("State change probability between neighbouring bins: {}", model.p_trans());
        Some(model)
    };

    for chrom in 0..bins.n_chroms() {
        if good_bins.chrom_range(chrom).is_empty() && !bins.chrom_range(chrom).is_empty() {
            warn!(
                "Chromosome {} has no good bins, its bins stay unlabeled",
                bins.chrom_name(chrom).unwrap_or_default()
            );
        }
    }

    let outcomes: Vec<CellOutcome> = cells
        .par_iter()
        .map(|cell| {
            let labels = decode_cell(cell, bins.len(), good_bins, &samples, transitions.as_ref(), config);
            if let Err(e) = &labels {
                error!("{}", e);
            }
            CellOutcome {
                cell_id: cell.info.id,
                cell_name: cell.info.name.clone(),
                sample_name: cell.info.sample_name.clone(),
                labels,
            }
        })
        .collect();

    let n_failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!("Classified {} of {} cells", outcomes.len() - n_failed, outcomes.len());

    Ok(Classification {
        filter,
        samples,
        transitions,
        cells: outcomes,
    })
}

fn decode_cell(
    cell: &CellCounts,
    n_bins: usize,
    good_bins: &GoodBinSet,
    samples: &SampleRegistry,
    transitions: Option<&TransitionModel>,
    config: &ClassifierConfig,
) -> Result<CellLabels, CellError> {
    if !has_positive_median(cell) {
        return Err(CellError::ZeroMedian {
            cell: cell.name().to_string(),
        });
    }

    let mut labels: CellLabels = vec![None; n_bins];
    let Some(transitions) = transitions else {
        return Ok(labels);
    };

    // a sample missing from the registry has no usable dispersion
    let p = samples.dispersion(cell.sample_name()).unwrap_or(f64::NAN);
    let emissions = strand_emissions(cell.info.median_bin_count, p, config.zero_channel_rate)
        .map_err(|source| CellError::Configuration {
            cell: cell.name().to_string(),
            sample: cell.sample_name().to_string(),
            source,
        })?;
    let hmm = StrandStateHmm::new(transitions.clone(), emissions);

    let segments: Vec<Vec<StrandState>> = (0..good_bins.n_chroms())
        .into_par_iter()
        .map(|chrom| {
            let observations: Vec<[u32; 2]> = good_bins
                .chrom_indices(chrom)
                .iter()
                .map(|&b| cell.counts[b].channels())
                .collect();
            hmm.decode(&observations)
        })
        .collect();

    for (chrom, states) in segments.into_iter().enumerate() {
        for (&b, state) in good_bins.chrom_indices(chrom).iter().zip(states) {
            labels[b] = Some(state);
        }
    }
    debug!("Decoded cell {} over {} good bins", cell.name(), good_bins.len());

    Ok(labels)
}
