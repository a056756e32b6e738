use pretty_assertions::assert_eq;
use rstest::*;

use strandhmm_classify::{
    CellError, ClassifierConfig, ClassifyError, SampleRegistry, classify, decode_cells, filter_bins,
};
use strandhmm_core::{Bin, CellCounts, DataShapeError, GenomeBins, StrandCount, StrandState};
use strandhmm_stats::ConfigurationError;

fn genome(chrom_sizes: &[usize]) -> GenomeBins {
    let names = (0..chrom_sizes.len()).map(|c| format!("chr{}", c + 1)).collect();
    let bins = chrom_sizes
        .iter()
        .enumerate()
        .flat_map(|(chrom, &n)| (0..n as u32).map(move |i| Bin::new(chrom, i * 1000, (i + 1) * 1000)))
        .collect();
    GenomeBins::new(names, bins).unwrap()
}

/// Depth close to 50 reads per bin
fn steady_depth(i: u32) -> u32 {
    45 + (i * 7) % 11
}

/// Depth varying more than a Poisson process would, as in real libraries
fn overdispersed_depth(i: u32) -> u32 {
    40 + 10 * (i % 5)
}

fn signal(state: StrandState, depth: u32, i: u32) -> StrandCount {
    match state {
        StrandState::WW => StrandCount::new(i % 2, depth),
        StrandState::CC => StrandCount::new(depth, i % 2),
        StrandState::WC => StrandCount::new(depth / 2 + i % 3, depth / 2 - i % 3),
    }
}

fn cell_from_states(id: usize, sample: &str, states: &[StrandState], depth: fn(u32) -> u32) -> CellCounts {
    let counts = states
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let i = i as u32 + id as u32;
            signal(s, depth(i), i)
        })
        .collect();
    CellCounts::new(id, format!("cell{}", id), sample, counts)
}

fn labels_of(states: &[StrandState]) -> Vec<Option<StrandState>> {
    states.iter().map(|&s| Some(s)).collect()
}

#[fixture]
fn ww_then_cc() -> Vec<StrandState> {
    let mut states = vec![StrandState::WW; 60];
    states.extend(vec![StrandState::CC; 40]);
    states
}

#[rstest]
fn test_end_to_end_with_fixed_dispersion(ww_then_cc: Vec<StrandState>) {
    let bins = genome(&[100]);
    let cells = vec![cell_from_states(0, "sample", &ww_then_cc, steady_depth).with_median_bin_count(100.0)];
    let config = ClassifierConfig::default();

    let filter = filter_bins(&bins, &cells, &config).unwrap();
    assert_eq!(filter.good_bins.len(), 100);

    let mut samples = SampleRegistry::build(&cells, &filter.good_bins);
    assert!(samples.set_dispersion("sample", 0.5));

    let result = decode_cells(&bins, &cells, &config, filter, samples).unwrap();
    let labels = result.cells[0].labels.as_ref().unwrap();

    assert_eq!(labels, &labels_of(&ww_then_cc));
    let switches = labels.windows(2).filter(|w| w[0] != w[1]).count();
    assert!(switches <= 1);
}

#[rstest]
fn test_end_to_end_with_fitted_dispersion() {
    let mut states = vec![StrandState::WC; 50];
    states.extend(vec![StrandState::WW; 30]);
    states.extend(vec![StrandState::WC; 40]);

    let bins = genome(&[120]);
    let cells: Vec<CellCounts> = (0..3).map(|id| cell_from_states(id, "sample", &states, overdispersed_depth)).collect();
    let result = classify(&bins, &cells, &ClassifierConfig::default()).unwrap();

    let sample = result.samples.get("sample").unwrap();
    assert_eq!(sample.cells.len(), 3);
    assert!(!sample.is_degenerate());

    for outcome in &result.cells {
        let labels = outcome.labels.as_ref().unwrap();
        for (b, label) in labels.iter().enumerate() {
            if result.good_bins().indices().contains(&b) {
                assert_eq!(*label, Some(states[b]));
            } else {
                assert_eq!(*label, None);
            }
        }
    }
}

#[rstest]
fn test_chromosome_isolation(ww_then_cc: Vec<StrandState>) {
    let bins = genome(&[100, 50]);
    let config = ClassifierConfig::default();

    let mut states = ww_then_cc.clone();
    states.extend(vec![StrandState::WC; 50]);
    let original = vec![cell_from_states(0, "sample", &states, steady_depth).with_median_bin_count(100.0)];

    // chromosome 2 turns into a wild mix, chromosome 1 is untouched
    let mut altered = original.clone();
    for (k, b) in (100..150).enumerate() {
        let state = StrandState::ALL[(k / 3) % 3];
        altered[0].counts[b] = signal(state, 10 + k as u32 * 5, k as u32);
    }

    let filter = filter_bins(&bins, &original, &config).unwrap();
    let mut samples = SampleRegistry::build(&original, &filter.good_bins);
    samples.set_dispersion("sample", 0.5);

    let first = decode_cells(&bins, &original, &config, filter.clone(), samples.clone()).unwrap();
    let second = decode_cells(&bins, &altered, &config, filter, samples).unwrap();

    let first = first.cells[0].labels.as_ref().unwrap();
    let second = second.cells[0].labels.as_ref().unwrap();
    assert_eq!(&first[..100], &second[..100]);
    assert_eq!(&first[..100], &labels_of(&ww_then_cc)[..]);
}

#[rstest]
fn test_decoding_is_deterministic() {
    let states: Vec<StrandState> = (0..90).map(|i| StrandState::ALL[(i / 30) % 3]).collect();
    let bins = genome(&[45, 45]);
    let cells: Vec<CellCounts> = (0..4).map(|id| cell_from_states(id, "sample", &states, overdispersed_depth)).collect();
    let config = ClassifierConfig::default();

    let first = classify(&bins, &cells, &config).unwrap();
    let second = classify(&bins, &cells, &config).unwrap();

    assert_eq!(first.cells, second.cells);
    assert_eq!(first.good_bins(), second.good_bins());
}

#[rstest]
fn test_degenerate_sample_fails_only_its_cells(ww_then_cc: Vec<StrandState>) {
    let bins = genome(&[100]);
    let flat_counts = vec![StrandCount::new(5, 5); 100];
    let cells = vec![
        cell_from_states(0, "good", &ww_then_cc, overdispersed_depth),
        CellCounts::new(1, "flat_cell", "flat", flat_counts),
        cell_from_states(2, "good", &ww_then_cc, overdispersed_depth),
    ];

    let result = classify(&bins, &cells, &ClassifierConfig::default()).unwrap();

    assert!(result.samples.get("flat").unwrap().is_degenerate());
    assert!(matches!(
        &result.cells[1].labels,
        Err(CellError::Configuration {
            source: ConfigurationError::InvalidDispersion(_),
            ..
        })
    ));
    assert_eq!(result.cells[1].labels.as_ref().unwrap_err().cell(), "flat_cell");
    assert!(result.cells[0].is_ok());
    assert!(result.cells[2].is_ok());
    assert_eq!(result.n_failed(), 1);

    let rows = result.rows(&bins, &cells).count();
    assert_eq!(rows, 200);
}

#[rstest]
fn test_chromosome_without_good_bins_stays_unlabeled(ww_then_cc: Vec<StrandState>) {
    let bins = genome(&[40, 100]);
    let mut counts = vec![StrandCount::new(0, 0); 40];
    counts.extend(cell_from_states(0, "sample", &ww_then_cc, steady_depth).counts);
    let cells = vec![CellCounts::new(0, "cell0", "sample", counts).with_median_bin_count(100.0)];
    let config = ClassifierConfig::default();

    let filter = filter_bins(&bins, &cells, &config).unwrap();
    assert!(filter.good_bins.chrom_indices(0).is_empty());
    assert_eq!(filter.good_bins.chrom_indices(1).len(), 100);

    let mut samples = SampleRegistry::build(&cells, &filter.good_bins);
    samples.set_dispersion("sample", 0.5);

    let result = decode_cells(&bins, &cells, &config, filter, samples).unwrap();
    assert!(result.transitions.is_some());

    let labels = result.cells[0].labels.as_ref().unwrap();
    assert_eq!(&labels[..40], &vec![None; 40][..]);
    assert_eq!(&labels[40..], &labels_of(&ww_then_cc)[..]);
}

#[rstest]
#[case::fewer_bins(&[40], DataShapeError::FilterLength { expected: 40, found: 60 })]
#[case::other_chromosomes(&[30, 30], DataShapeError::BoundaryLength { expected: 3, found: 2 })]
fn test_filter_from_other_bins_is_rejected(#[case] decode_sizes: &[usize], #[case] expected: DataShapeError) {
    let filter_genome = genome(&[60]);
    let states: Vec<StrandState> = (0..60).map(|i| StrandState::ALL[(i / 20) % 3]).collect();
    let filter_cells = vec![cell_from_states(0, "sample", &states, steady_depth).with_median_bin_count(100.0)];
    let config = ClassifierConfig::default();

    let filter = filter_bins(&filter_genome, &filter_cells, &config).unwrap();
    assert_eq!(filter.good_bins.len(), 60);
    let mut samples = SampleRegistry::build(&filter_cells, &filter.good_bins);
    samples.set_dispersion("sample", 0.5);

    let bins = genome(decode_sizes);
    let n_bins = decode_sizes.iter().sum::<usize>();
    let cells = vec![
        cell_from_states(0, "sample", &states[..n_bins], steady_depth).with_median_bin_count(100.0),
    ];

    match decode_cells(&bins, &cells, &config, filter, samples) {
        Err(ClassifyError::Shape(e)) => assert_eq!(e, expected),
        other => panic!("unexpected result: {:?}", other),
    }
}
