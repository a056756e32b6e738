use std::io::BufRead;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use strandhmm_classify::{ClassifierConfig, Classification, classify};
use strandhmm_core::utils::get_dynamic_reader;
use strandhmm_core::{Bin, CellCounts, GenomeBins, ReadStats, StrandCount};
use strandhmm_io::*;

struct Run {
    bins: GenomeBins,
    cells: Vec<CellCounts>,
    classification: Classification,
}

#[fixture]
fn run() -> Run {
    let bins = GenomeBins::new(
        vec!["chr1".to_string(), "chr2".to_string()],
        vec![
            Bin::new(0, 0, 100),
            Bin::new(0, 100, 200),
            Bin::new(0, 200, 300),
            Bin::new(0, 300, 400),
            Bin::new(1, 0, 100),
            Bin::new(1, 100, 200),
        ],
    )
    .unwrap();

    let counts: Vec<StrandCount> = [(0, 40), (0, 80), (0, 0), (0, 60), (50, 0), (100, 0)]
        .iter()
        .map(|&(c, w)| StrandCount::new(c, w))
        .collect();
    let stats = ReadStats {
        n_mapped: 500,
        n_supplementary: 10,
        n_pcr_dups: 60,
        n_low_mapq: 40,
        n_read2s: 60,
        n_counted: 330,
    };
    let cells = vec![
        CellCounts::new(0, "cell_b", "s2", counts.clone()).with_read_stats(stats),
        CellCounts::new(1, "cell_a", "s1", counts).with_read_stats(stats),
    ];

    // five good bins only, so keep the state change probability below 0.5
    let config = ClassifierConfig {
        expected_events: 1.0,
        ..ClassifierConfig::default()
    };
    let classification = classify(&bins, &cells, &config).unwrap();
    Run {
        bins,
        cells,
        classification,
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    get_dynamic_reader(path)
        .unwrap()
        .lines()
        .map(|l| l.unwrap())
        .collect()
}

#[rstest]
fn test_count_table(run: Run) {
    let mut out = Vec::new();
    write_count_table(&mut out, &run.bins, &run.cells, &run.classification).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], COUNT_TABLE_HEADER);
    assert_eq!(lines.len(), 1 + 6 * 2);

    // bin then cell
    assert!(lines[1].starts_with("chr1\t0\t100\ts2\tcell_b\t0\t40\t"));
    assert!(lines[2].starts_with("chr1\t0\t100\ts1\tcell_a\t0\t40\t"));
    assert_eq!(lines[5], "chr1\t200\t300\ts2\tcell_b\t0\t0\tNone");
    assert!(lines[12].starts_with("chr2\t100\t200\ts1\tcell_a\t100\t0\t"));

    for line in lines.iter().skip(1) {
        let class = line.rsplit('\t').next().unwrap();
        assert!(["CC", "WC", "WW", EXCLUDED_LABEL].contains(&class));
    }
}

#[rstest]
fn test_count_table_gz_matches_plain(run: Run) {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("out.txt");
    let gz = dir.path().join("nested/out.txt.gz");

    save_count_table(&plain, &run.bins, &run.cells, &run.classification).unwrap();
    save_count_table(&gz, &run.bins, &run.cells, &run.classification).unwrap();

    assert_eq!(read_lines(&plain), read_lines(&gz));
}

#[rstest]
fn test_cell_summary(run: Run) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("info.txt");
    save_cell_summary(&path, &run.cells).unwrap();

    let lines = read_lines(&path);
    let body: Vec<&String> = lines.iter().filter(|l| !l.starts_with('#')).collect();

    assert_eq!(lines.iter().filter(|l| l.starts_with('#')).count(), 7);
    assert_eq!(body[0], "sample\tcell\tmedbin\tmapped\tsuppl\tdupl\tmapq\tread2\tgood");
    assert_eq!(body[1], "s1\tcell_a\t55\t500\t10\t60\t40\t60\t330");
    assert_eq!(body[2], "s2\tcell_b\t55\t500\t10\t60\t40\t60\t330");
}

#[rstest]
fn test_sample_summary(run: Run) {
    let mut out = Vec::new();
    write_sample_summary(&mut out, &run.classification.samples).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "sample\tcells\tp\tmeans\tvars");
    assert_eq!(lines.len(), 3);

    let fields: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(fields[0], "s1");
    assert_eq!(fields[1], "1");
    let p: f64 = fields[2].parse().unwrap();
    let mean: f64 = fields[3].parse().unwrap();
    let var: f64 = fields[4].parse().unwrap();
    assert!((mean - 66.0).abs() < 1e-9);
    assert!((var - 464.0).abs() < 1e-9);
    assert!((p - mean / var).abs() < 1e-12);
    assert!(lines[2].starts_with("s2\t1\t"));
}

#[rstest]
fn test_removed_bins(run: Run) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("removed.bed");
    save_removed_bins(&path, &run.bins, &run.classification.filter).unwrap();

    assert_eq!(read_lines(&path), vec!["chr1\t200\t300\tl"]);
}
