use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use strandhmm_classify::ClassifierConfig;

/// How the genome is cut into bins.
#[derive(Debug, Clone, PartialEq)]
pub enum Binning {
    Fixed { window: u32, exclude: Option<PathBuf> },
    Bed(PathBuf),
}

///
/// Everything `classify` needs, checked before any file is opened for counting.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOptions {
    pub bams: Vec<PathBuf>,
    pub min_mapq: u8,
    pub binning: Binning,
    pub out: PathBuf,
    pub info: Option<PathBuf>,
    pub sample_info: Option<PathBuf>,
    pub removed_bins: Option<PathBuf>,
    pub config: ClassifierConfig,
    pub threads: Option<usize>,
    pub verbose: bool,
}

impl ClassifyOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let bams: Vec<PathBuf> = matches
            .get_many::<PathBuf>("bams")
            .map(|paths| paths.cloned().collect())
            .unwrap_or_default();
        if bams.is_empty() {
            bail!("At least one BAM file is required");
        }

        let min_mapq = matches.get_one::<u8>("mapq").copied().unwrap_or(10);

        let binning = match matches.get_one::<PathBuf>("bins") {
            Some(path) => Binning::Bed(path.clone()),
            None => {
                let window = matches.get_one::<u32>("window").copied().unwrap_or(1_000_000);
                if window == 0 {
                    bail!("--window must be positive");
                }
                Binning::Fixed {
                    window,
                    exclude: matches.get_one::<PathBuf>("exclude").cloned(),
                }
            }
        };

        let threads = matches.get_one::<usize>("threads").copied();
        if threads == Some(0) {
            bail!("--threads must be positive");
        }

        let config = match matches.get_one::<PathBuf>("config") {
            Some(path) => ClassifierConfig::try_from(path.as_path())
                .with_context(|| format!("Failed to load config: {:?}", path))?,
            None => ClassifierConfig::default(),
        };

        Ok(ClassifyOptions {
            bams,
            min_mapq,
            binning,
            out: matches
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(super::cli::DEFAULT_OUT)),
            info: matches.get_one::<PathBuf>("info").cloned(),
            sample_info: matches.get_one::<PathBuf>("sample-info").cloned(),
            removed_bins: matches.get_one::<PathBuf>("removed-bins").cloned(),
            config,
            threads,
            verbose: matches.get_flag("verbose"),
        })
    }

    /// Fail on the first input file that does not exist.
    pub fn check_inputs(&self) -> Result<()> {
        let mut inputs: Vec<&Path> = self.bams.iter().map(PathBuf::as_path).collect();
        match &self.binning {
            Binning::Bed(path) => inputs.push(path),
            Binning::Fixed {
                exclude: Some(path),
                ..
            } => inputs.push(path),
            Binning::Fixed { exclude: None, .. } => {}
        }

        for path in inputs {
            if !path.is_file() {
                bail!("Input file not found: {:?}", path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::classify::cli::create_classify_cli;

    fn parse(args: &[&str]) -> Result<ClassifyOptions> {
        let mut argv = vec!["classify"];
        argv.extend_from_slice(args);
        let matches = create_classify_cli().try_get_matches_from(argv)?;
        ClassifyOptions::from_matches(&matches)
    }

    #[rstest]
    fn test_defaults() {
        let options = parse(&["a.bam", "b.bam"]).unwrap();

        assert_eq!(options.bams, vec![PathBuf::from("a.bam"), PathBuf::from("b.bam")]);
        assert_eq!(options.min_mapq, 10);
        assert_eq!(
            options.binning,
            Binning::Fixed {
                window: 1_000_000,
                exclude: None
            }
        );
        assert_eq!(options.out, PathBuf::from("out.txt"));
        assert_eq!(options.info, None);
        assert_eq!(options.config, ClassifierConfig::default());
        assert!(!options.verbose);
    }

    #[rstest]
    fn test_all_options() {
        let options = parse(&[
            "-q", "20", "-w", "500000", "-x", "exclude.txt", "-o", "counts.txt.gz", "-i", "info.txt",
            "-S", "samples.txt", "-R", "removed.bed", "--threads", "4", "-v", "cell.bam",
        ])
        .unwrap();

        assert_eq!(options.min_mapq, 20);
        assert_eq!(
            options.binning,
            Binning::Fixed {
                window: 500_000,
                exclude: Some(PathBuf::from("exclude.txt"))
            }
        );
        assert_eq!(options.out, PathBuf::from("counts.txt.gz"));
        assert_eq!(options.sample_info, Some(PathBuf::from("samples.txt")));
        assert_eq!(options.removed_bins, Some(PathBuf::from("removed.bed")));
        assert_eq!(options.threads, Some(4));
        assert!(options.verbose);
    }

    #[rstest]
    fn test_bed_bins() {
        let options = parse(&["-b", "bins.bed", "cell.bam"]).unwrap();
        assert_eq!(options.binning, Binning::Bed(PathBuf::from("bins.bed")));
    }

    #[rstest]
    #[case(&["-b", "bins.bed", "-w", "1000", "cell.bam"])]
    #[case(&["-b", "bins.bed", "-x", "exclude.txt", "cell.bam"])]
    #[case(&["-w", "0", "cell.bam"])]
    #[case(&["--threads", "0", "cell.bam"])]
    #[case(&["-q", "300", "cell.bam"])]
    #[case(&[])]
    fn test_rejected(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[rstest]
    fn test_missing_inputs_are_reported() {
        let options = parse(&["missing/cell.bam"]).unwrap();
        assert!(options.check_inputs().is_err());
    }
}
