use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{info, warn};

use strandhmm_classify::classify;
use strandhmm_core::GenomeBins;
use strandhmm_core::binning::{fixed_width_bins, read_bed_bins, read_exclude_file};
use strandhmm_count::{BamHeaderInfo, count_cells};
use strandhmm_io::{save_cell_summary, save_count_table, save_removed_bins, save_sample_summary};

use super::options::{Binning, ClassifyOptions};
use crate::utils::{init_logger, init_rayon_threads};

fn build_bins(options: &ClassifyOptions, reference: &[(String, u32)]) -> Result<GenomeBins> {
    let bins = match &options.binning {
        Binning::Fixed { window, exclude } => {
            let chrom_names: Vec<String> = reference.iter().map(|(name, _)| name.clone()).collect();
            let excluded = match exclude {
                Some(path) => read_exclude_file(path, &chrom_names)
                    .with_context(|| format!("Failed to read exclude file: {:?}", path))?,
                None => Vec::new(),
            };
            info!("Excluding {} chromosomes or regions", excluded.len());
            fixed_width_bins(reference, *window, &excluded).context("Failed to create bins")?
        }
        Binning::Bed(path) => read_bed_bins(path, reference)
            .with_context(|| format!("Failed to read bins from {:?}", path))?,
    };

    info!(
        "Using {} bins on {} chromosomes, median width {} bp",
        bins.len(),
        bins.n_chroms(),
        bins.median_bin_width().unwrap_or(0.0)
    );
    Ok(bins)
}

pub fn run_classify(matches: &ArgMatches) -> Result<()> {
    init_logger(matches.get_flag("verbose"))?;

    let options = ClassifyOptions::from_matches(matches)?;
    options.check_inputs()?;
    init_rayon_threads(options.threads)?;

    // all libraries are expected to share the reference of the first one
    let first = &options.bams[0];
    let header = BamHeaderInfo::from_path(first)
        .with_context(|| format!("Failed to read reference from {:?}", first))?;
    let bins = build_bins(&options, &header.reference)?;

    let cells = count_cells(&options.bams, &bins, options.min_mapq, true)?;
    if cells.is_empty() {
        bail!("None of the {} BAM files could be counted", options.bams.len());
    }

    if let Some(path) = &options.info {
        save_cell_summary(path, &cells)?;
        info!("Wrote cell summary to {:?}", path);
    }

    let classification = classify(&bins, &cells, &options.config)?;

    if let Some(path) = &options.removed_bins {
        save_removed_bins(path, &bins, &classification.filter)?;
        info!("Wrote {} removed bins to {:?}", classification.filter.n_excluded(), path);
    }
    if let Some(path) = &options.sample_info {
        save_sample_summary(path, &classification.samples)?;
        info!("Wrote sample summary to {:?}", path);
    }

    save_count_table(&options.out, &bins, &cells, &classification)?;
    info!("Wrote labeled counts to {:?}", options.out);

    let n_failed = classification.n_failed();
    if n_failed > 0 {
        warn!("{} of {} cells could not be classified", n_failed, cells.len());
    }

    Ok(())
}
