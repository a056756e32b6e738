//! Construction of bin sets from a reference.
//!
//! Two strategies are supported: fixed width windows tiled along every chromosome
//! (optionally skipping excluded regions), and variable width bins read from a BED
//! file. Both produce a [`GenomeBins`] whose chromosome indices follow the order of
//! the reference.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use log::warn;

use crate::errors::BinningError;
use crate::models::{Bin, GenomeBins};
use crate::utils::get_dynamic_reader;

/// A region that must not be covered by fixed width bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedRegion {
    pub chrom: usize,
    /// `None` excludes the whole chromosome.
    pub interval: Option<(u32, u32)>,
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("track")
        || trimmed.starts_with("browser")
}

fn parse_coordinate(field: Option<&str>, file: &str, line: usize, what: &str) -> Result<u32, BinningError> {
    field
        .ok_or_else(|| BinningError::ParseError {
            file: file.to_string(),
            line,
            reason: format!("missing {} column", what),
        })?
        .parse::<u32>()
        .map_err(|e| BinningError::ParseError {
            file: file.to_string(),
            line,
            reason: format!("invalid {}: {}", what, e),
        })
}

///
/// Read an exclude file.
///
/// Each line is either `chrom` (exclude the whole chromosome) or
/// `chrom start end`. Blank lines and `#` comments are skipped; chromosomes the
/// reference does not know are ignored with a warning.
///
/// # Arguments
/// - path: path to the exclude file (may be gzipped)
/// - chrom_names: reference chromosome names in reference order
///
pub fn read_exclude_file<P: AsRef<Path>>(
    path: P,
    chrom_names: &[String],
) -> Result<Vec<ExcludedRegion>, BinningError> {
    let path = path.as_ref();
    let file = path.display().to_string();
    let reader = get_dynamic_reader(path)?;

    let mut excluded = Vec::new();
    let mut unknown: HashSet<String> = HashSet::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        let mut fields = line.split_whitespace();
        let chrom_name = match fields.next() {
            Some(name) => name,
            None => continue,
        };

        let Some(chrom) = chrom_names.iter().position(|c| c == chrom_name) else {
            if unknown.insert(chrom_name.to_string()) {
                warn!("Exclude file names unknown chromosome {}, ignoring it", chrom_name);
            }
            continue;
        };

        let interval = match fields.next() {
            None => None,
            Some(start) => {
                let start = parse_coordinate(Some(start), &file, line_no + 1, "start")?;
                let end = parse_coordinate(fields.next(), &file, line_no + 1, "end")?;
                if start >= end {
                    return Err(BinningError::ParseError {
                        file,
                        line: line_no + 1,
                        reason: format!("start {} is not before end {}", start, end),
                    });
                }
                Some((start, end))
            }
        };

        excluded.push(ExcludedRegion { chrom, interval });
    }

    Ok(excluded)
}

///
/// Tile every chromosome with windows of a fixed width.
///
/// Only windows that fit entirely into the chromosome are created. Windows that
/// overlap an excluded interval are skipped, wholly excluded chromosomes get no bins.
///
/// # Arguments
/// - reference: (name, length) of each chromosome in reference order
/// - window: window width in bp
/// - exclude: regions to leave out
///
pub fn fixed_width_bins(
    reference: &[(String, u32)],
    window: u32,
    exclude: &[ExcludedRegion],
) -> Result<GenomeBins, BinningError> {
    if window == 0 {
        return Err(BinningError::InvalidWindow);
    }

    let mut bins = Vec::new();
    for (chrom, (_, length)) in reference.iter().enumerate() {
        let chrom_excluded: Vec<&ExcludedRegion> =
            exclude.iter().filter(|e| e.chrom == chrom).collect();
        if chrom_excluded.iter().any(|e| e.interval.is_none()) {
            continue;
        }

        let mut start = 0u64;
        while start + window as u64 <= *length as u64 {
            let bin = Bin::new(chrom, start as u32, (start + window as u64) as u32);
            let hits_exclusion = chrom_excluded
                .iter()
                .filter_map(|e| e.interval)
                .any(|(s, e)| bin.overlap(s, e));
            if !hits_exclusion {
                bins.push(bin);
            }
            start += window as u64;
        }
    }

    if bins.is_empty() {
        return Err(BinningError::EmptyBinSet);
    }

    let names = reference.iter().map(|(name, _)| name.clone()).collect();
    Ok(GenomeBins::new(names, bins)?)
}

///
/// Read variable width bins from a BED file.
///
/// Columns beyond the third are ignored. Bins on chromosomes missing from the
/// reference are skipped with a warning. The result is sorted by (chromosome, start);
/// overlapping bins are rejected.
///
/// # Arguments
/// - path: path to the BED file (may be gzipped)
/// - reference: (name, length) of each chromosome in reference order
///
pub fn read_bed_bins<P: AsRef<Path>>(
    path: P,
    reference: &[(String, u32)],
) -> Result<GenomeBins, BinningError> {
    let path = path.as_ref();
    let file = path.display().to_string();
    let reader = get_dynamic_reader(path)?;

    let mut bins = Vec::new();
    let mut unknown: HashSet<String> = HashSet::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        let mut fields = line.split_whitespace();
        let chrom_name = fields.next().unwrap_or_default();

        let start = parse_coordinate(fields.next(), &file, line_no + 1, "start")?;
        let end = parse_coordinate(fields.next(), &file, line_no + 1, "end")?;
        if start >= end {
            return Err(BinningError::ParseError {
                file,
                line: line_no + 1,
                reason: format!("start {} is not before end {}", start, end),
            });
        }

        match reference.iter().position(|(name, _)| name == chrom_name) {
            Some(chrom) => bins.push(Bin::new(chrom, start, end)),
            None => {
                if unknown.insert(chrom_name.to_string()) {
                    warn!("Bin file names unknown chromosome {}, skipping its bins", chrom_name);
                }
            }
        }
    }

    if bins.is_empty() {
        return Err(BinningError::EmptyBinSet);
    }

    bins.sort();
    let names = reference.iter().map(|(name, _)| name.clone()).collect();
    Ok(GenomeBins::new(names, bins)?)
}
