use std::collections::BTreeSet;
use std::path::Path;

use noodles::bam;
use noodles::sam;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;
use strandhmm_core::GenomeBins;

use crate::errors::CountError;

///
/// What the classifier needs from a BAM header: the sample the library belongs to
/// and the reference sequences reads are aligned against.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BamHeaderInfo {
    pub sample_name: String,
    /// (name, length) in header order
    pub reference: Vec<(String, u32)>,
}

impl BamHeaderInfo {
    ///
    /// Extract the sample name and reference sequences from a parsed header.
    ///
    /// All read groups must agree on a single `SM` value.
    ///
    pub fn from_header(header: &sam::Header, path: &Path) -> Result<Self, CountError> {
        let samples: BTreeSet<String> = header
            .read_groups()
            .values()
            .filter_map(|rg| rg.other_fields().get(&rg_tag::SAMPLE))
            .map(|sm| sm.to_string())
            .collect();

        let sample_name = match samples.len() {
            0 => {
                return Err(CountError::MissingSample {
                    path: path.to_path_buf(),
                });
            }
            1 => samples.into_iter().next().unwrap_or_default(),
            _ => {
                return Err(CountError::AmbiguousSample {
                    path: path.to_path_buf(),
                    samples: samples.into_iter().collect(),
                });
            }
        };

        let reference = header
            .reference_sequences()
            .iter()
            .map(|(name, rs)| {
                let length = u32::try_from(rs.length().get()).unwrap_or(u32::MAX);
                (name.to_string(), length)
            })
            .collect();

        Ok(BamHeaderInfo {
            sample_name,
            reference,
        })
    }

    /// Read only the header of a BAM file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CountError> {
        let path = path.as_ref();
        let io_err = |source| CountError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(path)
            .map_err(io_err)?;
        let header = reader.read_header().map_err(io_err)?;
        Self::from_header(&header, path)
    }

    ///
    /// Map every reference sequence onto the chromosome index of the bin set.
    /// Sequences the bins do not know map to `None`.
    ///
    pub fn chrom_map(&self, bins: &GenomeBins) -> Vec<Option<usize>> {
        self.reference
            .iter()
            .map(|(name, _)| bins.chrom_index(name))
            .collect()
    }
}
