use std::fs;
use std::path::PathBuf;

use crate::errors::SamplerError;
use crate::sampler::OutputRecord;
use crate::transport::fs::FsCorpus;

/// Destination side of a run. Consumes output records read-only; a failed
/// copy surfaces as an error and never feeds back into sampler state.
pub trait CopySink {
    /// Copy one selected item into the destination.
    fn copy(&self, record: &OutputRecord) -> Result<(), SamplerError>;
}

/// Copy sink that resolves items through their owning corpus and copies them
/// into a flat destination directory, keeping the original file name.
pub struct FsCopySink<'a> {
    corpora: &'a [FsCorpus],
    destination: PathBuf,
}

impl<'a> FsCopySink<'a> {
    /// Create a sink writing into `destination`, creating it if needed.
    pub fn new(
        corpora: &'a [FsCorpus],
        destination: impl Into<PathBuf>,
    ) -> Result<Self, SamplerError> {
        let destination = destination.into();
        fs::create_dir_all(&destination)?;
        Ok(Self {
            corpora,
            destination,
        })
    }

    fn resolve(&self, record: &OutputRecord) -> Result<PathBuf, SamplerError> {
        self.corpora
            .iter()
            .find(|corpus| corpus.owns_stratum(&record.stratum))
            .map(|corpus| corpus.item_path(&record.stratum, &record.item))
            .ok_or_else(|| SamplerError::CopySink {
                stratum: record.stratum.clone(),
                item: record.item.clone(),
                reason: "no corpus owns this stratum".into(),
            })
    }
}

impl CopySink for FsCopySink<'_> {
    fn copy(&self, record: &OutputRecord) -> Result<(), SamplerError> {
        let source = self.resolve(record)?;
        let target = self.destination.join(&record.item);
        fs::copy(&source, &target).map_err(|err| SamplerError::CopySink {
            stratum: record.stratum.clone(),
            item: record.item.clone(),
            reason: err.to_string(),
        })?;
        Ok(())
    }
}
