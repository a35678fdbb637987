use std::path::Path;

use tracing::{info, warn};

use super::fetch::{Fetch, FetchError};
use super::store::ArtifactStore;
use super::{ArtifactDescriptor, ArtifactState};
use crate::utils::errors::ProvisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    AlreadyValid,
    Downloaded { bytes: u64 },
}

impl Provisioned {
    pub fn was_downloaded(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }
}

/// Keeps artifacts present and plausibly intact, fetching them on demand.
pub struct ArtifactProvisioner<F> {
    store: ArtifactStore,
    fetcher: F,
}

impl<F: Fetch> ArtifactProvisioner<F> {
    pub fn new(store: ArtifactStore, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Makes `descriptor` valid on disk. Missing or undersized files trigger
    /// exactly one download attempt; an undersized file is deleted first.
    #[tracing::instrument(
        skip_all,
        name = "ArtifactProvisioner::ensure",
        fields(artifact = descriptor.name)
    )]
    pub fn ensure(&self, descriptor: &ArtifactDescriptor) -> Result<Provisioned, ProvisionError> {
        let path = self.store.path_of(descriptor);
        let state = self
            .store
            .probe(descriptor)
            .map_err(|e| ProvisionError::write_failed(descriptor, &path, e))?;

        match state {
            ArtifactState::Valid { size } => {
                info!(
                    "{} already exists and is valid size ({size} bytes): {}",
                    descriptor.name,
                    path.display()
                );
                return Ok(Provisioned::AlreadyValid);
            }
            ArtifactState::TooSmall { size } => {
                warn!(
                    "Existing {} size ({size}) is less than expected ({}), deleting and re-downloading...",
                    descriptor.name, descriptor.expected_min_size_bytes
                );
                self.store
                    .remove(descriptor)
                    .map_err(|e| ProvisionError::write_failed(descriptor, &path, e))?;
            }
            ArtifactState::Missing => {
                info!("{} not found, downloading...", descriptor.name);
            }
        }

        let bytes = self.download(descriptor, &path)?;
        info!("{} downloaded to: {} ({bytes} bytes)", descriptor.name, path.display());
        Ok(Provisioned::Downloaded { bytes })
    }

    /// Ensures each descriptor in order, stopping at the first failure.
    /// Returns whether any artifact had to be downloaded.
    pub fn ensure_all(&self, descriptors: &[ArtifactDescriptor]) -> Result<bool, ProvisionError> {
        let mut downloaded = false;
        for descriptor in descriptors {
            downloaded |= self.ensure(descriptor)?.was_downloaded();
        }
        Ok(downloaded)
    }

    // The body lands in a temp file beside `path` and is renamed into place only
    // once complete, so a concurrent probe never sees a partial file.
    fn download(
        &self,
        descriptor: &ArtifactDescriptor,
        path: &Path,
    ) -> Result<u64, ProvisionError> {
        let write_failed = |e| ProvisionError::write_failed(descriptor, path, e);

        self.store.ensure_base_dir().map_err(write_failed)?;
        let mut staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", descriptor.file_name))
            .suffix(".part")
            .tempfile_in(self.store.base_dir())
            .map_err(write_failed)?;

        let received = match self.fetcher.fetch(descriptor.remote_url, staging.as_file_mut()) {
            Ok(received) => received,
            Err(FetchError::Sink(e)) => return Err(write_failed(e)),
            Err(cause) => return Err(ProvisionError::download_failed(descriptor, cause)),
        };
        if received < descriptor.expected_min_size_bytes {
            return Err(ProvisionError::download_failed(
                descriptor,
                FetchError::Truncated {
                    expected: descriptor.expected_min_size_bytes,
                    received,
                },
            ));
        }

        staging.as_file().sync_all().map_err(write_failed)?;
        staging.persist(path).map_err(|e| write_failed(e.error))?;
        Ok(received)
    }
}
