use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::artifacts::fetch::FetchError;
use crate::artifacts::ArtifactDescriptor;

/// An artifact could not be made available locally. The lifecycle step that
/// requested it aborts before touching the backend.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Failed to download {name} from {url}: {cause}")]
    DownloadFailed {
        name: &'static str,
        url: &'static str,
        #[source]
        cause: FetchError,
    },
    #[error("Failed to store {name} at {}: {source}", .path.display())]
    WriteFailed {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProvisionError {
    pub(crate) fn download_failed(descriptor: &ArtifactDescriptor, cause: FetchError) -> Self {
        Self::DownloadFailed {
            name: descriptor.name,
            url: descriptor.remote_url,
            cause,
        }
    }

    pub(crate) fn write_failed(
        descriptor: &ArtifactDescriptor,
        path: &Path,
        source: io::Error,
    ) -> Self {
        Self::WriteFailed {
            name: descriptor.name,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Opaque failure reported by a proving backend. Never retried by the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfig(String),
    #[error("Backend failure: {0}")]
    Internal(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("No verification key cached; generate a proof first")]
    MissingVerificationKey,
    #[error("No proof supplied and none generated yet")]
    MissingProof,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
