use common::constants::{
    CIRCUIT_FILE_NAME, CIRCUIT_MIN_SIZE_BYTES, CIRCUIT_NAME, CIRCUIT_URL, SRS_FILE_NAME,
    SRS_MIN_SIZE_BYTES, SRS_URL,
};

pub mod fetch;
pub mod provisioner;
pub mod store;

pub use fetch::{Fetch, FetchError};
#[cfg(feature = "host")]
pub use fetch::HttpFetcher;
pub use provisioner::{ArtifactProvisioner, Provisioned};
pub use store::ArtifactStore;

/// A named artifact that must exist locally before the backend can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub name: &'static str,
    /// Flat file name under the store's base directory.
    pub file_name: &'static str,
    pub remote_url: &'static str,
    /// Conservative lower bound for detecting truncated files. Not a checksum.
    pub expected_min_size_bytes: u64,
}

pub const CIRCUIT: ArtifactDescriptor = ArtifactDescriptor {
    name: CIRCUIT_NAME,
    file_name: CIRCUIT_FILE_NAME,
    remote_url: CIRCUIT_URL,
    expected_min_size_bytes: CIRCUIT_MIN_SIZE_BYTES,
};

pub const SRS: ArtifactDescriptor = ArtifactDescriptor {
    name: "noir_multiplier2 srs",
    file_name: SRS_FILE_NAME,
    remote_url: SRS_URL,
    expected_min_size_bytes: SRS_MIN_SIZE_BYTES,
};

/// Local condition of an artifact, recomputed from file metadata on every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Missing,
    TooSmall { size: u64 },
    Valid { size: u64 },
}

impl ArtifactState {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
