use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use common::config::ConfigError;
use common::path::{artifact_dir, normalize_uri};

use super::{ArtifactDescriptor, ArtifactState};

/// Flat directory of artifact files. Touches the filesystem only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Accepts platform URIs such as `file:///data/.../files/`.
    pub fn from_uri(uri: &str) -> Self {
        Self::new(normalize_uri(uri))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        artifact_dir().map(Self::new)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_of(&self, descriptor: &ArtifactDescriptor) -> PathBuf {
        self.base_dir.join(descriptor.file_name)
    }

    /// Absence is a normal state and maps to `Missing`. Other metadata
    /// failures, and anything at the path that is not a regular file, are errors.
    pub fn probe(&self, descriptor: &ArtifactDescriptor) -> io::Result<ArtifactState> {
        let path = self.path_of(descriptor);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ArtifactState::Missing),
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let size = metadata.len();
        if size < descriptor.expected_min_size_bytes {
            Ok(ArtifactState::TooSmall { size })
        } else {
            Ok(ArtifactState::Valid { size })
        }
    }

    /// Idempotent: removing an absent file succeeds.
    pub fn remove(&self, descriptor: &ArtifactDescriptor) -> io::Result<()> {
        match fs::remove_file(self.path_of(descriptor)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }

    pub fn ensure_base_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::descriptor;

    #[test]
    fn probe_reports_missing_small_and_valid() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let artifact = descriptor("circuit.json", 8);

        assert_eq!(store.probe(&artifact).unwrap(), ArtifactState::Missing);

        fs::write(store.path_of(&artifact), b"tiny").unwrap();
        assert_eq!(store.probe(&artifact).unwrap(), ArtifactState::TooSmall { size: 4 });

        fs::write(store.path_of(&artifact), b"exactly8").unwrap();
        assert_eq!(store.probe(&artifact).unwrap(), ArtifactState::Valid { size: 8 });
    }

    #[test]
    fn directory_in_place_of_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let artifact = descriptor("circuit.json", 1);
        fs::create_dir(store.path_of(&artifact)).unwrap();

        let err = store.probe(&artifact).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let artifact = descriptor("srs.bin", 1);

        fs::write(store.path_of(&artifact), b"data").unwrap();
        store.remove(&artifact).unwrap();
        assert_eq!(store.probe(&artifact).unwrap(), ArtifactState::Missing);

        store.remove(&artifact).unwrap();
        assert_eq!(store.probe(&artifact).unwrap(), ArtifactState::Missing);
    }

    #[test]
    fn paths_are_flat_under_base_dir() {
        let store = ArtifactStore::from_uri("file:///data/app/files");
        assert_eq!(store.base_dir(), Path::new("/data/app/files"));
        assert_eq!(
            store.path_of(&crate::artifacts::CIRCUIT),
            PathBuf::from("/data/app/files/noir_multiplier2.json")
        );
    }

    #[test]
    fn ensure_base_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("a").join("b"));
        store.ensure_base_dir().unwrap();
        assert!(store.base_dir().is_dir());
        store.ensure_base_dir().unwrap();
    }
}
