pub const CIRCUIT_NAME: &str = "noir_multiplier2";

// Local files:  <artifact dir>/<CIRCUIT_FILE_NAME>, <artifact dir>/<SRS_FILE_NAME>
pub const CIRCUIT_FILE_NAME: &str = "noir_multiplier2.json";
pub const SRS_FILE_NAME: &str = "noir_multiplier2.bin";

pub const CIRCUIT_URL: &str = "https://raw.githubusercontent.com/zkmopro/mopro/54a930d90295ddf14f77983340a5a15cf6af63f6/cli/src/template/init/test-vectors/noir/noir_multiplier2.json";
pub const SRS_URL: &str = "https://github.com/zkmopro/mopro/raw/54a930d90295ddf14f77983340a5a15cf6af63f6/cli/src/template/init/test-vectors/noir/noir_multiplier2.srs";

/// Lower bounds used to reject truncated downloads. Not checksums.
pub const CIRCUIT_MIN_SIZE_BYTES: u64 = 1024;
pub const SRS_MIN_SIZE_BYTES: u64 = 1024;

pub const ARTIFACT_DIR_NAME: &str = ".proofkit";

pub const ARTIFACT_DIR_ENV: &str = "PROOFKIT_ARTIFACT_DIR";
pub const TRANSCRIPT_ENV: &str = "PROOFKIT_TRANSCRIPT";
pub const LOW_MEMORY_ENV: &str = "PROOFKIT_LOW_MEMORY";
pub const DOWNLOAD_TIMEOUT_ENV: &str = "PROOFKIT_DOWNLOAD_TIMEOUT_SECS";

pub const FILE_URI_SCHEME: &str = "file://";

/// Width of one encoded field element in proofs and public inputs.
pub const FIELD_ELEMENT_BYTES: usize = 32;
pub const PROOF_PREVIEW_BYTES: usize = 100;
