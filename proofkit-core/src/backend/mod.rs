//! Boundary to the proving system.
//!
//! The session treats a backend as three black-box capabilities over artifact
//! paths and byte buffers. Paths handed across this boundary are plain
//! filesystem paths; platform URI schemes are stripped by the artifact store.

use std::path::Path;

use common::config::ProverConfig;

use crate::utils::errors::BackendError;

pub mod digest;

pub use digest::DigestBackend;

/// Key material derived from a circuit and its setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey(Vec<u8>);

impl VerificationKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for VerificationKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Opaque proof bytes. Immutable once produced; tampering means building a new `Proof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof(Vec<u8>);

impl Proof {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Size: N bytes` followed by the first `limit` bytes as spaced hex.
    pub fn hex_preview(&self, limit: usize) -> String {
        if self.0.is_empty() {
            return "No proof generated".to_string();
        }
        let shown = &self.0[..limit.min(self.0.len())];
        let hex = shown
            .iter()
            .map(|byte| hex::encode([*byte]))
            .collect::<Vec<_>>()
            .join(" ");
        let ellipsis = if self.0.len() > limit { "..." } else { "" };
        format!("Size: {} bytes\n{hex}{ellipsis}", self.0.len())
    }
}

impl From<Vec<u8>> for Proof {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Proof {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

pub trait ProvingBackend {
    /// Fails on a malformed circuit or an unsupported configuration.
    fn derive_verification_key(
        &self,
        circuit: &Path,
        srs: &Path,
        config: &ProverConfig,
    ) -> Result<VerificationKey, BackendError>;

    /// Fails if `inputs` are malformed or do not match the circuit's arity.
    fn generate_proof(
        &self,
        circuit: &Path,
        srs: &Path,
        config: &ProverConfig,
        inputs: &[String],
        key: &VerificationKey,
    ) -> Result<Proof, BackendError>;

    /// `Ok(false)` for a well-formed proof that does not verify. Errors are
    /// reserved for buffers the backend cannot parse.
    fn verify_proof(
        &self,
        circuit: &Path,
        proof: &Proof,
        key: &VerificationKey,
        config: &ProverConfig,
    ) -> Result<bool, BackendError>;
}
