use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use common::config::ProverConfig;

use crate::artifacts::{ArtifactDescriptor, Fetch, FetchError};
use crate::backend::digest::DigestBackend;
use crate::backend::{Proof, ProvingBackend, VerificationKey};
use crate::utils::errors::BackendError;

/// Compiled `fn main(a: Field, b: pub Field)` circuit, trimmed to the fields the
/// digest backend reads. Padded so it clears size thresholds used in tests.
pub const MULTIPLIER2_CIRCUIT: &str = r#"{
  "noir_version": "1.0.0-beta.3",
  "hash": 6093958467281963000,
  "abi": {
    "parameters": [
      { "name": "a", "type": { "kind": "field" }, "visibility": "private" },
      { "name": "b", "type": { "kind": "field" }, "visibility": "public" }
    ],
    "return_type": { "abi_type": { "kind": "field" }, "visibility": "public" },
    "error_types": {}
  },
  "bytecode": "H4sIAAAAAAAA/62QQQqAMAwE1/q8z3Jz2+yR4YjvRzd4Pb8VpcX1h4M7JFoUxAJPKCEYYqH21p6DX3ld8h6f7"
}"#;

pub const SRS_BYTES: &[u8] = &[0x5a; 128];

pub fn descriptor(file_name: &'static str, min_size: u64) -> ArtifactDescriptor {
    let url = format!("https://artifacts.test/{file_name}");
    let url: &'static str = Box::leak(url.into_boxed_str());
    ArtifactDescriptor {
        name: file_name,
        file_name,
        remote_url: url,
        expected_min_size_bytes: min_size,
    }
}

/// Serves fixed bodies by URL and counts every request. Unknown URLs get a 404.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, descriptor: &ArtifactDescriptor, body: Vec<u8>) -> Self {
        self.set_body(descriptor, body);
        self
    }

    pub fn set_body(&self, descriptor: &ArtifactDescriptor, body: Vec<u8>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(descriptor.remote_url.to_string(), body);
    }

    /// Stops serving `descriptor`, so later fetches of it get a 404.
    pub fn withdraw(&self, descriptor: &ArtifactDescriptor) {
        self.bodies.lock().unwrap().remove(descriptor.remote_url);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))?;
        sink.write_all(&body).map_err(FetchError::Sink)?;
        Ok(body.len() as u64)
    }
}

/// Wraps the digest backend and counts calls per capability.
#[derive(Default)]
pub struct CountingBackend {
    inner: DigestBackend,
    pub derive_calls: AtomicUsize,
    pub prove_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub fail_proving: AtomicBool,
    pub panic_proving: AtomicBool,
}

impl CountingBackend {
    pub fn derives(&self) -> usize {
        self.derive_calls.load(Ordering::SeqCst)
    }

    pub fn proves(&self) -> usize {
        self.prove_calls.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl ProvingBackend for CountingBackend {
    fn derive_verification_key(
        &self,
        circuit: &Path,
        srs: &Path,
        config: &ProverConfig,
    ) -> Result<VerificationKey, BackendError> {
        self.derive_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.derive_verification_key(circuit, srs, config)
    }

    fn generate_proof(
        &self,
        circuit: &Path,
        srs: &Path,
        config: &ProverConfig,
        inputs: &[String],
        key: &VerificationKey,
    ) -> Result<Proof, BackendError> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_proving.load(Ordering::SeqCst) {
            panic!("prover aborted");
        }
        if self.fail_proving.load(Ordering::SeqCst) {
            return Err(BackendError::Internal("prover crashed".to_string()));
        }
        self.inner.generate_proof(circuit, srs, config, inputs, key)
    }

    fn verify_proof(
        &self,
        circuit: &Path,
        proof: &Proof,
        key: &VerificationKey,
        config: &ProverConfig,
    ) -> Result<bool, BackendError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_proof(circuit, proof, key, config)
    }
}
