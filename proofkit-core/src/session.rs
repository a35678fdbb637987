use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use common::config::ProverConfig;
use tracing::{info, warn};

use crate::artifacts::{
    ArtifactDescriptor, ArtifactProvisioner, Fetch, Provisioned, CIRCUIT, SRS,
};
use crate::backend::{Proof, ProvingBackend, VerificationKey};
use crate::utils::errors::{PreconditionError, ProvisionError, SessionError};

/// Where a session sits in `Idle → KeyReady → ProofReady → Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    KeyReady,
    ProofReady,
    Verified,
}

#[derive(Debug, Default)]
struct ProofSessionState {
    circuit_inputs: Vec<String>,
    verification_key: Option<VerificationKey>,
    last_proof: Option<Proof>,
    last_verification: Option<bool>,
}

impl ProofSessionState {
    fn phase(&self) -> SessionPhase {
        match (&self.verification_key, &self.last_proof, self.last_verification) {
            (None, _, _) => SessionPhase::Idle,
            (Some(_), _, Some(_)) => SessionPhase::Verified,
            (Some(_), Some(_), None) => SessionPhase::ProofReady,
            (Some(_), None, None) => SessionPhase::KeyReady,
        }
    }
}

/// Drives key derivation, proving and verification for one circuit.
///
/// Every lifecycle call holds the session lock from start to finish, so calls
/// from different threads run one after another and the cached key is never
/// observed half-updated.
pub struct ProofSession<B, F> {
    provisioner: ArtifactProvisioner<F>,
    backend: B,
    circuit: ArtifactDescriptor,
    srs: ArtifactDescriptor,
    config: ProverConfig,
    state: Mutex<ProofSessionState>,
}

impl<B: ProvingBackend, F: Fetch> ProofSession<B, F> {
    pub fn new(provisioner: ArtifactProvisioner<F>, backend: B, config: ProverConfig) -> Self {
        Self {
            provisioner,
            backend,
            circuit: CIRCUIT,
            srs: SRS,
            config,
            state: Mutex::new(ProofSessionState::default()),
        }
    }

    pub fn with_artifacts(mut self, circuit: ArtifactDescriptor, srs: ArtifactDescriptor) -> Self {
        self.circuit = circuit;
        self.srs = srs;
        *self.state.get_mut().unwrap_or_else(PoisonError::into_inner) =
            ProofSessionState::default();
        self
    }

    // State is only ever replaced field by field with complete values, so a
    // panic in a backend cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, ProofSessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // A download of either artifact drops the cached key, even when a later
    // artifact then fails to provision.
    fn provision(
        &self,
        state: &mut ProofSessionState,
    ) -> Result<(PathBuf, PathBuf), ProvisionError> {
        for descriptor in [&self.circuit, &self.srs] {
            let provisioned = self.provisioner.ensure(descriptor);
            if let Ok(Provisioned::Downloaded { .. }) = provisioned {
                if state.verification_key.is_some() {
                    warn!(
                        "{} changed on disk, discarding cached verification key",
                        descriptor.name
                    );
                    *state = ProofSessionState::default();
                }
            }
            provisioned?;
        }
        let store = self.provisioner.store();
        Ok((store.path_of(&self.circuit), store.path_of(&self.srs)))
    }

    /// Proves `inputs`, deriving and caching the verification key on first use.
    ///
    /// A backend failure while deriving leaves the session idle; a failure
    /// while proving keeps the derived key for the next attempt.
    #[tracing::instrument(skip_all, name = "ProofSession::generate")]
    pub fn generate<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Proof, SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let (circuit, srs) = self.provision(state)?;

        let key: &VerificationKey = match state.verification_key {
            Some(ref key) => key,
            None => {
                info!("Generating verification key...");
                let key = self
                    .backend
                    .derive_verification_key(&circuit, &srs, &self.config)?;
                &*state.verification_key.insert(key)
            }
        };

        let inputs: Vec<String> = inputs.iter().map(|s| s.as_ref().to_owned()).collect();
        info!("Generating proof with verification key...");
        let proof = self
            .backend
            .generate_proof(&circuit, &srs, &self.config, &inputs, key)?;

        info!("Generated proof of {} bytes", proof.len());
        state.circuit_inputs = inputs;
        state.last_proof = Some(proof.clone());
        state.last_verification = None;
        Ok(proof)
    }

    /// Verifies `proof`, or the last generated proof when `None`.
    ///
    /// Never derives a key: verifying before any `generate` is a
    /// [`PreconditionError::MissingVerificationKey`].
    #[tracing::instrument(skip_all, name = "ProofSession::verify")]
    pub fn verify(&self, proof: Option<&Proof>) -> Result<bool, SessionError> {
        let mut state = self.lock();
        let (circuit, _) = self.provision(&mut state)?;

        let valid = {
            let key = state
                .verification_key
                .as_ref()
                .ok_or(PreconditionError::MissingVerificationKey)?;
            let proof = proof
                .or(state.last_proof.as_ref())
                .ok_or(PreconditionError::MissingProof)?;
            self.backend
                .verify_proof(&circuit, proof, key, &self.config)?
        };

        info!("Proof is valid: {valid}");
        state.last_verification = Some(valid);
        Ok(valid)
    }

    /// Drops the cached key, proof, inputs and result together.
    pub fn reset(&self) {
        *self.lock() = ProofSessionState::default();
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    pub fn has_verification_key(&self) -> bool {
        self.lock().verification_key.is_some()
    }

    pub fn verification_key(&self) -> Option<VerificationKey> {
        self.lock().verification_key.clone()
    }

    pub fn last_proof(&self) -> Option<Proof> {
        self.lock().last_proof.clone()
    }

    pub fn last_verification(&self) -> Option<bool> {
        self.lock().last_verification
    }

    pub fn circuit_inputs(&self) -> Vec<String> {
        self.lock().circuit_inputs.clone()
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn provisioner(&self) -> &ArtifactProvisioner<F> {
        &self.provisioner
    }
}
