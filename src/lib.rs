//! Provision Noir circuit artifacts and run the prove/verify lifecycle.
//!
//! ```no_run
//! use proofkit::{open_session, DigestBackend};
//!
//! proofkit::init_tracing();
//! let session = open_session(DigestBackend)?;
//! let proof = session.generate(&["3", "4"])?;
//! assert!(session.verify(Some(&proof))?);
//! # Ok::<(), eyre::Report>(())
//! ```

pub use common::config::{ConfigError, MemoryMode, ProverConfig, TranscriptHashScheme};
pub use common::constants;
pub use proofkit_core::artifacts::{
    ArtifactDescriptor, ArtifactProvisioner, ArtifactState, ArtifactStore, Fetch, FetchError,
    Provisioned, CIRCUIT, SRS,
};
#[cfg(feature = "host")]
pub use proofkit_core::artifacts::HttpFetcher;
pub use proofkit_core::backend::{DigestBackend, Proof, ProvingBackend, VerificationKey};
pub use proofkit_core::session::{ProofSession, SessionPhase};
pub use proofkit_core::utils::errors::{
    BackendError, PreconditionError, ProvisionError, SessionError,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a compact stderr subscriber filtered by `RUST_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(log_filter);

    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}

/// Session over the default multiplier2 artifacts, configured from the environment
/// (`PROOFKIT_ARTIFACT_DIR`, `PROOFKIT_TRANSCRIPT`, `PROOFKIT_LOW_MEMORY`,
/// `PROOFKIT_DOWNLOAD_TIMEOUT_SECS`).
#[cfg(feature = "host")]
pub fn open_session<B: ProvingBackend>(backend: B) -> eyre::Result<ProofSession<B, HttpFetcher>> {
    let store = ArtifactStore::from_env()?;
    let timeout = common::config::download_timeout_from_env()?;
    let fetcher = HttpFetcher::with_timeout(timeout)?;
    let config = ProverConfig::from_env()?;
    tracing::info!(
        "Artifacts in {}, transcript {}, memory mode {}",
        store.base_dir().display(),
        config.transcript,
        config.memory_mode
    );
    Ok(ProofSession::new(ArtifactProvisioner::new(store, fetcher), backend, config))
}
