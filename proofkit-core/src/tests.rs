//! End-to-end runs of the proof lifecycle against on-disk artifacts.

use std::fs;
use std::thread;

use common::config::ProverConfig;
use common::constants::ARTIFACT_DIR_ENV;
use serial_test::serial;

use crate::artifacts::{ArtifactProvisioner, ArtifactState, ArtifactStore};
use crate::backend::{DigestBackend, Proof};
use crate::session::{ProofSession, SessionPhase};
use crate::utils::test_utils::{
    descriptor, CountingBackend, StaticFetcher, MULTIPLIER2_CIRCUIT, SRS_BYTES,
};

fn fetcher_for_multiplier2() -> (StaticFetcher, [crate::artifacts::ArtifactDescriptor; 2]) {
    let circuit = descriptor("noir_multiplier2.json", 64);
    let srs = descriptor("noir_multiplier2.bin", 64);
    let fetcher = StaticFetcher::new()
        .serve(&circuit, MULTIPLIER2_CIRCUIT.as_bytes().to_vec())
        .serve(&srs, SRS_BYTES.to_vec());
    (fetcher, [circuit, srs])
}

#[test]
fn multiplier2_e2e() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, [circuit, srs]) = fetcher_for_multiplier2();
    let provisioner = ArtifactProvisioner::new(ArtifactStore::new(dir.path()), fetcher);
    let session = ProofSession::new(provisioner, DigestBackend, ProverConfig::on_chain())
        .with_artifacts(circuit, srs);

    let proof = session.generate(&["3", "4"]).unwrap();
    assert!(session.verify(Some(&proof)).unwrap());

    let mut bytes = proof.into_bytes();
    let last = bytes.len() - 1;
    bytes[last] = bytes[last].wrapping_add(1);
    assert!(!session.verify(Some(&Proof::from(bytes))).unwrap());

    // The session's own copy is untouched by the caller's mutation.
    assert!(session.verify(None).unwrap());
}

#[test]
fn corrupted_artifact_heals_between_calls() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, [circuit, srs]) = fetcher_for_multiplier2();
    let provisioner = ArtifactProvisioner::new(ArtifactStore::new(dir.path()), fetcher);
    let session = ProofSession::new(provisioner, DigestBackend, ProverConfig::native())
        .with_artifacts(circuit, srs);

    session.generate(&["3", "4"]).unwrap();

    let store = session.provisioner().store();
    fs::write(store.path_of(&srs), b"cut off").unwrap();
    assert_eq!(store.probe(&srs).unwrap(), ArtifactState::TooSmall { size: 7 });

    // Re-download drops the stale key, so verification needs a fresh proof.
    assert!(session.verify(None).is_err());
    assert_eq!(store.probe(&srs).unwrap(), ArtifactState::Valid { size: 128 });
    assert_eq!(session.phase(), SessionPhase::Idle);

    session.generate(&["3", "4"]).unwrap();
    assert!(session.verify(None).unwrap());
}

#[test]
fn concurrent_generate_never_tears_the_key_cache() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, [circuit, srs]) = fetcher_for_multiplier2();
    let provisioner = ArtifactProvisioner::new(ArtifactStore::new(dir.path()), fetcher);
    let session =
        ProofSession::new(provisioner, CountingBackend::default(), ProverConfig::on_chain())
            .with_artifacts(circuit, srs);

    thread::scope(|s| {
        for i in 0..8 {
            let session = &session;
            s.spawn(move || {
                let a = (i + 1).to_string();
                session.generate(&[a.as_str(), "4"]).unwrap();
                session.verify(None).unwrap();
            });
        }
    });

    assert_eq!(session.backend().derives(), 1);
    assert_eq!(session.backend().proves(), 8);
    assert_eq!(session.provisioner().fetcher().calls(), 2);
    assert_eq!(session.verification_key().map(|k| k.len()), Some(37));
    assert_eq!(session.last_verification(), Some(true));
}

#[test]
#[serial]
fn store_reads_base_dir_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("file://{}", dir.path().display());
    std::env::set_var(ARTIFACT_DIR_ENV, &uri);
    let store = ArtifactStore::from_env();
    std::env::remove_var(ARTIFACT_DIR_ENV);

    assert_eq!(store.unwrap().base_dir(), dir.path());
}
