//! Deterministic hash-commitment backend.
//!
//! Binds inputs to the verification key with a transcript hash so tampering is
//! detected. It provides integrity only, not zero knowledge, and exists so the
//! lifecycle can run end to end without a native prover.
//!
//! Key layout:   scheme tag (1) || arity (4, big-endian) || H(domain, circuit, srs)
//! Proof layout: H(domain, key, words) || one 32-byte big-endian word per input

use std::fs;
use std::path::Path;

use common::config::{ProverConfig, TranscriptHashScheme};
use common::constants::FIELD_ELEMENT_BYTES;
use serde::Deserialize;
use sha3::{Digest, Keccak256, Sha3_256};

use super::{Proof, ProvingBackend, VerificationKey};
use crate::utils::errors::BackendError;

const KEY_DOMAIN: &[u8] = b"proofkit/digest/vk/v1";
const PROOF_DOMAIN: &[u8] = b"proofkit/digest/proof/v1";
const KEY_LEN: usize = 1 + 4 + 32;

#[derive(Deserialize)]
struct CompiledCircuit {
    abi: Abi,
}

#[derive(Deserialize)]
struct Abi {
    parameters: Vec<AbiParameter>,
}

#[derive(Deserialize)]
struct AbiParameter {
    #[allow(dead_code)]
    name: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DigestBackend;

fn scheme_tag(scheme: TranscriptHashScheme) -> u8 {
    match scheme {
        TranscriptHashScheme::Keccak => 0,
        TranscriptHashScheme::Poseidon => 1,
    }
}

/// Keccak-256 for the on-chain scheme; SHA3-256 stands in for Poseidon.
fn transcript_hash(scheme: TranscriptHashScheme, parts: &[&[u8]]) -> [u8; 32] {
    fn absorb<D: Digest>(mut hasher: D, parts: &[&[u8]]) -> [u8; 32] {
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    match scheme {
        TranscriptHashScheme::Keccak => absorb(Keccak256::new(), parts),
        TranscriptHashScheme::Poseidon => absorb(Sha3_256::new(), parts),
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, BackendError> {
    fs::read(path)
        .map_err(|e| BackendError::Internal(format!("cannot read {}: {e}", path.display())))
}

fn circuit_arity(circuit: &[u8]) -> Result<usize, BackendError> {
    let compiled: CompiledCircuit = serde_json::from_slice(circuit).map_err(|e| {
        BackendError::MalformedInput(format!("circuit is not a compiled program: {e}"))
    })?;
    Ok(compiled.abi.parameters.len())
}

/// Accepts decimal or `0x`-prefixed hex.
fn encode_input(input: &str) -> Result<[u8; FIELD_ELEMENT_BYTES], BackendError> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex_digits) => u128::from_str_radix(hex_digits, 16),
        None => trimmed.parse::<u128>(),
    };
    let value = parsed
        .map_err(|_| BackendError::MalformedInput(format!("{input:?} is not a field element")))?;

    let mut word = [0u8; FIELD_ELEMENT_BYTES];
    word[FIELD_ELEMENT_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
    Ok(word)
}

struct KeyHeader {
    arity: usize,
}

fn parse_key(key: &VerificationKey, config: &ProverConfig) -> Result<KeyHeader, BackendError> {
    let bytes = key.as_bytes();
    if bytes.len() != KEY_LEN {
        return Err(BackendError::MalformedInput(format!(
            "verification key is {} bytes, expected {KEY_LEN}",
            bytes.len()
        )));
    }
    if bytes[0] != scheme_tag(config.transcript) {
        return Err(BackendError::MalformedInput(format!(
            "verification key was not derived for the {} transcript",
            config.transcript
        )));
    }
    let arity = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
    Ok(KeyHeader { arity })
}

fn proof_tag(scheme: TranscriptHashScheme, key: &VerificationKey, words: &[u8]) -> [u8; 32] {
    transcript_hash(scheme, &[PROOF_DOMAIN, key.as_bytes(), words])
}

impl ProvingBackend for DigestBackend {
    fn derive_verification_key(
        &self,
        circuit: &Path,
        srs: &Path,
        config: &ProverConfig,
    ) -> Result<VerificationKey, BackendError> {
        let circuit_bytes = read_artifact(circuit)?;
        let arity = circuit_arity(&circuit_bytes)?;
        let arity = u32::try_from(arity).map_err(|_| {
            BackendError::UnsupportedConfig(format!("circuit has {arity} parameters"))
        })?;
        let srs_bytes = read_artifact(srs)?;

        let digest = transcript_hash(
            config.transcript,
            &[KEY_DOMAIN, circuit_bytes.as_slice(), srs_bytes.as_slice()],
        );
        let mut key = Vec::with_capacity(KEY_LEN);
        key.push(scheme_tag(config.transcript));
        key.extend_from_slice(&arity.to_be_bytes());
        key.extend_from_slice(&digest);
        Ok(VerificationKey::from(key))
    }

    fn generate_proof(
        &self,
        circuit: &Path,
        _srs: &Path,
        config: &ProverConfig,
        inputs: &[String],
        key: &VerificationKey,
    ) -> Result<Proof, BackendError> {
        let header = parse_key(key, config)?;
        let arity = circuit_arity(&read_artifact(circuit)?)?;
        if arity != header.arity {
            return Err(BackendError::MalformedInput(
                "verification key belongs to a different circuit".to_string(),
            ));
        }
        if inputs.len() != arity {
            return Err(BackendError::MalformedInput(format!(
                "circuit expects {arity} inputs, got {}",
                inputs.len()
            )));
        }

        let mut words = Vec::with_capacity(arity * FIELD_ELEMENT_BYTES);
        for input in inputs {
            words.extend_from_slice(&encode_input(input)?);
        }

        let mut proof = proof_tag(config.transcript, key, &words).to_vec();
        proof.extend_from_slice(&words);
        Ok(Proof::from(proof))
    }

    fn verify_proof(
        &self,
        circuit: &Path,
        proof: &Proof,
        key: &VerificationKey,
        config: &ProverConfig,
    ) -> Result<bool, BackendError> {
        let header = parse_key(key, config)?;
        let arity = circuit_arity(&read_artifact(circuit)?)?;
        let expected_len = (1 + arity) * FIELD_ELEMENT_BYTES;
        if proof.len() != expected_len {
            return Err(BackendError::MalformedInput(format!(
                "proof is {} bytes, expected {expected_len}",
                proof.len()
            )));
        }
        if arity != header.arity {
            return Ok(false);
        }

        let (tag, words) = proof.as_bytes().split_at(FIELD_ELEMENT_BYTES);
        Ok(tag == proof_tag(config.transcript, key, words).as_slice())
    }
}
