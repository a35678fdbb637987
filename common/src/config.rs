use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::constants::{DOWNLOAD_TIMEOUT_ENV, LOW_MEMORY_ENV, TRANSCRIPT_ENV};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Could not determine the home directory")]
    NoHomeDir,
}

/// Hash used for the Fiat-Shamir transcript.
///
/// `Keccak` matches what a Solidity verifier recomputes, so it is the default
/// whenever proofs are checked on chain.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptHashScheme {
    #[default]
    Keccak,
    Poseidon,
}

impl TranscriptHashScheme {
    pub fn from_on_chain(on_chain: bool) -> Self {
        if on_chain {
            Self::Keccak
        } else {
            Self::Poseidon
        }
    }

    pub fn is_on_chain(self) -> bool {
        self == Self::Keccak
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryMode {
    #[default]
    Standard,
    LowMemory,
}

impl MemoryMode {
    pub fn from_low_memory(low_memory: bool) -> Self {
        if low_memory {
            Self::LowMemory
        } else {
            Self::Standard
        }
    }

    pub fn is_low_memory(self) -> bool {
        self == Self::LowMemory
    }
}

/// Options forwarded untouched to the proving backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProverConfig {
    pub transcript: TranscriptHashScheme,
    pub memory_mode: MemoryMode,
}

impl ProverConfig {
    pub fn on_chain() -> Self {
        Self::default()
    }

    pub fn native() -> Self {
        Self {
            transcript: TranscriptHashScheme::Poseidon,
            ..Self::default()
        }
    }

    pub fn with_memory_mode(mut self, memory_mode: MemoryMode) -> Self {
        self.memory_mode = memory_mode;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from `lookup`, which maps an environment variable name to its value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let transcript = match lookup(TRANSCRIPT_ENV) {
            Some(value) if !value.trim().is_empty() => TranscriptHashScheme::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidValue {
                    var: TRANSCRIPT_ENV,
                    value,
                })?,
            _ => TranscriptHashScheme::default(),
        };

        let low_memory = lookup(LOW_MEMORY_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            transcript,
            memory_mode: MemoryMode::from_low_memory(low_memory),
        })
    }
}

/// Reads the optional HTTP timeout for artifact downloads. Unset means no timeout.
pub fn download_timeout_from_env() -> Result<Option<Duration>, ConfigError> {
    download_timeout_from_lookup(|var| std::env::var(var).ok())
}

pub fn download_timeout_from_lookup<L>(lookup: L) -> Result<Option<Duration>, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(DOWNLOAD_TIMEOUT_ENV) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue {
                var: DOWNLOAD_TIMEOUT_ENV,
                value,
            }),
    }
}
