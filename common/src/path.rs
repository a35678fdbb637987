use std::path::PathBuf;

use crate::config::ConfigError;
use crate::constants::{ARTIFACT_DIR_ENV, ARTIFACT_DIR_NAME, FILE_URI_SCHEME};

/// Strips a `file://` scheme so the result can be handed to code expecting a plain path.
pub fn normalize_uri(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix(FILE_URI_SCHEME).unwrap_or(uri))
}

/// Directory holding downloaded artifacts: `$PROOFKIT_ARTIFACT_DIR`, else `~/.proofkit`.
pub fn artifact_dir() -> Result<PathBuf, ConfigError> {
    artifact_dir_from_lookup(|var| std::env::var(var).ok())
}

pub fn artifact_dir_from_lookup<L>(lookup: L) -> Result<PathBuf, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(ARTIFACT_DIR_ENV) {
        Some(dir) if !dir.trim().is_empty() => Ok(normalize_uri(dir.trim())),
        _ => dirs::home_dir()
            .map(|home| home.join(ARTIFACT_DIR_NAME))
            .ok_or(ConfigError::NoHomeDir),
    }
}
