//! Fatal error types. Bad input never produces these; they signal either a
//! scanner bug or an invalid caller configuration.

use thiserror::Error;

/// A broken internal invariant. Distinct from diagnostics, which describe
/// problems in the scanned text.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scanner invariant violated ({invariant}): {detail}")]
    InvariantViolation { invariant: &'static str, detail: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
