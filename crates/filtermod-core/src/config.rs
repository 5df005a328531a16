//! Configuration payload parsing.
//!
//! The host hands the module an opaque byte payload at configuration time.
//! By convention filter modules carry JSON there; [`parse_json`] turns the
//! borrowed payload into an owned settings value in one step, which also
//! satisfies the rule that nothing borrowed from the creation call may be
//! retained.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to build a filter configuration from the host-supplied payload.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The payload was not the JSON document the settings type expects.
    #[error("configuration payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but the values are unusable.
    #[error("configuration rejected: {0}")]
    Rejected(String),

    /// The filter name is not one this module provides.
    #[error("unknown filter name {0:?}")]
    UnknownFilter(String),
}

/// Parse a JSON configuration payload into an owned settings value.
///
/// An empty payload is treated as the empty object, so settings types with
/// serde defaults accept an omitted configuration block.
pub fn parse_json<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ConfigError> {
    let payload = if payload.is_empty() { b"{}" } else { payload };
    Ok(serde_json::from_slice(payload)?)
}
