//! Persisted trust-chain records

use serde::{Deserialize, Serialize};

use crate::revocation::RevocationLedger;

/// The singleton root-of-trust record, stored at `operator`.
///
/// Holds only the operator seed; the public key is derived on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorRecord {
    /// Operator NKey seed (secret)
    pub nkey: String,
}

impl OperatorRecord {
    /// A record with no seed yet (pre-bootstrap)
    pub fn is_unset(&self) -> bool {
        self.nkey.is_empty()
    }
}

/// Per-account record, stored at `account/<name>`.
///
/// The seed is set once at creation and survives updates; TTL settings are
/// sticky once non-zero. The revocation ledger grows with revocations and
/// shrinks (in serialized size only) under compaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,

    /// Account NKey seed (secret; signs this account's user JWTs)
    pub nkey: String,

    /// Default TTL for user credentials, in seconds
    #[serde(default)]
    pub default_ttl: u64,

    /// Maximum TTL for user credentials, in seconds
    #[serde(default)]
    pub max_ttl: u64,

    #[serde(default, skip_serializing_if = "RevocationLedger::is_empty")]
    pub revocations: RevocationLedger,
}

impl AccountRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
