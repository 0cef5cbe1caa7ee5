//! User credential leases
//!
//! A lease is the renewable, revocable grant handed back on issuance. The
//! caller sees only the credential material; the internal section is what a
//! lease subsystem carries between issuance and the later renewal or
//! revocation callback, and is never re-exposed to the original caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credential material handed to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    /// User NKey seed (secret)
    pub nkey: String,

    /// Signed user JWT
    pub jwt: String,
}

/// Renewal/revocation data carried opaquely by the lease subsystem.
///
/// The account seed here is a snapshot taken at issuance. Renewal signs
/// with this snapshot, so a lease stays renewable even if the account
/// record is later deleted or rotated - after a rotation the renewed JWT is
/// signed by a key the trust chain no longer advertises. Known risk,
/// intentionally not patched here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseInternal {
    pub account_name: String,

    /// Account NKey seed as of issuance (secret)
    pub account_nkey: String,

    pub user_name: Option<String>,

    /// User NKey seed (secret)
    pub user_nkey: String,
}

/// A renewable user credential grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLease {
    pub lease_id: Uuid,

    /// User-visible credential material (refreshed on renewal)
    pub credentials: UserCredentials,

    /// TTL of the current JWT, in seconds
    pub ttl_secs: u64,

    /// Issue time of the current JWT (updated on renewal)
    pub issued_at: DateTime<Utc>,

    /// Expiry of the current JWT
    pub expires_at: DateTime<Utc>,

    pub renewable: bool,

    /// Data for renewal/revocation callbacks; not for the original caller
    pub internal: LeaseInternal,
}

impl UserLease {
    /// Public key of the user identity this lease covers
    pub fn user_public_key(&self) -> crate::types::Result<String> {
        let pair = crate::nkey::from_seed(crate::nkey::KeyRole::User, &self.internal.user_nkey)?;
        Ok(pair.public_key())
    }
}
