//! Credential lifecycle service
//!
//! The composition root and the six caller-facing operations. Every
//! operation is a single read-modify-write against the trust store; the
//! storage collaborator's `put` is the only durability point and nothing
//! here retries.

use std::sync::Arc;

use nkeys::KeyPair;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::jwt::{AccountClaims, OperatorClaims, UserClaims};
use crate::nkey::{self, KeyRole};
use crate::storage::Storage;
use crate::trust::{AccountRecord, TrustStore};
use crate::types::{EngineError, Result};

use super::lease::{LeaseInternal, UserCredentials, UserLease};

/// Parameters for creating or updating an account
#[derive(Debug, Clone, Default)]
pub struct WriteAccountRequest {
    pub name: String,

    /// Account seed to import or rotate to; None keeps (or generates) one
    pub nkey_seed: Option<String>,

    /// Default user-credential TTL in seconds; 0 means unset
    pub default_ttl_secs: u64,

    /// Maximum user-credential TTL in seconds; 0 means unset
    pub max_ttl_secs: u64,
}

/// Parameters for issuing a user credential
#[derive(Debug, Clone, Default)]
pub struct IssueUserCredentialRequest {
    pub account_name: String,

    /// User seed to import; None generates a fresh identity
    pub nkey_seed: Option<String>,

    pub user_name: Option<String>,

    /// Requested TTL in seconds; 0 falls back to the account default
    pub ttl_secs: u64,
}

/// Account response payload: identity plus a freshly signed account JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMaterial {
    pub name: String,
    pub public_key: String,
    pub jwt: String,
}

/// Operator response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorMaterial {
    pub public_key: String,
    pub jwt: String,
}

/// Outcome of one revocation sweep
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Accounts visited
    pub accounts: usize,
    /// Accounts whose ledger changed and was persisted
    pub updated: usize,
    /// Individual ledger entries folded into the wildcard
    pub entries_dropped: usize,
}

/// The trust-chain credential lifecycle engine
pub struct CredentialService<S> {
    trust: TrustStore<S>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: Storage> CredentialService<S> {
    /// Assemble the engine from its collaborators
    pub fn new(storage: S, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            trust: TrustStore::new(storage),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Operator
    // =========================================================================

    /// Idempotent bootstrap of the root of trust.
    ///
    /// Generates and persists an operator keypair only when no operator is
    /// stored yet (or a stored record carries an empty seed). Safe to call
    /// on every backend initialization; an existing key is never rotated.
    pub async fn init_operator(&self) -> Result<()> {
        let mut operator = self.trust.get_operator().await?.unwrap_or_default();

        if !operator.is_unset() {
            debug!("Operator already bootstrapped");
            return Ok(());
        }

        let pair = nkey::generate(KeyRole::Operator);
        let seed = nkey::seed_string(&pair)?;
        operator.nkey = seed.to_string();
        self.trust.put_operator(&operator).await?;

        info!(public_key = %pair.public_key(), "Bootstrapped operator keypair");
        Ok(())
    }

    /// Public key of the bootstrapped operator
    pub async fn operator_public_key(&self) -> Result<String> {
        let pair = self.operator_keypair().await?;
        Ok(pair.public_key())
    }

    /// Self-signed operator claims, named for the deployment
    pub async fn operator_jwt(&self, name: &str) -> Result<OperatorMaterial> {
        let pair = self.operator_keypair().await?;
        let public_key = pair.public_key();

        let display_name = (!name.is_empty()).then(|| name.to_string());
        let jwt = OperatorClaims::new(public_key.clone(), display_name)
            .encode(&pair, self.clock.now_unix())?;

        Ok(OperatorMaterial { public_key, jwt })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create or update an account and return its signed account JWT.
    ///
    /// The account seed is set at creation (generated, or imported from the
    /// request) and preserved across updates; supplying a seed on an update
    /// is an explicit rotation. TTL settings are sticky: once non-zero they
    /// survive later writes, and zeros at creation fall back to the engine
    /// defaults.
    pub async fn write_account(&self, req: WriteAccountRequest) -> Result<AccountMaterial> {
        if req.name.is_empty() {
            return Err(EngineError::InvalidArgument(
                "Account name cannot be empty".into(),
            ));
        }

        let operator = self.operator_keypair().await?;

        let existing = self.trust.get_account(&req.name).await?;
        let created = existing.is_none();
        let mut account = existing.unwrap_or_else(|| AccountRecord::new(&req.name));

        let pair = match (&req.nkey_seed, account.nkey.is_empty()) {
            // Explicit seed: first import or deliberate rotation
            (Some(seed), _) => nkey::from_seed(KeyRole::Account, seed)?,
            // No seed on an existing account: keep the stored key
            (None, false) => nkey::from_seed(KeyRole::Account, &account.nkey)?,
            // First creation without a seed
            (None, true) => nkey::generate(KeyRole::Account),
        };
        let seed = nkey::seed_string(&pair)?;
        account.nkey = seed.to_string();

        if account.default_ttl == 0 {
            account.default_ttl = if req.default_ttl_secs != 0 {
                req.default_ttl_secs
            } else {
                self.config.default_ttl_secs
            };
        }
        if account.max_ttl == 0 {
            account.max_ttl = if req.max_ttl_secs != 0 {
                req.max_ttl_secs
            } else {
                self.config.max_ttl_secs
            };
        }

        let material = self.account_material(&operator, &account, &pair)?;
        self.trust.put_account(&account).await?;

        if created {
            info!(
                account = %account.name,
                public_key = %material.public_key,
                default_ttl = account.default_ttl,
                max_ttl = account.max_ttl,
                "Created account"
            );
        } else {
            debug!(account = %account.name, "Updated account");
        }

        Ok(material)
    }

    /// Re-derive an account's identity and sign a fresh account JWT
    pub async fn read_account(&self, name: &str) -> Result<AccountMaterial> {
        if name.is_empty() {
            return Err(EngineError::InvalidArgument(
                "Account name cannot be empty".into(),
            ));
        }

        let operator = self.operator_keypair().await?;
        let account = self.require_account(name).await?;
        let pair = nkey::from_seed(KeyRole::Account, &account.nkey)?;

        self.account_material(&operator, &account, &pair)
    }

    /// Delete an account record. Deleting an absent account succeeds.
    pub async fn delete_account(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(EngineError::InvalidArgument(
                "Account name cannot be empty".into(),
            ));
        }

        self.trust.delete_account(name).await?;
        info!(account = %name, "Deleted account");
        Ok(())
    }

    // =========================================================================
    // User credentials
    // =========================================================================

    /// Issue a renewable user credential lease under an account.
    ///
    /// Effective TTL is the requested one when it lies strictly between
    /// zero and the account's maximum; anything else (including a request
    /// exactly at the maximum) falls back to the account default.
    pub async fn issue_user_credential(
        &self,
        req: IssueUserCredentialRequest,
    ) -> Result<UserLease> {
        if req.account_name.is_empty() {
            return Err(EngineError::InvalidArgument(
                "Account name cannot be empty".into(),
            ));
        }

        let account = self.require_account(&req.account_name).await?;
        let account_pair = nkey::from_seed(KeyRole::Account, &account.nkey)?;
        let user_pair = nkey::seed_or_generate(KeyRole::User, req.nkey_seed.as_deref())?;

        let ttl_secs = effective_issue_ttl(&account, req.ttl_secs);
        let now = self.clock.now();
        let expires_at = now + chrono::Duration::seconds(ttl_secs as i64);

        let jwt = UserClaims::new(
            user_pair.public_key(),
            req.user_name.clone(),
            expires_at.timestamp(),
        )
        .encode(&account_pair, now.timestamp())?;

        let user_seed = nkey::seed_string(&user_pair)?;
        let account_seed = nkey::seed_string(&account_pair)?;

        let lease = UserLease {
            lease_id: Uuid::new_v4(),
            credentials: UserCredentials {
                nkey: user_seed.to_string(),
                jwt,
            },
            ttl_secs,
            issued_at: now,
            expires_at,
            renewable: true,
            internal: LeaseInternal {
                account_name: account.name.clone(),
                account_nkey: account_seed.to_string(),
                user_name: req.user_name,
                user_nkey: user_seed.to_string(),
            },
        };

        debug!(
            account = %account.name,
            user = %user_pair.public_key(),
            lease_id = %lease.lease_id,
            ttl = ttl_secs,
            "Issued user credential"
        );

        Ok(lease)
    }

    /// Renew a leased credential: recompute the TTL from the account's
    /// current policy and re-sign a JWT with a fresh expiry.
    ///
    /// The user identity stays stable across renewals - only the claims
    /// document changes. Signing uses the lease's account-seed snapshot,
    /// and the revocation ledger is deliberately not consulted here.
    pub async fn renew_user_credential(
        &self,
        lease: &mut UserLease,
        increment_secs: u64,
    ) -> Result<UserCredentials> {
        let account = self.require_account(&lease.internal.account_name).await?;

        let account_pair = nkey::from_seed(KeyRole::Account, &lease.internal.account_nkey)?;
        let user_pair = nkey::from_seed(KeyRole::User, &lease.internal.user_nkey)?;

        let ttl_secs = effective_renew_ttl(&account, increment_secs);
        let now = self.clock.now();
        let expires_at = now + chrono::Duration::seconds(ttl_secs as i64);

        let jwt = UserClaims::new(
            user_pair.public_key(),
            lease.internal.user_name.clone(),
            expires_at.timestamp(),
        )
        .encode(&account_pair, now.timestamp())?;

        lease.credentials.jwt = jwt;
        lease.ttl_secs = ttl_secs;
        lease.issued_at = now;
        lease.expires_at = expires_at;

        debug!(
            account = %account.name,
            user = %user_pair.public_key(),
            lease_id = %lease.lease_id,
            ttl = ttl_secs,
            "Renewed user credential"
        );

        Ok(lease.credentials.clone())
    }

    /// Revoke a leased credential into the owning account's ledger.
    ///
    /// Idempotent: re-revoking only ever advances the recorded timestamp.
    pub async fn revoke_user_credential(&self, lease: &UserLease) -> Result<()> {
        let mut account = self.require_account(&lease.internal.account_name).await?;

        let user_pair = nkey::from_seed(KeyRole::User, &lease.internal.user_nkey)?;
        let public_key = user_pair.public_key();
        let now = self.clock.now_unix();

        account.revocations.revoke(&public_key, now);
        self.trust.put_account(&account).await?;

        info!(
            account = %account.name,
            user = %public_key,
            lease_id = %lease.lease_id,
            revoked_at = now,
            "Revoked user credential"
        );

        Ok(())
    }

    // =========================================================================
    // Revocation sweep
    // =========================================================================

    /// One compaction sweep across every account.
    ///
    /// Raises each ledger's wildcard to `now - retention_window` (anything
    /// issued before that is already past its maximum lifetime), folds
    /// dominated entries into it, and persists only changed ledgers. The
    /// first failing account aborts the sweep with its error; accounts
    /// persisted earlier in the walk stay persisted, and the next tick
    /// picks up where this one failed.
    pub async fn compact_revocations(&self) -> Result<SweepReport> {
        let cutoff = self.clock.now_unix() - self.config.retention_window_secs as i64;
        let mut report = SweepReport::default();

        for name in self.trust.list_account_names().await? {
            // Tolerate an account deleted mid-sweep
            let Some(mut account) = self.trust.get_account(&name).await? else {
                continue;
            };
            report.accounts += 1;

            let pruned = account.revocations.prune_older_than(cutoff);
            let dropped = account.revocations.compact();

            if pruned || dropped > 0 {
                self.trust.put_account(&account).await?;
                report.updated += 1;
                report.entries_dropped += dropped;
                debug!(
                    account = %name,
                    cutoff,
                    entries_dropped = dropped,
                    "Compacted revocation ledger"
                );
            }
        }

        Ok(report)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn operator_keypair(&self) -> Result<KeyPair> {
        let operator = self
            .trust
            .get_operator()
            .await?
            .filter(|record| !record.is_unset())
            .ok_or_else(|| EngineError::NotFound("Operator is not bootstrapped".into()))?;

        let seed = Zeroizing::new(operator.nkey);
        nkey::from_seed(KeyRole::Operator, &seed)
    }

    async fn require_account(&self, name: &str) -> Result<AccountRecord> {
        self.trust
            .get_account(name)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Account {} not found", name)))
    }

    fn account_material(
        &self,
        operator: &KeyPair,
        account: &AccountRecord,
        pair: &KeyPair,
    ) -> Result<AccountMaterial> {
        let public_key = pair.public_key();
        let jwt = AccountClaims::new(public_key.clone(), account.name.clone())
            .with_revocations(account.revocations.clone())
            .encode(operator, self.clock.now_unix())?;

        Ok(AccountMaterial {
            name: account.name.clone(),
            public_key,
            jwt,
        })
    }
}

/// Issue-time TTL resolution: strictly between zero and the account
/// maximum, else the account default. A request exactly at the maximum is
/// deliberately rejected to the default.
fn effective_issue_ttl(account: &AccountRecord, requested_secs: u64) -> u64 {
    if requested_secs > 0 && requested_secs < account.max_ttl {
        requested_secs
    } else {
        account.default_ttl
    }
}

/// Renewal-time TTL resolution: zero means the account default, anything
/// above the account maximum clamps down to it.
fn effective_renew_ttl(account: &AccountRecord, increment_secs: u64) -> u64 {
    if increment_secs == 0 {
        account.default_ttl
    } else if increment_secs > account.max_ttl {
        account.max_ttl
    } else {
        increment_secs
    }
}
