//! Keyward - NATS credential engine
//!
//! Issues, renews, and revokes short-lived NATS credentials (NKey keypairs
//! plus signed JWT claims) under a three-tier trust hierarchy: one
//! operator, many accounts, many users per account. Nothing below the
//! operator can outlive or exceed the authority of what signed it.
//!
//! ## Services
//!
//! - **Lifecycle**: operator bootstrap, account write/read/delete, user
//!   credential leases (issue, renew, revoke), periodic revocation sweep
//! - **Trust store**: operator and account records over an abstract
//!   key-value storage collaborator
//! - **NKey provider**: role-typed keypair generation and derivation
//! - **Claims**: hierarchical `ed25519-nkey` JWT encoding
//! - **Revocation**: forward-only per-account ledgers with retention-window
//!   pruning and size compaction
//!
//! The host owns routing, storage backends, and scheduling; the engine is
//! assembled with [`CredentialService::new`] from a [`storage::Storage`]
//! implementation and a [`clock::Clock`].

pub mod clock;
pub mod config;
pub mod jwt;
pub mod lifecycle;
pub mod nkey;
pub mod revocation;
pub mod storage;
pub mod trust;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use config::EngineConfig;
pub use lifecycle::{
    spawn_compaction_task, AccountMaterial, CredentialService, IssueUserCredentialRequest,
    OperatorMaterial, SweepReport, UserCredentials, UserLease, WriteAccountRequest,
};
pub use revocation::{RevocationLedger, ALL_IDENTITIES};
pub use storage::{MemoryStorage, Storage};
pub use types::{EngineError, Result};
