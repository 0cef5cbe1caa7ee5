//! Credential lifecycle
//!
//! Orchestrates the trust store, nkey provider, revocation ledgers, and
//! claims encoding into the caller-facing operations: operator bootstrap,
//! account write/read/delete, user credential issue/renew/revoke, and the
//! periodic revocation sweep.

pub mod lease;
pub mod service;
pub mod sweep;

pub use lease::{LeaseInternal, UserCredentials, UserLease};
pub use service::{
    AccountMaterial, CredentialService, IssueUserCredentialRequest, OperatorMaterial, SweepReport,
    WriteAccountRequest,
};
pub use sweep::spawn_compaction_task;
