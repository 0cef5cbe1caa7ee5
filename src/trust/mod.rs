//! Trust store
//!
//! Persistence-backed repository for the single operator record and the
//! account records under it. All reads go straight to storage - there is no
//! cache, so the sweep and the lifecycle operations always observe the
//! latest persisted write.

pub mod records;
pub mod store;

pub use records::{AccountRecord, OperatorRecord};
pub use store::{account_path, TrustStore, ACCOUNT_PREFIX, OPERATOR_PATH};
