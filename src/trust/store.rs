//! Repository over the storage collaborator

use tracing::debug;

use crate::storage::Storage;
use crate::types::{EngineError, Result};

use super::records::{AccountRecord, OperatorRecord};

/// Storage key of the singleton operator record
pub const OPERATOR_PATH: &str = "operator";

/// Storage prefix for account records
pub const ACCOUNT_PREFIX: &str = "account/";

/// Storage key for an account record
pub fn account_path(name: &str) -> String {
    format!("{}{}", ACCOUNT_PREFIX, name)
}

/// Typed repository for operator and account records.
///
/// Absence is reported as `None`, not an error, so callers can tell "needs
/// bootstrap" apart from a failing backend.
pub struct TrustStore<S> {
    storage: S,
}

impl<S: Storage> TrustStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn get_operator(&self) -> Result<Option<OperatorRecord>> {
        match self.storage.get(OPERATOR_PATH).await? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| EngineError::Storage(format!("Error reading operator: {}", e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub async fn put_operator(&self, operator: &OperatorRecord) -> Result<()> {
        let bytes = serde_json::to_vec(operator)?;
        self.storage.put(OPERATOR_PATH, bytes).await
    }

    pub async fn get_account(&self, name: &str) -> Result<Option<AccountRecord>> {
        match self.storage.get(&account_path(name)).await? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes).map_err(|e| {
                    EngineError::Storage(format!("Error reading account {}: {}", name, e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub async fn put_account(&self, account: &AccountRecord) -> Result<()> {
        let bytes = serde_json::to_vec(account)?;
        self.storage.put(&account_path(&account.name), bytes).await?;
        debug!(account = %account.name, "Persisted account record");
        Ok(())
    }

    pub async fn delete_account(&self, name: &str) -> Result<()> {
        self.storage.delete(&account_path(name)).await
    }

    pub async fn list_account_names(&self) -> Result<Vec<String>> {
        self.storage.list(ACCOUNT_PREFIX).await
    }
}
