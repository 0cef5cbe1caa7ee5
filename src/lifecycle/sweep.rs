//! Periodic revocation sweep
//!
//! Background task that re-runs [`CredentialService::compact_revocations`]
//! at a fixed interval. A failed tick is logged and dropped; the next tick
//! starts over from the full account list, so progress is self-healing
//! through repetition rather than in-call retries.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::storage::Storage;

use super::service::CredentialService;

/// Spawn the compaction sweep on the current tokio runtime
pub fn spawn_compaction_task<S: Storage>(
    service: Arc<CredentialService<S>>,
    interval: Duration,
) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match service.compact_revocations().await {
                Ok(report) if report.updated > 0 => {
                    debug!(
                        accounts = report.accounts,
                        updated = report.updated,
                        entries_dropped = report.entries_dropped,
                        "Revocation sweep complete"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Revocation sweep failed; retrying next tick");
                }
            }
        }
    });
    info!(interval_secs = interval.as_secs(), "Revocation sweep started");
}
