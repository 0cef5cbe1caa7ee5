//! Configuration for the credential engine
//!
//! Plain settings struct handed to the composition root. Hosts that read
//! these from CLI flags or environment variables own that mapping; the
//! engine only sees the resolved values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default TTL applied to user credentials when neither the account nor the
/// request specifies one (15 minutes).
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::from_secs(15 * 60);

/// Default ceiling on user credential TTLs (1 hour).
pub const DEFAULT_MAX_CREDENTIAL_TTL: Duration = Duration::from_secs(60 * 60);

/// Default revocation retention window (1 hour).
///
/// No user credential can outlive the max TTL, so anything issued before
/// `now - window` is already unverifiable and its revocation entries are
/// safe to fold into the wildcard.
pub const DEFAULT_RETENTION_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Default interval between compaction sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default TTL (seconds) for accounts created without one
    pub default_ttl_secs: u64,

    /// Maximum TTL (seconds) for accounts created without one
    pub max_ttl_secs: u64,

    /// Revocation retention window (seconds) applied by the sweep
    pub retention_window_secs: u64,

    /// Interval (seconds) between compaction sweeps
    pub sweep_interval_secs: u64,
}

impl EngineConfig {
    pub fn retention_window(&self) -> Duration {
        Duration::from_secs(self.retention_window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_CREDENTIAL_TTL.as_secs(),
            max_ttl_secs: DEFAULT_MAX_CREDENTIAL_TTL.as_secs(),
            retention_window_secs: DEFAULT_RETENTION_WINDOW.as_secs(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}
