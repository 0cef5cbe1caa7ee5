//! Revocation ledger
//!
//! Per-account map from revoked identity (a user public key, or the `*`
//! wildcard meaning "everything") to the unix time of revocation. The map
//! only moves forward: re-revoking an identity can raise its timestamp but
//! never lower it.
//!
//! The ledger is embedded verbatim in the account JWT, so its serialized
//! size matters. [`RevocationLedger::compact`] folds individual entries
//! into the wildcard once the wildcard dominates them, without changing any
//! [`RevocationLedger::is_revoked`] verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wildcard identity: revokes every subject not listed with a later timestamp
pub const ALL_IDENTITIES: &str = "*";

/// Forward-only map of revoked identities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevocationLedger {
    entries: BTreeMap<String, i64>,
}

impl RevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over (identity, revoked-at) entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Revocation time recorded for an identity, if any
    pub fn revoked_at(&self, identity: &str) -> Option<i64> {
        self.entries.get(identity).copied()
    }

    /// Insert or raise the revocation time for an identity.
    ///
    /// Returns true when the ledger changed. An existing later timestamp is
    /// never regressed.
    pub fn revoke(&mut self, identity: &str, at: i64) -> bool {
        match self.entries.get(identity) {
            Some(&existing) if existing >= at => false,
            _ => {
                self.entries.insert(identity.to_string(), at);
                true
            }
        }
    }

    /// Revoke every identity as of `at` via the wildcard entry
    pub fn revoke_all(&mut self, at: i64) -> bool {
        self.revoke(ALL_IDENTITIES, at)
    }

    /// Expire history older than `cutoff`.
    ///
    /// Raises the wildcard to `cutoff`: every credential issued before that
    /// instant is treated as revoked, which is safe once `cutoff` trails
    /// `now` by at least the maximum credential lifetime (nothing issued
    /// before it can still verify anyway).
    pub fn prune_older_than(&mut self, cutoff: i64) -> bool {
        self.revoke_all(cutoff)
    }

    /// Drop individual entries already dominated by the wildcard.
    ///
    /// Returns the number of entries removed. The observable
    /// [`is_revoked`](Self::is_revoked) verdict is identical before and
    /// after for every identity and instant.
    pub fn compact(&mut self) -> usize {
        let Some(all_at) = self.revoked_at(ALL_IDENTITIES) else {
            return 0;
        };

        let before = self.entries.len();
        self.entries
            .retain(|identity, &mut at| identity == ALL_IDENTITIES || at > all_at);
        before - self.entries.len()
    }

    /// Whether a credential for `identity` issued at `issued_at` is revoked.
    ///
    /// A credential is dead when its identity (or the wildcard) carries a
    /// revocation timestamp at or after the credential's issue time.
    pub fn is_revoked(&self, identity: &str, issued_at: i64) -> bool {
        let hit = |key: &str| self.revoked_at(key).is_some_and(|at| at >= issued_at);
        hit(ALL_IDENTITIES) || hit(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_records_timestamp() {
        let mut ledger = RevocationLedger::new();
        assert!(ledger.revoke("UA", 100));
        assert_eq!(ledger.revoked_at("UA"), Some(100));
    }

    #[test]
    fn test_revoke_is_forward_only() {
        let mut ledger = RevocationLedger::new();

        // Ascending order lands on the later time
        ledger.revoke("UA", 100);
        assert!(ledger.revoke("UA", 200));
        assert_eq!(ledger.revoked_at("UA"), Some(200));

        // Descending order keeps the later time
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 200);
        assert!(!ledger.revoke("UA", 100));
        assert_eq!(ledger.revoked_at("UA"), Some(200));
    }

    #[test]
    fn test_is_revoked_boundary() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 100);

        // Issued at or before the revocation instant: dead
        assert!(ledger.is_revoked("UA", 99));
        assert!(ledger.is_revoked("UA", 100));

        // Issued after: alive
        assert!(!ledger.is_revoked("UA", 101));

        // Unrelated identity: alive
        assert!(!ledger.is_revoked("UB", 50));
    }

    #[test]
    fn test_wildcard_revokes_unlisted_identities() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke_all(500);

        assert!(ledger.is_revoked("UA", 400));
        assert!(ledger.is_revoked("UB", 500));
        assert!(!ledger.is_revoked("UB", 501));
    }

    #[test]
    fn test_prune_older_than_raises_wildcard() {
        let mut ledger = RevocationLedger::new();
        assert!(ledger.prune_older_than(1_000));
        assert_eq!(ledger.revoked_at(ALL_IDENTITIES), Some(1_000));

        // A later sweep advances it, an earlier one is a no-op
        assert!(ledger.prune_older_than(2_000));
        assert!(!ledger.prune_older_than(1_500));
        assert_eq!(ledger.revoked_at(ALL_IDENTITIES), Some(2_000));
    }

    #[test]
    fn test_compact_drops_dominated_entries() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 100);
        ledger.revoke("UB", 500);
        ledger.revoke("UC", 900);
        ledger.revoke_all(500);

        let dropped = ledger.compact();

        // UA (100) and UB (500) fold into the wildcard; UC (900) survives
        assert_eq!(dropped, 2);
        assert_eq!(ledger.revoked_at("UA"), None);
        assert_eq!(ledger.revoked_at("UB"), None);
        assert_eq!(ledger.revoked_at("UC"), Some(900));
        assert_eq!(ledger.revoked_at(ALL_IDENTITIES), Some(500));
    }

    #[test]
    fn test_compact_without_wildcard_is_noop() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 100);

        assert_eq!(ledger.compact(), 0);
        assert_eq!(ledger.revoked_at("UA"), Some(100));
    }

    #[test]
    fn test_compact_preserves_every_verdict() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 100);
        ledger.revoke("UB", 500);
        ledger.revoke("UC", 900);
        ledger.revoke_all(500);

        let identities = ["UA", "UB", "UC", "UD", ALL_IDENTITIES];
        let instants = [0, 99, 100, 101, 499, 500, 501, 899, 900, 901, 10_000];

        let before: Vec<bool> = identities
            .iter()
            .flat_map(|id| instants.iter().map(|t| ledger.is_revoked(id, *t)))
            .collect();

        let mut compacted = ledger.clone();
        compacted.compact();

        let after: Vec<bool> = identities
            .iter()
            .flat_map(|id| instants.iter().map(|t| compacted.is_revoked(id, *t)))
            .collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_serialized_form_is_a_plain_map() {
        let mut ledger = RevocationLedger::new();
        ledger.revoke("UA", 100);
        ledger.revoke_all(50);

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json, serde_json::json!({ "*": 50, "UA": 100 }));

        let restored: RevocationLedger = serde_json::from_value(json).unwrap();
        assert_eq!(restored, ledger);
    }
}
