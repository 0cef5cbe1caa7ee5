//! NKey provider
//!
//! Role-typed wrapper over the `nkeys` crate for the three key families in
//! the trust chain. Seeds are the only persistable secret; everything else
//! is derived. Transient seed copies ride in [`Zeroizing`] buffers so they
//! are wiped as soon as the operation that needed them returns.

use nkeys::{KeyPair, KeyPairType};
use zeroize::Zeroizing;

use crate::types::{EngineError, Result};

/// The three levels of the trust hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Operator,
    Account,
    User,
}

impl KeyRole {
    /// Public-key prefix character for this role family
    pub fn prefix(&self) -> char {
        match self {
            Self::Operator => 'O',
            Self::Account => 'A',
            Self::User => 'U',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Account => "account",
            Self::User => "user",
        }
    }

    fn pair_type(&self) -> KeyPairType {
        match self {
            Self::Operator => KeyPairType::Operator,
            Self::Account => KeyPairType::Account,
            Self::User => KeyPairType::User,
        }
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a fresh keypair for the given role
pub fn generate(role: KeyRole) -> KeyPair {
    KeyPair::new(role.pair_type())
}

/// Reconstruct a keypair from a seed, enforcing the role family.
///
/// Fails with `InvalidKeyMaterial` if the seed does not parse or decodes to
/// a key of a different family (e.g. an account seed where a user seed is
/// required).
pub fn from_seed(role: KeyRole, seed: &str) -> Result<KeyPair> {
    let pair = KeyPair::from_seed(seed)
        .map_err(|e| EngineError::InvalidKeyMaterial(format!("{} seed: {}", role, e)))?;

    let public_key = pair.public_key();
    if !public_key.starts_with(role.prefix()) {
        return Err(EngineError::InvalidKeyMaterial(format!(
            "Seed is not an {} key (public key {} has the wrong prefix)",
            role, public_key
        )));
    }

    Ok(pair)
}

/// Use the supplied seed when present, otherwise generate a fresh keypair.
///
/// A supplied seed that fails to parse (or belongs to the wrong family) is
/// an error rather than a silent fallback to generation - callers importing
/// a key need to know when the import did not happen.
pub fn seed_or_generate(role: KeyRole, seed: Option<&str>) -> Result<KeyPair> {
    match seed {
        Some(s) if !s.is_empty() => from_seed(role, s),
        _ => Ok(generate(role)),
    }
}

/// Extract the seed as wipe-on-drop string material
pub fn seed_string(pair: &KeyPair) -> Result<Zeroizing<String>> {
    pair.seed()
        .map(Zeroizing::new)
        .map_err(|e| EngineError::InvalidKeyMaterial(format!("Seed not extractable: {}", e)))
}
