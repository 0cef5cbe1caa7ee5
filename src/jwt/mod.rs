//! Hierarchical JWT encoding
//!
//! Builds and signs the three claim documents of the trust chain. Signing
//! always uses the direct parent's keypair: the operator self-signs its own
//! claims and signs account claims, accounts sign user claims. The encoders
//! enforce that by checking the issuer's key family before signing.
//!
//! Wire form is the NATS claims layout: `b64url(header).b64url(payload).
//! b64url(signature)` with algorithm `ed25519-nkey` and a `jti` claims hash
//! computed over the payload.

use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;
use base64::Engine as _;
use nkeys::KeyPair;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::revocation::RevocationLedger;
use crate::types::{EngineError, Result};

/// Signature algorithm named in every JWT header
pub const ALGORITHM: &str = "ed25519-nkey";

/// Claims document version
const CLAIMS_VERSION: u8 = 2;

#[derive(Serialize)]
struct Header {
    typ: &'static str,
    alg: &'static str,
}

const HEADER: Header = Header {
    typ: "JWT",
    alg: ALGORITHM,
};

/// Common envelope around each role's `nats` section
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    #[serde(skip_serializing_if = "str::is_empty")]
    jti: &'a str,
    iat: i64,
    iss: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    sub: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    nats: &'a T,
}

#[derive(Serialize)]
struct OperatorSection {
    #[serde(rename = "type")]
    claims_type: &'static str,
    version: u8,
}

#[derive(Serialize)]
struct AccountSection<'a> {
    #[serde(rename = "type")]
    claims_type: &'static str,
    version: u8,
    #[serde(skip_serializing_if = "RevocationLedger::is_empty")]
    revocations: &'a RevocationLedger,
}

#[derive(Serialize)]
struct UserSection {
    #[serde(rename = "type")]
    claims_type: &'static str,
    version: u8,
}

/// Self-signed claims for the root of the trust chain
#[derive(Debug, Clone)]
pub struct OperatorClaims {
    /// Operator public key (subject and issuer are the same key)
    pub subject: String,
    pub name: Option<String>,
}

impl OperatorClaims {
    pub fn new(subject: impl Into<String>, name: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            name,
        }
    }

    /// Encode and self-sign. The issuer must be the operator keypair whose
    /// public key is the subject.
    pub fn encode(&self, issuer: &KeyPair, issued_at: i64) -> Result<String> {
        let issuer_key = issuer.public_key();
        if issuer_key != self.subject {
            return Err(EngineError::Signing(
                "Operator claims must be self-signed by the subject key".into(),
            ));
        }

        encode_claims(
            issuer,
            issued_at,
            &self.subject,
            self.name.as_deref(),
            None,
            &OperatorSection {
                claims_type: "operator",
                version: CLAIMS_VERSION,
            },
        )
    }
}

/// Account claims, signed by the operator, embedding the revocation snapshot
#[derive(Debug, Clone)]
pub struct AccountClaims {
    /// Account public key
    pub subject: String,
    pub name: String,
    pub revocations: RevocationLedger,
}

impl AccountClaims {
    pub fn new(subject: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: name.into(),
            revocations: RevocationLedger::new(),
        }
    }

    pub fn with_revocations(mut self, revocations: RevocationLedger) -> Self {
        self.revocations = revocations;
        self
    }

    /// Encode and sign with the operator keypair (the account's parent)
    pub fn encode(&self, issuer: &KeyPair, issued_at: i64) -> Result<String> {
        if !issuer.public_key().starts_with('O') {
            return Err(EngineError::Signing(
                "Account claims must be signed by an operator key".into(),
            ));
        }

        encode_claims(
            issuer,
            issued_at,
            &self.subject,
            Some(&self.name),
            None,
            &AccountSection {
                claims_type: "account",
                version: CLAIMS_VERSION,
                revocations: &self.revocations,
            },
        )
    }
}

/// User claims, signed by the owning account, with a hard expiry
#[derive(Debug, Clone)]
pub struct UserClaims {
    /// User public key
    pub subject: String,
    pub name: Option<String>,
    /// Expiry instant (unix seconds)
    pub expires: i64,
}

impl UserClaims {
    pub fn new(subject: impl Into<String>, name: Option<String>, expires: i64) -> Self {
        Self {
            subject: subject.into(),
            name,
            expires,
        }
    }

    /// Encode and sign with the account keypair (the user's parent)
    pub fn encode(&self, issuer: &KeyPair, issued_at: i64) -> Result<String> {
        if !issuer.public_key().starts_with('A') {
            return Err(EngineError::Signing(
                "User claims must be signed by an account key".into(),
            ));
        }

        encode_claims(
            issuer,
            issued_at,
            &self.subject,
            self.name.as_deref(),
            Some(self.expires),
            &UserSection {
                claims_type: "user",
                version: CLAIMS_VERSION,
            },
        )
    }
}

/// Serialize, hash, and sign one claims document
fn encode_claims<T: Serialize>(
    issuer: &KeyPair,
    issued_at: i64,
    subject: &str,
    name: Option<&str>,
    expires: Option<i64>,
    section: &T,
) -> Result<String> {
    let issuer_key = issuer.public_key();
    let encoding = |e: serde_json::Error| EngineError::Signing(format!("Claims encoding failed: {}", e));

    // The claims hash is computed with jti absent, then embedded
    let unhashed = serde_json::to_vec(&Envelope {
        jti: "",
        iat: issued_at,
        iss: &issuer_key,
        name,
        sub: subject,
        exp: expires,
        nats: section,
    })
    .map_err(encoding)?;
    let jti = hex::encode(Sha256::digest(&unhashed));

    let payload = serde_json::to_vec(&Envelope {
        jti: &jti,
        iat: issued_at,
        iss: &issuer_key,
        name,
        sub: subject,
        exp: expires,
        nats: section,
    })
    .map_err(encoding)?;

    let signing_input = format!(
        "{}.{}",
        B64URL.encode(serde_json::to_vec(&HEADER).map_err(encoding)?),
        B64URL.encode(payload)
    );

    let signature = issuer
        .sign(signing_input.as_bytes())
        .map_err(|e| EngineError::Signing(format!("JWT signature failed: {}", e)))?;

    Ok(format!("{}.{}", signing_input, B64URL.encode(signature)))
}


#[cfg(test)]
mod tests {
    use super::testing::{decode_payload, verify_signature};
    use super::*;
    use crate::nkey::{self, KeyRole};

    #[test]
    fn test_operator_claims_self_signed() {
        let operator = nkey::generate(KeyRole::Operator);
        let claims = OperatorClaims::new(operator.public_key(), Some("root".into()));

        let jwt = claims.encode(&operator, 1_000).unwrap();
        let payload = decode_payload(&jwt);

        assert_eq!(payload["iss"], payload["sub"]);
        assert_eq!(payload["iat"], 1_000);
        assert_eq!(payload["name"], "root");
        assert_eq!(payload["nats"]["type"], "operator");
        assert!(verify_signature(&jwt));
    }

    #[test]
    fn test_operator_claims_reject_foreign_signer() {
        let operator = nkey::generate(KeyRole::Operator);
        let other = nkey::generate(KeyRole::Operator);
        let claims = OperatorClaims::new(operator.public_key(), None);

        let result = claims.encode(&other, 1_000);
        assert!(matches!(result, Err(EngineError::Signing(_))));
    }

    #[test]
    fn test_account_claims_signed_by_operator() {
        let operator = nkey::generate(KeyRole::Operator);
        let account = nkey::generate(KeyRole::Account);

        let mut revocations = RevocationLedger::new();
        revocations.revoke("UABC", 900);

        let jwt = AccountClaims::new(account.public_key(), "billing")
            .with_revocations(revocations)
            .encode(&operator, 1_000)
            .unwrap();

        let payload = decode_payload(&jwt);
        assert_eq!(payload["iss"], operator.public_key());
        assert_eq!(payload["sub"], account.public_key());
        assert_eq!(payload["nats"]["type"], "account");
        assert_eq!(payload["nats"]["revocations"]["UABC"], 900);
        assert!(payload.get("exp").is_none());
        assert!(verify_signature(&jwt));
    }

    #[test]
    fn test_account_claims_reject_non_operator_issuer() {
        let account = nkey::generate(KeyRole::Account);
        let claims = AccountClaims::new(account.public_key(), "billing");

        // Self-signing an account is a broken trust chain
        let result = claims.encode(&account, 1_000);
        assert!(matches!(result, Err(EngineError::Signing(_))));
    }

    #[test]
    fn test_account_claims_empty_ledger_omitted() {
        let operator = nkey::generate(KeyRole::Operator);
        let account = nkey::generate(KeyRole::Account);

        let jwt = AccountClaims::new(account.public_key(), "empty")
            .encode(&operator, 1_000)
            .unwrap();

        let payload = decode_payload(&jwt);
        assert!(payload["nats"].get("revocations").is_none());
    }

    #[test]
    fn test_user_claims_signed_by_account_with_expiry() {
        let account = nkey::generate(KeyRole::Account);
        let user = nkey::generate(KeyRole::User);

        let jwt = UserClaims::new(user.public_key(), Some("ci-runner".into()), 2_000)
            .encode(&account, 1_000)
            .unwrap();

        let payload = decode_payload(&jwt);
        assert_eq!(payload["iss"], account.public_key());
        assert_eq!(payload["sub"], user.public_key());
        assert_eq!(payload["exp"], 2_000);
        assert_eq!(payload["nats"]["type"], "user");
        assert!(verify_signature(&jwt));
    }

    #[test]
    fn test_user_claims_reject_operator_issuer() {
        let operator = nkey::generate(KeyRole::Operator);
        let user = nkey::generate(KeyRole::User);
        let claims = UserClaims::new(user.public_key(), None, 2_000);

        // Skipping a level (operator directly signing a user) is rejected
        let result = claims.encode(&operator, 1_000);
        assert!(matches!(result, Err(EngineError::Signing(_))));
    }

    #[test]
    fn test_jti_is_a_claims_hash() {
        let operator = nkey::generate(KeyRole::Operator);
        let account = nkey::generate(KeyRole::Account);
        let claims = AccountClaims::new(account.public_key(), "billing");

        let a = claims.encode(&operator, 1_000).unwrap();
        let b = claims.encode(&operator, 1_000).unwrap();
        let c = claims.encode(&operator, 1_001).unwrap();

        // Same inputs hash identically; a different iat changes the hash
        assert_eq!(decode_payload(&a)["jti"], decode_payload(&b)["jti"]);
        assert_ne!(decode_payload(&a)["jti"], decode_payload(&c)["jti"]);
        assert_eq!(decode_payload(&a)["jti"].as_str().unwrap().len(), 64);
    }
}
