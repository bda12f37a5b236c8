//! Hash Commitments
//!
//! SHA-256 commitments over server secrets:
//! - Publishing a commitment hash before any round is played
//! - Checking a revealed secret against that hash
//! - Generating fresh 256-bit secrets

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::entropy::EntropySource;

/// Raw SHA-256 output (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// Number of random bytes in a server secret.
pub const SECRET_BYTES: usize = 32;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Errors raised when parsing hash wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Wrong number of characters.
    #[error("commitment hash must be 64 hex characters, got {0}")]
    BadLength(usize),

    /// Contains something other than lowercase hex digits.
    #[error("commitment hash must be lowercase hex")]
    NotLowercaseHex,
}

/// Public SHA-256 commitment to a server secret.
///
/// Always 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitmentHash(String);

impl CommitmentHash {
    /// Parse a commitment hash from its wire form.
    pub fn parse(value: &str) -> Result<Self, HashError> {
        if value.len() != HEX_DIGEST_LEN {
            return Err(HashError::BadLength(value.len()));
        }
        if !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(HashError::NotLowercaseHex);
        }
        Ok(Self(value.to_owned()))
    }

    /// Hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl TryFrom<String> for CommitmentHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CommitmentHash> for String {
    fn from(hash: CommitmentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentHash({})", self.0)
    }
}

/// Operator secret behind a commitment.
///
/// Generated secrets are 64 hex characters, but any string a verifier
/// supplies is accepted so that wrong secrets can still be checked.
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerSecret(String);

impl ServerSecret {
    /// Draw a fresh 256-bit secret.
    pub fn generate<E: EntropySource + ?Sized>(entropy: &E) -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        entropy.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a known secret (e.g. one published on rotation).
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Commitment hash for this secret.
    pub fn commitment(&self) -> CommitmentHash {
        commit(&self.0)
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(<redacted>)")
    }
}

/// SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of arbitrary data, lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Commit to a secret.
pub fn commit(secret: &str) -> CommitmentHash {
    // hex::encode always yields 64 lowercase characters for a 32-byte digest
    CommitmentHash(sha256_hex(secret.as_bytes()))
}

/// Check a secret against a published commitment.
pub fn check(secret: &str, hash: &CommitmentHash) -> bool {
    commit(secret) == *hash
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entropy::SeededEntropy;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            commit(&"0".repeat(64)).as_str(),
            "60e05bd1b195af2f94112fa7197a5c88289058840ce7c6df9693756bc6250f55"
        );
    }

    #[test]
    fn test_commit_check() {
        let hash = commit("operator-secret");
        assert!(check("operator-secret", &hash));
        assert!(!check("operator-secreT", &hash));
        assert!(!check("", &hash));
    }

    #[test]
    fn test_generated_secret_format() {
        let entropy = SeededEntropy::new(7);
        let secret = ServerSecret::generate(&entropy);

        assert_eq!(secret.expose().len(), HEX_DIGEST_LEN);
        assert!(secret.expose().bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert!(check(secret.expose(), &secret.commitment()));
    }

    #[test]
    fn test_generated_secrets_differ() {
        let entropy = SeededEntropy::new(7);
        let a = ServerSecret::generate(&entropy);
        let b = ServerSecret::generate(&entropy);
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = ServerSecret::new("do-not-print");
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("do-not-print"));
    }

    #[test]
    fn test_parse_rejects_bad_wire_values() {
        assert_eq!(CommitmentHash::parse("abc"), Err(HashError::BadLength(3)));

        let upper = "A".repeat(64);
        assert_eq!(CommitmentHash::parse(&upper), Err(HashError::NotLowercaseHex));

        let good = commit("x");
        assert_eq!(CommitmentHash::parse(good.as_str()), Ok(good));
    }

    #[test]
    fn test_hash_serde_validates() {
        let hash = commit("x");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.as_str()));

        let back: CommitmentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);

        assert!(serde_json::from_str::<CommitmentHash>("\"not-a-hash\"").is_err());
    }
}
