//! Seed Commitment Protocol
//!
//! Commit to a server secret before any round is played.
//! Reveal it on rotation so every round played under it can be checked.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entropy::{random_hex, EntropySource};
use crate::core::hash::{CommitmentHash, ServerSecret};
use crate::game::mines::generate_mine_positions;
use crate::game::params::{BoardParams, ParamError};

/// Player-editable seed mixed into every round. Never empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientSeed(String);

impl ClientSeed {
    /// Validate a client seed. Length limits are the caller's business.
    pub fn new(seed: impl Into<String>) -> Result<Self, ParamError> {
        let seed = seed.into();
        if seed.is_empty() {
            return Err(ParamError::EmptyClientSeed);
        }
        Ok(Self(seed))
    }

    /// Random hex seed from `bytes` bytes of entropy (at least one).
    pub fn generate<E: EntropySource + ?Sized>(entropy: &E, bytes: usize) -> Self {
        Self(random_hex(entropy, bytes.max(1)))
    }

    /// Seed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientSeed {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientSeed> for String {
    fn from(seed: ClientSeed) -> Self {
        seed.0
    }
}

impl fmt::Display for ClientSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ClientSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientSeed({:?})", self.0)
    }
}

/// Errors loading persisted commitments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitmentError {
    /// Persisted secret doesn't hash to the persisted commitment.
    #[error("stored secret does not match commitment {0}")]
    SecretMismatch(CommitmentHash),
}

/// A player's live commitment.
///
/// `commitment_hash == SHA-256(secret)` by construction. The secret has no
/// accessor; it leaves only through [`SeedCommitment::reveal`] or inside a
/// [`RoundSeed`] that never hands it out.
///
/// The serde form is the persistence form and contains the secret. Never
/// send it to a player; use [`SeedCommitment::view`] instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCommitment")]
pub struct SeedCommitment {
    secret: ServerSecret,
    commitment_hash: CommitmentHash,
    client_seed: ClientSeed,
    nonce: u64,
}

#[derive(Deserialize)]
struct StoredCommitment {
    secret: ServerSecret,
    commitment_hash: CommitmentHash,
    client_seed: ClientSeed,
    nonce: u64,
}

impl TryFrom<StoredCommitment> for SeedCommitment {
    type Error = CommitmentError;

    fn try_from(stored: StoredCommitment) -> Result<Self, Self::Error> {
        if stored.secret.commitment() != stored.commitment_hash {
            return Err(CommitmentError::SecretMismatch(stored.commitment_hash));
        }
        Ok(Self {
            secret: stored.secret,
            commitment_hash: stored.commitment_hash,
            client_seed: stored.client_seed,
            nonce: stored.nonce,
        })
    }
}

impl SeedCommitment {
    /// Commit to `secret` with nonce 0.
    pub fn new(secret: ServerSecret, client_seed: ClientSeed) -> Self {
        let commitment_hash = secret.commitment();
        Self {
            secret,
            commitment_hash,
            client_seed,
            nonce: 0,
        }
    }

    /// Commit to a freshly generated secret.
    pub fn generate<E: EntropySource + ?Sized>(entropy: &E, client_seed: ClientSeed) -> Self {
        Self::new(ServerSecret::generate(entropy), client_seed)
    }

    /// Published commitment hash.
    pub fn commitment_hash(&self) -> &CommitmentHash {
        &self.commitment_hash
    }

    /// Current client seed.
    pub fn client_seed(&self) -> &ClientSeed {
        &self.client_seed
    }

    /// Nonce the next round will use.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Public projection (no secret).
    pub fn view(&self) -> CommitmentView {
        CommitmentView {
            commitment_hash: self.commitment_hash.clone(),
            client_seed: self.client_seed.as_str().to_owned(),
            nonce: self.nonce,
        }
    }

    /// Replace the client seed. The nonce is untouched.
    pub(crate) fn set_client_seed(&mut self, client_seed: ClientSeed) {
        self.client_seed = client_seed;
    }

    /// Freeze the current tuple for a new round and advance the nonce.
    ///
    /// Callers must hold the player's lock.
    pub(crate) fn allocate(&mut self) -> NonceAllocation {
        let seed = RoundSeed {
            secret: self.secret.clone(),
            commitment_hash: self.commitment_hash.clone(),
            client_seed: self.client_seed.as_str().to_owned(),
            nonce: self.nonce,
        };
        self.nonce += 1;
        NonceAllocation {
            seed,
            next_nonce: self.nonce,
        }
    }

    /// Publish the secret. Consumes the commitment.
    pub(crate) fn reveal(self, revealed_at: DateTime<Utc>) -> RevealedCommitment {
        RevealedCommitment {
            secret: self.secret,
            commitment_hash: self.commitment_hash,
            client_seed: self.client_seed.into(),
            final_nonce: self.nonce,
            revealed_at,
        }
    }
}

/// Public part of a live commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentView {
    /// SHA-256 of the hidden secret.
    pub commitment_hash: CommitmentHash,
    /// Client seed.
    pub client_seed: String,
    /// Nonce the next round will use.
    pub nonce: u64,
}

/// The commitment tuple frozen onto one round.
///
/// Holds the secret so positions can be generated, but only exposes the
/// public half.
#[derive(Clone, Debug)]
pub struct RoundSeed {
    secret: ServerSecret,
    commitment_hash: CommitmentHash,
    client_seed: String,
    nonce: u64,
}

impl RoundSeed {
    /// Commitment hash in force.
    pub fn commitment_hash(&self) -> &CommitmentHash {
        &self.commitment_hash
    }

    /// Client seed in force.
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Nonce allocated to the round.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Mine positions for this tuple.
    pub fn mine_positions(&self, params: BoardParams) -> Vec<u32> {
        generate_mine_positions(self.secret.expose(), &self.client_seed, self.nonce, params)
    }

    /// Split into (commitment hash, client seed, nonce), dropping the secret.
    pub(crate) fn into_public(self) -> (CommitmentHash, String, u64) {
        (self.commitment_hash, self.client_seed, self.nonce)
    }
}

/// Result of an atomic read-then-increment.
#[derive(Clone, Debug)]
pub struct NonceAllocation {
    /// Tuple for the new round.
    pub seed: RoundSeed,
    /// Nonce stored after the increment.
    pub next_nonce: u64,
}

/// A commitment whose secret has been published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCommitment {
    /// The revealed secret.
    pub secret: ServerSecret,
    /// Commitment hash that was published before play.
    pub commitment_hash: CommitmentHash,
    /// Client seed in force at rotation.
    pub client_seed: String,
    /// Nonce at rotation; rounds used `0..final_nonce`.
    pub final_nonce: u64,
    /// When the secret was published.
    pub revealed_at: DateTime<Utc>,
}

impl RevealedCommitment {
    /// Does this reveal cover a round played under `hash` at `nonce`?
    ///
    /// The bound is inclusive: `final_nonce` itself was never allocated, but
    /// a claim for it still regenerates from the published tuple.
    pub fn covers(&self, hash: &CommitmentHash, nonce: u64) -> bool {
        self.commitment_hash == *hash && nonce <= self.final_nonce
    }
}

/// Both halves of a rotation.
#[derive(Clone, Debug, Serialize)]
pub struct RotationResult {
    /// The commitment that was just revealed.
    pub revealed: RevealedCommitment,
    /// The commitment now in force.
    pub next: CommitmentView,
}

/// Everything stored for one player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerSeeds {
    current: SeedCommitment,
    /// Oldest first.
    revealed: VecDeque<RevealedCommitment>,
}

impl PlayerSeeds {
    /// Fresh record with no reveal history.
    pub fn new(current: SeedCommitment) -> Self {
        Self {
            current,
            revealed: VecDeque::new(),
        }
    }

    /// Live commitment, secret included.
    pub(crate) fn current(&self) -> &SeedCommitment {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut SeedCommitment {
        &mut self.current
    }

    /// Most recent reveal.
    pub fn previous(&self) -> Option<&RevealedCommitment> {
        self.revealed.back()
    }

    /// Retained reveals, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &RevealedCommitment> {
        self.revealed.iter()
    }

    /// Reveal covering a round played under `hash` at `nonce`.
    pub fn find_reveal(&self, hash: &CommitmentHash, nonce: u64) -> Option<&RevealedCommitment> {
        self.revealed.iter().rev().find(|r| r.covers(hash, nonce))
    }

    /// Reveal the live commitment and install `next` in its place.
    ///
    /// Keeps at most `history_limit` reveals (minimum 1).
    pub(crate) fn rotate(&mut self, next: SeedCommitment, history_limit: usize) -> RotationResult {
        let old = std::mem::replace(&mut self.current, next);
        let revealed = old.reveal(Utc::now());

        self.revealed.push_back(revealed.clone());
        while self.revealed.len() > history_limit.max(1) {
            self.revealed.pop_front();
        }

        RotationResult {
            revealed,
            next: self.current.view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entropy::SeededEntropy;
    use crate::core::hash::check;

    fn seed(s: &str) -> ClientSeed {
        ClientSeed::new(s).unwrap()
    }

    #[test]
    fn test_client_seed_validation() {
        assert_eq!(ClientSeed::new(""), Err(ParamError::EmptyClientSeed));
        assert_eq!(seed("lucky").as_str(), "lucky");
        assert!(serde_json::from_str::<ClientSeed>("\"\"").is_err());
    }

    #[test]
    fn test_commitment_integrity() {
        let entropy = SeededEntropy::new(1);
        let commitment = SeedCommitment::generate(&entropy, seed("c"));

        assert_eq!(commitment.nonce(), 0);
        let revealed = commitment.clone().reveal(Utc::now());
        assert!(check(revealed.secret.expose(), commitment.commitment_hash()));
    }

    #[test]
    fn test_view_hides_secret() {
        let commitment = SeedCommitment::new(ServerSecret::new("hidden-secret"), seed("c"));
        let json = serde_json::to_string(&commitment.view()).unwrap();

        assert!(!json.contains("hidden-secret"));
        assert!(json.contains(commitment.commitment_hash().as_str()));
    }

    #[test]
    fn test_allocate_increments_by_one() {
        let mut commitment = SeedCommitment::new(ServerSecret::new("s"), seed("c"));

        let first = commitment.allocate();
        let second = commitment.allocate();

        assert_eq!(first.seed.nonce(), 0);
        assert_eq!(first.next_nonce, 1);
        assert_eq!(second.seed.nonce(), 1);
        assert_eq!(second.next_nonce, 2);
        assert_eq!(commitment.nonce(), 2);
    }

    #[test]
    fn test_round_seed_generates_canonical_positions() {
        let mut commitment = SeedCommitment::new(ServerSecret::new("0".repeat(64)), seed("test"));
        commitment.allocate();
        let allocation = commitment.allocate();

        let params = BoardParams::standard(3).unwrap();
        assert_eq!(allocation.seed.mine_positions(params), vec![5, 15, 19]);
    }

    #[test]
    fn test_set_client_seed_keeps_nonce() {
        let mut commitment = SeedCommitment::new(ServerSecret::new("s"), seed("c"));
        commitment.allocate();
        commitment.set_client_seed(seed("new"));

        assert_eq!(commitment.nonce(), 1);
        assert_eq!(commitment.client_seed().as_str(), "new");
    }

    #[test]
    fn test_rotation_reveals_and_resets() {
        let mut commitment = SeedCommitment::new(ServerSecret::new("old"), seed("c1"));
        commitment.allocate();
        commitment.allocate();
        let old_hash = commitment.commitment_hash().clone();

        let mut seeds = PlayerSeeds::new(commitment);
        let next = SeedCommitment::new(ServerSecret::new("new"), seed("c2"));
        let result = seeds.rotate(next, 1);

        assert_eq!(result.revealed.secret.expose(), "old");
        assert_eq!(result.revealed.commitment_hash, old_hash);
        assert_eq!(result.revealed.client_seed, "c1");
        assert_eq!(result.revealed.final_nonce, 2);

        assert_eq!(result.next.nonce, 0);
        assert_eq!(result.next.client_seed, "c2");
        assert_ne!(result.next.commitment_hash, old_hash);
        assert_eq!(seeds.previous(), Some(&result.revealed));
    }

    #[test]
    fn test_reveal_history_limit() {
        let mut seeds = PlayerSeeds::new(SeedCommitment::new(ServerSecret::new("s0"), seed("c")));
        for i in 1..=4 {
            let next = SeedCommitment::new(ServerSecret::new(format!("s{}", i)), seed("c"));
            seeds.rotate(next, 2);
        }

        let kept: Vec<&str> = seeds.history().map(|r| r.secret.expose()).collect();
        assert_eq!(kept, vec!["s2", "s3"]);

        // A limit of zero still keeps the latest reveal
        seeds.rotate(SeedCommitment::new(ServerSecret::new("s5"), seed("c")), 0);
        assert_eq!(seeds.history().count(), 1);
    }

    #[test]
    fn test_covers() {
        let mut commitment = SeedCommitment::new(ServerSecret::new("s"), seed("c"));
        commitment.allocate();
        commitment.allocate();
        let hash = commitment.commitment_hash().clone();
        let revealed = commitment.reveal(Utc::now());

        assert!(revealed.covers(&hash, 0));
        assert!(revealed.covers(&hash, 2));
        assert!(!revealed.covers(&hash, 3));
        assert!(!revealed.covers(&crate::core::hash::commit("other"), 0));
    }

    #[test]
    fn test_persisted_commitment_checked_on_load() {
        let commitment = SeedCommitment::new(ServerSecret::new("s"), seed("c"));
        let json = serde_json::to_string(&commitment).unwrap();
        let loaded: SeedCommitment = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, commitment);

        let tampered = json.replace("\"secret\":\"s\"", "\"secret\":\"t\"");
        assert!(serde_json::from_str::<SeedCommitment>(&tampered).is_err());
    }
}
