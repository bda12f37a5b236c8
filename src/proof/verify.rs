//! Verification API
//!
//! Recompute a round from its revealed tuple and compare.
//! Anyone holding the revealed secret and the round's public metadata can
//! run this; nothing here touches the commitment store.

use serde::{Deserialize, Serialize};

use crate::core::hash::{check, commit, CommitmentHash};
use crate::game::mines::generate_mine_positions;
use crate::game::params::{BoardParams, ParamError};
use crate::game::round::Round;
use crate::proof::commitment::RevealedCommitment;

/// Everything a third party needs to check one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClaim {
    /// Revealed server secret.
    pub secret: String,
    /// Commitment hash published before the round.
    pub commitment_hash: CommitmentHash,
    /// Client seed the round used.
    pub client_seed: String,
    /// Nonce the round used.
    pub nonce: u64,
    /// Board size (N).
    pub board_size: u32,
    /// Mine count (k).
    pub mine_count: u32,
    /// Mine positions the operator says the round had.
    pub claimed_positions: Vec<u32>,
}

impl RoundClaim {
    /// Claim for a finished round checked against a reveal.
    pub fn from_round(reveal: &RevealedCommitment, round: &Round) -> Self {
        Self {
            secret: reveal.secret.expose().to_owned(),
            commitment_hash: round.commitment_hash().clone(),
            client_seed: round.client_seed().to_owned(),
            nonce: round.nonce(),
            board_size: round.params().board_size(),
            mine_count: round.params().mine_count(),
            claimed_positions: round.frozen_positions().to_vec(),
        }
    }
}

/// Outcome of a verification that actually ran.
///
/// Mismatches are reported here, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// SHA-256(secret) equals the published commitment.
    pub hash_matches: bool,
    /// Regenerated positions equal the claimed ones (as sets).
    pub positions_match: bool,
    /// Both of the above.
    pub verified: bool,
    /// SHA-256 of the supplied secret.
    pub computed_hash: CommitmentHash,
    /// Positions recomputed from the supplied tuple, ascending.
    pub regenerated_positions: Vec<u32>,
}

/// Reasons verification could not run at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The round's secret has not been revealed.
    #[error("commitment {commitment_hash} not yet revealed for nonce {nonce}")]
    NotYetRevealed {
        /// Commitment the round was played under.
        commitment_hash: CommitmentHash,
        /// Round nonce.
        nonce: u64,
    },

    /// Positions are not final until the round ends.
    #[error("round is still in progress")]
    RoundInProgress,

    /// Board parameters were invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),
}

/// Verify a claim.
///
/// 1. hash check of the secret against the published commitment
/// 2. regenerate positions from the tuple
/// 3. compare as sorted lists
pub fn verify_claim(claim: &RoundClaim) -> Result<VerificationReport, ParamError> {
    let params = BoardParams::new(claim.board_size, claim.mine_count)?;

    let hash_matches = check(&claim.secret, &claim.commitment_hash);
    let regenerated = generate_mine_positions(&claim.secret, &claim.client_seed, claim.nonce, params);

    let mut claimed = claim.claimed_positions.clone();
    claimed.sort_unstable();
    let positions_match = claimed == regenerated;

    Ok(VerificationReport {
        hash_matches,
        positions_match,
        verified: hash_matches && positions_match,
        computed_hash: commit(&claim.secret),
        regenerated_positions: regenerated,
    })
}

/// Verify a finished round against a revealed commitment.
///
/// Fails without computing anything if the reveal does not cover the
/// round, or if the round is still active.
pub fn verify_round(
    reveal: &RevealedCommitment,
    round: &Round,
) -> Result<VerificationReport, VerifyError> {
    if !round.is_finished() {
        return Err(VerifyError::RoundInProgress);
    }
    if !reveal.covers(round.commitment_hash(), round.nonce()) {
        return Err(VerifyError::NotYetRevealed {
            commitment_hash: round.commitment_hash().clone(),
            nonce: round.nonce(),
        });
    }
    Ok(verify_claim(&RoundClaim::from_round(reveal, round))?)
}

// =============================================================================
// TESTS
// =============================================================================
