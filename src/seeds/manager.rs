//! Seed Manager
//!
//! Owns each player's commitment lifecycle on top of a `CommitmentStore`:
//! ensure, client-seed edits, nonce allocation, rotation, and verification
//! against revealed history. The live secret never leaves this layer
//! except through rotation.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::entropy::{EntropySource, OsEntropy};
use crate::core::hash::CommitmentHash;
use crate::game::params::{BoardParams, ParamError};
use crate::game::round::Round;
use crate::proof::commitment::{
    ClientSeed, CommitmentView, NonceAllocation, PlayerSeeds, RevealedCommitment,
    RotationResult, SeedCommitment,
};
use crate::proof::verify::{verify_round, VerificationReport, VerifyError};

use super::store::{CommitmentStore, MemoryCommitmentStore, StoreError};
use super::PlayerId;

/// Seed manager errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// No commitment exists for this player.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Rejected input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),

    /// The round's secret has not been rotated out yet.
    #[error("commitment {commitment_hash} not yet revealed for nonce {nonce}")]
    NotYetRevealed {
        /// Commitment the round was played under.
        commitment_hash: CommitmentHash,
        /// Round nonce.
        nonce: u64,
    },

    /// Round has not ended.
    #[error("round is still in progress")]
    RoundInProgress,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<VerifyError> for SeedError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::NotYetRevealed { commitment_hash, nonce } => {
                Self::NotYetRevealed { commitment_hash, nonce }
            }
            VerifyError::RoundInProgress => Self::RoundInProgress,
            VerifyError::InvalidParameter(e) => Self::InvalidParameter(e),
        }
    }
}

/// Per-player commitment lifecycle.
pub struct SeedManager<S = MemoryCommitmentStore, E = OsEntropy> {
    store: S,
    entropy: E,
    config: EngineConfig,
}

impl SeedManager {
    /// In-memory store, OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(MemoryCommitmentStore::new(), OsEntropy, config)
    }
}

impl Default for SeedManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: CommitmentStore, E: EntropySource> SeedManager<S, E> {
    /// Build from an injected store and entropy source.
    pub fn with_parts(store: S, entropy: E, config: EngineConfig) -> Self {
        Self { store, entropy, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying store. Holds live secrets, so it stays inside the crate.
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    fn generate_client_seed(&self) -> ClientSeed {
        ClientSeed::generate(&self.entropy, self.config.client_seed_bytes)
    }

    fn new_player_seeds(&self, player: &PlayerId) -> PlayerSeeds {
        let commitment = SeedCommitment::generate(&self.entropy, self.generate_client_seed());
        info!(
            "Created seed commitment for {} (hash {})",
            player,
            commitment.commitment_hash().short()
        );
        PlayerSeeds::new(commitment)
    }

    /// Get the player's commitment, creating one if absent.
    pub fn ensure(&self, player: &PlayerId) -> Result<CommitmentView, SeedError> {
        let view = self.store.update(player, |slot| {
            slot.get_or_insert_with(|| self.new_player_seeds(player))
                .current()
                .view()
        })?;
        Ok(view)
    }

    /// Public half of the live commitment.
    pub fn current(&self, player: &PlayerId) -> Result<CommitmentView, SeedError> {
        self.store
            .read(player, |seeds| seeds.map(|s| s.current().view()))?
            .ok_or_else(|| SeedError::UnknownPlayer(player.clone()))
    }

    /// Most recently revealed commitment, if any.
    pub fn previous(&self, player: &PlayerId) -> Result<Option<RevealedCommitment>, SeedError> {
        self.store
            .read(player, |seeds| seeds.map(|s| s.previous().cloned()))?
            .ok_or_else(|| SeedError::UnknownPlayer(player.clone()))
    }

    /// Every retained reveal, oldest first.
    pub fn reveal_history(&self, player: &PlayerId) -> Result<Vec<RevealedCommitment>, SeedError> {
        self.store
            .read(player, |seeds| seeds.map(|s| s.history().cloned().collect::<Vec<_>>()))?
            .ok_or_else(|| SeedError::UnknownPlayer(player.clone()))
    }

    /// Replace the client seed. Nonce is untouched.
    pub fn set_client_seed(
        &self,
        player: &PlayerId,
        client_seed: &str,
    ) -> Result<CommitmentView, SeedError> {
        let client_seed = ClientSeed::new(client_seed)?;

        let view = self.store.update(player, |slot| match slot {
            Some(seeds) => {
                seeds.current_mut().set_client_seed(client_seed);
                Ok(seeds.current().view())
            }
            None => Err(SeedError::UnknownPlayer(player.clone())),
        })??;

        debug!("Client seed updated for {}", player);
        Ok(view)
    }

    /// Freeze the current tuple for a new round and advance the nonce.
    ///
    /// Runs under the player's lock, so concurrent calls never see the same
    /// nonce and rotation can't tear the tuple.
    pub fn allocate_nonce(&self, player: &PlayerId) -> Result<NonceAllocation, SeedError> {
        let allocation = self.store.update(player, |slot| {
            slot.get_or_insert_with(|| self.new_player_seeds(player))
                .current_mut()
                .allocate()
        })?;

        debug!(
            "Allocated nonce {} for {} (hash {})",
            allocation.seed.nonce(),
            player,
            allocation.seed.commitment_hash().short()
        );
        Ok(allocation)
    }

    /// Start a round on an `board_size`-cell board with `mine_count` mines.
    ///
    /// Parameters are validated before a nonce is consumed.
    pub fn allocate_round(
        &self,
        player: &PlayerId,
        board_size: u32,
        mine_count: u32,
    ) -> Result<Round, SeedError> {
        let params = BoardParams::new(board_size, mine_count)?;
        let allocation = self.allocate_nonce(player)?;

        let mines = allocation.seed.mine_positions(params);
        let (commitment_hash, client_seed, nonce) = allocation.seed.into_public();

        let round = Round::new(
            player.clone(),
            commitment_hash,
            client_seed,
            nonce,
            params,
            mines,
        );
        info!(
            "Round {} started for {}: {} mines on {} cells (nonce {})",
            round.id(),
            player,
            mine_count,
            board_size,
            nonce
        );
        Ok(round)
    }

    /// Start a round on the configured default board.
    pub fn allocate_default_round(
        &self,
        player: &PlayerId,
        mine_count: u32,
    ) -> Result<Round, SeedError> {
        self.allocate_round(player, self.config.default_board_size, mine_count)
    }

    /// Reveal the live secret and replace it with a fresh commitment.
    ///
    /// `new_client_seed` must be non-empty if given; otherwise a random seed
    /// is generated. The new nonce is 0.
    pub fn rotate(
        &self,
        player: &PlayerId,
        new_client_seed: Option<&str>,
    ) -> Result<RotationResult, SeedError> {
        let client_seed = match new_client_seed {
            Some(seed) => ClientSeed::new(seed)?,
            None => self.generate_client_seed(),
        };
        let next = SeedCommitment::generate(&self.entropy, client_seed);
        let history_limit = self.config.reveal_history;

        let result = self.store.update(player, move |slot| match slot {
            Some(seeds) => Ok(seeds.rotate(next, history_limit)),
            None => Err(SeedError::UnknownPlayer(player.clone())),
        })??;

        info!(
            "Rotated seeds for {}: revealed {} after {} rounds, next {}",
            player,
            result.revealed.commitment_hash.short(),
            result.revealed.final_nonce,
            result.next.commitment_hash.short()
        );
        Ok(result)
    }

    /// Verify a finished round against the player's revealed history.
    ///
    /// Only revealed commitments are consulted; a round played under the
    /// live commitment is `NotYetRevealed`.
    pub fn verify_round(&self, round: &Round) -> Result<VerificationReport, SeedError> {
        if !round.is_finished() {
            return Err(SeedError::RoundInProgress);
        }

        let reveal = self
            .store
            .read(round.player_id(), |seeds| {
                seeds.and_then(|s| s.find_reveal(round.commitment_hash(), round.nonce()).cloned())
            })?
            .ok_or_else(|| SeedError::NotYetRevealed {
                commitment_hash: round.commitment_hash().clone(),
                nonce: round.nonce(),
            })?;

        let report = verify_round(&reveal, round)?;
        if report.verified {
            debug!("Round {} verified", round.id());
        } else {
            warn!(
                "Round {} failed verification (hash_matches={}, positions_match={})",
                round.id(),
                report.hash_matches,
                report.positions_match
            );
        }
        Ok(report)
    }
}
