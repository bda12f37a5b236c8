//! Round State
//!
//! One mines round, frozen at creation to the commitment tuple it was
//! generated from. Mine positions are computed once and never again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::hash::CommitmentHash;
use crate::seeds::PlayerId;

use super::multiplier::multiplier;
use super::params::BoardParams;

/// Unique round identifier.
pub type RoundId = Uuid;

/// Round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Tiles can still be revealed.
    Active,
    /// Player took the payout (or cleared every safe cell).
    CashedOut,
    /// Player revealed a mine.
    Lost,
}

/// Result of revealing a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TileOutcome {
    /// Safe cell; multiplier after this reveal.
    Safe {
        /// Current multiplier.
        multiplier: f64,
    },
    /// Mine; the round is lost.
    Mine,
}

/// Round state-machine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    /// Round already ended.
    #[error("round is not active")]
    NotActive,

    /// Tile is off the board.
    #[error("tile {tile} out of range for board size {board_size}")]
    TileOutOfRange {
        /// Requested tile.
        tile: u32,
        /// Board size.
        board_size: u32,
    },

    /// Tile was revealed earlier.
    #[error("tile {0} already revealed")]
    AlreadyRevealed(u32),

    /// Cash out needs at least one safe reveal.
    #[error("no safe tiles revealed")]
    NothingRevealed,
}

/// A mines round.
#[derive(Debug, Clone)]
pub struct Round {
    id: RoundId,
    player_id: PlayerId,
    commitment_hash: CommitmentHash,
    client_seed: String,
    nonce: u64,
    params: BoardParams,
    mine_positions: Vec<u32>,
    revealed: Vec<u32>,
    status: RoundStatus,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Round {
    /// Create a round from a frozen commitment tuple and its generated
    /// positions.
    pub(crate) fn new(
        player_id: PlayerId,
        commitment_hash: CommitmentHash,
        client_seed: String,
        nonce: u64,
        params: BoardParams,
        mine_positions: Vec<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            commitment_hash,
            client_seed,
            nonce,
            params,
            mine_positions,
            revealed: Vec::new(),
            status: RoundStatus::Active,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Round identifier.
    pub fn id(&self) -> RoundId {
        self.id
    }

    /// Owning player.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Commitment hash in force when the round was created.
    pub fn commitment_hash(&self) -> &CommitmentHash {
        &self.commitment_hash
    }

    /// Client seed in force when the round was created.
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Nonce allocated to this round.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Board parameters.
    pub fn params(&self) -> BoardParams {
        self.params
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Has the round ended?
    pub fn is_finished(&self) -> bool {
        self.status != RoundStatus::Active
    }

    /// Tiles revealed so far, in reveal order.
    pub fn revealed_tiles(&self) -> &[u32] {
        &self.revealed
    }

    /// Mine positions, withheld until the round ends.
    pub fn mine_positions(&self) -> Option<&[u32]> {
        if self.is_finished() {
            Some(&self.mine_positions)
        } else {
            None
        }
    }

    /// Safe reveals so far.
    pub fn safe_reveals(&self) -> u32 {
        let hit_mine = self.status == RoundStatus::Lost;
        self.revealed.len() as u32 - hit_mine as u32
    }

    /// Multiplier for the safe reveals so far.
    pub fn current_multiplier(&self) -> f64 {
        multiplier(self.safe_reveals(), self.params)
    }

    /// When the round started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the round ended.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Reveal a tile.
    ///
    /// A mine ends the round as lost. Revealing the last safe cell ends it
    /// as cashed out.
    pub fn reveal_tile(&mut self, tile: u32) -> Result<TileOutcome, RoundError> {
        if self.is_finished() {
            return Err(RoundError::NotActive);
        }
        if tile >= self.params.board_size() {
            return Err(RoundError::TileOutOfRange {
                tile,
                board_size: self.params.board_size(),
            });
        }
        if self.revealed.contains(&tile) {
            return Err(RoundError::AlreadyRevealed(tile));
        }

        self.revealed.push(tile);

        if self.mine_positions.binary_search(&tile).is_ok() {
            self.finish(RoundStatus::Lost);
            return Ok(TileOutcome::Mine);
        }

        if self.safe_reveals() == self.params.safe_cells() {
            self.finish(RoundStatus::CashedOut);
        }

        Ok(TileOutcome::Safe {
            multiplier: self.current_multiplier(),
        })
    }

    /// Cash out, returning the final multiplier.
    pub fn cash_out(&mut self) -> Result<f64, RoundError> {
        if self.is_finished() {
            return Err(RoundError::NotActive);
        }
        if self.revealed.is_empty() {
            return Err(RoundError::NothingRevealed);
        }
        self.finish(RoundStatus::CashedOut);
        Ok(self.current_multiplier())
    }

    /// Public projection of the round.
    pub fn view(&self) -> RoundView {
        RoundView {
            id: self.id,
            player_id: self.player_id.clone(),
            commitment_hash: self.commitment_hash.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            board_size: self.params.board_size(),
            mine_count: self.params.mine_count(),
            revealed_tiles: self.revealed.clone(),
            status: self.status,
            multiplier: self.current_multiplier(),
            mine_positions: self.mine_positions().map(<[u32]>::to_vec),
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Positions as generated, regardless of status.
    pub(crate) fn frozen_positions(&self) -> &[u32] {
        &self.mine_positions
    }

    fn finish(&mut self, status: RoundStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }
}

/// Serializable public view of a round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    /// Round identifier.
    pub id: RoundId,
    /// Owning player.
    pub player_id: PlayerId,
    /// Commitment hash used.
    pub commitment_hash: CommitmentHash,
    /// Client seed used.
    pub client_seed: String,
    /// Nonce used.
    pub nonce: u64,
    /// Board size (N).
    pub board_size: u32,
    /// Mine count (k).
    pub mine_count: u32,
    /// Revealed tiles in reveal order.
    pub revealed_tiles: Vec<u32>,
    /// Status.
    pub status: RoundStatus,
    /// Current multiplier.
    pub multiplier: f64,
    /// Mine positions, present once the round ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mine_positions: Option<Vec<u32>>,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}
