//! Board Parameters
//!
//! Validated board size / mine count pairs. Validation happens once at the
//! boundary so the generator and multiplier stay total.

use serde::{Deserialize, Serialize};

/// Standard 5x5 board.
pub const DEFAULT_BOARD_SIZE: u32 = 25;

/// Largest board the engine accepts.
///
/// Keeps the shuffle buffer bounded, and keeps `index * 2^32` products well
/// inside f64 precision so float-based reimplementations agree exactly.
pub const MAX_BOARD_SIZE: u32 = 1 << 20;

/// Rejected input parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// Board must have at least two cells.
    #[error("board size must be greater than 1, got {0}")]
    BoardTooSmall(u32),

    /// Board exceeds `MAX_BOARD_SIZE`.
    #[error("board size {0} exceeds maximum {}", MAX_BOARD_SIZE)]
    BoardTooLarge(u32),

    /// Mine count must be in [1, board_size - 1].
    #[error("mine count {mines} outside [1, {}] for board size {board_size}", .board_size.saturating_sub(1))]
    MineCountOutOfRange {
        /// Requested mines.
        mines: u32,
        /// Board size it was requested for.
        board_size: u32,
    },

    /// Client seed may not be empty.
    #[error("client seed must not be empty")]
    EmptyClientSeed,
}

/// A validated (board size, mine count) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardParams")]
pub struct BoardParams {
    board_size: u32,
    mine_count: u32,
}

#[derive(Deserialize)]
struct RawBoardParams {
    board_size: u32,
    mine_count: u32,
}

impl TryFrom<RawBoardParams> for BoardParams {
    type Error = ParamError;

    fn try_from(raw: RawBoardParams) -> Result<Self, Self::Error> {
        Self::new(raw.board_size, raw.mine_count)
    }
}

impl BoardParams {
    /// Validate a board. Out-of-range values are rejected, never clamped.
    pub fn new(board_size: u32, mine_count: u32) -> Result<Self, ParamError> {
        if board_size <= 1 {
            return Err(ParamError::BoardTooSmall(board_size));
        }
        if board_size > MAX_BOARD_SIZE {
            return Err(ParamError::BoardTooLarge(board_size));
        }
        if mine_count == 0 || mine_count >= board_size {
            return Err(ParamError::MineCountOutOfRange {
                mines: mine_count,
                board_size,
            });
        }
        Ok(Self { board_size, mine_count })
    }

    /// Standard board with the given mine count.
    pub fn standard(mine_count: u32) -> Result<Self, ParamError> {
        Self::new(DEFAULT_BOARD_SIZE, mine_count)
    }

    /// Number of cells (N).
    #[inline]
    pub fn board_size(&self) -> u32 {
        self.board_size
    }

    /// Number of mines (k).
    #[inline]
    pub fn mine_count(&self) -> u32 {
        self.mine_count
    }

    /// Number of safe cells (N - k), always at least 1.
    #[inline]
    pub fn safe_cells(&self) -> u32 {
        self.board_size - self.mine_count
    }
}
