//! Payout Multiplier
//!
//! Pure function of reveal progress. Depends only on how many safe cells
//! have been revealed, never on which ones.

use super::params::BoardParams;

/// Per-step bonus for carrying `mine_count` mines.
#[inline]
pub fn risk_bonus(mine_count: u32) -> f64 {
    (1.0 + 0.5 * (mine_count as f64 - 1.0)).max(0.0)
}

/// Factor applied for the safe reveal with zero-based index `index`.
///
/// `None` once no safe cells remain at that index.
pub fn step_factor(index: u32, params: BoardParams) -> Option<f64> {
    let remaining_cells = params.board_size() as i64 - index as i64;
    let remaining_safe = params.safe_cells() as i64 - index as i64;
    if remaining_safe <= 0 {
        return None;
    }
    Some((remaining_cells as f64 / remaining_safe as f64) * risk_bonus(params.mine_count()))
}

/// Multiplier after `safe_reveals` safe cells.
///
/// Starts at 1.0 and multiplies in one step factor per reveal. Reveal
/// counts past the number of safe cells keep the last reachable value.
pub fn multiplier(safe_reveals: u32, params: BoardParams) -> f64 {
    let mut total = 1.0;
    for index in 0..safe_reveals {
        match step_factor(index, params) {
            Some(factor) => total *= factor,
            None => break,
        }
    }
    total
}

/// Multiplier after every safe cell is revealed.
pub fn max_multiplier(params: BoardParams) -> f64 {
    multiplier(params.safe_cells(), params)
}
