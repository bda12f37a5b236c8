//! Game logic (deterministic).
//!
//! Everything here is a pure function of its inputs except the timestamps
//! and identifiers stamped onto a `Round`.

pub mod mines;
pub mod multiplier;
pub mod params;
pub mod round;

pub use mines::{generate_mine_positions, mine_positions, safe_cells};
pub use multiplier::{max_multiplier, multiplier};
pub use params::{BoardParams, ParamError, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
pub use round::{Round, RoundError, RoundId, RoundStatus, RoundView, TileOutcome};
