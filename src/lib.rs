//! # Mines Fair
//!
//! Provably-fair randomness for mines rounds: commit to a server secret,
//! derive mine positions from it deterministically, reveal it on rotation,
//! and let anyone regenerate the board.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MINES FAIR                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── hash.rs     - SHA-256 commitments                      │
//! │  ├── rng.rs      - Mulberry32 PRNG and round seeding        │
//! │  └── entropy.rs  - Secret and client seed entropy           │
//! │                                                             │
//! │  game/           - Game logic (deterministic)               │
//! │  ├── params.rs   - Board parameter validation               │
//! │  ├── mines.rs    - Mine position generation                 │
//! │  ├── multiplier.rs - Payout multiplier                      │
//! │  └── round.rs    - Round state machine                      │
//! │                                                             │
//! │  proof/          - Commit-reveal protocol                   │
//! │  ├── commitment.rs - Commitments, nonces, rotation          │
//! │  └── verify.rs   - Verification by regeneration             │
//! │                                                             │
//! │  seeds/          - Per-player state (concurrent)            │
//! │  ├── store.rs    - Locked per-player storage                │
//! │  └── manager.rs  - Commitment lifecycle                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given `(secret, client_seed, nonce, board_size, mine_count)`, mine
//! positions are identical on every platform:
//! - SHA-256 of `secret:client_seed:nonce`, first 4 bytes big-endian
//! - Mulberry32 with wrapping `u32` arithmetic
//! - Integer index selection, no floating point
//! - Fisher–Yates from the top, first `k` cells, sorted

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod proof;
pub mod seeds;

// Re-export commonly used types
pub use config::EngineConfig;
pub use core::hash::{commit, CommitmentHash, ServerSecret};
pub use core::rng::Mulberry32;
pub use game::mines::{generate_mine_positions, mine_positions};
pub use game::multiplier::multiplier;
pub use game::params::{BoardParams, ParamError};
pub use game::round::{Round, RoundStatus, TileOutcome};
pub use proof::commitment::{CommitmentView, RevealedCommitment, RotationResult};
pub use proof::verify::{verify_claim, RoundClaim, VerificationReport};
pub use seeds::{PlayerId, SeedError, SeedManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
