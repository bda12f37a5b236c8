//! Provably-Fair Proof System
//!
//! Makes every round checkable after the fact through:
//! - Seed commitments published before play
//! - Reveal on rotation
//! - Verification by deterministic regeneration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - Commit / allocate / reveal lifecycle     │
//! │  verify.rs       - Verification by regeneration             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod verify;

// Re-export key types
pub use commitment::{
    ClientSeed, CommitmentError, CommitmentView, NonceAllocation, PlayerSeeds,
    RevealedCommitment, RotationResult, RoundSeed, SeedCommitment,
};
pub use verify::{verify_claim, verify_round, RoundClaim, VerificationReport, VerifyError};
