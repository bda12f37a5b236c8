//! Core primitives.
//!
//! Hashing, entropy, and the deterministic PRNG. Everything except
//! `entropy` is a pure function of its inputs.

pub mod entropy;
pub mod hash;
pub mod rng;

// Re-export core types
pub use entropy::{EntropySource, OsEntropy, SeededEntropy};
pub use hash::{check, commit, CommitmentHash, HashError, ServerSecret};
pub use rng::{derive_round_seed, Mulberry32};
