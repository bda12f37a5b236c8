//! Engine Configuration
//!
//! Defaults plus environment overrides.

use crate::game::params::DEFAULT_BOARD_SIZE;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Board size used when the caller doesn't pick one.
    pub default_board_size: u32,
    /// Random bytes in a generated client seed (hex doubles the length).
    pub client_seed_bytes: usize,
    /// Revealed commitments kept per player. At least 1.
    pub reveal_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_board_size: DEFAULT_BOARD_SIZE,
            client_seed_bytes: 16,
            reveal_history: 1,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    ///
    /// Absent or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_board_size: env_or("MINES_BOARD_SIZE", defaults.default_board_size),
            client_seed_bytes: env_or("MINES_CLIENT_SEED_BYTES", defaults.client_seed_bytes).max(1),
            reveal_history: env_or("MINES_REVEAL_HISTORY", defaults.reveal_history).max(1),
        }
    }

    /// Override reveal history (clamped to at least 1).
    pub fn with_reveal_history(mut self, reveal_history: usize) -> Self {
        self.reveal_history = reveal_history.max(1);
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
