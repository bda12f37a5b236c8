//! Commitment Store
//!
//! The seam a durable per-player store plugs into. Every mutation runs
//! inside `update`, under that player's lock, so read-then-increment and
//! rotation can never interleave for the same player.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::proof::commitment::PlayerSeeds;

use super::PlayerId;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("lock poisoned for player {0}")]
    Poisoned(PlayerId),

    /// Backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Keyed store of per-player seed records.
pub trait CommitmentStore: Send + Sync {
    /// Run `f` on the player's record with exclusive access.
    ///
    /// `None` means no record yet; `f` may create one, and the store keeps
    /// it only if it did. No other `update` for the same player may run
    /// concurrently.
    fn update<R, F>(&self, player: &PlayerId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<PlayerSeeds>) -> R;

    /// Run `f` on a consistent snapshot of the player's record.
    fn read<R, F>(&self, player: &PlayerId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(Option<&PlayerSeeds>) -> R;
}

type Slot = Arc<Mutex<Option<PlayerSeeds>>>;

/// In-memory store with one mutex per player.
///
/// The outer lock only guards slot lookup/insertion; per-player work holds
/// the slot's own mutex, so different players never contend. A record is
/// created under the outer write lock, and only when `update` fills it.
#[derive(Default)]
pub struct MemoryCommitmentStore {
    players: RwLock<BTreeMap<PlayerId, Slot>>,
}

impl MemoryCommitmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of players with a record.
    pub fn player_count(&self) -> usize {
        match self.players.read() {
            Ok(players) => players.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn slot(&self, player: &PlayerId) -> Result<Option<Slot>, StoreError> {
        let players = self
            .players
            .read()
            .map_err(|_| StoreError::Poisoned(player.clone()))?;
        Ok(players.get(player).cloned())
    }

    fn update_slot<R, F>(slot: &Slot, player: &PlayerId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<PlayerSeeds>) -> R,
    {
        let mut record = slot
            .lock()
            .map_err(|_| StoreError::Poisoned(player.clone()))?;
        Ok(f(&mut record))
    }
}

impl CommitmentStore for MemoryCommitmentStore {
    fn update<R, F>(&self, player: &PlayerId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Option<PlayerSeeds>) -> R,
    {
        if let Some(slot) = self.slot(player)? {
            return Self::update_slot(&slot, player, f);
        }

        let mut players = self
            .players
            .write()
            .map_err(|_| StoreError::Poisoned(player.clone()))?;

        // Another writer may have created the record since the read above.
        let existing = players.get(player).cloned();
        if let Some(slot) = existing {
            drop(players);
            return Self::update_slot(&slot, player, f);
        }

        // Only a record the closure actually created gets a slot.
        let mut record = None;
        let result = f(&mut record);
        if record.is_some() {
            players.insert(player.clone(), Arc::new(Mutex::new(record)));
        }
        Ok(result)
    }

    fn read<R, F>(&self, player: &PlayerId, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(Option<&PlayerSeeds>) -> R,
    {
        match self.slot(player)? {
            Some(slot) => {
                let record = slot
                    .lock()
                    .map_err(|_| StoreError::Poisoned(player.clone()))?;
                Ok(f(record.as_ref()))
            }
            None => Ok(f(None)),
        }
    }
}
