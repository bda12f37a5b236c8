//! Entropy Sources
//!
//! Secure randomness for server secrets and generated client seeds.
//! Only this module touches a non-deterministic source; everything that
//! derives mine positions is seeded from hashes.

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// A cryptographically secure random byte source.
pub trait EntropySource: Send + Sync {
    /// Fill `buf` with random bytes.
    fn fill_bytes(&self, buf: &mut [u8]);
}

/// Operating-system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// Reproducible source for tests and demos.
///
/// Never use this in production: anyone knowing the seed can predict
/// every secret it produces.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    /// Create from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill_bytes(&self, buf: &mut [u8]) {
        // A panic mid-fill leaves the generator usable, so poisoning is ignored.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.fill_bytes(buf);
    }
}

/// `len` random bytes from `entropy`, hex encoded.
pub fn random_hex<E: EntropySource + ?Sized>(entropy: &E, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    entropy.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
