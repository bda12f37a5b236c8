//! Deterministic Random Number Generator
//!
//! Uses the Mulberry32 algorithm: one 32-bit state, one additive step and
//! a fixed xorshift/multiply mix per call. Simple enough that any third
//! party can reimplement it bit-for-bit from this file.

use serde::{Deserialize, Serialize};

use super::hash::sha256;

/// Additive constant applied to the state on every call.
pub const MULBERRY32_INCREMENT: u32 = 0x6D2B_79F5;

/// Deterministic PRNG using the Mulberry32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG produces the exact same sequence on any
/// platform. All arithmetic is wrapping `u32`.
///
/// # Example
///
/// ```
/// use mines_fair::core::rng::Mulberry32;
///
/// let mut rng = Mulberry32::new(42);
/// let value = rng.next_u32();
/// assert_eq!(value, 2581720956); // Always the same!
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// Zero is a valid seed; the additive step moves the state off zero
    /// before the first output.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create the RNG for one round.
    pub fn for_round(secret: &str, client_seed: &str, nonce: u64) -> Self {
        Self::new(derive_round_seed(secret, client_seed, nonce))
    }

    /// Generate the next 32-bit random value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY32_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate a float in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Generate an index in [0, bound).
    ///
    /// Equals `floor(next_f64() * bound)`, computed in exact integer
    /// arithmetic so no float rounding can creep in.
    #[inline]
    pub fn next_index(&mut self, bound: u32) -> u32 {
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }

    /// Shuffle a slice in place, top-down Fisher-Yates.
    ///
    /// For `i` from `len - 1` down to `1`, swaps `slice[i]` with
    /// `slice[next_index(i + 1)]`. Exactly `len - 1` draws.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in (1..len).rev() {
            let j = self.next_index((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Canonical round message: `secret:client_seed:nonce`.
pub fn round_message(secret: &str, client_seed: &str, nonce: u64) -> String {
    format!("{}:{}:{}", secret, client_seed, nonce)
}

/// Derive the PRNG seed for a round.
///
/// SHA-256 of the round message, first 4 bytes read big-endian.
pub fn derive_round_seed(secret: &str, client_seed: &str, nonce: u64) -> u32 {
    let digest = sha256(round_message(secret, client_seed, nonce).as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = Mulberry32::new(12345);
        let mut rng2 = Mulberry32::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_known_values() {
        // These values must never change!
        // If they do, every published round stops verifying.
        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_u32(), 2581720956);
        assert_eq!(rng.next_u32(), 1925393290);
        assert_eq!(rng.next_u32(), 3661312704);

        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_u32(), 1144304738);
        assert_eq!(rng.next_u32(), 1416247);
        assert_eq!(rng.next_u32(), 958946056);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = Mulberry32::new(9999);
        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_next_index_matches_float_form() {
        let mut a = Mulberry32::new(2024);
        let mut b = Mulberry32::new(2024);

        for bound in 1..500u32 {
            let exact = a.next_index(bound);
            let float = (b.next_f64() * bound as f64).floor() as u32;
            assert_eq!(exact, float);
            assert!(exact < bound);
        }
    }

    #[test]
    fn test_next_index_bound_one() {
        let mut rng = Mulberry32::new(5);
        for _ in 0..100 {
            assert_eq!(rng.next_index(1), 0);
        }
    }

    #[test]
    fn test_shuffle_determinism() {
        let mut rng1 = Mulberry32::new(1111);
        let mut rng2 = Mulberry32::new(1111);

        let mut arr1 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut arr2 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        rng1.shuffle(&mut arr1);
        rng2.shuffle(&mut arr2);

        assert_eq!(arr1, arr2);

        let mut sorted = arr1;
        sorted.sort();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_shuffle_draw_count() {
        let mut shuffled = Mulberry32::new(77);
        let mut counted = Mulberry32::new(77);

        let mut arr = [0u8; 25];
        shuffled.shuffle(&mut arr);
        for _ in 0..24 {
            counted.next_u32();
        }

        assert_eq!(shuffled.state(), counted.state());
    }

    #[test]
    fn test_round_message_format() {
        assert_eq!(round_message("abc", "seed", 7), "abc:seed:7");
        assert_eq!(round_message("", "", 0), "::0");
    }

    #[test]
    fn test_derive_round_seed() {
        let secret = "0".repeat(64);
        assert_eq!(derive_round_seed(&secret, "test", 1), 0xF98B_AE36);
        assert_eq!(derive_round_seed(&secret, "test", 0), 725500874);

        // Any change to the tuple changes the seed
        assert_ne!(
            derive_round_seed(&secret, "test", 1),
            derive_round_seed(&secret, "test", 2)
        );
    }
}
