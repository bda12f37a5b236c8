//! Mine Position Generator
//!
//! The canonical, published algorithm. Third parties recompute it to check
//! rounds, so every step here is part of the public contract:
//!
//! 1. message = `secret:client_seed:nonce` (decimal nonce)
//! 2. seed = first 4 bytes of SHA-256(message), big-endian
//! 3. Mulberry32 seeded with `seed`
//! 4. top-down Fisher-Yates over `[0, N)`
//! 5. mines = first `k` shuffled cells, sorted ascending
//!
//! There is no rejection loop: the generator is total and O(N).

use crate::core::rng::Mulberry32;

use super::params::{BoardParams, ParamError};

/// Generate mine positions for a validated board.
///
/// Returns exactly `params.mine_count()` distinct cells in
/// `[0, params.board_size())`, sorted ascending. Sorting is for a stable
/// representation only; set membership is what counts.
pub fn generate_mine_positions(
    secret: &str,
    client_seed: &str,
    nonce: u64,
    params: BoardParams,
) -> Vec<u32> {
    let mut rng = Mulberry32::for_round(secret, client_seed, nonce);

    let mut cells: Vec<u32> = (0..params.board_size()).collect();
    rng.shuffle(&mut cells);

    cells.truncate(params.mine_count() as usize);
    cells.sort_unstable();
    cells
}

/// Generate mine positions from raw board parameters.
pub fn mine_positions(
    secret: &str,
    client_seed: &str,
    nonce: u64,
    board_size: u32,
    mine_count: u32,
) -> Result<Vec<u32>, ParamError> {
    let params = BoardParams::new(board_size, mine_count)?;
    Ok(generate_mine_positions(secret, client_seed, nonce, params))
}

/// Cells of the board that are not mines, ascending.
pub fn safe_cells(params: BoardParams, mines: &[u32]) -> Vec<u32> {
    (0..params.board_size())
        .filter(|cell| mines.binary_search(cell).is_err())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zero_secret() -> String {
        "0".repeat(64)
    }

    #[test]
    fn test_regression_vector() {
        // Published fixture. Must never change.
        let mines = mine_positions(&zero_secret(), "test", 1, 25, 3).unwrap();
        assert_eq!(mines, vec![5, 15, 19]);

        let mines = mine_positions(&zero_secret(), "test", 0, 25, 3).unwrap();
        assert_eq!(mines, vec![9, 11, 12]);
    }

    #[test]
    fn test_single_safe_cell() {
        let params = BoardParams::new(25, 24).unwrap();
        let mines = generate_mine_positions(&zero_secret(), "test", 1, params);

        assert_eq!(mines.len(), 24);
        assert_eq!(safe_cells(params, &mines), vec![18]);
    }

    #[test]
    fn test_smallest_board() {
        let params = BoardParams::new(2, 1).unwrap();
        for nonce in 0..20 {
            let mines = generate_mine_positions("s", "c", nonce, params);
            assert_eq!(mines.len(), 1);
            assert!(mines[0] < 2);
        }
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert_eq!(
            mine_positions("s", "c", 0, 1, 1),
            Err(ParamError::BoardTooSmall(1))
        );
        assert!(mine_positions("s", "c", 0, 25, 0).is_err());
        assert!(mine_positions("s", "c", 0, 25, 25).is_err());
    }

    #[test]
    fn test_tuple_sensitivity() {
        let params = BoardParams::standard(5).unwrap();
        let base = generate_mine_positions("secret", "client", 3, params);

        // Not a guarantee in general, but these specific tuples differ.
        assert_ne!(base, generate_mine_positions("secret", "client", 4, params));
        assert_ne!(base, generate_mine_positions("secret", "client2", 3, params));
        assert_ne!(base, generate_mine_positions("secret2", "client", 3, params));
    }

    #[test]
    fn test_safe_cells_complement() {
        let params = BoardParams::standard(3).unwrap();
        let mines = vec![5, 15, 19];
        let safe = safe_cells(params, &mines);

        assert_eq!(safe.len(), 22);
        assert!(safe.iter().all(|c| !mines.contains(c)));
    }

    proptest! {
        #[test]
        fn prop_deterministic(
            secret in "[0-9a-f]{64}",
            client_seed in ".{1,32}",
            nonce in any::<u64>(),
            board_size in 2u32..200,
            mine_frac in 0.0f64..1.0,
        ) {
            let mine_count = 1 + ((board_size - 2) as f64 * mine_frac) as u32;
            let params = BoardParams::new(board_size, mine_count).unwrap();

            let a = generate_mine_positions(&secret, &client_seed, nonce, params);
            let b = generate_mine_positions(&secret, &client_seed, nonce, params);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_cardinality(
            secret in "[0-9a-f]{64}",
            client_seed in ".{1,32}",
            nonce in any::<u64>(),
            board_size in 2u32..200,
            mine_frac in 0.0f64..1.0,
        ) {
            let mine_count = 1 + ((board_size - 2) as f64 * mine_frac) as u32;
            let params = BoardParams::new(board_size, mine_count).unwrap();

            let mines = generate_mine_positions(&secret, &client_seed, nonce, params);
            prop_assert_eq!(mines.len(), mine_count as usize);
            prop_assert!(mines.iter().all(|&m| m < board_size));
            // Sorted strictly ascending implies distinct.
            prop_assert!(mines.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
