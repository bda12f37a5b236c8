//! Mines Fair demo
//!
//! Plays a few rounds against the in-memory engine, rotates the seed, and
//! verifies every round from the revealed secret.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mines_fair::{
    game::round::TileOutcome, verify_claim, EngineConfig, PlayerId, Round, RoundClaim,
    SeedManager, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env();
    info!("Mines Fair v{}", VERSION);
    info!(
        "Board: {} cells, client seed: {} bytes, reveal history: {}",
        config.default_board_size, config.client_seed_bytes, config.reveal_history
    );

    let manager = Arc::new(SeedManager::new(config));
    let player = PlayerId::new("demo-player");

    let commitment = manager.ensure(&player)?;
    info!("Published commitment: {}", commitment.commitment_hash);

    let rounds = play_concurrently(&manager, &player, 8).await?;

    info!("=== Rotating seeds ===");
    let rotation = manager.rotate(&player, None)?;
    println!("{}", serde_json::to_string_pretty(&rotation)?);

    info!("=== Verifying {} rounds ===", rounds.len());
    let mut failures = 0;
    for round in &rounds {
        let report = manager.verify_round(round)?;
        if report.verified {
            info!("Round nonce {} verified: {:?}", round.nonce(), report.regenerated_positions);
        } else {
            warn!("Round nonce {} FAILED verification", round.nonce());
            failures += 1;
        }
    }

    // The same check with nothing but public data
    if let Some(round) = rounds.first() {
        let claim = RoundClaim::from_round(&rotation.revealed, round);
        let report = verify_claim(&claim)?;
        info!("Standalone verification of nonce {}: {}", round.nonce(), report.verified);
    }

    if failures > 0 {
        bail!("{} rounds failed verification", failures);
    }
    info!("ALL ROUNDS VERIFIED");
    Ok(())
}

/// Start `count` rounds in parallel and play each to completion.
async fn play_concurrently(
    manager: &Arc<SeedManager>,
    player: &PlayerId,
    count: usize,
) -> anyhow::Result<Vec<Round>> {
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        let manager = Arc::clone(manager);
        let player = player.clone();
        handles.push(tokio::task::spawn_blocking(move || -> anyhow::Result<Round> {
            let mines = 1 + (i as u32 % 5);
            let mut round = manager.allocate_default_round(&player, mines)?;
            play(&mut round)?;
            Ok(round)
        }));
    }

    let mut rounds = Vec::with_capacity(count);
    let mut nonces = BTreeSet::new();
    for handle in handles {
        let round = handle.await.context("round task panicked")??;
        if !nonces.insert(round.nonce()) {
            bail!("nonce {} allocated twice", round.nonce());
        }
        rounds.push(round);
    }
    rounds.sort_by_key(Round::nonce);
    Ok(rounds)
}

/// Reveal tiles left to right, cashing out after three safe ones.
fn play(round: &mut Round) -> anyhow::Result<()> {
    for tile in 0..round.params().board_size() {
        match round.reveal_tile(tile)? {
            TileOutcome::Mine => {
                info!("Nonce {}: mine at {}", round.nonce(), tile);
                return Ok(());
            }
            TileOutcome::Safe { multiplier } => {
                if round.is_finished() {
                    return Ok(());
                }
                if round.safe_reveals() == 3 {
                    let payout = round.cash_out()?;
                    info!("Nonce {}: cashed out at {:.4}x", round.nonce(), payout);
                    return Ok(());
                }
                info!("Nonce {}: tile {} safe ({:.4}x)", round.nonce(), tile, multiplier);
            }
        }
    }
    Ok(())
}
