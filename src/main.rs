//! Fruit Fusion headless runner
//!
//! Plays one session against a stand-in physics model, records it to a
//! tape, then replays the tape and checks the final state hash matches.

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod tape;

use fruit_fusion::{
    VERSION,
    config::GameConfig,
    core::fixed::{to_float, Fixed},
    core::rng::derive_session_seed,
    core::vec2::FixedVec2,
    game::{
        contact::{find_contacts, BodySync},
        events::GameEventData,
        input::{InputEvent, InputFrame},
        state::GameState,
        tick::tick,
    },
};
use tape::SessionTape;

/// Drops before the runner gives up and ends the session itself.
const MAX_DROPS: u32 = 400;

/// Distinct x positions the runner aims at.
const LANES: i32 = 9;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Fruit Fusion v{}", VERSION);

    let config = GameConfig::from_env().context("loading configuration")?;
    let rules = config.build_rules().context("building session rules")?;
    info!("Tiers: {}", rules.catalog.describe());

    let session_id = *uuid::Uuid::new_v4().as_bytes();
    let seed = config.seed.unwrap_or_else(|| derive_session_seed(&session_id));
    info!("Session ID: {}", hex::encode(session_id));
    info!("RNG Seed: {}", seed);

    let mut state = GameState::new(session_id, seed, rules.clone());
    let mut tape = SessionTape::new(session_id, seed);
    let mut stats = RunStats::default();

    run_frame(&mut state, &mut tape, &mut stats, InputFrame::from(vec![InputEvent::Start]));

    let width = state.rules.playfield.width;
    for n in 0..MAX_DROPS {
        let lane = (n as i32 * 5) % LANES;
        let x = lane_x(width, lane);
        run_frame(
            &mut state,
            &mut tape,
            &mut stats,
            InputFrame::from(vec![InputEvent::PointerMove(x), InputEvent::PointerDown]),
        );

        let bodies = settle(&state);
        run_frame(&mut state, &mut tape, &mut stats, InputFrame::from(vec![InputEvent::BodySync(bodies)]));

        let contacts = find_contacts(&state);
        if !contacts.is_empty() {
            run_frame(&mut state, &mut tape, &mut stats, InputFrame::from(vec![InputEvent::Collisions(contacts)]));
        }

        if state.is_ended() {
            break;
        }
    }

    if !state.is_ended() {
        warn!("No top-tier collision after {} drops, ending session", MAX_DROPS);
        run_frame(&mut state, &mut tape, &mut stats, InputFrame::from(vec![InputEvent::EndRequested]));
    }

    info!("=== Session Results ===");
    info!("End reason: {:?}", state.end_reason);
    info!("Drops: {}, fusions: {}, commands: {}", stats.drops, state.fusions, stats.commands);
    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let bytes = tape.to_bytes().context("encoding tape")?;
    info!("Tape: {} frames, {} bytes", tape.frames.len(), bytes.len());
    let replayed = SessionTape::from_bytes(&bytes).context("decoding tape")?;
    let replay_hash = replayed.final_hash(rules);
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

#[derive(Default)]
struct RunStats {
    drops: u32,
    commands: usize,
}

/// Tick, record and log one frame.
fn run_frame(state: &mut GameState, tape: &mut SessionTape, stats: &mut RunStats, frame: InputFrame) {
    let result = tick(state, &frame);
    tape.record(frame);
    stats.commands += result.commands.len();

    for event in &result.events {
        match &event.data {
            GameEventData::Dropped { entity, tier, .. } => {
                stats.drops += 1;
                debug!("Dropped {} ({})", entity, state.catalog().name_of(*tier));
            }
            GameEventData::Fused { from_tier, into_tier, position, .. } => {
                let (x, y) = position.to_floats();
                info!(
                    "Fused two {} into {} at ({:.1}, {:.1})",
                    state.catalog().name_of(*from_tier),
                    state.catalog().name_of(*into_tier),
                    x,
                    y
                );
            }
            GameEventData::SessionEnded { reason } => {
                info!("Session ended: {:?}", reason);
            }
            _ => {}
        }
    }
}

/// x-coordinate of a lane, lanes spread evenly across the playfield.
fn lane_x(width: Fixed, lane: i32) -> Fixed {
    let step = width / (LANES + 1);
    step * (lane + 1)
}

/// Stand-in physics: every active fruit rests on the floor at its x.
fn settle(state: &GameState) -> Vec<BodySync> {
    let floor = state.rules.playfield.height;
    state
        .active_entities()
        .filter_map(|e| {
            let radius = e.body?.radius;
            let y = floor - radius;
            debug!("Settled {} at y={:.1}", e.id, to_float(y));
            Some(BodySync {
                entity: e.id,
                position: FixedVec2::new(e.position.x, y),
            })
        })
        .collect()
}

