//! Pixel Tactics headless runner
//!
//! `pixel-tactics [seed] [config.json]` plays an all-bot match on the
//! standard arena and prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use pixel_tactics::GameConfig;
    use pixel_tactics::sim::{
        ArenaSetup, GameState, MatchPhase, Roster, Snapshot, TickInput, tick,
    };

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("seed must be an unsigned integer, got {raw:?}"))?,
        None => 0x5EED,
    };
    let config = match args.next() {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };

    log::info!("Pixel Tactics (headless) starting, seed {seed}");

    let arena = ArenaSetup::standard().context("building standard arena")?;
    let dt = config.sim_dt();
    // Generous cap: every round can run to time-out
    let max_ticks = (f64::from(config.win_score) * 2.0 * f64::from(config.round_duration + 10.0)
        / f64::from(dt)) as u64;

    let mut state = GameState::new(arena, config, Roster::all_bots(), seed)?;
    let class_a = state.random_class();
    let class_b = state.random_class();
    state.start_match(class_a, class_b);

    let input = TickInput::default();
    let mut last_round = state.round;
    while !matches!(state.phase, MatchPhase::MatchEnd { .. }) && state.time_ticks < max_ticks {
        tick(&mut state, &input, dt);
        if state.round != last_round {
            last_round = state.round;
            log::debug!("Round {last_round} set up");
        }
    }

    match state.phase {
        MatchPhase::MatchEnd { winner } => log::info!(
            "Team {:?} wins {}-{} ({} as A, {} as B)",
            winner,
            state.scores.a,
            state.scores.b,
            class_a.name(),
            class_b.name()
        ),
        _ => log::warn!("Stopped after {} ticks without a winner", state.time_ticks),
    }

    println!("{}", Snapshot::capture(&state).to_json()?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host page drives `sim::tick` directly
}
