//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically.

use glam::Vec2;

use super::bomb::BombOutcome;
use super::bot::drive_bot;
use super::player::{PlayerId, Team};
use super::state::{GameState, MatchPhase, RoundEndReason};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Human input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Primary attack held
    pub fire: bool,
    /// Plant/defuse held
    pub interact: bool,
    /// Aim point in world space
    pub aim: Vec2,
}

impl TickInput {
    /// Directional keys as a -1..=1 axis pair (screen Y grows downward)
    pub fn move_axis(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        MatchPhase::TeamSelect | MatchPhase::MatchEnd { .. } => return,
        MatchPhase::RoundIntro { remaining } => {
            update_players(state, input, dt, true);
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.phase = MatchPhase::Playing;
                state.side_swap_event = false;
                log::info!(
                    "Round {} live: team {:?} attacking",
                    state.round,
                    state.attack_team
                );
            } else {
                state.phase = MatchPhase::RoundIntro { remaining };
            }
        }
        MatchPhase::RoundEnd { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.reset_for_next_round();
            } else {
                state.phase = MatchPhase::RoundEnd { remaining };
            }
        }
        MatchPhase::Playing => play(state, input, dt),
    }
    state.time_ticks += 1;
}

/// One live-round step; stops as soon as the round is decided
fn play(state: &mut GameState, input: &TickInput, dt: f32) {
    state.round_time = (state.round_time - dt).max(0.0);
    if state.round_time <= 0.0 {
        let defenders = state.defending_team();
        state.end_round(defenders, RoundEndReason::TimeUp);
        return;
    }

    update_players(state, input, dt, false);
    human_actions(state, input);

    for projectile in state.projectiles.iter_mut() {
        projectile.update(dt, &state.grid, &mut state.players);
    }
    state.projectiles.retain(|p| !p.expired());

    if let Some(outcome) = state.bomb.update(dt, &mut state.players, &state.config) {
        let (winner, reason) = match outcome {
            BombOutcome::Exploded => (state.attack_team, RoundEndReason::Exploded),
            BombOutcome::Defused => (state.defending_team(), RoundEndReason::Defused),
        };
        state.end_round(winner, reason);
        return;
    }

    let alive_a = state.alive_count(Team::A);
    let alive_b = state.alive_count(Team::B);
    if alive_a == 0 && alive_b > 0 {
        state.end_round(Team::B, RoundEndReason::Elimination);
    } else if alive_b == 0 && alive_a > 0 {
        state.end_round(Team::A, RoundEndReason::Elimination);
    }
}

/// Per-player update in roster order; frozen players only decay timers
fn update_players(state: &mut GameState, input: &TickInput, dt: f32, frozen: bool) {
    let GameState {
        players,
        projectiles,
        grid,
        config,
        rng,
        ..
    } = state;

    for i in 0..players.len() {
        if !players[i].alive {
            continue;
        }
        players[i].advance_timers(dt);
        if frozen {
            continue;
        }

        if players[i].is_bot {
            drive_bot(players, PlayerId(i), dt, grid, config, rng, projectiles);
        } else {
            players[i].steer(input.move_axis(), dt, grid);
        }
        players[i].continue_burst(&config.classes, rng, projectiles);
    }
}

/// Human fire and plant/defuse
fn human_actions(state: &mut GameState, input: &TickInput) {
    let Some(id) = state.human_id() else {
        return;
    };
    if !state.players[id.0].alive {
        return;
    }

    if input.fire {
        let GameState {
            players,
            projectiles,
            config,
            rng,
            ..
        } = state;
        players[id.0].fire(input.aim, &config.classes, rng, projectiles);
    }

    if input.interact {
        let player = &state.players[id.0];
        let attacking = player.team == state.attack_team;
        if !state.bomb.planted {
            if attacking {
                state.bomb.start_plant(player, &state.config);
            }
        } else if state.bomb.plant_done && !attacking {
            state.bomb.start_defuse(player, &state.config);
        }
    }
}

/// Converts variable frame time into a bounded number of fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time; returns the number of ticks run
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        let dt = state.config.sim_dt();
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            tick(state, input, dt);
            self.accumulator -= dt;
            substeps += 1;
        }
        // Drop any backlog the substep cap left behind
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(dt);
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self, dt: f32) -> f32 {
        if dt > 0.0 {
            (self.accumulator / dt).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::arena::ArenaSetup;
    use crate::sim::player::{CharacterClass, ClassState};
    use crate::sim::state::{Roster, RoundResult};

    fn game(roster: Roster, seed: u64) -> GameState {
        let mut state = GameState::new(
            ArenaSetup::standard().unwrap(),
            GameConfig::default(),
            roster,
            seed,
        )
        .unwrap();
        state.start_match(CharacterClass::Ranger, CharacterClass::Ranger);
        state
    }

    fn run_until(
        state: &mut GameState,
        input: &TickInput,
        max_ticks: u32,
        done: impl Fn(&GameState) -> bool,
    ) {
        for _ in 0..max_ticks {
            if done(state) {
                return;
            }
            tick(state, input, SIM_DT);
        }
        assert!(done(state), "condition not reached in {max_ticks} ticks");
    }

    fn skip_intro(state: &mut GameState) {
        run_until(state, &TickInput::default(), 400, |s| s.phase == MatchPhase::Playing);
    }

    /// Pin everyone in place with no way to attack
    fn disarm_all(state: &mut GameState) {
        for p in &mut state.players {
            p.speed = 0.0;
            p.attack_range = 0.0;
        }
    }

    /// Skip to the next live round with team `loser` eliminated on the first tick
    fn win_round_by_elimination(state: &mut GameState, loser: Team) {
        skip_intro(state);
        for p in state.players.iter_mut().filter(|p| p.team == loser) {
            p.take_damage(1000);
        }
        tick(state, &TickInput::default(), SIM_DT);
    }

    fn finish_round_end(state: &mut GameState) {
        run_until(state, &TickInput::default(), 400, |s| {
            !matches!(s.phase, MatchPhase::RoundEnd { .. })
        });
    }

    #[test]
    fn test_team_select_does_not_tick() {
        let mut state = GameState::new(
            ArenaSetup::standard().unwrap(),
            GameConfig::default(),
            Roster::default(),
            1,
        )
        .unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, MatchPhase::TeamSelect);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_intro_is_frozen() {
        let mut state = game(Roster::default(), 3);
        let start = state.players[0].pos;
        let input = TickInput {
            right: true,
            fire: true,
            aim: state.players[2].pos,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(matches!(state.phase, MatchPhase::RoundIntro { .. }));
        assert_eq!(state.players[0].pos, start);
        assert!(state.projectiles.is_empty());

        run_until(&mut state, &input, 400, |s| s.phase == MatchPhase::Playing);
        tick(&mut state, &input, SIM_DT);
        assert!(state.players[0].pos.x > start.x);
    }

    #[test]
    fn test_timers_decay_during_intro() {
        let mut state = GameState::new(
            ArenaSetup::standard().unwrap(),
            GameConfig::default(),
            Roster::default(),
            3,
        )
        .unwrap();
        state.start_match(CharacterClass::Knight, CharacterClass::Ranger);
        let swing_duration = state.config.classes.knight.swing_duration;
        state.players[0].fire_timer = 2.0;
        state.players[0].shoot_flash = 0.08;
        state.players[0].class_state = ClassState::Knight {
            swing_timer: swing_duration,
            swing_duration,
        };

        // 2.5 s of a 3 s intro
        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(matches!(state.phase, MatchPhase::RoundIntro { .. }));
        let knight = &state.players[0];
        assert_eq!(knight.fire_timer, 0.0);
        assert_eq!(knight.shoot_flash, 0.0);
        assert!(matches!(
            knight.class_state,
            ClassState::Knight { swing_timer, .. } if swing_timer == 0.0
        ));
    }

    #[test]
    fn test_human_fires_toward_aim() {
        let mut state = game(Roster::default(), 3);
        skip_intro(&mut state);
        disarm_all(&mut state);
        let aim = state.players[0].pos + Vec2::new(0.0, 100.0);
        let input = TickInput {
            fire: true,
            aim,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].owner, Some(PlayerId(0)));
        assert!(state.projectiles[0].vel.y > 0.0);
    }

    #[test]
    fn test_timeout_goes_to_defenders() {
        let mut state = game(Roster::all_bots(), 5);
        skip_intro(&mut state);
        state.round_time = SIM_DT / 2.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.round_time, 0.0);
        assert_eq!(
            state.last_result,
            Some(RoundResult {
                round: 1,
                winner: Team::B,
                reason: RoundEndReason::TimeUp
            })
        );
        assert!(matches!(state.phase, MatchPhase::RoundEnd { .. }));
    }

    #[test]
    fn test_round_end_resets_into_intro() {
        let mut state = game(Roster::all_bots(), 5);
        win_round_by_elimination(&mut state, Team::B);
        assert!(matches!(state.phase, MatchPhase::RoundEnd { .. }));
        assert!(state.is_frozen());
        finish_round_end(&mut state);
        assert!(matches!(state.phase, MatchPhase::RoundIntro { .. }));
        assert_eq!(state.round, 2);
        assert_eq!(state.alive_count(Team::B), 2);
    }

    #[test]
    fn test_match_ends_at_win_score() {
        let mut state = game(Roster::all_bots(), 11);
        for round in 1..=10 {
            assert_eq!(state.round, round);
            win_round_by_elimination(&mut state, Team::B);
            if round < 10 {
                finish_round_end(&mut state);
            }
        }
        assert_eq!(state.scores.a, 10);
        assert_eq!(state.scores.b, 0);
        assert_eq!(state.phase, MatchPhase::MatchEnd { winner: Team::A });

        let ticks = state.time_ticks;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.round, 10);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_sides_swap_once_after_round_seven() {
        let mut state = game(Roster::all_bots(), 13);
        let initial = state.attack_team;
        let mut swaps = 0;
        for round in 1..=9 {
            let before = state.attack_team;
            win_round_by_elimination(&mut state, Team::B);
            if state.attack_team != before {
                swaps += 1;
                assert_eq!(round, 7);
                assert!(state.side_swap_event);
            }
            finish_round_end(&mut state);
            if round == 7 {
                // Event stays raised through the intro, then clears
                assert!(state.side_swap_event);
                skip_intro(&mut state);
                assert!(!state.side_swap_event);
            }
        }
        assert_eq!(swaps, 1);
        assert_eq!(state.attack_team, initial.other());
        let carrier = state.players.iter().find(|p| p.has_bomb).unwrap();
        assert_eq!(carrier.team, initial.other());
    }

    /// Human parked on the plant zone, everyone pinned and unable to attack
    fn planting_setup(seed: u64) -> GameState {
        let mut state = game(Roster::default(), seed);
        skip_intro(&mut state);
        disarm_all(&mut state);
        state.players[0].pos = state.plant_zone.center();
        state
    }

    fn interact() -> TickInput {
        TickInput {
            interact: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_human_plants_bomb() {
        let mut state = planting_setup(17);
        assert!(state.players[0].has_bomb);
        run_until(&mut state, &interact(), 240, |s| s.bomb.planted);
        assert!(!state.players[0].has_bomb);
        assert_eq!(state.bomb.location, state.plant_zone.center());
        assert_eq!(state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_defender_cannot_plant() {
        let mut state = planting_setup(17);
        state.attack_team = Team::B;
        for _ in 0..240 {
            tick(&mut state, &interact(), SIM_DT);
        }
        assert!(!state.bomb.planted);
        assert_eq!(state.bomb.planting, None);
    }

    #[test]
    fn test_explosion_wins_for_attackers() {
        let mut state = planting_setup(19);
        run_until(&mut state, &interact(), 240, |s| s.bomb.planted);
        // Planter stays on the bomb and dies with it; attackers still win
        run_until(&mut state, &TickInput::default(), 700, |s| s.phase != MatchPhase::Playing);
        assert!(!state.players[0].alive);
        assert_eq!(
            state.last_result.map(|r| (r.winner, r.reason)),
            Some((Team::A, RoundEndReason::Exploded))
        );
        assert_eq!(state.scores.a, 1);
    }

    #[test]
    fn test_human_defuses() {
        let mut state = planting_setup(23);
        state.attack_team = Team::B;
        // Planted by the other side
        state.bomb.planted = true;
        state.bomb.plant_done = true;
        run_until(&mut state, &interact(), 300, |s| s.phase != MatchPhase::Playing);
        assert_eq!(
            state.last_result.map(|r| (r.winner, r.reason)),
            Some((Team::A, RoundEndReason::Defused))
        );
        assert!(state.players[0].alive);
    }

    #[test]
    fn test_all_bot_match_is_deterministic() {
        let mut a = game(Roster::all_bots(), 99_999);
        let mut b = game(Roster::all_bots(), 99_999);
        let input = TickInput::default();
        for _ in 0..3000 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.round, b.round);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.projectiles.len(), b.projectiles.len());
        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.hp, pb.hp);
        }
    }

    #[test]
    fn test_fixed_step_accumulates_and_caps() {
        let mut state = game(Roster::all_bots(), 1);
        let mut stepper = FixedStep::new();
        let input = TickInput::default();

        assert_eq!(stepper.advance(&mut state, &input, SIM_DT / 2.0), 0);
        assert_eq!(stepper.advance(&mut state, &input, SIM_DT / 2.0), 1);
        assert_eq!(state.time_ticks, 1);

        // A long stall is clamped to the frame cap
        let steps = stepper.advance(&mut state, &input, 5.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps >= 5);
        assert!(stepper.alpha(SIM_DT) <= 1.0);
    }

    #[test]
    fn test_move_axis() {
        let input = TickInput {
            up: true,
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.move_axis(), Vec2::new(0.0, -1.0));
    }
}
