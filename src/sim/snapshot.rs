//! Read-only views of the match for rendering, HUD and logging

use glam::Vec2;
use serde::Serialize;

use super::bomb::{Bomb, BombPhase};
use super::collision::can_see;
use super::player::{CharacterClass, Player, PlayerId, Team};
use super::projectile::{Projectile, ProjectileKind};
use super::state::{GameState, MatchPhase, RoundResult, Scores};
use crate::config::GameConfig;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub class: CharacterClass,
    pub is_bot: bool,
    pub pos: Vec2,
    pub facing_left: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    pub has_bomb: bool,
    pub attack_frame: u8,
    pub shoot_flash: bool,
    pub kills: u32,
    /// Whether the human player should see this player (teammates always)
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ProjectileKind,
    pub color: [u8; 3],
    pub life: f32,
    pub owner: Option<PlayerId>,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            pos: p.pos,
            radius: p.radius,
            kind: p.kind,
            color: p.kind.color(),
            life: p.life,
            owner: p.owner,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BombView {
    pub phase: BombPhase,
    pub planted: bool,
    pub plant_done: bool,
    pub location: Vec2,
    pub countdown: f32,
    pub plant_fraction: f32,
    pub defuse_fraction: f32,
}

impl BombView {
    fn new(bomb: &Bomb, config: &GameConfig) -> Self {
        Self {
            phase: bomb.phase(),
            planted: bomb.planted,
            plant_done: bomb.plant_done,
            location: bomb.location,
            countdown: bomb.countdown.max(0.0),
            plant_fraction: bomb.plant_fraction(config),
            defuse_fraction: bomb.defuse_fraction(config),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: MatchPhase,
    pub frozen: bool,
    pub round: u32,
    pub scores: Scores,
    pub round_time: f32,
    pub attack_team: Team,
    pub side_swap_event: bool,
    pub last_result: Option<RoundResult>,
    pub camera: Vec2,
    pub time_ticks: u64,
    pub players: Vec<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
    pub bomb: BombView,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let human = state.human();
        let sight = state.sight();
        let visible = |p: &Player| match human {
            Some(h) => h.id == p.id || h.team == p.team || can_see(&state.grid, h, p, sight),
            None => true,
        };

        let players = state
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                team: p.team,
                class: p.class,
                is_bot: p.is_bot,
                pos: p.pos,
                facing_left: p.facing_left,
                hp: p.hp.max(0),
                max_hp: p.max_hp,
                alive: p.alive,
                has_bomb: p.has_bomb,
                attack_frame: p.attack_frame(),
                shoot_flash: p.shoot_flash > 0.0,
                kills: p.kills,
                visible: visible(p),
            })
            .collect();

        Self {
            phase: state.phase,
            frozen: state.is_frozen(),
            round: state.round,
            scores: state.scores,
            round_time: state.round_time,
            attack_team: state.attack_team,
            side_swap_event: state.side_swap_event,
            last_result: state.last_result,
            camera: state.camera_focus(),
            time_ticks: state.time_ticks,
            players,
            projectiles: state.projectiles.iter().map(ProjectileView::from).collect(),
            bomb: BombView::new(&state.bomb, &state.config),
        }
    }

    /// Compact JSON for logging or piping to a viewer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::ArenaSetup;
    use crate::sim::state::Roster;

    fn game() -> GameState {
        let mut state = GameState::new(
            ArenaSetup::standard().unwrap(),
            GameConfig::default(),
            Roster::default(),
            42,
        )
        .unwrap();
        state.start_match(CharacterClass::Knight, CharacterClass::Wizard);
        state
    }

    #[test]
    fn test_enemies_hidden_behind_distance() {
        let state = game();
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.players.len(), 4);
        // Teammate always shown, enemies across the map are not
        assert!(snap.players[0].visible);
        assert!(snap.players[1].visible);
        assert!(!snap.players[2].visible);
        assert!(!snap.players[3].visible);
        assert!(snap.frozen);
    }

    #[test]
    fn test_close_enemy_visible() {
        let mut state = game();
        state.players[2].pos = state.players[0].pos + Vec2::new(96.0, 0.0);
        let snap = Snapshot::capture(&state);
        assert!(snap.players[2].visible);
    }

    #[test]
    fn test_all_bot_roster_shows_everyone() {
        let mut state = GameState::new(
            ArenaSetup::standard().unwrap(),
            GameConfig::default(),
            Roster::all_bots(),
            42,
        )
        .unwrap();
        state.start_match(CharacterClass::Ranger, CharacterClass::Ranger);
        let snap = Snapshot::capture(&state);
        assert!(snap.players.iter().all(|p| p.visible));
    }

    #[test]
    fn test_serializes_to_json() {
        let state = game();
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["round"], 1);
        assert_eq!(value["bomb"]["phase"], "Idle");
        assert_eq!(value["players"][0]["class"], "Knight");
        assert_eq!(value["players"][0]["has_bomb"], true);
    }
}
