//! Match state and round lifecycle
//!
//! `TeamSelect → RoundIntro → Playing → RoundEnd → RoundIntro … → MatchEnd`.
//! Everything a round mutates (players, projectiles, bomb) is rebuilt at the
//! start of each round; only scores, the round counter and side assignment
//! carry over.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{ArenaSetup, SetupError, TeamSpawns};
use super::bomb::Bomb;
use super::collision::{Rect, Sight};
use super::grid::TileGrid;
use super::player::{CharacterClass, Player, PlayerId, Team};
use super::projectile::Projectile;
use crate::clamp_lenient;
use crate::config::GameConfig;
use crate::consts::{MAP_TOP, VIEW_HEIGHT, VIEW_WIDTH};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for character selection
    TeamSelect,
    /// Players placed but frozen
    RoundIntro { remaining: f32 },
    /// Live round
    Playing,
    /// Round decided, waiting before the next one
    RoundEnd { remaining: f32 },
    /// Terminal
    MatchEnd { winner: Team },
}

impl MatchPhase {
    /// Movement and combat only run while playing
    #[inline]
    pub fn is_frozen(&self) -> bool {
        !matches!(self, MatchPhase::Playing)
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    TimeUp,
    Elimination,
    Defused,
    Exploded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub winner: Team,
    pub reason: RoundEndReason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub a: u32,
    pub b: u32,
}

impl Scores {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::A => self.a,
            Team::B => self.b,
        }
    }

    fn credit(&mut self, team: Team) {
        match team {
            Team::A => self.a += 1,
            Team::B => self.b += 1,
        }
    }
}

/// One roster slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    pub name: String,
    pub is_bot: bool,
}

impl RosterSlot {
    fn new(name: &str, is_bot: bool) -> Self {
        Self {
            name: name.to_string(),
            is_bot,
        }
    }
}

/// Fixed 2v2 line-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub a: Vec<RosterSlot>,
    pub b: Vec<RosterSlot>,
}

impl Default for Roster {
    /// Human leads team A; everyone else is a bot
    fn default() -> Self {
        Self {
            a: vec![RosterSlot::new("Player", false), RosterSlot::new("Bot-A2", true)],
            b: vec![RosterSlot::new("Bot", true), RosterSlot::new("Bot-B2", true)],
        }
    }
}

impl Roster {
    /// Headless line-up with no human
    pub fn all_bots() -> Self {
        Self {
            a: vec![RosterSlot::new("Bot-A1", true), RosterSlot::new("Bot-A2", true)],
            b: vec![RosterSlot::new("Bot-B1", true), RosterSlot::new("Bot-B2", true)],
        }
    }

    pub fn for_team(&self, team: Team) -> &[RosterSlot] {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }
}

/// Authoritative match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub grid: TileGrid,
    pub plant_zone: Rect,
    pub spawns: TeamSpawns,
    pub roster: Roster,
    /// Class picked for each team at selection
    pub selected: Option<(CharacterClass, CharacterClass)>,

    pub phase: MatchPhase,
    /// 1-based round counter
    pub round: u32,
    pub scores: Scores,
    pub attack_team: Team,
    /// Seconds left in the live round
    pub round_time: f32,
    /// Raised when sides swap; cleared when the next round goes live
    pub side_swap_event: bool,
    sides_swapped: bool,
    pub last_result: Option<RoundResult>,

    /// Players in roster order (team A first)
    pub players: Vec<Player>,
    /// Live projectiles in spawn order
    pub projectiles: Vec<Projectile>,
    pub bomb: Bomb,

    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build a match waiting for team selection
    pub fn new(
        arena: ArenaSetup,
        config: GameConfig,
        roster: Roster,
        seed: u64,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let bomb = Bomb::new(arena.plant_zone, &config);
        let round_time = config.round_duration;
        Ok(Self {
            config,
            grid: arena.grid,
            plant_zone: arena.plant_zone,
            spawns: arena.spawns,
            roster,
            selected: None,
            phase: MatchPhase::TeamSelect,
            round: 1,
            scores: Scores::default(),
            attack_team: Team::A,
            round_time,
            side_swap_event: false,
            sides_swapped: false,
            last_result: None,
            players: Vec::new(),
            projectiles: Vec::new(),
            bomb,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Finish selection and start round one; ignored outside `TeamSelect`
    pub fn start_match(&mut self, class_a: CharacterClass, class_b: CharacterClass) -> bool {
        if self.phase != MatchPhase::TeamSelect {
            return false;
        }
        self.selected = Some((class_a, class_b));
        log::info!("Match start: A as {}, B as {}", class_a.name(), class_b.name());
        self.create_players();
        true
    }

    /// Random class from the match RNG (for the opposing team at selection)
    pub fn random_class(&mut self) -> CharacterClass {
        CharacterClass::random(&mut self.rng)
    }

    /// Rebuild the round: players at spawns, fresh bomb, cleared projectiles,
    /// full round timer, frozen intro
    pub fn create_players(&mut self) {
        let (class_a, class_b) = self.selected.unwrap_or_default();
        let classes = &self.config.classes;

        self.players.clear();
        for team in Team::ALL {
            let class = match team {
                Team::A => class_a,
                Team::B => class_b,
            };
            for (slot_index, slot) in self.roster.for_team(team).iter().enumerate() {
                let Some(pos) = self.spawns.slot(team, slot_index) else {
                    continue;
                };
                let id = PlayerId(self.players.len());
                let mut player =
                    Player::spawn(id, team, slot.name.clone(), class, slot.is_bot, pos, classes);
                player.has_bomb = team == self.attack_team && slot_index == 0;
                self.players.push(player);
            }
        }

        self.projectiles.clear();
        self.bomb = Bomb::new(self.plant_zone, &self.config);
        self.round_time = self.config.round_duration;
        self.phase = MatchPhase::RoundIntro {
            remaining: self.config.freeze_time,
        };
    }

    /// Credit the winner, handle the side swap and decide whether the match
    /// is over
    pub fn end_round(&mut self, winner: Team, reason: RoundEndReason) {
        if !matches!(self.phase, MatchPhase::Playing) {
            return;
        }
        self.scores.credit(winner);
        self.last_result = Some(RoundResult {
            round: self.round,
            winner,
            reason,
        });
        log::info!(
            "Round {} to team {:?} ({:?}) - score A {} : B {}",
            self.round,
            winner,
            reason,
            self.scores.a,
            self.scores.b
        );

        if self.round == self.config.side_swap_round && !self.sides_swapped {
            self.attack_team = self.attack_team.other();
            self.sides_swapped = true;
            self.side_swap_event = true;
            log::info!("Sides swapped: team {:?} now attacking", self.attack_team);
        }

        let win = self.config.win_score;
        if self.scores.a >= win || self.scores.b >= win {
            let winner = if self.scores.a >= win { Team::A } else { Team::B };
            self.phase = MatchPhase::MatchEnd { winner };
            log::info!("Match over: team {:?} wins", winner);
        } else {
            self.phase = MatchPhase::RoundEnd {
                remaining: self.config.round_end_wait,
            };
        }
    }

    /// Advance to the next round
    pub fn reset_for_next_round(&mut self) {
        self.round += 1;
        self.create_players();
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.phase.is_frozen()
    }

    #[inline]
    pub fn defending_team(&self) -> Team {
        self.attack_team.other()
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.players.iter().filter(|p| p.team == team && p.alive).count()
    }

    /// The human-controlled player, if any
    pub fn human(&self) -> Option<&Player> {
        self.players.iter().find(|p| !p.is_bot)
    }

    pub fn human_id(&self) -> Option<PlayerId> {
        self.human().map(|p| p.id)
    }

    pub fn sight(&self) -> Sight {
        Sight {
            max_distance: self.config.sight_distance,
            step: self.config.sight_step,
        }
    }

    /// Top-left of a viewport centred on the human, clamped to the world
    pub fn camera_focus(&self) -> Vec2 {
        let focus = self
            .human()
            .or_else(|| self.players.first())
            .map(|p| p.pos)
            .unwrap_or(self.plant_zone.center());
        Vec2::new(
            clamp_lenient(focus.x - VIEW_WIDTH / 2.0, 0.0, self.grid.world_width() - VIEW_WIDTH),
            clamp_lenient(
                focus.y - VIEW_HEIGHT / 2.0,
                MAP_TOP,
                MAP_TOP + self.grid.world_height() - VIEW_HEIGHT,
            ),
        )
    }
}
