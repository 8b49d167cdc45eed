//! Bomb plant/defuse lifecycle
//!
//! `Idle → Planting → Planted → (Defusing) → Exploded | Defused`. Planting
//! and defusing each have a single actor slot; whoever takes it first keeps
//! it until they finish, die, or leave the zone. Interrupted progress is
//! discarded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::player::{Player, PlayerId, damage_player};
use crate::config::GameConfig;

/// Terminal bomb result that ends the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombOutcome {
    /// Fuse ran out; attackers win
    Exploded,
    /// Defuse completed; defenders win
    Defused,
}

/// Derived lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombPhase {
    Idle,
    Planting,
    Planted,
    Defusing,
    Exploded,
    Defused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub plant_zone: Rect,
    pub planted: bool,
    pub plant_done: bool,
    /// Plant-zone centre until planted, then the planter's position
    pub location: Vec2,
    /// Fuse time remaining
    pub countdown: f32,
    pub planting: Option<PlayerId>,
    pub plant_progress: f32,
    pub defusing: Option<PlayerId>,
    pub defuse_progress: f32,
    pub outcome: Option<BombOutcome>,
}

impl Bomb {
    pub fn new(plant_zone: Rect, config: &GameConfig) -> Self {
        Self {
            plant_zone,
            planted: false,
            plant_done: false,
            location: plant_zone.center(),
            countdown: config.bomb_timer,
            planting: None,
            plant_progress: 0.0,
            defusing: None,
            defuse_progress: 0.0,
            outcome: None,
        }
    }

    pub fn phase(&self) -> BombPhase {
        match self.outcome {
            Some(BombOutcome::Exploded) => BombPhase::Exploded,
            Some(BombOutcome::Defused) => BombPhase::Defused,
            None if self.defusing.is_some() => BombPhase::Defusing,
            None if self.planted => BombPhase::Planted,
            None if self.planting.is_some() => BombPhase::Planting,
            None => BombPhase::Idle,
        }
    }

    /// Begin planting; ignored unless unplanted, the slot is free and the
    /// player stands in the zone
    pub fn start_plant(&mut self, player: &Player, config: &GameConfig) -> bool {
        if self.outcome.is_some() || self.planted || self.planting.is_some() {
            return false;
        }
        if !player.alive || !player.in_zone(&self.plant_zone) {
            return false;
        }
        self.planting = Some(player.id);
        self.plant_progress = config.plant_time;
        log::debug!("{} started planting at {:?}", player.name, player.pos);
        true
    }

    /// Begin defusing; ignored unless planted, the slot is free and the
    /// player stands in the zone
    pub fn start_defuse(&mut self, player: &Player, config: &GameConfig) -> bool {
        if self.outcome.is_some() || !(self.planted && self.plant_done) || self.defusing.is_some() {
            return false;
        }
        if !player.alive || !player.in_zone(&self.plant_zone) {
            return false;
        }
        self.defusing = Some(player.id);
        self.defuse_progress = config.defuse_time;
        log::debug!("{} started defusing", player.name);
        true
    }

    /// Advance timers; returns an outcome on the tick the round is decided
    ///
    /// A completed defuse is checked before the fuse, so it wins a same-tick
    /// race with the explosion.
    pub fn update(
        &mut self,
        dt: f32,
        players: &mut [Player],
        config: &GameConfig,
    ) -> Option<BombOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        if let Some(id) = self.planting {
            match self.active_actor(players, id) {
                None => {
                    self.planting = None;
                    self.plant_progress = 0.0;
                    log::debug!("Planting cancelled");
                }
                Some(pos) => {
                    self.plant_progress -= dt;
                    if self.plant_progress <= 0.0 {
                        self.planted = true;
                        self.plant_done = true;
                        self.location = pos;
                        self.planting = None;
                        self.countdown = config.bomb_timer;
                        if let Some(planter) = players.get_mut(id.0) {
                            planter.has_bomb = false;
                        }
                        log::info!("Bomb planted at ({:.0}, {:.0})", pos.x, pos.y);
                    }
                }
            }
        }

        if !(self.planted && self.plant_done) {
            return None;
        }

        self.countdown -= dt;

        if let Some(id) = self.defusing {
            match self.active_actor(players, id) {
                None => {
                    self.defusing = None;
                    self.defuse_progress = 0.0;
                    log::debug!("Defusing cancelled");
                }
                Some(_) => {
                    self.defuse_progress -= dt;
                    if self.defuse_progress <= 0.0 {
                        self.defusing = None;
                        self.outcome = Some(BombOutcome::Defused);
                        log::info!("Bomb defused with {:.2}s left", self.countdown.max(0.0));
                        return self.outcome;
                    }
                }
            }
        }

        if self.countdown <= 0.0 {
            self.explode(players, config);
            return self.outcome;
        }

        None
    }

    /// Fraction of the plant completed (1.0 once planted)
    pub fn plant_fraction(&self, config: &GameConfig) -> f32 {
        if self.planted {
            1.0
        } else if self.planting.is_some() {
            (1.0 - self.plant_progress / config.plant_time).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fraction of the active defuse completed
    pub fn defuse_fraction(&self, config: &GameConfig) -> f32 {
        match (self.defusing, self.outcome) {
            (_, Some(BombOutcome::Defused)) => 1.0,
            (Some(_), _) => (1.0 - self.defuse_progress / config.defuse_time).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Position of the actor if still alive and inside the zone
    fn active_actor(&self, players: &[Player], id: PlayerId) -> Option<Vec2> {
        players
            .get(id.0)
            .filter(|p| p.alive && p.in_zone(&self.plant_zone))
            .map(|p| p.pos)
    }

    fn explode(&mut self, players: &mut [Player], config: &GameConfig) {
        let victims: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.pos.distance(self.location) <= config.blast_radius)
            .map(|p| p.id)
            .collect();
        for id in victims {
            damage_player(players, id, config.explosion_damage, None);
        }
        self.defusing = None;
        self.outcome = Some(BombOutcome::Exploded);
        log::info!("Bomb exploded at ({:.0}, {:.0})", self.location.x, self.location.y);
    }
}
