//! Projectiles and melee hit-volumes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::is_solid;
use super::grid::TileGrid;
use super::player::{Player, PlayerId, damage_player};
use crate::angle_to_dir;
use crate::config::{KnightTuning, RangerTuning, WizardTuning};

/// What spawned the projectile (drives rendering colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Stationary knight hit-volume
    Slash,
    /// Fast ranger shot
    Arrow,
    /// Slow, wide wizard bolt
    Bolt,
}

impl ProjectileKind {
    /// Render colour (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            ProjectileKind::Slash => [255, 255, 255],
            ProjectileKind::Arrow => [60, 220, 60],
            ProjectileKind::Bolt => [100, 100, 255],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    /// Shooter, for kill credit and self-hit exclusion
    pub owner: Option<PlayerId>,
    /// Seconds remaining; pruned at or below zero
    pub life: f32,
    pub radius: f32,
    pub kind: ProjectileKind,
    /// Set once damage has been dealt
    pub has_hit: bool,
}

impl Projectile {
    pub fn slash(pos: Vec2, owner: PlayerId, knight: &KnightTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            damage: knight.damage,
            owner: Some(owner),
            life: knight.hit_life,
            radius: knight.hit_radius,
            kind: ProjectileKind::Slash,
            has_hit: false,
        }
    }

    pub fn arrow(pos: Vec2, angle: f32, owner: PlayerId, ranger: &RangerTuning) -> Self {
        Self {
            pos,
            vel: angle_to_dir(angle) * ranger.projectile_speed,
            damage: ranger.damage,
            owner: Some(owner),
            life: ranger.projectile_life,
            radius: ranger.projectile_radius,
            kind: ProjectileKind::Arrow,
            has_hit: false,
        }
    }

    pub fn bolt(pos: Vec2, angle: f32, owner: PlayerId, wizard: &WizardTuning) -> Self {
        Self {
            pos,
            vel: angle_to_dir(angle) * wizard.projectile_speed,
            damage: wizard.damage,
            owner: Some(owner),
            life: wizard.projectile_life,
            radius: wizard.projectile_radius,
            kind: ProjectileKind::Bolt,
            has_hit: false,
        }
    }

    #[inline]
    pub fn is_melee(&self) -> bool {
        self.kind == ProjectileKind::Slash
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Advance one tick: move, age, stop on walls, then resolve at most one hit
    pub fn update(&mut self, dt: f32, grid: &TileGrid, players: &mut [Player]) {
        let melee = self.is_melee();
        if !melee {
            self.pos += self.vel * dt;
        }
        self.life -= dt;

        if !melee && is_solid(grid, self.pos, 0.0) {
            self.life = -1.0;
            return;
        }

        if self.has_hit {
            return;
        }

        let victim = players.iter().find(|p| {
            p.alive
                && Some(p.id) != self.owner
                && p.pos.distance(self.pos) <= p.radius + self.radius
        });
        if let Some(victim) = victim.map(|p| p.id) {
            damage_player(players, victim, self.damage, self.owner);
            if !melee {
                self.life = -1.0;
            }
            self.has_hit = true;
        }
    }
}
