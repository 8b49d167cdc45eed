//! Players and per-class combat

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, is_solid};
use super::grid::TileGrid;
use super::projectile::Projectile;
use crate::config::ClassTable;
use crate::consts::{PLAYER_MAX_HP, PLAYER_RADIUS};
use crate::{aim_direction, angle_to_dir};

/// How long the muzzle/tint flash lasts after any attack
pub const SHOOT_FLASH: f32 = 0.08;

/// Team identity; attack/defence roles are assigned per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Playable character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    Knight,
    #[default]
    Ranger,
    Wizard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Knight,
        CharacterClass::Ranger,
        CharacterClass::Wizard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterClass::Knight => "Knight",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Uniformly random class
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Index of a player in the current round's player list
///
/// Handles are only meaningful until the next round recreates the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

/// Class-specific attack state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassState {
    Knight {
        swing_timer: f32,
        swing_duration: f32,
    },
    Ranger,
    Wizard {
        /// Shots left in the current burst
        remaining_burst: u32,
        /// Time until the next burst shot may leave
        burst_timer: f32,
        /// Aim point captured when the burst was triggered
        burst_target: Vec2,
    },
}

impl ClassState {
    fn for_class(class: CharacterClass, classes: &ClassTable) -> Self {
        match class {
            CharacterClass::Knight => ClassState::Knight {
                swing_timer: 0.0,
                swing_duration: classes.knight.swing_duration,
            },
            CharacterClass::Ranger => ClassState::Ranger,
            CharacterClass::Wizard => ClassState::Wizard {
                remaining_burst: 0,
                burst_timer: 0.0,
                burst_target: Vec2::ZERO,
            },
        }
    }
}

/// A combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team: Team,
    pub name: String,
    pub class: CharacterClass,
    pub is_bot: bool,

    pub pos: Vec2,
    pub radius: f32,
    pub facing_left: bool,
    pub speed: f32,

    /// May go negative on the killing blow
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,

    /// Main cooldown after an attack
    pub fire_cooldown: f32,
    /// Remaining cooldown
    pub fire_timer: f32,
    pub attack_range: f32,
    pub shoot_flash: f32,
    pub class_state: ClassState,

    pub kills: u32,
    pub has_bomb: bool,
}

impl Player {
    /// Create a fresh player at a spawn point
    pub fn spawn(
        id: PlayerId,
        team: Team,
        name: impl Into<String>,
        class: CharacterClass,
        is_bot: bool,
        pos: Vec2,
        classes: &ClassTable,
    ) -> Self {
        Self {
            id,
            team,
            name: name.into(),
            class,
            is_bot,
            pos,
            radius: PLAYER_RADIUS,
            facing_left: false,
            speed: classes.speed(class),
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            alive: true,
            fire_cooldown: classes.cooldown(class),
            fire_timer: 0.0,
            attack_range: classes.attack_range(class),
            shoot_flash: 0.0,
            class_state: ClassState::for_class(class, classes),
            kills: 0,
            has_bomb: false,
        }
    }

    /// Decay cooldowns and effect timers; runs even while frozen
    pub fn advance_timers(&mut self, dt: f32) {
        self.fire_timer = (self.fire_timer - dt).max(0.0);
        self.shoot_flash = (self.shoot_flash - dt).max(0.0);

        match &mut self.class_state {
            ClassState::Knight { swing_timer, .. } => {
                *swing_timer = (*swing_timer - dt).max(0.0);
            }
            ClassState::Wizard {
                remaining_burst,
                burst_timer,
                ..
            } => {
                if *remaining_burst > 0 {
                    *burst_timer = (*burst_timer - dt).max(0.0);
                }
            }
            ClassState::Ranger => {}
        }
    }

    /// Move by `delta`, resolving X then Y so walls can be slid along
    pub fn move_with_collision(&mut self, delta: Vec2, grid: &TileGrid) {
        if !is_solid(grid, self.pos + Vec2::new(delta.x, 0.0), self.radius) {
            self.pos.x += delta.x;
        }
        if !is_solid(grid, self.pos + Vec2::new(0.0, delta.y), self.radius) {
            self.pos.y += delta.y;
        }
        if delta.x != 0.0 {
            self.facing_left = delta.x < 0.0;
        }
    }

    /// Apply directional input (each axis in -1..=1) at full speed
    pub fn steer(&mut self, axis: Vec2, dt: f32, grid: &TileGrid) {
        if axis == Vec2::ZERO {
            return;
        }
        let dir = if axis.x != 0.0 && axis.y != 0.0 {
            axis * FRAC_1_SQRT_2
        } else {
            axis
        };
        self.move_with_collision(dir * self.speed * dt, grid);
    }

    /// Attack toward `target`; returns false while on cooldown or (Knight)
    /// when the target is out of reach
    pub fn fire(
        &mut self,
        target: Vec2,
        classes: &ClassTable,
        rng: &mut impl Rng,
        out: &mut Vec<Projectile>,
    ) -> bool {
        if self.fire_timer > 0.0 {
            return false;
        }

        let (dir, dist) = aim_direction(self.pos, target);
        let base_angle = dir.y.atan2(dir.x);

        match &mut self.class_state {
            ClassState::Knight {
                swing_timer,
                swing_duration,
            } => {
                let knight = &classes.knight;
                if dist > knight.attack_range {
                    return false;
                }
                self.fire_timer = knight.cooldown;
                *swing_timer = *swing_duration;

                let half_arc = (knight.attack_arc_deg / 2.0).to_radians();
                let start = base_angle - half_arc;
                let samples = knight.arc_samples.max(1);
                let gaps = (samples - 1).max(1) as f32;
                for i in 0..samples {
                    let angle = start + half_arc * 2.0 * i as f32 / gaps;
                    for &reach in &knight.reach_fractions {
                        let at = self.pos + angle_to_dir(angle) * knight.attack_range * reach;
                        out.push(Projectile::slash(at, self.id, knight));
                    }
                }
            }
            ClassState::Ranger => {
                let ranger = &classes.ranger;
                self.fire_timer = ranger.cooldown;
                let angle = base_angle + symmetric_jitter(rng, ranger.spread);
                out.push(Projectile::arrow(self.pos, angle, self.id, ranger));
            }
            ClassState::Wizard {
                remaining_burst,
                burst_timer,
                burst_target,
            } => {
                if *remaining_burst == 0 {
                    self.fire_timer = classes.wizard.cooldown;
                    *remaining_burst = classes.wizard.burst_count;
                    *burst_timer = 0.0;
                }
                *burst_target = target;
                self.release_bolt(classes, rng, out);
            }
        }

        self.shoot_flash = SHOOT_FLASH;
        true
    }

    /// Emit the next shot of an ongoing wizard burst if its delay has passed
    pub fn continue_burst(
        &mut self,
        classes: &ClassTable,
        rng: &mut impl Rng,
        out: &mut Vec<Projectile>,
    ) -> bool {
        if self.release_bolt(classes, rng, out) {
            self.shoot_flash = SHOOT_FLASH;
            true
        } else {
            false
        }
    }

    fn release_bolt(
        &mut self,
        classes: &ClassTable,
        rng: &mut impl Rng,
        out: &mut Vec<Projectile>,
    ) -> bool {
        let ClassState::Wizard {
            remaining_burst,
            burst_timer,
            burst_target,
        } = &mut self.class_state
        else {
            return false;
        };
        if *remaining_burst == 0 || *burst_timer > 0.0 {
            return false;
        }

        let wizard = &classes.wizard;
        let (dir, _) = aim_direction(self.pos, *burst_target);
        let angle = dir.y.atan2(dir.x) + symmetric_jitter(rng, wizard.burst_spread);
        out.push(Projectile::bolt(self.pos, angle, self.id, wizard));
        *remaining_burst -= 1;
        *burst_timer = wizard.burst_delay;
        true
    }

    /// Subtract health; returns true if this hit killed the player
    ///
    /// Dead players ignore further damage.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0 {
            self.alive = false;
            return true;
        }
        false
    }

    #[inline]
    pub fn in_zone(&self, zone: &Rect) -> bool {
        zone.contains(self.pos)
    }

    /// Knight swing phase (0..=2) for visuals; 0 for other classes
    pub fn attack_frame(&self) -> u8 {
        match self.class_state {
            ClassState::Knight {
                swing_timer,
                swing_duration,
            } if swing_timer > 0.0 && swing_duration > 0.0 => {
                (((1.0 - swing_timer / swing_duration) * 3.0) as u8).min(2)
            }
            _ => 0,
        }
    }
}

/// Damage `victim`, crediting a kill to a living `attacker` other than the
/// victim. Returns true if the victim died from this hit.
pub fn damage_player(
    players: &mut [Player],
    victim: PlayerId,
    amount: i32,
    attacker: Option<PlayerId>,
) -> bool {
    let Some(target) = players.get_mut(victim.0) else {
        return false;
    };
    if !target.take_damage(amount) {
        return false;
    }
    log::debug!("{} was killed", target.name);

    if let Some(attacker) = attacker.filter(|a| *a != victim) {
        if let Some(killer) = players.get_mut(attacker.0) {
            if killer.alive {
                killer.kills += 1;
            }
        }
    }
    true
}

/// Uniform offset in `-half..=half`; zero when `half` is not positive
pub(crate) fn symmetric_jitter(rng: &mut impl Rng, half: f32) -> f32 {
    if half > 0.0 {
        rng.random_range(-half..=half)
    } else {
        0.0
    }
}
