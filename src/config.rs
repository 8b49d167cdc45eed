//! Match configuration and class tuning
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::CharacterClass;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// Melee class parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnightTuning {
    pub speed: f32,
    pub cooldown: f32,
    pub attack_range: f32,
    /// Full swing arc in degrees
    pub attack_arc_deg: f32,
    pub swing_duration: f32,
    /// Angular samples across the arc
    pub arc_samples: u32,
    /// Hit-volume distances as fractions of `attack_range`
    pub reach_fractions: Vec<f32>,
    pub damage: i32,
    pub hit_life: f32,
    pub hit_radius: f32,
}

impl Default for KnightTuning {
    fn default() -> Self {
        Self {
            speed: 120.0,
            cooldown: 0.5,
            attack_range: 80.0,
            attack_arc_deg: 90.0,
            swing_duration: 0.2,
            arc_samples: 8,
            reach_fractions: vec![0.3, 0.6, 0.9],
            damage: 40,
            hit_life: 0.15,
            hit_radius: 15.0,
        }
    }
}

/// Single-shot ranged class parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangerTuning {
    pub speed: f32,
    pub cooldown: f32,
    pub attack_range: f32,
    /// Half-width of the random angular spread (radians)
    pub spread: f32,
    pub projectile_speed: f32,
    pub damage: i32,
    pub projectile_radius: f32,
    pub projectile_life: f32,
}

impl Default for RangerTuning {
    fn default() -> Self {
        Self {
            speed: 140.0,
            cooldown: 0.35,
            attack_range: 900.0,
            spread: 0.04,
            projectile_speed: 820.0,
            damage: 22,
            projectile_radius: 4.0,
            projectile_life: 2.0,
        }
    }
}

/// Burst caster parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardTuning {
    pub speed: f32,
    pub cooldown: f32,
    pub attack_range: f32,
    pub burst_count: u32,
    pub burst_spread: f32,
    /// Delay between shots of one burst
    pub burst_delay: f32,
    pub projectile_speed: f32,
    pub damage: i32,
    pub projectile_radius: f32,
    pub projectile_life: f32,
}

impl Default for WizardTuning {
    fn default() -> Self {
        Self {
            speed: 140.0,
            cooldown: 0.8,
            attack_range: 500.0,
            burst_count: 3,
            burst_spread: 0.2,
            burst_delay: 0.1,
            projectile_speed: 520.0,
            damage: 30,
            projectile_radius: 8.0,
            projectile_life: 1.5,
        }
    }
}

/// Per-class parameter sets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassTable {
    pub knight: KnightTuning,
    pub ranger: RangerTuning,
    pub wizard: WizardTuning,
}

impl ClassTable {
    /// Movement speed for a class
    pub fn speed(&self, class: CharacterClass) -> f32 {
        match class {
            CharacterClass::Knight => self.knight.speed,
            CharacterClass::Ranger => self.ranger.speed,
            CharacterClass::Wizard => self.wizard.speed,
        }
    }

    /// Main fire cooldown for a class
    pub fn cooldown(&self, class: CharacterClass) -> f32 {
        match class {
            CharacterClass::Knight => self.knight.cooldown,
            CharacterClass::Ranger => self.ranger.cooldown,
            CharacterClass::Wizard => self.wizard.cooldown,
        }
    }

    /// Range within which a bot will attack
    pub fn attack_range(&self, class: CharacterClass) -> f32 {
        match class {
            CharacterClass::Knight => self.knight.attack_range,
            CharacterClass::Ranger => self.ranger.attack_range,
            CharacterClass::Wizard => self.wizard.attack_range,
        }
    }
}

/// Match rules and timings (seconds, world units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Target simulation ticks per second
    pub tick_rate: u32,
    /// Rounds needed to win the match
    pub win_score: u32,
    /// Round after which attackers and defenders swap
    pub side_swap_round: u32,
    /// Fuse length once planted
    pub bomb_timer: f32,
    /// Round intro freeze
    pub freeze_time: f32,
    /// Pause between rounds
    pub round_end_wait: f32,
    pub plant_time: f32,
    pub defuse_time: f32,
    pub blast_radius: f32,
    pub explosion_damage: i32,
    pub round_duration: f32,

    // === Visibility ===
    pub sight_distance: f32,
    pub sight_step: f32,

    // === Bots ===
    /// Bots stop closing in once this near; above a class's attack range
    /// that class's bots wait for enemies to come to them
    pub bot_engage_radius: f32,
    /// Fraction of class speed used while pursuing
    pub bot_speed_factor: f32,
    /// Max aim offset per axis
    pub bot_aim_jitter: f32,

    pub classes: ClassTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            win_score: 10,
            side_swap_round: 7,
            bomb_timer: 10.0,
            freeze_time: 3.0,
            round_end_wait: 3.0,
            plant_time: 3.0,
            defuse_time: 4.0,
            blast_radius: 160.0,
            explosion_damage: 999,
            round_duration: 110.0,

            sight_distance: 420.0,
            sight_step: 8.0,

            bot_engage_radius: 120.0,
            bot_speed_factor: 0.8,
            bot_aim_jitter: 18.0,

            classes: ClassTable::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values that would stall or break the round flow
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 9] = [
            ("tick_rate", self.tick_rate > 0),
            ("win_score", self.win_score > 0),
            ("bomb_timer", self.bomb_timer > 0.0),
            ("plant_time", self.plant_time > 0.0),
            ("defuse_time", self.defuse_time > 0.0),
            ("round_duration", self.round_duration > 0.0),
            ("sight_step", self.sight_step > 0.0),
            ("freeze_time", self.freeze_time >= 0.0),
            ("round_end_wait", self.round_end_wait >= 0.0),
        ];
        for (name, ok) in checks {
            if !ok {
                return Err(ConfigError::NotPositive(name));
            }
        }
        Ok(())
    }

    /// Fixed tick length implied by `tick_rate`
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.win_score, 10);
        assert_eq!(config.side_swap_round, 7);
        assert!((config.sim_dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let json = r#"{ "win_score": 3, "classes": { "wizard": { "burst_count": 5 } } }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.win_score, 3);
        assert_eq!(config.classes.wizard.burst_count, 5);
        assert_eq!(config.classes.wizard.burst_delay, 0.1);
        assert_eq!(config.plant_time, 3.0);
    }

    #[test]
    fn test_rejects_zero_win_score() {
        let err = GameConfig::from_json(r#"{ "win_score": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive("win_score")));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_class_lookup() {
        let table = ClassTable::default();
        assert_eq!(table.speed(CharacterClass::Knight), 120.0);
        assert_eq!(table.speed(CharacterClass::Ranger), 140.0);
        assert_eq!(table.attack_range(CharacterClass::Wizard), 500.0);
        assert_eq!(table.cooldown(CharacterClass::Ranger), 0.35);
    }
}
