//! Pixel Tactics - a round-based 2v2 bomb plant/defuse arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, players, projectiles, bomb, match flow)
//! - `config`: Tunable match and class parameters
//!
//! Rendering, asset loading and window handling live outside this crate; they
//! consume [`sim::Snapshot`] and feed [`sim::TickInput`] back in.

pub mod config;
pub mod sim;

pub use config::{ClassTable, ConfigError, GameConfig};

use glam::Vec2;

/// World and timing constants
pub mod consts {
    /// Default simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tile edge length in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Vertical offset of the tile grid in world space (HUD strip above it)
    pub const MAP_TOP: f32 = 56.0;
    /// Standard arena size in tiles
    pub const MAP_W: usize = 32;
    pub const MAP_H: usize = 20;

    /// Viewport used for camera focus
    pub const VIEW_WIDTH: f32 = 960.0;
    pub const VIEW_HEIGHT: f32 = 640.0;

    /// Player body
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MAX_HP: i32 = 100;

    /// Distances below this are treated as zero when normalizing
    pub const MIN_DISTANCE: f32 = 1e-3;
}

/// Unit vector from `from` toward `to`, or +X when the points coincide.
///
/// Returns the direction together with the (floored) distance so callers can
/// divide by it safely.
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist < consts::MIN_DISTANCE {
        (Vec2::X, consts::MIN_DISTANCE)
    } else {
        (delta / dist, dist)
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp that tolerates `lo > hi` by preferring `lo` (world smaller than view)
#[inline]
pub fn clamp_lenient(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_direction_coincident_points() {
        let (dir, dist) = aim_direction(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(dir, Vec2::X);
        assert!(dist > 0.0);
    }

    #[test]
    fn test_aim_direction_normalizes() {
        let (dir, dist) = aim_direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dist - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_lenient_inverted_bounds() {
        assert_eq!(clamp_lenient(50.0, 0.0, -20.0), 0.0);
        assert_eq!(clamp_lenient(50.0, 0.0, 100.0), 50.0);
    }
}
