//! Collision detection and line of sight against the tile grid
//!
//! Circles are tested against the solid cells under their bounding box using
//! a closest-point clamp. Sight is a stepped point march, coarse but cheap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use super::player::Player;
use crate::consts::{MAP_TOP, TILE_SIZE};

/// Axis-aligned rectangle in world space
///
/// Containment is half-open: the left/top edges are inside, the right/bottom
/// edges are not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w`×`h` centred on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

/// Sight parameters for [`can_see`]
#[derive(Debug, Clone, Copy)]
pub struct Sight {
    pub max_distance: f32,
    pub step: f32,
}

/// Check whether a circle overlaps solid geometry
///
/// Anything reaching outside the grid counts as solid, so the world edge
/// behaves like a wall. A zero radius tests a single point.
pub fn is_solid(grid: &TileGrid, pos: Vec2, radius: f32) -> bool {
    let local = Vec2::new(pos.x, pos.y - MAP_TOP);

    let left = ((local.x - radius) / TILE_SIZE).floor() as i32;
    let right = ((local.x + radius) / TILE_SIZE).floor() as i32;
    let top = ((local.y - radius) / TILE_SIZE).floor() as i32;
    let bottom = ((local.y + radius) / TILE_SIZE).floor() as i32;

    if left < 0 || top < 0 || right >= grid.width() as i32 || bottom >= grid.height() as i32 {
        return true;
    }

    let radius_sq = radius * radius;
    for ty in top..=bottom {
        for tx in left..=right {
            let solid = grid.get(tx, ty).map(|t| t.is_solid()).unwrap_or(true);
            if !solid {
                continue;
            }

            let min = Vec2::new(tx as f32 * TILE_SIZE, ty as f32 * TILE_SIZE);
            let closest = local.clamp(min, min + Vec2::splat(TILE_SIZE));
            if local.distance_squared(closest) <= radius_sq {
                return true;
            }
        }
    }

    false
}

/// March a point from `from` toward `to` in `step`-sized increments
///
/// Fails when the distance exceeds `max_distance`, a sample leaves the world
/// or lands in a solid tile, or `to` itself is embedded in geometry. A
/// non-positive `step` never sees anything.
pub fn line_of_sight(grid: &TileGrid, from: Vec2, to: Vec2, max_distance: f32, step: f32) -> bool {
    if step.is_nan() || step <= 0.0 {
        return false;
    }
    let delta = to - from;
    let dist = delta.length();
    if dist > max_distance {
        return false;
    }

    let dir = if dist > 0.0 { delta / dist } else { Vec2::ZERO };
    let steps = (dist / step) as u32;

    let mut cursor = from;
    for _ in 0..steps {
        cursor += dir * step;
        if !grid.contains_point(cursor) || is_solid(grid, cursor, 0.0) {
            return false;
        }
    }

    !is_solid(grid, to, 0.0)
}

/// Whether `observer` has line of sight to a living `target`
pub fn can_see(grid: &TileGrid, observer: &Player, target: &Player, sight: Sight) -> bool {
    if !target.alive {
        return false;
    }
    line_of_sight(grid, observer.pos, target.pos, sight.max_distance, sight.step)
}
