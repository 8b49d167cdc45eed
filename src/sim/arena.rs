//! Arena setup: tile grid, plant zone and team spawn points
//!
//! Everything here is validated once before a match is built; the simulation
//! assumes a well-formed arena afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, is_solid};
use super::grid::{GridError, TileGrid};
use super::player::Team;
use crate::config::ConfigError;
use crate::consts::{MAP_TOP, PLAYER_RADIUS};

/// Side length of the square plant zone
pub const PLANT_ZONE_SIZE: f32 = 80.0;

/// Built-in 32×20 arena
const STANDARD_LAYOUT: &str = "
################################
#..............................#
#..............................#
#......CC..........#...........#
#......CC..........#.....CC....#
#..................#.....CC....#
#...######.....................#
#........#.....................#
#........#.............C.......#
#.............................##
#....CC...........####........##
#....CC.......................##
#.......................#......#
#....C..................#......#
#..........#######......#......#
#..............................#
#.....CC......#.........CC.....#
#.............#.........CC.....#
#..............................#
################################
";

/// Fatal problems building a match
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid tile data: {0}")]
    Grid(#[from] GridError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("team {0:?} has no spawn points")]
    NoSpawns(Team),

    #[error("spawn point {pos} for team {team:?} is inside geometry")]
    SpawnBlocked { team: Team, pos: Vec2 },

    #[error("plant zone centre {0} is inside geometry")]
    PlantZoneBlocked(Vec2),
}

/// Spawn points per team; roster slot `i` uses point `i % len`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSpawns {
    pub a: Vec<Vec2>,
    pub b: Vec<Vec2>,
}

impl TeamSpawns {
    pub fn for_team(&self, team: Team) -> &[Vec2] {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }

    /// Spawn point for a roster slot
    pub fn slot(&self, team: Team, index: usize) -> Option<Vec2> {
        let points = self.for_team(team);
        if points.is_empty() {
            None
        } else {
            Some(points[index % points.len()])
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSetup {
    pub grid: TileGrid,
    pub plant_zone: Rect,
    pub spawns: TeamSpawns,
}

impl ArenaSetup {
    /// Validate and assemble an arena
    pub fn new(grid: TileGrid, plant_zone: Rect, spawns: TeamSpawns) -> Result<Self, SetupError> {
        for team in Team::ALL {
            let points = spawns.for_team(team);
            if points.is_empty() {
                return Err(SetupError::NoSpawns(team));
            }
            if let Some(&pos) = points.iter().find(|p| is_solid(&grid, **p, PLAYER_RADIUS)) {
                return Err(SetupError::SpawnBlocked { team, pos });
            }
        }
        let center = plant_zone.center();
        if is_solid(&grid, center, 0.0) {
            return Err(SetupError::PlantZoneBlocked(center));
        }
        Ok(Self {
            grid,
            plant_zone,
            spawns,
        })
    }

    /// The built-in arena
    pub fn standard() -> Result<Self, SetupError> {
        Self::from_layout(STANDARD_LAYOUT)
    }

    /// Build from an ASCII layout with default placements: team A in the
    /// top-left corner, team B bottom-right, plant zone in the middle
    pub fn from_layout(layout: &str) -> Result<Self, SetupError> {
        let grid: TileGrid = layout.parse()?;
        Self::with_default_placements(grid)
    }

    /// Default placements on an already-built grid
    pub fn with_default_placements(grid: TileGrid) -> Result<Self, SetupError> {
        let (w, h) = (grid.width(), grid.height());
        let spawns = TeamSpawns {
            a: vec![TileGrid::tile_center(2, 2), TileGrid::tile_center(2, 4)],
            b: vec![
                TileGrid::tile_center(w.saturating_sub(3), h.saturating_sub(3)),
                TileGrid::tile_center(w.saturating_sub(3), h.saturating_sub(5)),
            ],
        };
        let center = Vec2::new(grid.world_width() / 2.0, MAP_TOP + grid.world_height() / 2.0);
        let plant_zone = Rect::centered(center, PLANT_ZONE_SIZE, PLANT_ZONE_SIZE);
        Self::new(grid, plant_zone, spawns)
    }
}
