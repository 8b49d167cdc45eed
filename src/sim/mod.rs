//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (roster order for players, spawn order for projectiles)
//! - No rendering or platform dependencies

pub mod arena;
pub mod bomb;
pub mod bot;
pub mod collision;
pub mod grid;
pub mod player;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use arena::{ArenaSetup, SetupError, TeamSpawns};
pub use bomb::{Bomb, BombOutcome, BombPhase};
pub use bot::{drive_bot, nearest_enemy};
pub use collision::{Rect, Sight, can_see, is_solid, line_of_sight};
pub use grid::{GridError, TileGrid, TileKind};
pub use player::{CharacterClass, ClassState, Player, PlayerId, Team, damage_player};
pub use projectile::{Projectile, ProjectileKind};
pub use snapshot::{BombView, PlayerView, ProjectileView, Snapshot};
pub use state::{GameState, MatchPhase, Roster, RosterSlot, RoundEndReason, RoundResult, Scores};
pub use tick::{FixedStep, TickInput, tick};
