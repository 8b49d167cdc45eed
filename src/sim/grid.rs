//! Static tile grid
//!
//! Produced once at setup (from an offline image classification or an ASCII
//! layout) and only queried afterwards.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAP_TOP, TILE_SIZE};

/// Tile classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Open,
    Wall,
    Crate,
}

impl TileKind {
    /// Walls and crates both block movement, shots and sight
    #[inline]
    pub fn is_solid(self) -> bool {
        self != TileKind::Open
    }

    /// Decode the numeric class emitted by the image sampler
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Open),
            1 => Some(TileKind::Wall),
            2 => Some(TileKind::Crate),
            _ => None,
        }
    }

    /// Decode an ASCII layout character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(TileKind::Open),
            '#' => Some(TileKind::Wall),
            'C' | 'c' => Some(TileKind::Crate),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            TileKind::Open => '.',
            TileKind::Wall => '#',
            TileKind::Crate => 'C',
        }
    }
}

/// Invalid tile data; a match cannot be built from it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("tile grid is empty")]
    Empty,

    #[error("expected {expected} cells for the grid, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile code {code} at ({x}, {y})")]
    UnknownCode { code: u8, x: usize, y: usize },

    #[error("unknown tile character {ch:?} at ({x}, {y})")]
    UnknownChar { ch: char, x: usize, y: usize },
}

/// Rectangular, row-major grid of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Build from a row-major cell list
    pub fn new(width: usize, height: usize, tiles: Vec<TileKind>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = width * height;
        if tiles.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                found: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Grid where every cell is `kind`
    pub fn filled(width: usize, height: usize, kind: TileKind) -> Result<Self, GridError> {
        Self::new(width, height, vec![kind; width * height])
    }

    /// Build from rows of sampler codes (0 open, 1 wall, 2 crate)
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let kind = TileKind::from_code(code).ok_or(GridError::UnknownCode { code, x, y })?;
                tiles.push(kind);
            }
        }
        Self::new(width, height, tiles)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at (tx, ty); `None` outside the grid
    pub fn get(&self, tx: i32, ty: i32) -> Option<TileKind> {
        if tx < 0 || ty < 0 {
            return None;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx >= self.width || ty >= self.height {
            return None;
        }
        Some(self.tiles[ty * self.width + tx])
    }

    /// Overwrite a single tile (setup/tests only; grids are fixed during a match)
    pub fn set(&mut self, tx: usize, ty: usize, kind: TileKind) {
        if tx < self.width && ty < self.height {
            self.tiles[ty * self.width + tx] = kind;
        }
    }

    /// World-space width
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// World-space height of the tiled area (excluding the top margin)
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Whether a world point lies within the tiled area
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= 0.0
            && p.x < self.world_width()
            && p.y >= MAP_TOP
            && p.y < MAP_TOP + self.world_height()
    }

    /// Tile index containing a world point (may be out of range)
    #[inline]
    pub fn tile_at(p: Vec2) -> (i32, i32) {
        (
            (p.x / TILE_SIZE).floor() as i32,
            ((p.y - MAP_TOP) / TILE_SIZE).floor() as i32,
        )
    }

    /// World-space centre of a tile
    #[inline]
    pub fn tile_center(tx: usize, ty: usize) -> Vec2 {
        Vec2::new(
            tx as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            ty as f32 * TILE_SIZE + TILE_SIZE / 2.0 + MAP_TOP,
        )
    }
}

impl FromStr for TileGrid {
    type Err = GridError;

    /// Parse an ASCII layout: `.` open, `#` wall, `C` crate. Blank lines and
    /// surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                tiles.push(TileKind::from_char(ch).ok_or(GridError::UnknownChar { ch, x, y })?);
            }
        }
        Self::new(width, rows.len(), tiles)
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width) {
            for tile in row {
                write!(f, "{}", tile.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_codes() {
        let grid = TileGrid::from_codes(&[vec![1u8, 1, 1], vec![1, 0, 2], vec![1, 1, 1]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 1), Some(TileKind::Open));
        assert_eq!(grid.get(2, 1), Some(TileKind::Crate));
        assert_eq!(grid.get(3, 1), None);
        assert_eq!(grid.get(-1, 0), None);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = TileGrid::from_codes(&[vec![0u8, 0, 0], vec![0, 0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_rejects_unknown_code() {
        let err = TileGrid::from_codes(&[vec![0u8, 7]]).unwrap_err();
        assert_eq!(err, GridError::UnknownCode { code: 7, x: 1, y: 0 });
    }

    #[test]
    fn test_rejects_empty() {
        let rows: Vec<Vec<u8>> = Vec::new();
        assert_eq!(TileGrid::from_codes(&rows).unwrap_err(), GridError::Empty);
        assert_eq!("".parse::<TileGrid>().unwrap_err(), GridError::Empty);
        assert_eq!(TileGrid::new(0, 4, Vec::new()).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let layout = "####\n#.C#\n####\n";
        let grid: TileGrid = layout.parse().unwrap();
        assert_eq!(grid.get(2, 1), Some(TileKind::Crate));
        assert_eq!(grid.to_string(), layout);
    }

    #[test]
    fn test_parse_rejects_unknown_char() {
        let err = "#.#\n#?#".parse::<TileGrid>().unwrap_err();
        assert_eq!(err, GridError::UnknownChar { ch: '?', x: 1, y: 1 });
    }

    #[test]
    fn test_tile_mapping_respects_top_margin() {
        let center = TileGrid::tile_center(2, 3);
        assert_eq!(TileGrid::tile_at(center), (2, 3));
        assert_eq!(TileGrid::tile_at(Vec2::new(10.0, MAP_TOP - 1.0)), (0, -1));
    }
}
