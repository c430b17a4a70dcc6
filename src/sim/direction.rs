//! Eight-way compass facing
//!
//! Screen convention: +x points right (east), +y points down (south).

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Integer step components (dx, dy)
    pub fn components(self) -> (i8, i8) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    fn from_components(dx: i8, dy: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.components() == (dx, dy))
    }

    /// Unit vector for this direction (diagonals are normalized)
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.components();
        Vec2::new(dx as f32, dy as f32).normalize()
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.components();
        dx != 0 && dy != 0
    }

    /// -1 when facing west-ish, 1 when facing east-ish, 0 for pure north/south
    pub fn horizontal_sign(self) -> i8 {
        self.components().0
    }

    /// Only the vertical part of this direction (N or S), if any
    pub fn vertical_part(self) -> Option<Self> {
        let (_, dy) = self.components();
        Self::from_components(0, dy)
    }

    /// Only the horizontal part of this direction (E or W), if any
    pub fn horizontal_part(self) -> Option<Self> {
        let (dx, _) = self.components();
        Self::from_components(dx, 0)
    }

    /// Nearest compass direction to an arbitrary vector, `None` for zero
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v.length_squared() <= f32::EPSILON {
            return None;
        }
        // atan2 with y down: east = 0, south = +90°
        let angle = v.y.atan2(v.x);
        let octant = (angle / std::f32::consts::FRAC_PI_4).round() as i32;
        let index = (octant.rem_euclid(8) + 2) % 8;
        Some(Self::ALL[index as usize])
    }
}
