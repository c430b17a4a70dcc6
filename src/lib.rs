//! Showdown - deterministic simulation core for face-off arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, steering, duels, scene tick)
//! - `level`: Read-only scene description loaded before a scene starts
//! - `tuning`: Data-driven game balance
//! - `error`: Load-time and command errors

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::{CommandError, ConfigError};
pub use level::LevelDescription;
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation rate the tuning tables are authored against (ticks/sec)
    pub const TICK_RATE: u32 = 60;

    /// Distances below this are treated as "arrived"
    pub const ARRIVAL_EPSILON: f32 = 0.01;

    /// Attempts at picking a free random destination before giving up for this tick
    pub const DESTINATION_ATTEMPTS: u32 = 8;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector toward `to`, or zero when the points coincide
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Sign of a scalar as -1, 0 or 1 (zero stays zero, unlike `f32::signum`)
#[inline]
pub fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
