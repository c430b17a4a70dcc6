//! Game balance knobs
//!
//! Every timer is counted in simulation ticks; nothing in the core reads the
//! wall clock. A level description may override any subset of these values.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive tick range a countdown is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub min: u32,
    pub max: u32,
}

impl TickRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Range with the upper bound stretched by `factor` (at least 1)
    pub fn scaled(self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            min: self.min,
            max: self.max.saturating_mul(factor).max(self.min),
        }
    }
}

/// Exponential walking-speed profile shared by every actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Speed an actor jumps to when starting from rest, and the cutoff below which it stops
    pub min: f32,
    /// Hard cap (pixels per tick)
    pub max: f32,
    /// Multiplier applied per accelerate call, divisor per decelerate call (> 1)
    pub factor: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            factor: 1.25,
        }
    }
}

/// All tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    pub speed: SpeedProfile,

    // === Duels ===
    /// Minimum horizontal distance for a face-off
    pub duel_range_min: f32,
    /// Maximum horizontal distance for a face-off
    pub duel_range_max: f32,
    /// Maximum vertical offset between two actors that can face off
    pub duel_height_tolerance: f32,

    // === Behavior policy timers ===
    /// Base range for the duel-check countdown, stretched by the live actor count
    pub duel_check_ticks: TickRange,
    /// Countdown until an NPC collapses for good; `None` disables it
    pub coma_ticks: Option<TickRange>,
    pub interaction_cooldown_ticks: TickRange,
    pub cooldown_pause_ticks: TickRange,
    /// How long an NPC holds a duel or a looping interaction before letting go
    pub release_ticks: TickRange,
    /// Delay between two wander destinations
    pub wander_cooldown_ticks: TickRange,

    // === Behavior policy probabilities (per tick) ===
    pub cooldown_pause_probability: f32,
    pub attraction_probability: f32,
    pub hard_path_probability: f32,

    // === Paths ===
    /// How close a hard path endpoint must be to be considered
    pub hard_path_range: f32,
    /// Attempts at building a path that avoids stairs before falling back to a direct one
    pub stair_retry_limit: u32,

    // === Scene ===
    pub transition_ticks: u32,
    pub message_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: SpeedProfile::default(),

            duel_range_min: 20.0,
            duel_range_max: 120.0,
            duel_height_tolerance: 6.0,

            duel_check_ticks: TickRange::new(60, 240),
            coma_ticks: Some(TickRange::new(60 * 60 * 3, 60 * 60 * 6)),
            interaction_cooldown_ticks: TickRange::new(600, 1800),
            cooldown_pause_ticks: TickRange::new(30, 180),
            release_ticks: TickRange::new(60, 180),
            wander_cooldown_ticks: TickRange::new(30, 240),

            cooldown_pause_probability: 0.002,
            attraction_probability: 0.05,
            hard_path_probability: 0.3,

            hard_path_range: 64.0,
            stair_retry_limit: 3,

            transition_ticks: 45,
            message_ticks: 180,
        }
    }
}

impl Tuning {
    /// Reject values that would break the state machine or the speed ramp
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speed = &self.speed;
        if !(speed.min > 0.0) || speed.min > speed.max {
            return Err(ConfigError::Tuning(format!(
                "speed range [{}, {}] is invalid",
                speed.min, speed.max
            )));
        }
        if !(speed.factor > 1.0) {
            return Err(ConfigError::Tuning(format!(
                "acceleration factor {} must be greater than 1",
                speed.factor
            )));
        }
        if self.duel_range_min < 0.0 || self.duel_range_min > self.duel_range_max {
            return Err(ConfigError::Tuning(format!(
                "duel range [{}, {}] is invalid",
                self.duel_range_min, self.duel_range_max
            )));
        }
        if self.duel_height_tolerance < 0.0 {
            return Err(ConfigError::Tuning("duel height tolerance is negative".into()));
        }
        let ranges = [
            ("duel_check_ticks", Some(self.duel_check_ticks)),
            ("coma_ticks", self.coma_ticks),
            ("interaction_cooldown_ticks", Some(self.interaction_cooldown_ticks)),
            ("cooldown_pause_ticks", Some(self.cooldown_pause_ticks)),
            ("release_ticks", Some(self.release_ticks)),
            ("wander_cooldown_ticks", Some(self.wander_cooldown_ticks)),
        ];
        for (name, range) in ranges {
            if let Some(range) = range {
                if range.min > range.max {
                    return Err(ConfigError::Tuning(format!(
                        "{name} min {} exceeds max {}",
                        range.min, range.max
                    )));
                }
            }
        }
        let probabilities = [
            ("cooldown_pause_probability", self.cooldown_pause_probability),
            ("attraction_probability", self.attraction_probability),
            ("hard_path_probability", self.hard_path_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Tuning(format!("{name} {p} is not a probability")));
            }
        }
        if self.stair_retry_limit == 0 {
            return Err(ConfigError::Tuning("stair_retry_limit must be at least 1".into()));
        }
        Ok(())
    }
}
