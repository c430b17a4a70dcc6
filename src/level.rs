//! Level description
//!
//! Static geometry, character archetypes and spawn points, loaded once before
//! a scene starts and treated as read-only afterwards. Everything that could
//! make a tick misbehave is rejected here.

use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::action::{ActionKind, ActionTable};
use crate::sim::direction::Direction;
use crate::sim::geometry::{Rect, StaticGeometry};
use crate::tuning::Tuning;

/// One kind of character: its sprite timing and collision box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDescription {
    /// Hitbox relative to the actor position
    pub hitbox: Rect,
    /// Exposure list (ticks per sprite frame) for every action
    pub actions: ActionTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub name: String,
    pub archetype: String,
    pub position: Vec2,
    #[serde(default)]
    pub facing: Option<Direction>,
    /// Driven by input snapshots instead of a behavior policy
    #[serde(default)]
    pub playable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub geometry: StaticGeometry,
    pub archetypes: BTreeMap<String, ArchetypeDescription>,
    pub spawns: Vec<Spawn>,
    #[serde(default)]
    pub tuning: Tuning,
}

fn degenerate(what: &'static str, index: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::DegenerateGeometry {
        what,
        index,
        message: message.into(),
    }
}

impl LevelDescription {
    /// Parse and validate a JSON level
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let level: LevelDescription = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Actions every archetype must carry because some zone plays them
    fn zone_actions(&self) -> Vec<ActionKind> {
        let mut actions: Vec<ActionKind> =
            self.geometry.zones.iter().map(|z| z.action).collect();
        actions.sort();
        actions.dedup();
        actions
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        self.validate_geometry()?;

        let zone_actions = self.zone_actions();
        for (name, archetype) in &self.archetypes {
            archetype.actions.validate(name, &zone_actions)?;
            if archetype.hitbox.is_degenerate() {
                return Err(degenerate("hitbox of archetype", 0, format!("{name:?} has no area")));
            }
        }

        for (index, spawn) in self.spawns.iter().enumerate() {
            let Some(archetype) = self.archetypes.get(&spawn.archetype) else {
                return Err(ConfigError::UnknownArchetype {
                    index,
                    archetype: spawn.archetype.clone(),
                });
            };
            let hitbox = archetype.hitbox.translated(spawn.position);
            if self.geometry.collide(&hitbox) {
                return Err(ConfigError::SpawnBlocked {
                    index,
                    x: spawn.position.x,
                    y: spawn.position.y,
                });
            }
        }
        Ok(())
    }

    fn validate_geometry(&self) -> Result<(), ConfigError> {
        let geo = &self.geometry;
        if geo.bounds.is_degenerate() {
            return Err(degenerate("bounds", 0, "walkable area has no size"));
        }
        for (i, rect) in geo.no_go.iter().enumerate() {
            if rect.is_degenerate() {
                return Err(degenerate("no-go box", i, "width and height must be positive"));
            }
        }
        for (i, rect) in geo.stairs.iter().enumerate() {
            if rect.is_degenerate() {
                return Err(degenerate("stair region", i, "width and height must be positive"));
            }
        }
        for (i, wall) in geo.walls.iter().enumerate() {
            if wall.points.len() < 3 {
                return Err(degenerate("wall", i, format!("{} points", wall.points.len())));
            }
        }
        for (i, fence) in geo.fences.iter().enumerate() {
            if fence.length() <= 0.0 {
                return Err(degenerate("fence", i, "zero length"));
            }
        }
        for (i, path) in geo.hard_paths.iter().enumerate() {
            if path.len() < 2 {
                return Err(degenerate("hard path", i, "needs at least two waypoints"));
            }
        }
        for (i, zone) in geo.zones.iter().enumerate() {
            if zone.rect.is_degenerate() {
                return Err(degenerate("zone", i, "width and height must be positive"));
            }
            if !geo.bounds.contains_point(zone.target) {
                return Err(degenerate("zone", i, "target lies outside the bounds"));
            }
            if !zone.rect.contains_point(zone.target) {
                return Err(degenerate("zone", i, "target lies outside the zone"));
            }
        }
        Ok(())
    }

    /// Shared duration tables, one per archetype
    pub fn action_tables(&self) -> BTreeMap<String, Rc<ActionTable>> {
        self.archetypes
            .iter()
            .map(|(name, archetype)| (name.clone(), Rc::new(archetype.actions.clone())))
            .collect()
    }
}
