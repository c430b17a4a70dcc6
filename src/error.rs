//! Error taxonomy
//!
//! Configuration errors are fatal at load time and surface before a scene
//! starts. Command errors reject a single state-machine command atomically;
//! neither participating actor is modified when one is returned.

use thiserror::Error;

use crate::sim::action::ActionKind;
use crate::sim::actor::{ActorId, Status};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level description is not valid JSON: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("spawn {index} references unknown archetype {archetype:?}")]
    UnknownArchetype { index: usize, archetype: String },
    #[error("archetype {archetype:?} has no duration table for action {action:?}")]
    MissingAction {
        archetype: String,
        action: ActionKind,
    },
    #[error("archetype {archetype:?} action {action:?} has an empty or zero-length exposure list")]
    EmptyExposure {
        archetype: String,
        action: ActionKind,
    },
    #[error("{what} {index} is degenerate: {message}")]
    DegenerateGeometry {
        what: &'static str,
        index: usize,
        message: String,
    },
    #[error("spawn {index} at ({x}, {y}) collides with static geometry")]
    SpawnBlocked { index: usize, x: f32, y: f32 },
    #[error("invalid tuning: {0}")]
    Tuning(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no live actor with id {0:?}")]
    UnknownActor(ActorId),
    #[error("actor {actor:?} cannot {command} while {status:?}")]
    IllegalTransition {
        actor: ActorId,
        status: Status,
        command: &'static str,
    },
    #[error("actor {0:?} cannot duel itself")]
    SelfDuel(ActorId),
    #[error("actor {0:?} has no duel partner")]
    NoPartner(ActorId),
    #[error("actor {0:?} is not inside an interaction zone")]
    NoZone(ActorId),
}
