//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one generator, owned by the scene)
//! - Stable iteration order (actor insertion order)
//! - No rendering, audio or platform dependencies

pub mod action;
pub mod actor;
pub mod direction;
pub mod duel;
pub mod events;
pub mod geometry;
pub mod npc;
pub mod path;
pub mod pilot;
pub mod state;
pub mod tick;

pub use action::{ActionClock, ActionKind, ActionTable};
pub use actor::{Actor, ActorId, Status};
pub use direction::Direction;
pub use duel::{DuelPair, DuelRules, find_duels};
pub use events::{EventSink, NullSink, SimEvent};
pub use geometry::{Polygon, Rect, Segment, StaticGeometry, Zone};
pub use npc::Npc;
pub use path::{nearest_hard_path, path_avoiding_stairs, shortest_path};
pub use pilot::{Pilot, PilotStatus};
pub use state::{ActorView, Command, Controller, Message, Scene};
pub use tick::{InputSnapshot, TickInput, tick};
