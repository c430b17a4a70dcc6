//! Audio/VFX trigger points
//!
//! The simulation reports transitions through an [`EventSink`]; sinks cannot
//! fail and the simulation never branches on what they do.

use serde::{Deserialize, Serialize};

use super::actor::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    DuelStarted { origin: ActorId, target: ActorId },
    DuelReleased { origin: ActorId, target: ActorId },
    Killed {
        aggressor: ActorId,
        victim: ActorId,
        covert: bool,
    },
    Incapacitated { actor: ActorId },
    Collapsed { actor: ActorId },
    ZoneEntered { actor: ActorId, zone: usize },
    ZoneExited { actor: ActorId, zone: usize },
}

/// Fire-and-forget receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SimEvent) {}
}
