//! Fixed timestep simulation tick
//!
//! Advances a scene by exactly one logical step. Order within a tick:
//! (a) ambient message timers, (b) every actor in insertion order (policy or
//! input command, then movement and timers), (c) black/white transition
//! countdown, or (d) duel matching for the next tick's consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, Status};
use super::direction::Direction;
use super::duel::{DuelPair, DuelRules, find_duels};
use super::events::EventSink;
use super::npc::PolicyContext;
use super::state::{Command, Controller, Scene};

/// Signals from one playable actor for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Held movement direction
    pub direction: Option<Direction>,
    /// Confirm: call out the current match, or shoot while dueling
    pub duel: bool,
    /// Action: interact with a zone, or kill quietly while dueling
    pub interact: bool,
    /// Back off from a duel or an interaction
    pub cancel: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Missing entries count as no input
    pub players: BTreeMap<ActorId, InputSnapshot>,
}

impl TickInput {
    pub fn single(id: ActorId, snapshot: InputSnapshot) -> Self {
        let mut players = BTreeMap::new();
        players.insert(id, snapshot);
        Self { players }
    }
}

/// Turn a player's snapshot into a state-machine command
fn player_command(actor: &Actor, input: &InputSnapshot, duels: &[DuelPair]) -> Option<Command> {
    let status = actor.status();
    if status.is_dueling() {
        return if input.duel {
            Some(Command::Kill { covert: false })
        } else if input.interact {
            Some(Command::Kill { covert: true })
        } else if input.cancel {
            Some(Command::ReleaseDuel)
        } else {
            None
        };
    }
    if input.duel && status.is_duelable() {
        if let Some(pair) = duels.iter().find(|p| p.origin == actor.id()) {
            return Some(Command::StartDuel {
                target: pair.target,
            });
        }
    }
    match status {
        Status::Free if input.interact && actor.zone().is_some() => Some(Command::Interact),
        Status::Interacting if input.cancel || input.direction.is_some() => {
            Some(Command::StopInteracting)
        }
        _ => None,
    }
}

/// Decide this tick's command for one actor
fn decide(scene: &mut Scene, index: usize, input: &TickInput, alive: usize) -> Option<Command> {
    let Scene {
        actors,
        controllers,
        duels,
        rng,
        description,
        ..
    } = scene;
    let actor = actors.get(index)?;
    match controllers.get_mut(index)? {
        Controller::Npc(npc) => {
            let ctx = PolicyContext {
                geometry: &description.geometry,
                tuning: &description.tuning,
                duels,
                alive,
            };
            npc.think(actor, &ctx, rng)
        }
        Controller::Player => {
            let snapshot = input.players.get(&actor.id())?;
            player_command(actor, snapshot, duels)
        }
    }
}

/// Advance the scene by one fixed timestep, reporting events to `sink`
pub fn tick(scene: &mut Scene, input: &TickInput, sink: &mut dyn EventSink) {
    // (a) Ambient timers
    scene.advance_messages();

    // (b) Actors, in insertion order
    let alive = scene.alive_count();
    for index in 0..scene.actors.len() {
        let id = ActorId(index);
        if let Some(command) = decide(scene, index, input, alive) {
            if let Err(err) = scene.apply(id, command) {
                log::warn!("Dropped command for actor {}: {}", index, err);
            }
        }

        if scene.is_playable(id) {
            let direction = input.players.get(&id).and_then(|s| s.direction);
            let geometry = &scene.description.geometry;
            if let Some(actor) = scene.actors.get_mut(index) {
                actor.walk(direction, geometry);
            }
        }
        scene.update_actor(id);
    }

    if scene.transition_ticks > 0 {
        // (c) Black/white screen: no duels this tick
        scene.transition_ticks -= 1;
        scene.duels.clear();
    } else {
        // (d) Proposals for the next tick
        let rules = DuelRules::from(&scene.description.tuning);
        scene.duels = find_duels(&scene.actors, &scene.description.geometry, &rules);
    }

    scene.time_ticks += 1;
    for event in scene.drain_events() {
        sink.emit(event);
    }
}
