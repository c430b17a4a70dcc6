//! Scene state and commands
//!
//! The scene owns every actor, every behavior policy, the static geometry and
//! the only random generator. Commands that touch two actors are checked on
//! both sides before either is mutated.

use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::action::{ActionKind, ActionTable};
use super::actor::{Actor, ActorId, ActorSignal, DuelRole, Status};
use super::direction::Direction;
use super::duel::DuelPair;
use super::events::SimEvent;
use super::geometry::StaticGeometry;
use super::npc::Npc;
use super::pilot::Pilot;
use crate::error::{CommandError, ConfigError};
use crate::level::LevelDescription;
use crate::tuning::Tuning;

/// State-machine command issued by a policy or by player input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Call out `target`; the issuer becomes the duel origin
    StartDuel { target: ActorId },
    /// Call off the duel the issuer is part of
    ReleaseDuel,
    /// Kill the issuer's duel partner
    Kill { covert: bool },
    /// Stop in place and drop any pilot
    Pause,
    /// Hand over a pilot, optionally interacting with a zone on arrival
    Engage { pilot: Pilot, zone: Option<usize> },
    /// Start the action of the zone the issuer stands in
    Interact,
    StopInteracting,
    /// Leave the scene for good
    Collapse,
}

/// Who decides what an actor does
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    /// Driven by input snapshots
    Player,
    Npc(Npc),
}

/// Ambient notification with a tick lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub ticks_left: u32,
}

/// Everything a renderer needs to draw one actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub id: ActorId,
    pub position: Vec2,
    pub facing: Option<Direction>,
    pub action: ActionKind,
    /// Tick-level index into the action
    pub frame: u32,
    /// Sprite slot for `frame`
    pub sprite_frame: usize,
    pub status: Status,
    pub speed: f32,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id(),
            position: actor.pos(),
            facing: actor.facing(),
            action: actor.action(),
            frame: actor.frame(),
            sprite_frame: actor.sprite_frame(),
            status: actor.status(),
            speed: actor.speed(),
        }
    }
}

/// Complete simulation state of one scene
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) seed: u64,
    pub(crate) description: LevelDescription,
    pub(crate) archetypes: BTreeMap<String, Rc<ActionTable>>,
    /// Insertion order is iteration order
    pub(crate) actors: Vec<Actor>,
    /// One per actor, same index
    pub(crate) controllers: Vec<Controller>,
    /// Duel proposals from the end of the previous tick
    pub(crate) duels: Vec<DuelPair>,
    pub(crate) rng: Pcg32,
    pub(crate) time_ticks: u64,
    /// Black/white screen countdown; no duels while non-zero
    pub(crate) transition_ticks: u32,
    pub(crate) messages: Vec<Message>,
    /// Events raised since the last flush
    pub(crate) outbox: Vec<SimEvent>,
}

impl Scene {
    /// Validate the description and populate the scene
    pub fn new(description: LevelDescription, seed: u64) -> Result<Self, ConfigError> {
        description.validate()?;
        let archetypes = description.action_tables();
        let mut scene = Self {
            seed,
            description,
            archetypes,
            actors: Vec::new(),
            controllers: Vec::new(),
            duels: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            transition_ticks: 0,
            messages: Vec::new(),
            outbox: Vec::new(),
        };
        scene.populate()?;
        Ok(scene)
    }

    fn populate(&mut self) -> Result<(), ConfigError> {
        self.actors.clear();
        self.controllers.clear();
        self.duels.clear();

        let description = &self.description;
        for (index, spawn) in description.spawns.iter().enumerate() {
            let archetype = description.archetypes.get(&spawn.archetype);
            let table = self.archetypes.get(&spawn.archetype);
            let (Some(archetype), Some(table)) = (archetype, table) else {
                return Err(ConfigError::UnknownArchetype {
                    index,
                    archetype: spawn.archetype.clone(),
                });
            };

            let id = ActorId(index);
            let mut actor = Actor::new(
                id,
                spawn.name.clone(),
                spawn.position,
                archetype.hitbox,
                Rc::clone(table),
                description.tuning.speed,
            );
            actor.set_facing(spawn.facing);
            actor.set_on_stairs(description.geometry.on_stairs(spawn.position));
            actor.set_zone(description.geometry.zone_at(spawn.position));
            self.actors.push(actor);

            let controller = if spawn.playable {
                Controller::Player
            } else {
                Controller::Npc(Npc::new(id, &description.tuning, &mut self.rng))
            };
            self.controllers.push(controller);
        }

        log::info!(
            "Scene populated: {} actors ({} playable), seed {}",
            self.actors.len(),
            self.controllers
                .iter()
                .filter(|c| matches!(c, Controller::Player))
                .count(),
            self.seed
        );
        Ok(())
    }

    /// Tear down actors, pilots and policies and repopulate from the description
    ///
    /// The random stream carries on; it is not reseeded.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        log::info!("Scene reset at tick {}", self.time_ticks);
        self.transition_ticks = 0;
        self.messages.clear();
        self.outbox.clear();
        self.populate()
    }

    // === Queries ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn description(&self) -> &LevelDescription {
        &self.description
    }

    pub fn geometry(&self) -> &StaticGeometry {
        &self.description.geometry
    }

    pub fn tuning(&self) -> &Tuning {
        &self.description.tuning
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn controller(&self, id: ActorId) -> Option<&Controller> {
        self.controllers.get(id.0)
    }

    pub fn is_playable(&self, id: ActorId) -> bool {
        matches!(self.controller(id), Some(Controller::Player))
    }

    /// Duel proposals computed at the end of the last tick
    pub fn duels(&self) -> &[DuelPair] {
        &self.duels
    }

    /// Pending match with `id` as origin, if any
    pub fn duel_for(&self, id: ActorId) -> Option<DuelPair> {
        self.duels.iter().copied().find(|pair| pair.origin == id)
    }

    pub fn view(&self, id: ActorId) -> Option<ActorView> {
        self.actor(id).map(ActorView::from)
    }

    pub fn views(&self) -> Vec<ActorView> {
        self.actors.iter().map(ActorView::from).collect()
    }

    pub fn alive_count(&self) -> usize {
        self.actors.iter().filter(|a| !a.is_out()).count()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.outbox)
    }

    // === Ambient services ===

    /// Show a notification; `ticks` defaults to the tuned message lifetime
    pub fn post_message(&mut self, text: impl Into<String>, ticks: Option<u32>) {
        let ticks_left = ticks.unwrap_or(self.description.tuning.message_ticks);
        if ticks_left > 0 {
            self.messages.push(Message {
                text: text.into(),
                ticks_left,
            });
        }
    }

    pub(crate) fn advance_messages(&mut self) {
        for message in &mut self.messages {
            message.ticks_left = message.ticks_left.saturating_sub(1);
        }
        self.messages.retain(|m| m.ticks_left > 0);
    }

    /// Black/white screen: duel matching is suspended until it runs out
    pub fn start_transition(&mut self) {
        self.transition_ticks = self.description.tuning.transition_ticks;
        self.duels.clear();
        log::info!("Transition started for {} ticks", self.transition_ticks);
    }

    pub fn is_transition_active(&self) -> bool {
        self.transition_ticks > 0
    }

    // === Commands ===

    /// Apply one command on behalf of `id`; rejected commands change nothing
    pub fn apply(&mut self, id: ActorId, command: Command) -> Result<(), CommandError> {
        match command {
            Command::StartDuel { target } => self.start_duel(id, target),
            Command::ReleaseDuel => self.release_duel(id),
            Command::Kill { covert } => self.kill(id, covert),
            Command::Pause => self.actor_mut(id)?.halt(),
            Command::Engage { pilot, zone } => self.actor_mut(id)?.engage(pilot, zone),
            Command::Interact => self.interact(id),
            Command::StopInteracting => self.actor_mut(id)?.end_interaction(),
            Command::Collapse => self.collapse(id),
        }
    }

    fn actor_ref(&self, id: ActorId) -> Result<&Actor, CommandError> {
        self.actors.get(id.0).ok_or(CommandError::UnknownActor(id))
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, CommandError> {
        self.actors.get_mut(id.0).ok_or(CommandError::UnknownActor(id))
    }

    /// Two distinct actors borrowed mutably at once
    fn pair_mut(
        &mut self,
        a: ActorId,
        b: ActorId,
    ) -> Result<(&mut Actor, &mut Actor), CommandError> {
        if a == b {
            return Err(CommandError::SelfDuel(a));
        }
        for id in [a, b] {
            if id.0 >= self.actors.len() {
                return Err(CommandError::UnknownActor(id));
            }
        }
        if a.0 < b.0 {
            let (left, right) = self.actors.split_at_mut(b.0);
            Ok((&mut left[a.0], &mut right[0]))
        } else {
            let (left, right) = self.actors.split_at_mut(a.0);
            Ok((&mut right[0], &mut left[b.0]))
        }
    }

    fn illegal(actor: &Actor, command: &'static str) -> CommandError {
        CommandError::IllegalTransition {
            actor: actor.id(),
            status: actor.status(),
            command,
        }
    }

    fn start_duel(&mut self, origin: ActorId, target: ActorId) -> Result<(), CommandError> {
        let (o, t) = self.pair_mut(origin, target)?;
        o.check_can_duel()?;
        t.check_can_duel()?;

        let (origin_pos, target_pos) = (o.pos(), t.pos());
        o.enter_duel(DuelRole::Origin, target, target_pos);
        t.enter_duel(DuelRole::Target, origin, origin_pos);
        log::info!("{} calls out {}", o.name(), t.name());

        self.outbox.push(SimEvent::DuelStarted { origin, target });
        Ok(())
    }

    fn release_duel(&mut self, id: ActorId) -> Result<(), CommandError> {
        let actor = self.actor_ref(id)?;
        if !actor.status().is_dueling() {
            return Err(Self::illegal(actor, "release a duel"));
        }
        let partner = actor.partner().ok_or(CommandError::NoPartner(id))?;
        let (origin, target) = if actor.status() == Status::DuelOrigin {
            (id, partner)
        } else {
            (partner, id)
        };

        let (a, b) = self.pair_mut(id, partner)?;
        a.leave_duel();
        b.leave_duel();
        log::debug!("{} and {} back off", a.name(), b.name());

        self.outbox.push(SimEvent::DuelReleased { origin, target });
        Ok(())
    }

    fn kill(&mut self, aggressor: ActorId, covert: bool) -> Result<(), CommandError> {
        let actor = self.actor_ref(aggressor)?;
        if !actor.status().is_dueling() {
            return Err(Self::illegal(actor, "kill"));
        }
        let victim = actor.partner().ok_or(CommandError::NoPartner(aggressor))?;

        let (a, v) = self.pair_mut(aggressor, victim)?;
        v.die();
        a.finish_kill(covert);
        log::info!(
            "{} kills {}{}",
            a.name(),
            v.name(),
            if covert { " quietly" } else { "" }
        );

        self.outbox.push(SimEvent::Killed {
            aggressor,
            victim,
            covert,
        });
        Ok(())
    }

    /// Out for good, releasing any duel partner first
    fn collapse(&mut self, id: ActorId) -> Result<(), CommandError> {
        let actor = self.actor_ref(id)?;
        if actor.is_out() {
            return Err(Self::illegal(actor, "collapse"));
        }
        if actor.partner().is_some() {
            self.release_duel(id)?;
        }

        let actor = self.actor_mut(id)?;
        actor.die();
        log::info!("{} collapses", actor.name());
        self.outbox.push(SimEvent::Collapsed { actor: id });
        Ok(())
    }

    fn interact(&mut self, id: ActorId) -> Result<(), CommandError> {
        let zones = &self.description.geometry.zones;
        let actor = self.actors.get_mut(id.0).ok_or(CommandError::UnknownActor(id))?;
        let index = actor.zone().ok_or(CommandError::NoZone(id))?;
        let zone = zones.get(index).ok_or(CommandError::NoZone(id))?;
        actor.begin_interaction(zone)?;
        log::debug!("{} interacts with zone {}", actor.name(), index);
        Ok(())
    }

    // === Per-tick helpers ===

    /// Advance one actor's timers and refresh its stairs and zone membership
    pub(crate) fn update_actor(&mut self, id: ActorId) {
        let geometry = &self.description.geometry;
        let Some(actor) = self.actors.get_mut(id.0) else {
            return;
        };

        match actor.update(geometry) {
            Some(ActorSignal::Incapacitated) => {
                log::debug!("{} is incapacitated", actor.name());
                self.outbox.push(SimEvent::Incapacitated { actor: id });
            }
            Some(ActorSignal::Arrived { zone: Some(zone) }) => {
                log::debug!("{} arrived and interacts with zone {}", actor.name(), zone);
            }
            Some(ActorSignal::Blocked) => {
                log::debug!("{} is blocked, autopilot aborted", actor.name());
            }
            Some(ActorSignal::Arrived { zone: None } | ActorSignal::Recovered) | None => {}
        }

        if actor.is_out() {
            return;
        }
        actor.set_on_stairs(geometry.on_stairs(actor.pos()));
        let zone = geometry.zone_at(actor.pos());
        let previous = actor.zone();
        if zone != previous {
            actor.set_zone(zone);
            if let Some(zone) = previous {
                self.outbox.push(SimEvent::ZoneExited { actor: id, zone });
            }
            if let Some(zone) = zone {
                self.outbox.push(SimEvent::ZoneEntered { actor: id, zone });
            }
        }
    }
}
