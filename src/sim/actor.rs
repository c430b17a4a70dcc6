//! Actor state machine
//!
//! An actor owns its position, facing, speed, action clock, status, duel
//! partner handle and (while autopiloting) its pilot. Transitions that touch
//! two actors are coordinated by the scene; the methods here only ever
//! mutate one side and never fail halfway.

use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{ActionClock, ActionKind, ActionTable};
use super::direction::Direction;
use super::geometry::{Rect, StaticGeometry, Zone};
use super::pilot::{Pilot, PilotStatus};
use crate::error::CommandError;
use crate::tuning::SpeedProfile;

/// Index into the scene's actor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Free,
    Stuck,
    Interacting,
    Autopilot,
    DuelOrigin,
    DuelTarget,
    /// Terminal
    Out,
}

impl Status {
    /// Statuses the duel matcher considers
    pub fn is_duelable(self) -> bool {
        matches!(self, Status::Free | Status::Autopilot | Status::Stuck)
    }

    pub fn is_dueling(self) -> bool {
        matches!(self, Status::DuelOrigin | Status::DuelTarget)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelRole {
    Origin,
    Target,
}

/// Something the scene should know about after an actor update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSignal {
    /// Autopilot finished; `zone` is set when the actor started interacting there
    Arrived { zone: Option<usize> },
    /// Autopilot aborted because the actor could not move
    Blocked,
    Incapacitated,
    Recovered,
}

#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    name: String,
    pos: Vec2,
    facing: Option<Direction>,
    speed: f32,
    profile: SpeedProfile,
    clock: ActionClock,
    table: Rc<ActionTable>,
    status: Status,
    partner: Option<ActorId>,
    pilot: Option<Pilot>,
    /// Zone to interact with once the pilot is exhausted
    destination_zone: Option<usize>,
    /// Zone the actor currently stands in (maintained by the scene)
    zone: Option<usize>,
    /// Armed when the current interaction finishes
    pending_incapacitation: Option<u32>,
    /// Ticks until Free/Autopilot turns into Stuck
    incapacitation: Option<u32>,
    /// Hitbox relative to `pos`
    hitbox: Rect,
    on_stairs: bool,
}

impl Actor {
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        pos: Vec2,
        hitbox: Rect,
        table: Rc<ActionTable>,
        profile: SpeedProfile,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            facing: None,
            speed: 0.0,
            profile,
            clock: ActionClock::new(ActionKind::Idle),
            table,
            status: Status::Free,
            partner: None,
            pilot: None,
            destination_zone: None,
            zone: None,
            pending_incapacitation: None,
            incapacitation: None,
            hitbox,
            on_stairs: false,
        }
    }

    // === Queries ===

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_out(&self) -> bool {
        self.status == Status::Out
    }

    pub fn partner(&self) -> Option<ActorId> {
        self.partner
    }

    pub fn pilot(&self) -> Option<&Pilot> {
        self.pilot.as_ref()
    }

    pub fn action(&self) -> ActionKind {
        self.clock.kind()
    }

    pub fn frame(&self) -> u32 {
        self.clock.index()
    }

    pub fn sprite_frame(&self) -> usize {
        self.table.sprite_frame(self.clock.kind(), self.clock.index())
    }

    pub fn action_complete(&self) -> bool {
        self.clock.is_complete(&self.table)
    }

    pub fn zone(&self) -> Option<usize> {
        self.zone
    }

    pub fn on_stairs(&self) -> bool {
        self.on_stairs
    }

    pub fn incapacitation(&self) -> Option<u32> {
        self.incapacitation
    }

    /// Hitbox relative to the actor's position
    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    /// Hitbox in world space at the current position
    pub fn world_hitbox(&self) -> Rect {
        self.hitbox.translated(self.pos)
    }

    // === Facing and speed ===

    pub fn set_facing(&mut self, facing: Option<Direction>) {
        self.facing = facing;
    }

    /// Face the compass direction nearest to `target` (unchanged if on top of it)
    pub fn face_towards(&mut self, target: Vec2) {
        if let Some(dir) = Direction::from_vector(target - self.pos) {
            self.facing = Some(dir);
        }
    }

    /// Jump to walking speed from rest, otherwise ramp up geometrically
    pub fn accelerate(&mut self) {
        if self.speed < self.profile.min {
            self.speed = self.profile.min;
        } else {
            self.speed = (self.speed * self.profile.factor).min(self.profile.max);
        }
    }

    /// Ramp down geometrically, snapping to rest below walking speed
    pub fn decelerate(&mut self) {
        self.speed /= self.profile.factor;
        if self.speed < self.profile.min {
            self.speed = 0.0;
        }
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    /// Arm the countdown that eventually leaves the actor stuck
    pub fn arm_incapacitation(&mut self, ticks: u32) {
        self.incapacitation = Some(ticks.max(1));
    }

    // === Movement ===

    /// Move without collision checks (authored paths)
    pub(crate) fn translate(&mut self, delta: Vec2) {
        if !self.is_out() {
            self.pos += delta;
        }
    }

    /// Step `speed` pixels toward `dir`, sliding along walls on diagonals
    ///
    /// Returns false when nothing could move.
    pub fn offset(&mut self, dir: Direction, geometry: &StaticGeometry) -> bool {
        if self.is_out() || self.speed <= 0.0 {
            return false;
        }
        let mut candidates = vec![dir];
        if dir.is_diagonal() {
            candidates.extend(dir.vertical_part());
            candidates.extend(dir.horizontal_part());
        }
        for step in candidates {
            let next = self.pos + step.unit() * self.speed;
            if !geometry.collide(&self.hitbox.translated(next)) {
                self.pos = next;
                return true;
            }
        }
        false
    }

    /// Player-style free walking; `None` lets the actor coast to a stop
    pub fn walk(&mut self, dir: Option<Direction>, geometry: &StaticGeometry) {
        if self.status != Status::Free {
            return;
        }
        match dir {
            Some(dir) => {
                self.facing = Some(dir);
                self.accelerate();
                if !self.offset(dir, geometry) {
                    self.stop();
                }
            }
            None if self.speed > 0.0 => {
                self.decelerate();
                if let Some(facing) = self.facing {
                    if !self.offset(facing, geometry) {
                        self.stop();
                    }
                }
            }
            // Resting: keep whatever pose is playing
            None => return,
        }
        self.play(if self.speed > 0.0 {
            ActionKind::Walk
        } else {
            ActionKind::Idle
        });
    }

    // === Actions ===

    /// Switch action, keeping progress if it is already playing
    fn play(&mut self, kind: ActionKind) {
        if self.clock.kind() != kind {
            self.clock.set(kind);
        }
    }

    /// Start an action from its first frame
    fn replay(&mut self, kind: ActionKind) {
        self.clock.set(kind);
    }

    /// Free, or Autopilot when a pilot survived (stairs)
    fn settle(&mut self, action: ActionKind) {
        if self.pilot.is_some() {
            self.status = Status::Autopilot;
            self.play(ActionKind::Walk);
        } else {
            self.status = Status::Free;
            self.replay(action);
        }
    }

    /// Pilots survive freezes only on inclined surfaces
    fn drop_pilot_unless_on_stairs(&mut self) {
        if !self.on_stairs {
            self.pilot = None;
            self.destination_zone = None;
        }
    }

    fn illegal(&self, command: &'static str) -> CommandError {
        CommandError::IllegalTransition {
            actor: self.id,
            status: self.status,
            command,
        }
    }

    // === Transitions ===

    /// Hand over a pilot: Free -> Autopilot
    pub(crate) fn engage(&mut self, pilot: Pilot, zone: Option<usize>) -> Result<(), CommandError> {
        if self.status != Status::Free {
            return Err(self.illegal("engage a pilot"));
        }
        self.pilot = Some(pilot);
        self.destination_zone = zone;
        self.status = Status::Autopilot;
        self.play(ActionKind::Walk);
        Ok(())
    }

    /// Stop in place, dropping any pilot: Free/Autopilot -> Free
    pub(crate) fn halt(&mut self) -> Result<(), CommandError> {
        if !matches!(self.status, Status::Free | Status::Autopilot) {
            return Err(self.illegal("halt"));
        }
        self.pilot = None;
        self.destination_zone = None;
        self.stop();
        self.status = Status::Free;
        self.play(ActionKind::Idle);
        Ok(())
    }

    pub(crate) fn check_can_duel(&self) -> Result<(), CommandError> {
        if !self.status.is_duelable() || self.partner.is_some() {
            return Err(self.illegal("enter a duel"));
        }
        Ok(())
    }

    /// Freeze for a face-off with `partner`
    pub(crate) fn enter_duel(&mut self, role: DuelRole, partner: ActorId, partner_pos: Vec2) {
        self.drop_pilot_unless_on_stairs();
        self.stop();
        self.partner = Some(partner);
        self.face_towards(partner_pos);
        match role {
            DuelRole::Origin => {
                self.status = Status::DuelOrigin;
                self.replay(ActionKind::Call);
            }
            DuelRole::Target => {
                self.status = Status::DuelTarget;
                self.replay(ActionKind::Idle);
            }
        }
    }

    /// Duel called off: back to Free/Autopilot looking suspicious
    pub(crate) fn leave_duel(&mut self) {
        self.partner = None;
        self.settle(ActionKind::Suspicious);
    }

    /// Aggressor side of a kill
    pub(crate) fn finish_kill(&mut self, covert: bool) {
        self.partner = None;
        if covert {
            self.pilot = None;
            self.destination_zone = None;
            self.status = Status::Interacting;
            self.replay(ActionKind::Attack);
        } else {
            self.settle(ActionKind::Idle);
        }
    }

    /// Terminal: death animation, then coma
    pub(crate) fn die(&mut self) {
        self.partner = None;
        self.pilot = None;
        self.destination_zone = None;
        self.incapacitation = None;
        self.stop();
        self.status = Status::Out;
        self.replay(ActionKind::Death);
    }

    /// Start interacting with a zone; zone membership stays with the scene
    pub(crate) fn begin_interaction(&mut self, zone: &Zone) -> Result<(), CommandError> {
        if !matches!(self.status, Status::Free | Status::Autopilot) {
            return Err(self.illegal("interact"));
        }
        self.pilot = None;
        self.destination_zone = None;
        self.stop();
        if let Some(facing) = zone.facing {
            self.facing = Some(facing);
        }
        self.pending_incapacitation = zone.incapacitates_after;
        self.status = Status::Interacting;
        self.replay(zone.action);
        Ok(())
    }

    /// Interacting -> Free, arming any incapacitation the zone carries
    pub(crate) fn end_interaction(&mut self) -> Result<(), CommandError> {
        if self.status != Status::Interacting {
            return Err(self.illegal("stop interacting"));
        }
        if let Some(ticks) = self.pending_incapacitation.take() {
            self.arm_incapacitation(ticks);
        }
        self.status = Status::Free;
        self.replay(ActionKind::Idle);
        Ok(())
    }

    fn incapacitate(&mut self) {
        self.incapacitation = None;
        self.drop_pilot_unless_on_stairs();
        self.stop();
        self.status = Status::Stuck;
        self.replay(ActionKind::Incapacitated);
    }

    // === Per-tick update ===

    pub(crate) fn set_on_stairs(&mut self, on_stairs: bool) {
        self.on_stairs = on_stairs;
    }

    pub(crate) fn set_zone(&mut self, zone: Option<usize>) {
        self.zone = zone;
    }

    /// Advance the action clock and the status-specific timers by one tick
    pub(crate) fn update(&mut self, geometry: &StaticGeometry) -> Option<ActorSignal> {
        // The last frame stays on screen for one tick before anything reacts to it
        let complete = self.clock.is_complete(&self.table);
        if complete && self.clock.kind().is_looping() {
            self.clock.restart();
        } else {
            self.clock.advance(&self.table);
        }

        match self.status {
            Status::Out => {
                if complete && self.clock.kind() == ActionKind::Death {
                    self.replay(ActionKind::Coma);
                }
                None
            }
            Status::DuelOrigin | Status::DuelTarget => None,
            Status::Stuck => {
                if complete {
                    let walking = self.on_stairs && self.pilot.is_some();
                    self.pilot = if walking { self.pilot.take() } else { None };
                    self.settle(ActionKind::Idle);
                    return Some(ActorSignal::Recovered);
                }
                None
            }
            Status::Interacting => {
                if complete && !self.clock.kind().is_looping() {
                    // Only fails when not interacting, which was just checked
                    let _ = self.end_interaction();
                }
                None
            }
            Status::Autopilot => self
                .step_pilot(geometry)
                .or_else(|| self.tick_incapacitation()),
            Status::Free => self.tick_incapacitation(),
        }
    }

    fn tick_incapacitation(&mut self) -> Option<ActorSignal> {
        let remaining = self.incapacitation?;
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.incapacitate();
            return Some(ActorSignal::Incapacitated);
        }
        self.incapacitation = Some(remaining);
        None
    }

    fn step_pilot(&mut self, geometry: &StaticGeometry) -> Option<ActorSignal> {
        let Some(mut pilot) = self.pilot.take() else {
            self.status = Status::Free;
            self.play(ActionKind::Idle);
            return Some(ActorSignal::Arrived { zone: None });
        };
        match pilot.step(self, geometry) {
            PilotStatus::Moving => {
                self.pilot = Some(pilot);
                self.play(ActionKind::Walk);
                None
            }
            PilotStatus::Exhausted => {
                self.stop();
                let target = self.destination_zone.take();
                let zone = target.and_then(|i| geometry.zones.get(i).map(|z| (i, z)));
                match zone {
                    Some((index, zone)) => {
                        self.status = Status::Free;
                        // Status is Free, so this cannot be rejected
                        let _ = self.begin_interaction(zone);
                        Some(ActorSignal::Arrived { zone: Some(index) })
                    }
                    None => {
                        self.status = Status::Free;
                        self.play(ActionKind::Idle);
                        Some(ActorSignal::Arrived { zone: None })
                    }
                }
            }
            PilotStatus::Blocked => {
                self.stop();
                self.destination_zone = None;
                self.status = Status::Free;
                self.play(ActionKind::Idle);
                Some(ActorSignal::Blocked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::tests::sample_table;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(
            ActorId(0),
            "test",
            Vec2::new(x, y),
            Rect::new(-4.0, -2.0, 8.0, 4.0),
            Rc::new(sample_table()),
            SpeedProfile::default(),
        )
    }

    fn open() -> StaticGeometry {
        StaticGeometry::open(Rect::new(0.0, 0.0, 400.0, 300.0))
    }

    #[test]
    fn test_speed_ramp_up_and_down() {
        let mut actor = actor_at(50.0, 50.0);
        let profile = SpeedProfile::default();
        let mut last = actor.speed();
        loop {
            actor.accelerate();
            assert!(actor.speed() <= profile.max);
            if actor.speed() == last {
                break;
            }
            assert!(actor.speed() > last);
            last = actor.speed();
        }
        assert_eq!(actor.speed(), profile.max);

        let mut ticks = 0;
        while actor.speed() > 0.0 {
            actor.decelerate();
            ticks += 1;
            assert!(ticks < 64, "deceleration never reached rest");
        }
        assert_eq!(actor.speed(), 0.0);
    }

    #[test]
    fn test_diagonal_slides_along_wall() {
        let mut geo = open();
        // Wall directly to the east of the hitbox
        geo.no_go.push(Rect::new(54.0, 0.0, 20.0, 300.0));
        let mut actor = actor_at(50.0, 100.0);
        actor.accelerate();

        let start = actor.pos();
        assert!(actor.offset(Direction::SouthEast, &geo));
        let moved = actor.pos() - start;
        assert_eq!(moved.x, 0.0);
        assert!(moved.y > 0.0);

        // Straight into the wall is a hard block
        let before = actor.pos();
        assert!(!actor.offset(Direction::East, &geo));
        assert_eq!(actor.pos(), before);
    }

    #[test]
    fn test_diagonal_prefers_vertical_then_horizontal() {
        let mut geo = open();
        // Floor below the actor: vertical slide is blocked, horizontal one is not
        geo.no_go.push(Rect::new(0.0, 102.0, 400.0, 20.0));
        let mut actor = actor_at(50.0, 100.0);
        actor.accelerate();
        assert!(actor.offset(Direction::SouthEast, &geo));
        assert_eq!(actor.pos().y, 100.0);
        assert!(actor.pos().x > 50.0);
    }

    #[test]
    fn test_duel_freezes_and_release_suspicious() {
        let mut actor = actor_at(50.0, 50.0);
        actor.accelerate();
        actor.check_can_duel().unwrap();
        actor.enter_duel(DuelRole::Origin, ActorId(1), Vec2::new(90.0, 50.0));
        assert_eq!(actor.status(), Status::DuelOrigin);
        assert_eq!(actor.action(), ActionKind::Call);
        assert_eq!(actor.speed(), 0.0);
        assert_eq!(actor.facing(), Some(Direction::East));
        assert!(actor.check_can_duel().is_err());

        actor.leave_duel();
        assert_eq!(actor.status(), Status::Free);
        assert_eq!(actor.action(), ActionKind::Suspicious);
        assert_eq!(actor.partner(), None);
    }

    #[test]
    fn test_duel_keeps_pilot_only_on_stairs() {
        let mut actor = actor_at(50.0, 50.0);
        actor.engage(Pilot::smooth([Vec2::new(100.0, 50.0)]), None).unwrap();
        actor.enter_duel(DuelRole::Target, ActorId(1), Vec2::new(10.0, 50.0));
        assert!(actor.pilot().is_none());

        let mut actor = actor_at(50.0, 50.0);
        actor.set_on_stairs(true);
        actor.engage(Pilot::hard([Vec2::new(100.0, 50.0)]), None).unwrap();
        actor.enter_duel(DuelRole::Target, ActorId(1), Vec2::new(10.0, 50.0));
        assert!(actor.pilot().is_some());
        actor.leave_duel();
        assert_eq!(actor.status(), Status::Autopilot);
    }

    #[test]
    fn test_out_is_terminal() {
        let geo = open();
        let mut actor = actor_at(50.0, 50.0);
        actor.die();
        assert_eq!(actor.status(), Status::Out);
        assert_eq!(actor.action(), ActionKind::Death);
        assert!(actor.check_can_duel().is_err());
        assert!(actor.engage(Pilot::smooth([Vec2::new(1.0, 1.0)]), None).is_err());
        assert!(actor.halt().is_err());
        actor.accelerate();
        assert!(!actor.offset(Direction::East, &geo));
        for _ in 0..40 {
            actor.update(&geo);
            assert_eq!(actor.status(), Status::Out);
        }
        assert_eq!(actor.action(), ActionKind::Coma);
    }

    #[test]
    fn test_death_holds_last_frame_before_coma() {
        let geo = open();
        let mut actor = actor_at(50.0, 50.0);
        actor.die();
        let duration = sample_table().duration(ActionKind::Death);
        for _ in 0..duration - 1 {
            actor.update(&geo);
        }
        assert_eq!(actor.action(), ActionKind::Death);
        assert_eq!(actor.frame(), duration - 1);
        actor.update(&geo);
        assert_eq!(actor.action(), ActionKind::Coma);
    }

    #[test]
    fn test_single_tick_frames_all_show() {
        let mut exposures = BTreeMap::new();
        for action in ActionKind::REQUIRED {
            exposures.insert(action, vec![1, 1]);
        }
        let table = ActionTable::new("blink", exposures, &[]).unwrap();
        let mut actor = Actor::new(
            ActorId(0),
            "blink",
            Vec2::new(50.0, 50.0),
            Rect::new(-4.0, -2.0, 8.0, 4.0),
            Rc::new(table),
            SpeedProfile::default(),
        );
        let geo = open();
        let mut frames = Vec::new();
        for _ in 0..6 {
            actor.update(&geo);
            frames.push(actor.sprite_frame());
        }
        assert_eq!(frames, vec![1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_incapacitation_then_recovery() {
        let geo = open();
        let mut actor = actor_at(50.0, 50.0);
        actor.arm_incapacitation(3);
        assert_eq!(actor.update(&geo), None);
        assert_eq!(actor.update(&geo), None);
        assert_eq!(actor.update(&geo), Some(ActorSignal::Incapacitated));
        assert_eq!(actor.status(), Status::Stuck);
        assert_eq!(actor.action(), ActionKind::Incapacitated);

        let duration = sample_table().duration(ActionKind::Incapacitated);
        let mut recovered = false;
        for _ in 0..duration {
            if actor.update(&geo) == Some(ActorSignal::Recovered) {
                recovered = true;
                break;
            }
        }
        assert!(recovered);
        assert_eq!(actor.status(), Status::Free);
    }

    #[test]
    fn test_stuck_on_stairs_resumes_autopilot() {
        let geo = open();
        let mut actor = actor_at(50.0, 50.0);
        actor.set_on_stairs(true);
        actor.engage(Pilot::hard([Vec2::new(50.0, 200.0)]), None).unwrap();
        actor.arm_incapacitation(1);
        // The pilot steps once, then the countdown fires
        assert_eq!(actor.update(&geo), Some(ActorSignal::Incapacitated));
        assert_eq!(actor.status(), Status::Stuck);
        assert!(actor.pilot().is_some());
        for _ in 0..sample_table().duration(ActionKind::Incapacitated) {
            actor.update(&geo);
        }
        assert_eq!(actor.status(), Status::Autopilot);
    }

    #[test]
    fn test_one_shot_interaction_returns_to_free() {
        let geo = open();
        let zone = Zone {
            rect: Rect::new(40.0, 40.0, 20.0, 20.0),
            target: Vec2::new(50.0, 50.0),
            action: ActionKind::Drink,
            facing: Some(Direction::North),
            attracts: true,
            incapacitates_after: Some(10),
        };
        let mut actor = actor_at(50.0, 50.0);
        actor.begin_interaction(&zone).unwrap();
        assert_eq!(actor.status(), Status::Interacting);
        assert_eq!(actor.facing(), Some(Direction::North));
        assert_eq!(actor.zone(), None);
        let duration = sample_table().duration(ActionKind::Drink);
        for _ in 0..duration - 1 {
            actor.update(&geo);
        }
        // The last sprite frame is still showing
        assert_eq!(actor.status(), Status::Interacting);
        assert_eq!(actor.frame(), duration - 1);
        assert_eq!(actor.sprite_frame(), 2);
        actor.update(&geo);
        assert_eq!(actor.status(), Status::Free);
        assert_eq!(actor.incapacitation(), Some(10));
    }

    #[test]
    fn test_looping_interaction_needs_release() {
        let geo = open();
        let zone = Zone {
            rect: Rect::new(40.0, 40.0, 20.0, 20.0),
            target: Vec2::new(50.0, 50.0),
            action: ActionKind::Play,
            facing: None,
            attracts: false,
            incapacitates_after: None,
        };
        let mut actor = actor_at(50.0, 50.0);
        actor.begin_interaction(&zone).unwrap();
        for _ in 0..100 {
            actor.update(&geo);
        }
        assert_eq!(actor.status(), Status::Interacting);
        actor.end_interaction().unwrap();
        assert_eq!(actor.status(), Status::Free);
    }

    #[test]
    fn test_autopilot_arrival_and_block() {
        let mut geo = open();
        let mut actor = actor_at(50.0, 50.0);
        actor.engage(Pilot::smooth([Vec2::new(70.0, 50.0)]), None).unwrap();
        let mut signal = None;
        for _ in 0..100 {
            signal = actor.update(&geo);
            if signal.is_some() {
                break;
            }
        }
        assert_eq!(signal, Some(ActorSignal::Arrived { zone: None }));
        assert_eq!(actor.status(), Status::Free);

        geo.no_go.push(Rect::new(76.0, 0.0, 10.0, 300.0));
        let mut actor = actor_at(72.0, 50.0);
        actor.engage(Pilot::smooth([Vec2::new(200.0, 50.0)]), None).unwrap();
        assert_eq!(actor.update(&geo), Some(ActorSignal::Blocked));
        assert_eq!(actor.status(), Status::Free);
        assert!(actor.pilot().is_none());
    }

    proptest! {
        #[test]
        fn prop_accelerate_never_exceeds_max(calls in 1usize..200) {
            let mut actor = actor_at(10.0, 10.0);
            let mut last = 0.0;
            for _ in 0..calls {
                actor.accelerate();
                prop_assert!(actor.speed() >= last);
                prop_assert!(actor.speed() <= SpeedProfile::default().max);
                last = actor.speed();
            }
        }

        #[test]
        fn prop_offset_never_enters_geometry(
            moves in prop::collection::vec(0usize..8, 1..120),
        ) {
            let mut geo = open();
            geo.no_go.push(Rect::new(100.0, 80.0, 40.0, 60.0));
            geo.walls.push(crate::sim::geometry::Polygon::new(vec![
                Vec2::new(200.0, 150.0),
                Vec2::new(260.0, 150.0),
                Vec2::new(230.0, 220.0),
            ]));
            let mut actor = actor_at(60.0, 110.0);
            for m in moves {
                actor.accelerate();
                actor.offset(Direction::ALL[m], &geo);
                prop_assert!(!geo.collide(&actor.world_hitbox()));
            }
        }
    }
}
