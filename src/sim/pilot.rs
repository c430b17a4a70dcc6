//! Steering strategies
//!
//! A pilot drives one actor through a waypoint queue, one step per tick.
//! Both variants pop a waypoint once a step stops bringing the actor closer
//! to it (distance before vs after), not when inside a proximity radius.

use std::collections::VecDeque;

use glam::Vec2;

use super::actor::Actor;
use super::direction::Direction;
use super::geometry::StaticGeometry;
use crate::consts::ARRIVAL_EPSILON;
use crate::{distance, heading};

/// Outcome of one pilot step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotStatus {
    /// Still travelling
    Moving,
    /// Queue empty, destination reached
    Exhausted,
    /// The step could not move the actor at all
    Blocked,
}

/// Follows exact waypoints, ignoring collision (authored paths are trusted)
///
/// Facing is only updated at the start and end of a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct HardPilot {
    waypoints: VecDeque<Vec2>,
    leg_started: bool,
}

impl HardPilot {
    pub fn new(waypoints: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            leg_started: false,
        }
    }

    fn step(&mut self, actor: &mut Actor) -> PilotStatus {
        let Some(&next) = self.waypoints.front() else {
            return PilotStatus::Exhausted;
        };
        if !self.leg_started {
            actor.face_towards(next);
            self.leg_started = true;
        }

        actor.accelerate();
        let before = distance(actor.pos(), next);
        let travel = actor.speed().min(before);
        actor.translate(heading(actor.pos(), next) * travel);
        let after = distance(actor.pos(), next);

        if after <= ARRIVAL_EPSILON || after >= before {
            self.waypoints.pop_front();
            self.leg_started = false;
            match self.waypoints.front() {
                Some(&following) => actor.face_towards(following),
                None => return PilotStatus::Exhausted,
            }
        }
        PilotStatus::Moving
    }
}

/// Re-aims every tick and moves through the collision-aware `offset`
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothPilot {
    waypoints: VecDeque<Vec2>,
}

impl SmoothPilot {
    pub fn new(waypoints: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    fn pop(&mut self) -> PilotStatus {
        self.waypoints.pop_front();
        if self.waypoints.is_empty() {
            PilotStatus::Exhausted
        } else {
            PilotStatus::Moving
        }
    }

    fn step(&mut self, actor: &mut Actor, geometry: &StaticGeometry) -> PilotStatus {
        let Some(&next) = self.waypoints.front() else {
            return PilotStatus::Exhausted;
        };
        let before = distance(actor.pos(), next);
        let Some(dir) = Direction::from_vector(next - actor.pos()) else {
            return self.pop();
        };
        if before <= ARRIVAL_EPSILON {
            return self.pop();
        }

        actor.set_facing(Some(dir));
        actor.accelerate();
        if !actor.offset(dir, geometry) {
            return PilotStatus::Blocked;
        }

        let after = distance(actor.pos(), next);
        if after <= ARRIVAL_EPSILON || after >= before {
            return self.pop();
        }
        PilotStatus::Moving
    }
}

/// The two interchangeable steering strategies
#[derive(Debug, Clone, PartialEq)]
pub enum Pilot {
    Hard(HardPilot),
    Smooth(SmoothPilot),
}

impl Pilot {
    pub fn hard(waypoints: impl IntoIterator<Item = Vec2>) -> Self {
        Pilot::Hard(HardPilot::new(waypoints))
    }

    pub fn smooth(waypoints: impl IntoIterator<Item = Vec2>) -> Self {
        Pilot::Smooth(SmoothPilot::new(waypoints))
    }

    /// Advance the actor by one tick
    pub fn step(&mut self, actor: &mut Actor, geometry: &StaticGeometry) -> PilotStatus {
        match self {
            Pilot::Hard(p) => p.step(actor),
            Pilot::Smooth(p) => p.step(actor, geometry),
        }
    }

    fn waypoints(&self) -> &VecDeque<Vec2> {
        match self {
            Pilot::Hard(p) => &p.waypoints,
            Pilot::Smooth(p) => &p.waypoints,
        }
    }

    /// Final waypoint, if any remain
    pub fn destination(&self) -> Option<Vec2> {
        self.waypoints().back().copied()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::tests::sample_table;
    use crate::sim::actor::ActorId;
    use crate::sim::geometry::Rect;
    use crate::tuning::SpeedProfile;
    use std::rc::Rc;

    fn walker(pos: Vec2) -> Actor {
        Actor::new(
            ActorId(0),
            "walker",
            pos,
            Rect::new(-4.0, -2.0, 8.0, 4.0),
            Rc::new(sample_table()),
            SpeedProfile::default(),
        )
    }

    fn run(
        pilot: &mut Pilot,
        actor: &mut Actor,
        geo: &StaticGeometry,
        limit: usize,
    ) -> PilotStatus {
        for _ in 0..limit {
            let status = pilot.step(actor, geo);
            if status != PilotStatus::Moving {
                return status;
            }
        }
        PilotStatus::Moving
    }

    #[test]
    fn test_empty_queue_is_exhausted_on_first_step() {
        let geo = StaticGeometry::open(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut actor = walker(Vec2::new(50.0, 50.0));
        let mut hard = Pilot::hard(Vec::new());
        let mut smooth = Pilot::smooth(Vec::new());
        assert_eq!(hard.step(&mut actor, &geo), PilotStatus::Exhausted);
        assert_eq!(smooth.step(&mut actor, &geo), PilotStatus::Exhausted);
        assert_eq!(actor.pos(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_hard_pilot_lands_on_waypoints() {
        let geo = StaticGeometry::open(Rect::new(0.0, 0.0, 300.0, 300.0));
        let mut actor = walker(Vec2::new(10.0, 10.0));
        let mut pilot = Pilot::hard([
            Vec2::new(10.0, 10.0),
            Vec2::new(60.0, 10.0),
            Vec2::new(60.0, 90.0),
        ]);
        assert_eq!(pilot.destination(), Some(Vec2::new(60.0, 90.0)));
        let status = run(&mut pilot, &mut actor, &geo, 500);
        assert_eq!(status, PilotStatus::Exhausted);
        assert!(distance(actor.pos(), Vec2::new(60.0, 90.0)) <= ARRIVAL_EPSILON);
        assert_eq!(pilot.remaining(), 0);
    }

    #[test]
    fn test_hard_pilot_faces_once_per_leg() {
        let geo = StaticGeometry::open(Rect::new(0.0, 0.0, 300.0, 300.0));
        let mut actor = walker(Vec2::new(10.0, 10.0));
        let mut pilot = Pilot::hard([Vec2::new(100.0, 12.0)]);
        pilot.step(&mut actor, &geo);
        assert_eq!(actor.facing(), Some(Direction::East));
        // Mid-leg the pilot leaves facing alone
        actor.set_facing(Some(Direction::South));
        pilot.step(&mut actor, &geo);
        assert_eq!(actor.facing(), Some(Direction::South));
    }

    #[test]
    fn test_smooth_pilot_reaches_destination() {
        let geo = StaticGeometry::open(Rect::new(0.0, 0.0, 300.0, 300.0));
        let mut actor = walker(Vec2::new(20.0, 20.0));
        let goal = Vec2::new(150.0, 70.0);
        let mut pilot = Pilot::smooth([Vec2::new(20.0, 20.0), Vec2::new(70.0, 70.0), goal]);
        let status = run(&mut pilot, &mut actor, &geo, 1000);
        assert_eq!(status, PilotStatus::Exhausted);
        assert!(distance(actor.pos(), goal) <= SpeedProfile::default().max + 0.01);
    }

    #[test]
    fn test_smooth_pilot_blocked_terminates() {
        let mut geo = StaticGeometry::open(Rect::new(0.0, 0.0, 300.0, 300.0));
        geo.no_go.push(Rect::new(30.0, 0.0, 10.0, 300.0));
        // Hitbox right edge flush against the wall
        let mut actor = walker(Vec2::new(26.0, 50.0));
        let mut pilot = Pilot::smooth([Vec2::new(100.0, 50.0)]);
        assert_eq!(pilot.step(&mut actor, &geo), PilotStatus::Blocked);
        assert_eq!(actor.pos(), Vec2::new(26.0, 50.0));
    }
}
