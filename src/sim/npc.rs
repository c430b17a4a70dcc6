//! Behavior policy for non-playable actors
//!
//! A handful of tick countdowns and per-tick dice rolls turned into scene
//! commands. The policy only reads its actor; every state change goes through
//! the scene so two-actor transitions stay atomic.
//!
//! Decision order while the actor is Free:
//! 1. Duel check elapsed and the actor has a pending match: call it out
//! 2. Small chance of a cooldown pause
//! 3. Standing in an attraction zone: maybe walk to its target and interact
//! 4. Wander cooldown elapsed: follow a nearby hard path or walk somewhere new

use glam::Vec2;
use rand::Rng;

use super::actor::{Actor, ActorId, Status};
use super::duel::DuelPair;
use super::geometry::StaticGeometry;
use super::path::{nearest_hard_path, path_avoiding_stairs, shortest_path};
use super::pilot::Pilot;
use super::state::Command;
use crate::consts::DESTINATION_ATTEMPTS;
use crate::tuning::{TickRange, Tuning};

/// Read-only view of the scene handed to every policy
pub struct PolicyContext<'a> {
    pub geometry: &'a StaticGeometry,
    pub tuning: &'a Tuning,
    /// Proposals computed at the end of the previous tick
    pub duels: &'a [DuelPair],
    /// Actors not yet Out
    pub alive: usize,
}

fn draw<R: Rng + ?Sized>(range: TickRange, rng: &mut R) -> u32 {
    rng.random_range(range.min..=range.max)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    actor: ActorId,
    duel_check: u32,
    coma: Option<u32>,
    interaction_cooldown: u32,
    cooldown_pause: u32,
    release: u32,
    wander: u32,
}

impl Npc {
    pub fn new<R: Rng + ?Sized>(actor: ActorId, tuning: &Tuning, rng: &mut R) -> Self {
        Self {
            actor,
            duel_check: draw(tuning.duel_check_ticks, rng),
            coma: tuning.coma_ticks.map(|range| draw(range, rng)),
            interaction_cooldown: draw(tuning.interaction_cooldown_ticks, rng),
            cooldown_pause: 0,
            release: 0,
            wander: draw(tuning.wander_cooldown_ticks, rng),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn is_pausing(&self) -> bool {
        self.cooldown_pause > 0
    }

    /// Decide this tick's command for `actor`
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        actor: &Actor,
        ctx: &PolicyContext<'_>,
        rng: &mut R,
    ) -> Option<Command> {
        debug_assert_eq!(actor.id(), self.actor);
        if actor.is_out() {
            return None;
        }

        // Runs regardless of status
        if let Some(coma) = self.coma.as_mut() {
            *coma = coma.saturating_sub(1);
            if *coma == 0 {
                self.coma = None;
                return Some(Command::Collapse);
            }
        }
        self.interaction_cooldown = self.interaction_cooldown.saturating_sub(1);

        match actor.status() {
            Status::Free => self.think_free(actor, ctx, rng),
            Status::DuelOrigin if actor.action_complete() => {
                self.release = self.release.saturating_sub(1);
                (self.release == 0).then_some(Command::ReleaseDuel)
            }
            Status::Interacting if actor.action().is_looping() => {
                self.release = self.release.saturating_sub(1);
                (self.release == 0).then_some(Command::StopInteracting)
            }
            _ => None,
        }
    }

    fn think_free<R: Rng + ?Sized>(
        &mut self,
        actor: &Actor,
        ctx: &PolicyContext<'_>,
        rng: &mut R,
    ) -> Option<Command> {
        let tuning = ctx.tuning;

        if self.cooldown_pause > 0 {
            self.cooldown_pause -= 1;
            return None;
        }

        self.duel_check = self.duel_check.saturating_sub(1);
        if self.duel_check == 0 {
            if let Some(pair) = ctx.duels.iter().find(|p| p.origin == self.actor) {
                let alive = u32::try_from(ctx.alive).unwrap_or(u32::MAX);
                self.duel_check = draw(tuning.duel_check_ticks.scaled(alive), rng);
                self.release = draw(tuning.release_ticks, rng);
                log::debug!("{} calls out {:?}", actor.name(), pair.target);
                return Some(Command::StartDuel {
                    target: pair.target,
                });
            }
        }

        if rng.random_bool(f64::from(tuning.cooldown_pause_probability)) {
            self.cooldown_pause = draw(tuning.cooldown_pause_ticks, rng);
            log::debug!("{} pauses for {} ticks", actor.name(), self.cooldown_pause);
            return Some(Command::Pause);
        }

        if self.interaction_cooldown == 0 {
            let zone = actor
                .zone()
                .and_then(|index| ctx.geometry.zones.get(index).map(|zone| (index, zone)));
            if let Some((index, zone)) = zone {
                if zone.attracts && rng.random_bool(f64::from(tuning.attraction_probability)) {
                    self.interaction_cooldown = draw(tuning.interaction_cooldown_ticks, rng);
                    self.release = draw(tuning.release_ticks, rng);
                    let path = shortest_path(actor.pos(), zone.target, rng);
                    log::debug!("{} heads to zone {}", actor.name(), index);
                    return Some(Command::Engage {
                        pilot: Pilot::smooth(path),
                        zone: Some(index),
                    });
                }
            }
        }

        if self.wander > 0 {
            self.wander -= 1;
            return None;
        }
        self.wander = draw(tuning.wander_cooldown_ticks, rng);

        if rng.random_bool(f64::from(tuning.hard_path_probability)) {
            let paths = &ctx.geometry.hard_paths;
            if let Some(path) = nearest_hard_path(paths, actor.pos(), tuning.hard_path_range) {
                // The hard pilot walks straight to the first waypoint without collision checks
                let blocked = path.first().is_none_or(|&start| {
                    ctx.geometry.sweep_collides(&actor.hitbox(), actor.pos(), start)
                });
                if !blocked {
                    return Some(Command::Engage {
                        pilot: Pilot::hard(path),
                        zone: None,
                    });
                }
                log::debug!("{} has no clear approach to the nearest hard path", actor.name());
            }
        }

        let destination = pick_destination(actor, ctx.geometry, rng)?;
        let path = path_avoiding_stairs(
            ctx.geometry,
            actor.pos(),
            destination,
            tuning.stair_retry_limit,
            rng,
        );
        Some(Command::Engage {
            pilot: Pilot::smooth(path),
            zone: None,
        })
    }
}

/// Random free spot inside the bounds, off the stairs
fn pick_destination<R: Rng + ?Sized>(
    actor: &Actor,
    geometry: &StaticGeometry,
    rng: &mut R,
) -> Option<Vec2> {
    let bounds = geometry.bounds;
    let hitbox = actor.hitbox();
    for _ in 0..DESTINATION_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(bounds.x..=bounds.x + bounds.w),
            rng.random_range(bounds.y..=bounds.y + bounds.h),
        );
        if !geometry.collide(&hitbox.translated(candidate)) && !geometry.on_stairs(candidate) {
            return Some(candidate);
        }
    }
    None
}
