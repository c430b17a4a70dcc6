//! Path builder
//!
//! Heuristic 8-direction routes for open floor space. A route is the origin,
//! at most one synthesized bend, and the destination. Obstacles are not
//! planned around; the collision-sliding movement rule handles them.

use glam::Vec2;
use rand::Rng;

use super::geometry::StaticGeometry;
use crate::distance;

/// Origin, optional bend, destination
///
/// Points sharing an X or Y coordinate get no bend. Otherwise the shorter of
/// the two axis legs is walked diagonally at 45°, and the remainder straight.
/// Half of the time the diagonal comes last instead of first.
pub fn shortest_path<R: Rng + ?Sized>(origin: Vec2, destination: Vec2, rng: &mut R) -> Vec<Vec2> {
    if origin == destination {
        return vec![destination];
    }
    if origin.x == destination.x || origin.y == destination.y {
        return vec![origin, destination];
    }

    let delta = destination - origin;
    let diagonal = delta.x.abs().min(delta.y.abs());
    let step = Vec2::new(delta.x.signum(), delta.y.signum()) * diagonal;

    let bend = if rng.random_bool(0.5) {
        origin + step
    } else {
        destination - step
    };
    if bend == origin || bend == destination {
        vec![origin, destination]
    } else {
        vec![origin, bend, destination]
    }
}

/// Shortest path that stays off stair regions, retried with fresh randomness
///
/// Falls back to the direct two-point route after `attempts` tries.
pub fn path_avoiding_stairs<R: Rng + ?Sized>(
    geometry: &StaticGeometry,
    origin: Vec2,
    destination: Vec2,
    attempts: u32,
    rng: &mut R,
) -> Vec<Vec2> {
    for attempt in 0..attempts {
        let path = shortest_path(origin, destination, rng);
        if !geometry.path_crosses_stairs(&path) {
            if attempt > 0 {
                log::debug!("stair-free path found after {} retries", attempt);
            }
            return path;
        }
    }
    log::warn!(
        "no stair-free path from {:?} to {:?} after {} attempts, walking direct",
        origin,
        destination,
        attempts
    );
    vec![origin, destination]
}

/// Authored path with an endpoint within `range` of `pos`
///
/// The returned waypoints are oriented so the nearer endpoint comes first.
/// Among several candidates the nearest endpoint wins, ties by authoring order.
pub fn nearest_hard_path(paths: &[Vec<Vec2>], pos: Vec2, range: f32) -> Option<Vec<Vec2>> {
    let mut best: Option<(f32, usize, bool)> = None;
    for (i, path) in paths.iter().enumerate() {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            continue;
        };
        for (endpoint, reversed) in [(*first, false), (*last, true)] {
            let d = distance(pos, endpoint);
            if d > range {
                continue;
            }
            if best.is_none_or(|(best_d, _, _)| d < best_d) {
                best = Some((d, i, reversed));
            }
        }
    }

    best.map(|(_, i, reversed)| {
        let mut path = paths[i].clone();
        if reversed {
            path.reverse();
        }
        path
    })
}
