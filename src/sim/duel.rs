//! Duel matcher
//!
//! Pure read pass over the actor table. Every duelable actor independently
//! picks the nearest duelable actor it is facing, within range, on roughly the
//! same row and with no fence in between. The result is not symmetric; only an
//! explicit duel command commits a pair.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId};
use super::geometry::StaticGeometry;
use crate::tuning::Tuning;
use crate::{distance, sign};

/// Proposed face-off, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelPair {
    pub origin: ActorId,
    pub target: ActorId,
}

/// Eligibility thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuelRules {
    pub range_min: f32,
    pub range_max: f32,
    pub height_tolerance: f32,
}

impl From<&Tuning> for DuelRules {
    fn from(tuning: &Tuning) -> Self {
        Self {
            range_min: tuning.duel_range_min,
            range_max: tuning.duel_range_max,
            height_tolerance: tuning.duel_height_tolerance,
        }
    }
}

impl DuelRules {
    /// Can `a` call out `b` this tick (ignores statuses)
    pub fn eligible(&self, a: &Actor, b: &Actor, geometry: &StaticGeometry) -> bool {
        let (pa, pb) = (a.pos(), b.pos());
        if (pa.y - pb.y).abs() > self.height_tolerance {
            return false;
        }
        let facing = a.facing().map_or(0, |f| f.horizontal_sign());
        if facing == 0 || facing != sign(pb.x - pa.x) {
            return false;
        }
        let dx = (pa.x - pb.x).abs();
        if dx < self.range_min || dx > self.range_max {
            return false;
        }
        !geometry.cross(pa, pb)
    }
}

/// All current (origin, target) proposals, in actor order
pub fn find_duels(actors: &[Actor], geometry: &StaticGeometry, rules: &DuelRules) -> Vec<DuelPair> {
    let mut pairs = Vec::new();
    for a in actors.iter().filter(|a| a.status().is_duelable()) {
        let mut best: Option<(f32, ActorId)> = None;
        for b in actors.iter().filter(|b| b.status().is_duelable()) {
            if a.id() == b.id() || !rules.eligible(a, b, geometry) {
                continue;
            }
            let d = distance(a.pos(), b.pos());
            // Strict comparison: on ties the earlier actor wins
            if best.is_none_or(|(best_d, _)| d < best_d) {
                best = Some((d, b.id()));
            }
        }
        if let Some((_, target)) = best {
            pairs.push(DuelPair {
                origin: a.id(),
                target,
            });
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::tests::sample_table;
    use crate::sim::direction::Direction;
    use crate::sim::geometry::{Rect, Segment};
    use crate::tuning::SpeedProfile;
    use glam::Vec2;
    use std::rc::Rc;

    fn actor(id: usize, x: f32, y: f32, facing: Direction) -> Actor {
        let mut a = Actor::new(
            ActorId(id),
            format!("a{id}"),
            Vec2::new(x, y),
            Rect::new(-4.0, -2.0, 8.0, 4.0),
            Rc::new(sample_table()),
            SpeedProfile::default(),
        );
        a.set_facing(Some(facing));
        a
    }

    fn rules() -> DuelRules {
        DuelRules {
            range_min: 20.0,
            range_max: 120.0,
            height_tolerance: 6.0,
        }
    }

    fn open() -> StaticGeometry {
        StaticGeometry::open(Rect::new(0.0, 0.0, 400.0, 300.0))
    }

    #[test]
    fn test_facing_pair_matches_both_ways() {
        let actors = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 140.0, 100.0, Direction::West),
        ];
        let pairs = find_duels(&actors, &open(), &rules());
        assert_eq!(
            pairs,
            vec![
                DuelPair {
                    origin: ActorId(0),
                    target: ActorId(1),
                },
                DuelPair {
                    origin: ActorId(1),
                    target: ActorId(0),
                },
            ]
        );
    }

    #[test]
    fn test_turning_away_removes_only_that_entry() {
        let actors = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 140.0, 100.0, Direction::East),
        ];
        let pairs = find_duels(&actors, &open(), &rules());
        assert_eq!(
            pairs,
            vec![DuelPair {
                origin: ActorId(0),
                target: ActorId(1),
            }]
        );
    }

    #[test]
    fn test_fence_blocks_pair() {
        let mut geo = open();
        geo.fences.push(Segment::new(Vec2::new(120.0, 80.0), Vec2::new(120.0, 120.0)));
        let actors = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 140.0, 100.0, Direction::West),
        ];
        assert!(find_duels(&actors, &geo, &rules()).is_empty());
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let actors = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 130.0, 100.0, Direction::South),
            actor(2, 120.0, 100.0, Direction::South),
        ];
        let pairs = find_duels(&actors, &open(), &rules());
        assert_eq!(
            pairs,
            vec![DuelPair {
                origin: ActorId(0),
                target: ActorId(2),
            }]
        );
    }

    #[test]
    fn test_tie_goes_to_earlier_actor() {
        let actors = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 130.0, 104.0, Direction::South),
            actor(2, 130.0, 96.0, Direction::South),
        ];
        let pairs = find_duels(&actors, &open(), &rules());
        assert_eq!(
            pairs,
            vec![DuelPair {
                origin: ActorId(0),
                target: ActorId(1),
            }]
        );
    }

    #[test]
    fn test_range_and_height_filters() {
        let too_close = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 110.0, 100.0, Direction::West),
        ];
        assert!(find_duels(&too_close, &open(), &rules()).is_empty());

        let too_far = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 230.0, 100.0, Direction::West),
        ];
        assert!(find_duels(&too_far, &open(), &rules()).is_empty());

        let other_row = vec![
            actor(0, 100.0, 100.0, Direction::East),
            actor(1, 140.0, 110.0, Direction::West),
        ];
        assert!(find_duels(&other_row, &open(), &rules()).is_empty());

        let facing_north = vec![
            actor(0, 100.0, 100.0, Direction::North),
            actor(1, 140.0, 100.0, Direction::West),
        ];
        assert_eq!(
            find_duels(&facing_north, &open(), &rules()),
            vec![DuelPair {
                origin: ActorId(1),
                target: ActorId(0),
            }]
        );
    }

    #[test]
    fn test_non_duelable_excluded() {
        let mut victim = actor(1, 140.0, 100.0, Direction::West);
        victim.die();
        let actors = vec![actor(0, 100.0, 100.0, Direction::East), victim];
        assert!(find_duels(&actors, &open(), &rules()).is_empty());
    }
}
