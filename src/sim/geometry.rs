//! Static level geometry and the pure intersection tests over it
//!
//! Rect/polygon overlap is strict: shapes that only share an edge do not
//! collide, which is what lets an actor slide along a wall face. Fence
//! crossing is inclusive: a line of sight that grazes a fence is blocked.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::ActionKind;
use super::direction::Direction;

/// Axis-aligned box, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Inclusive point test
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Strict point test (boundary excluded)
    fn contains_point_strict(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }

    /// `other` lies entirely within this rect
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Does the segment pass through this rect (touching counts)
    pub fn intersects_segment(&self, seg: &Segment) -> bool {
        if self.contains_point(seg.a) || self.contains_point(seg.b) {
            return true;
        }
        self.edges().iter().any(|edge| edge.crosses(seg))
    }
}

/// Line segment, used for fences and for path legs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

/// Orientation of the triple (p, q, r): 1 counter-clockwise, -1 clockwise, 0 collinear
fn orientation(p: Vec2, q: Vec2, r: Vec2) -> i8 {
    let cross = (q - p).perp_dot(r - p);
    crate::sign(cross)
}

/// `q` lies within the bounding box of segment `pr` (used for collinear cases)
fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// Inclusive intersection test, endpoints and collinear overlap count
    pub fn crosses(&self, other: &Segment) -> bool {
        let (p1, q1, p2, q2) = (self.a, self.b, other.a, other.b);
        let o1 = orientation(p1, q1, p2);
        let o2 = orientation(p1, q1, q2);
        let o3 = orientation(p2, q2, p1);
        let o4 = orientation(p2, q2, q1);

        if o1 != o2 && o3 != o4 {
            return true;
        }
        (o1 == 0 && on_segment(p1, p2, q1))
            || (o2 == 0 && on_segment(p1, q2, q1))
            || (o3 == 0 && on_segment(p2, p1, q2))
            || (o4 == 0 && on_segment(p2, q1, q2))
    }

    /// Proper crossing only: the segments cut through each other's interior
    pub fn crosses_strictly(&self, other: &Segment) -> bool {
        let o1 = orientation(self.a, self.b, other.a);
        let o2 = orientation(self.a, self.b, other.b);
        let o3 = orientation(other.a, other.b, self.a);
        let o4 = orientation(other.a, other.b, self.b);
        o1 * o2 < 0 && o3 * o4 < 0
    }
}

/// Arbitrary simple polygon ("wall")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Even-odd ray cast; boundary points are unspecified
    pub fn contains_point(&self, p: Vec2) -> bool {
        let mut inside = false;
        let n = self.points.len();
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let (pi, pj) = (self.points[i], self.points[j]);
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Interior overlap with a box
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        if self.points.iter().any(|p| rect.contains_point_strict(*p)) {
            return true;
        }
        if self.contains_point(rect.center()) {
            return true;
        }
        let rect_edges = rect.edges();
        self.edges()
            .any(|edge| rect_edges.iter().any(|r| r.crosses_strictly(&edge)))
    }
}

/// Interaction or prop zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub rect: Rect,
    /// Point an actor walks to before interacting
    pub target: Vec2,
    /// Action played while interacting here
    pub action: ActionKind,
    /// Facing adopted on arrival
    #[serde(default)]
    pub facing: Option<Direction>,
    /// NPCs standing here may be drawn to interact
    #[serde(default)]
    pub attracts: bool,
    /// Incapacitation countdown armed once the interaction finishes
    #[serde(default)]
    pub incapacitates_after: Option<u32>,
}

/// Immutable geometry of one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticGeometry {
    /// Walkable area; anything outside collides
    pub bounds: Rect,
    #[serde(default)]
    pub no_go: Vec<Rect>,
    #[serde(default)]
    pub walls: Vec<Polygon>,
    /// Block duel line of sight, not movement
    #[serde(default)]
    pub fences: Vec<Segment>,
    /// Inclined surfaces
    #[serde(default)]
    pub stairs: Vec<Rect>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Pre-authored waypoint sequences
    #[serde(default)]
    pub hard_paths: Vec<Vec<Vec2>>,
}

impl StaticGeometry {
    pub fn open(bounds: Rect) -> Self {
        Self {
            bounds,
            no_go: Vec::new(),
            walls: Vec::new(),
            fences: Vec::new(),
            stairs: Vec::new(),
            zones: Vec::new(),
            hard_paths: Vec::new(),
        }
    }

    /// Would a hitbox placed here overlap anything solid
    pub fn collide(&self, hitbox: &Rect) -> bool {
        !self.bounds.contains_rect(hitbox)
            || self.no_go.iter().any(|r| r.intersects(hitbox))
            || self.walls.iter().any(|w| w.intersects_rect(hitbox))
    }

    /// Would a hitbox moved in a straight line from `a` to `b` touch anything solid
    ///
    /// Samples the leg at half the hitbox's smaller side, so nothing thicker
    /// than that slips between samples.
    pub fn sweep_collides(&self, hitbox: &Rect, a: Vec2, b: Vec2) -> bool {
        let step = (hitbox.w.min(hitbox.h) * 0.5).max(0.5);
        let steps = (a.distance(b) / step).ceil().max(1.0) as u32;
        (0..=steps).any(|i| {
            let at = a.lerp(b, i as f32 / steps as f32);
            self.collide(&hitbox.translated(at))
        })
    }

    /// Does the line between two points cross any fence
    pub fn cross(&self, a: Vec2, b: Vec2) -> bool {
        let sight = Segment::new(a, b);
        self.fences.iter().any(|f| f.crosses(&sight))
    }

    pub fn on_stairs(&self, p: Vec2) -> bool {
        self.stairs.iter().any(|s| s.contains_point(p))
    }

    /// Any leg of the path touches a stair region
    pub fn path_crosses_stairs(&self, path: &[Vec2]) -> bool {
        path.windows(2).any(|leg| {
            let seg = Segment::new(leg[0], leg[1]);
            self.stairs.iter().any(|s| s.intersects_segment(&seg))
        })
    }

    /// First zone containing the point
    pub fn zone_at(&self, p: Vec2) -> Option<usize> {
        self.zones.iter().position(|z| z.rect.contains_point(p))
    }
}
