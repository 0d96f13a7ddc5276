use serde::{Deserialize, Serialize};

pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

/// Centre of the goal being attacked. Attackers always play toward +x.
pub const GOAL_CENTER: Point = Point { x: 120.0, y: 40.0 };
pub const GOAL_POST_LOW: f64 = 36.0;
pub const GOAL_POST_HIGH: f64 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn in_bounds(self) -> bool {
        (0.0..=PITCH_LENGTH).contains(&self.x) && (0.0..=PITCH_WIDTH).contains(&self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Where a point sits relative to a segment: `t` is the clamped projection
/// parameter (0 at `from`, 1 at `to`) and `distance` is measured to that
/// clamped point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub t: f64,
    pub distance: f64,
}

pub fn project_onto_segment(from: Point, to: Point, point: Point) -> SegmentProjection {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return SegmentProjection {
            t: 0.0,
            distance: from.distance(point),
        };
    }
    let t = (((point.x - from.x) * dx + (point.y - from.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(from.x + t * dx, from.y + t * dy);
    SegmentProjection {
        t,
        distance: closest.distance(point),
    }
}

/// Angle (radians) the goal mouth subtends when seen from `point`.
pub fn goal_mouth_angle(point: Point) -> f64 {
    let dx = GOAL_CENTER.x - point.x;
    let low = (GOAL_POST_LOW - point.y).atan2(dx);
    let high = (GOAL_POST_HIGH - point.y).atan2(dx);
    (high - low).abs()
}
