//! Fundamental geometric types.
//!
//! Positions live in the playfield rectangle `[0,width] x [0,height]`.
//! The batched circle kernel mirrors the scalar `Circle::intersects` exactly;
//! the two must never diverge or replays stop being reproducible.

use serde::{Deserialize, Serialize};

/// 2D position in playfield space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Bounding or sensor circle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

/// Lane width of the batched circle kernel.
pub const LANES: usize = 8;

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        self.distance_sq_to(other).sqrt()
    }

    /// Squared distance to another point (no sqrt).
    pub fn distance_sq_to(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Clamp into the playfield rectangle `[0,width] x [0,height]`.
    pub fn clamp(&mut self, width: f32, height: f32) {
        self.x = self.x.clamp(0.0, width);
        self.y = self.y.clamp(0.0, height);
    }

    /// Move toward `target` by at most `step`, never overshooting.
    pub fn move_toward(&mut self, target: &Point, step: f32) {
        let d = self.distance_to(target);
        if d <= step {
            *self = *target;
        } else {
            let t = step / d;
            self.x += (target.x - self.x) * t;
            self.y += (target.y - self.y) * t;
        }
    }

    /// Unit direction toward `target`, or zero if coincident.
    pub fn direction_to(&self, target: &Point) -> Point {
        let d = self.distance_to(target);
        if d == 0.0 {
            Point::default()
        } else {
            Point::new((target.x - self.x) / d, (target.y - self.y) / d)
        }
    }

    /// Bearing to another point in radians (atan2 convention).
    pub fn bearing_to(&self, other: &Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Offset from `center` by polar coordinates.
    pub fn from_polar(center: &Point, radius: f32, theta: f32) -> Point {
        Point::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        )
    }
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Bounding-circle overlap test: distance^2 <= (r1 + r2)^2.
    pub fn intersects(&self, other: &Circle) -> bool {
        let dr = self.radius + other.radius;
        self.center.distance_sq_to(&other.center) <= dr * dr
    }
}

/// Compare one circle against 8 lanes of circle data at once.
///
/// Returns a bitmask with bit `i` set when `outer` intersects lane `i`.
/// Written over fixed-width lanes so the optimizer vectorizes the loop;
/// semantically identical to calling `Circle::intersects` per lane.
pub fn circle_intersect_batch(
    outer: &Circle,
    xs: &[f32; LANES],
    ys: &[f32; LANES],
    rs: &[f32; LANES],
) -> u8 {
    let mut dd = [0.0f32; LANES];
    let mut dr2 = [0.0f32; LANES];

    for i in 0..LANES {
        let dx = outer.center.x - xs[i];
        let dy = outer.center.y - ys[i];
        let dr = outer.radius + rs[i];
        dd[i] = dx * dx + dy * dy;
        dr2[i] = dr * dr;
    }

    let mut mask = 0u8;
    for i in 0..LANES {
        if dd[i] <= dr2[i] {
            mask |= 1 << i;
        }
    }
    mask
}
