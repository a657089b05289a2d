//! Axis-aligned collision math
//!
//! The playfield is rectangular, so every collider here is an axis-aligned
//! box: bricks directly, the ball as its bounding box (center ± radius).
//! Side detection compares penetration distances on all four faces and
//! picks the minimum.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Bounding box of a circle (used for the ball)
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap test - touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Reflection axis for a resolved collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which face of a box the collision resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// The velocity component a bounce off this face flips
    #[inline]
    pub fn axis(&self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Horizontal,
            Side::Top | Side::Bottom => Axis::Vertical,
        }
    }
}

/// Pick the face of `target` an overlapping `mover` box entered through.
///
/// Penetration on each face is the distance between the facing edges; the
/// smallest one wins. An exact tie (mover centered on a corner) resolves in
/// the order left, right, top, bottom, so horizontal wins - either axis is a
/// legal outcome there.
pub fn contact_side(mover: &Aabb, target: &Aabb) -> Side {
    let left = (mover.max.x - target.min.x).abs();
    let right = (mover.min.x - target.max.x).abs();
    let top = (mover.max.y - target.min.y).abs();
    let bottom = (mover.min.y - target.max.y).abs();

    let mut side = Side::Left;
    let mut best = left;
    if right < best {
        side = Side::Right;
        best = right;
    }
    if top < best {
        side = Side::Top;
        best = top;
    }
    if bottom < best {
        side = Side::Bottom;
    }
    side
}
