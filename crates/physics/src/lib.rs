#![warn(missing_docs)]
//! Physics primitives (AABB, collision direction, body contract).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box used for collisions. World space, +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (x, y).
    pub min: Vec2,
    /// Maximum corner (x, y).
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    /// Box anchored at `position` (min corner) with the given size.
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position, position + size)
    }

    /// Box dimensions.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Tests intersection with another AABB.
    ///
    /// Touching edges do not count: each min corner must be strictly less than
    /// the other box's max corner on both axes.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Side of `b` that `a` ran into, as seen from `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionDirection {
    /// `b` is above `a`.
    Up,
    /// `b` is below `a`.
    Down,
    /// `b` is left of `a`.
    Left,
    /// `b` is right of `a`.
    Right,
    /// Exact diagonal (|dx| == |dy|); no axis dominates.
    None,
}

/// Classify the direction from position `a` to position `b`.
///
/// The axis with the larger absolute delta decides; the sign of that delta picks
/// the side. A tie yields [`CollisionDirection::None`].
pub fn classify_direction(a: Vec2, b: Vec2) -> CollisionDirection {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();

    if dx > dy {
        if a.x < b.x {
            CollisionDirection::Right
        } else {
            CollisionDirection::Left
        }
    } else if dy > dx {
        if a.y < b.y {
            CollisionDirection::Up
        } else {
            CollisionDirection::Down
        }
    } else {
        CollisionDirection::None
    }
}

/// Position that places a box of `size` flush against `solid` on the side named by
/// `direction`. Only the resolved axis changes; `None` leaves `position` untouched.
pub fn snap_flush(
    position: Vec2,
    size: Vec2,
    solid: &Aabb,
    direction: CollisionDirection,
) -> Vec2 {
    match direction {
        CollisionDirection::Up => Vec2::new(position.x, solid.min.y - size.y),
        CollisionDirection::Down => Vec2::new(position.x, solid.max.y),
        CollisionDirection::Left => Vec2::new(solid.max.x, position.y),
        CollisionDirection::Right => Vec2::new(solid.min.x - size.x, position.y),
        CollisionDirection::None => position,
    }
}

/// Type tag for collidable bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// World-anchored tile block.
    Block,
    /// The player avatar.
    Player,
    /// A dropped item awaiting pickup.
    Floater,
}

/// Capability contract every collidable object satisfies.
pub trait Body {
    /// Min corner in world pixels.
    fn position(&self) -> Vec2;
    /// Extent in world pixels.
    fn size(&self) -> Vec2;
    /// Whether the body takes part in collision this tick.
    fn is_solid(&self) -> bool;
    /// Type tag used for collision dispatch.
    fn kind(&self) -> BodyKind;

    /// Bounding box derived from position and size.
    fn bounds(&self) -> Aabb {
        Aabb::from_position_size(self.position(), self.size())
    }
}

/// Whether two bodies are both solid and overlapping.
pub fn bodies_touch(a: &dyn Body, b: &dyn Body) -> bool {
    a.is_solid() && b.is_solid() && a.bounds().intersects(&b.bounds())
}
