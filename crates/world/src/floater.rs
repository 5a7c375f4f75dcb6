//! Dropped items that drift to a stop and wait for pickup.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::Serialize;
use skafos_core::{ItemKind, TileFrame};
use skafos_physics::{Body, BodyKind};
use tracing::debug;

/// Edge length of a floater's body in pixels.
pub const FLOATER_SIZE: f32 = 8.0;
/// Lower bound of the idle pulse.
pub const SCALE_MIN: f32 = 0.4;
/// Upper bound of the idle pulse.
pub const SCALE_MAX: f32 = 0.5;
/// Pulse rate in scale units per second.
pub const SCALE_SPEED: f32 = 0.25;
/// Spin rate in radians per second (clockwise).
pub const ROTATION_SPEED: f32 = 3.0;
/// Linear velocity decay per axis in px/s².
pub const DECELERATION: f32 = 200.0;
/// Speeds below this snap to zero.
pub const SNAP_SPEED: f32 = 0.5;
/// Both velocity components must be below this for the floater to turn solid.
pub const REST_SPEED: f32 = 1.0;
/// Speed of a thrown floater in px/s.
pub const THROW_SPEED: f32 = 100.0;

/// Stable identifier, never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FloaterId(pub u64);

/// An item stack lying in the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Floater {
    /// Identifier used by the collideable registry.
    pub id: FloaterId,
    /// Item kind carried.
    pub kind: ItemKind,
    /// Icon frame of the carried item.
    pub frame: TileFrame,
    /// Units carried.
    pub amount: u32,
    /// Min corner in world pixels.
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    /// Idle pulse, between [`SCALE_MIN`] and [`SCALE_MAX`].
    pub scale: f32,
    /// Radians, decreasing while it spins.
    pub rotation: f32,
    scale_rising: bool,
    solid: bool,
    deleted: bool,
}

fn decay(speed: f32, step: f32) -> f32 {
    let slowed = if speed.abs() <= step {
        0.0
    } else {
        speed - step * speed.signum()
    };
    if slowed.abs() < SNAP_SPEED {
        0.0
    } else {
        slowed
    }
}

impl Floater {
    /// A floater starts solid only if it is already at rest.
    pub fn new(id: FloaterId, kind: ItemKind, amount: u32, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            kind,
            frame: kind.icon_frame(),
            amount,
            position,
            velocity,
            scale: SCALE_MAX,
            rotation: 0.0,
            scale_rising: false,
            solid: Self::at_rest(velocity),
            deleted: false,
        }
    }

    fn at_rest(velocity: Vec2) -> bool {
        velocity.x.abs() < REST_SPEED && velocity.y.abs() < REST_SPEED
    }

    /// Picked up and waiting for the next prune.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Flag for removal at the next prune.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Advance motion and the idle animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let step = DECELERATION * dt;
        self.velocity = Vec2::new(decay(self.velocity.x, step), decay(self.velocity.y, step));
        self.position += self.velocity * dt;

        self.rotation -= ROTATION_SPEED * dt;
        if self.rotation <= -TAU {
            self.rotation = 0.0;
        }

        if self.scale_rising {
            self.scale += SCALE_SPEED * dt;
            if self.scale >= SCALE_MAX {
                self.scale = SCALE_MAX;
                self.scale_rising = false;
            }
        } else {
            self.scale -= SCALE_SPEED * dt;
            if self.scale <= SCALE_MIN {
                self.scale = SCALE_MIN;
                self.scale_rising = true;
            }
        }

        if !self.solid && Self::at_rest(self.velocity) {
            self.solid = true;
        }
    }
}

impl Body for Floater {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        Vec2::splat(FLOATER_SIZE)
    }

    fn is_solid(&self) -> bool {
        self.solid && !self.deleted
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Floater
    }
}

/// Owning collection of live floaters.
#[derive(Debug, Clone, Default)]
pub struct FloaterSet {
    floaters: Vec<Floater>,
    next_id: u64,
}

impl FloaterSet {
    /// Empty set; ids start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a floater with a fresh id.
    pub fn spawn(&mut self, kind: ItemKind, amount: u32, position: Vec2, velocity: Vec2) -> FloaterId {
        let id = FloaterId(self.next_id);
        self.next_id += 1;
        self.floaters
            .push(Floater::new(id, kind, amount, position, velocity));
        debug!(id = id.0, ?kind, amount, ?position, "floater spawned");
        id
    }

    /// Advance every floater, deleted or not.
    pub fn update(&mut self, dt: f32) {
        for floater in &mut self.floaters {
            floater.update(dt);
        }
    }

    /// Drop deleted floaters, keeping the rest in order. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.floaters.len();
        self.floaters.retain(|floater| !floater.deleted);
        before - self.floaters.len()
    }

    /// Floater by id, deleted or not.
    pub fn get(&self, id: FloaterId) -> Option<&Floater> {
        self.floaters.iter().find(|floater| floater.id == id)
    }

    /// Mutable floater by id.
    pub fn get_mut(&mut self, id: FloaterId) -> Option<&mut Floater> {
        self.floaters.iter_mut().find(|floater| floater.id == id)
    }

    /// Floaters in spawn order, including ones awaiting prune.
    pub fn iter(&self) -> impl Iterator<Item = &Floater> + '_ {
        self.floaters.iter()
    }

    /// Floaters held, including ones awaiting prune.
    pub fn len(&self) -> usize {
        self.floaters.len()
    }

    /// True when no floaters are held.
    pub fn is_empty(&self) -> bool {
        self.floaters.is_empty()
    }

    /// Units carried by floaters that have not been picked up.
    pub fn total_count(&self) -> u64 {
        self.floaters
            .iter()
            .filter(|floater| !floater.deleted)
            .map(|floater| u64::from(floater.amount))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn resting_drop_is_solid_immediately() {
        let floater = Floater::new(FloaterId(0), ItemKind::Dirt, 1, Vec2::ZERO, Vec2::ZERO);
        assert!(floater.is_solid());
    }

    #[test]
    fn thrown_floater_turns_solid_after_stopping() {
        let mut floater = Floater::new(
            FloaterId(0),
            ItemKind::Dirt,
            1,
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
        );
        assert!(!floater.is_solid());
        floater.update(DT);
        assert!(!floater.is_solid());
        assert!(floater.velocity.x < 100.0);

        for _ in 0..60 {
            floater.update(DT);
        }
        assert_eq!(floater.velocity, Vec2::ZERO);
        assert!(floater.is_solid());
        // Travel under constant deceleration: v² / 2a = 25 px, give or take a step.
        assert!((floater.position.x - 25.0).abs() < 2.0, "{}", floater.position.x);
    }

    #[test]
    fn decay_snaps_small_speeds() {
        assert_eq!(decay(0.6, 0.2), 0.0);
        assert_eq!(decay(-3.0, 5.0), 0.0);
        assert_eq!(decay(-10.0, 2.0), -8.0);
    }

    #[test]
    fn scale_stays_within_bounds() {
        let mut floater = Floater::new(FloaterId(0), ItemKind::Stone, 1, Vec2::ZERO, Vec2::ZERO);
        let mut saw_min = false;
        for _ in 0..600 {
            floater.update(DT);
            assert!((SCALE_MIN..=SCALE_MAX).contains(&floater.scale));
            saw_min |= floater.scale == SCALE_MIN;
        }
        assert!(saw_min);
    }

    #[test]
    fn rotation_wraps_after_full_turn() {
        let mut floater = Floater::new(FloaterId(0), ItemKind::Stone, 1, Vec2::ZERO, Vec2::ZERO);
        let mut wrapped = false;
        for _ in 0..200 {
            let before = floater.rotation;
            floater.update(DT);
            assert!(floater.rotation <= 0.0 && floater.rotation > -TAU);
            wrapped |= floater.rotation > before;
        }
        assert!(wrapped);
    }

    #[test]
    fn deleted_floaters_are_pruned_and_ids_stay_stable() {
        let mut set = FloaterSet::new();
        let a = set.spawn(ItemKind::Dirt, 1, Vec2::ZERO, Vec2::ZERO);
        let b = set.spawn(ItemKind::Log, 2, Vec2::ONE, Vec2::ZERO);
        set.get_mut(a).unwrap().mark_deleted();
        assert!(!set.get(a).unwrap().is_solid());
        assert_eq!(set.total_count(), 2);
        assert_eq!(set.prune(), 1);
        assert!(set.get(a).is_none());
        assert_eq!(set.get(b).unwrap().amount, 2);

        let c = set.spawn(ItemKind::Dirt, 1, Vec2::ZERO, Vec2::ZERO);
        assert_ne!(c, a);
    }
}
