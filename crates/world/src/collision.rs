//! Pairwise collision pass over every registered collideable.

use glam::Vec2;
use serde::Serialize;
use skafos_core::ItemKind;
use skafos_physics::{bodies_touch, classify_direction, Aabb, Body, BodyKind, CollisionDirection};
use tracing::{debug, trace};

use crate::floater::{FloaterId, FloaterSet};
use crate::map::{BlockRef, ChunkMap};
use crate::player::Player;

/// Registry entry naming a collideable without borrowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EntityHandle {
    /// The player body.
    Player,
    /// A floater, by id.
    Floater {
        /// Id in the world's floater set.
        id: FloaterId,
    },
    /// A solid placed layer.
    Block {
        /// Cell and layer of the block.
        block: BlockRef,
    },
}

/// Position, size, and solidity of a collideable at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    /// What sort of body this is.
    pub kind: BodyKind,
    /// Min corner in world pixels.
    pub position: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Non-solid bodies are skipped by the pair test.
    pub solid: bool,
}

impl Body for BodySnapshot {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn kind(&self) -> BodyKind {
        self.kind
    }
}

impl BodySnapshot {
    fn of(body: &dyn Body) -> Self {
        Self {
            kind: body.kind(),
            position: body.position(),
            size: body.size(),
            solid: body.is_solid(),
        }
    }
}

/// An overlapping solid pair. Both callbacks ran, first against second, then the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contact {
    /// Earlier-registered body of the pair.
    pub first: EntityHandle,
    /// Later-registered body of the pair.
    pub second: EntityHandle,
    /// Direction from `first` to `second` at the time of contact.
    pub direction: CollisionDirection,
}

/// A floater absorbed into the player inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pickup {
    /// Floater that was absorbed.
    pub floater: FloaterId,
    /// Item kind it carried.
    pub kind: ItemKind,
    /// Units added to the inventory.
    pub amount: u32,
}

/// Outcome of one collision pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollisionReport {
    /// Overlapping solid pairs in registry order.
    pub contacts: Vec<Contact>,
    /// Every callback in firing order as (self, other).
    pub callbacks: Vec<(EntityHandle, EntityHandle)>,
    /// Floaters the player absorbed.
    pub pickups: Vec<Pickup>,
    /// Pickups refused because the inventory had no room.
    pub refused_pickups: usize,
}

/// Mutable view of everything the collision pass can touch.
pub struct CollisionScene<'a> {
    /// The player body, snapped back on solid contact.
    pub player: &'a mut Player,
    /// Floaters, marked deleted when picked up.
    pub floaters: &'a mut FloaterSet,
    /// Read-only; block bodies are looked up here.
    pub map: &'a ChunkMap,
}

impl CollisionScene<'_> {
    /// Current body of a handle, or `None` if it no longer exists.
    pub fn snapshot(&self, handle: EntityHandle) -> Option<BodySnapshot> {
        match handle {
            EntityHandle::Player => Some(BodySnapshot::of(&*self.player)),
            EntityHandle::Floater { id } => self
                .floaters
                .get(id)
                .map(|floater| BodySnapshot::of(floater)),
            EntityHandle::Block { block } => {
                let tile = self.map.block(block)?;
                let size = self.map.tile_size();
                Some(BodySnapshot {
                    kind: BodyKind::Block,
                    position: block.coord.to_world(size),
                    size: Vec2::splat(size),
                    solid: tile.is_solid(),
                })
            }
        }
    }

    /// Scan every unordered pair once. Pairs with a non-solid member are skipped.
    ///
    /// Bodies are re-read per pair, so a snap earlier in the pass is visible to later pairs.
    pub fn resolve_all(&mut self, entities: &[EntityHandle]) -> CollisionReport {
        let mut report = CollisionReport::default();
        for (i, &first) in entities.iter().enumerate() {
            for &second in &entities[i + 1..] {
                let (Some(a), Some(b)) = (self.snapshot(first), self.snapshot(second)) else {
                    continue;
                };
                if !bodies_touch(&a, &b) {
                    continue;
                }
                report.contacts.push(Contact {
                    first,
                    second,
                    direction: classify_direction(a.position, b.position),
                });
                self.collide(first, second, &mut report);
                self.collide(second, first, &mut report);
            }
        }
        report
    }

    /// Response of `this` to touching `other`.
    fn collide(&mut self, this: EntityHandle, other: EntityHandle, report: &mut CollisionReport) {
        report.callbacks.push((this, other));
        match (this, other) {
            (EntityHandle::Player, EntityHandle::Block { .. }) => {
                let Some(block) = self.snapshot(other) else {
                    return;
                };
                let direction = classify_direction(self.player.position, block.position);
                let solid = Aabb::from_position_size(block.position, block.size);
                self.player.snap_against(&solid, direction);
                trace!(?direction, position = ?self.player.position, "player snapped");
            }
            (EntityHandle::Player, EntityHandle::Floater { id })
            | (EntityHandle::Floater { id }, EntityHandle::Player) => self.pick_up(id, report),
            (EntityHandle::Block { .. }, _)
            | (EntityHandle::Floater { .. }, _)
            | (EntityHandle::Player, EntityHandle::Player) => {}
        }
    }

    fn pick_up(&mut self, id: FloaterId, report: &mut CollisionReport) {
        let Some(floater) = self.floaters.get_mut(id) else {
            return;
        };
        if floater.is_deleted() {
            return;
        }
        if !self
            .player
            .inventory_mut()
            .add_item(floater.kind, floater.amount)
        {
            report.refused_pickups += 1;
            trace!(id = id.0, "pickup refused: inventory full");
            return;
        }
        floater.mark_deleted();
        debug!(id = id.0, kind = ?floater.kind, amount = floater.amount, "floater picked up");
        report.pickups.push(Pickup {
            floater: id,
            kind: floater.kind,
            amount: floater.amount,
        });
    }
}
