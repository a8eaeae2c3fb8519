//! Terrain block component and its arena handle.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec2;

/// Generational handle to a block in the [`BlockField`](crate::systems::BlockField).
///
/// Holding a handle does not keep the block alive. Once the block is destroyed
/// the handle stops resolving, even if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHandle(pub(crate) Entity);

impl BlockHandle {
    /// Stable numeric id (slot + generation) for logging and UI keys.
    pub fn to_bits(self) -> u64 {
        self.0.to_bits().get()
    }
}

/// A square of depletable terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Hits remaining; the block is destroyed at zero or below
    pub durability: i64,
    /// Units granted to the miner that destroys it
    pub yield_amount: u64,
    /// Random-walk material grain, 50..=150
    pub grain: u8,
}

impl Block {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.size * 0.5, self.y + self.size * 0.5)
    }

    /// Circle vs axis-aligned square test.
    pub fn overlaps_circle(&self, point: Vec2, radius: f32) -> bool {
        let closest_x = point.x.clamp(self.x, self.x + self.size);
        let closest_y = point.y.clamp(self.y, self.y + self.size);
        let dx = point.x - closest_x;
        let dy = point.y - closest_y;
        dx * dx + dy * dy <= radius * radius
    }
}
