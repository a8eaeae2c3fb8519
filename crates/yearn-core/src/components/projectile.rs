//! Projectiles in flight, owned by the miner that fired them.

use super::block::BlockHandle;
use super::common::Vec2;

/// A single seek-and-strike shot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Weak reference; the block may already be gone.
    pub target: BlockHandle,
    pub speed: f32,
}

/// Per-miner list of in-flight projectiles.
#[derive(Debug, Clone, Default)]
pub struct Projectiles {
    pub in_flight: Vec<Projectile>,
}

impl Projectiles {
    pub fn launch(&mut self, projectile: Projectile) {
        self.in_flight.push(projectile);
    }

    /// Drop everything in flight (state changes away from digging).
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}

