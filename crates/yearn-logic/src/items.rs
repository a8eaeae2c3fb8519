//! Equipment stats a miner can pick up, and the "is this an upgrade" rules.
//!
//! Items are produced outside the simulation core; the core only decides
//! whether an offered item replaces what the miner already carries. An item
//! replaces the current one only when it is strictly better by its metric.

use serde::{Deserialize, Serialize};

use crate::tiers::ResourceTier;

/// The pickaxe fires projectiles at blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickaxeStats {
    /// Damage added to the miner's base power on every hit.
    pub mining_power: u32,
    /// Seconds between projectile launches.
    pub attack_interval: f32,
    /// Projectile travel speed in world units per second.
    pub projectile_speed: f32,
}

impl Default for PickaxeStats {
    fn default() -> Self {
        Self {
            mining_power: 1,
            attack_interval: 0.25,
            projectile_speed: 250.0,
        }
    }
}

impl PickaxeStats {
    /// Stats of a pickaxe forged from `tier` material.
    pub fn forged_from(tier: ResourceTier) -> Self {
        let level = tier.index() as u32;
        Self {
            mining_power: 10 + level * 3,
            attack_interval: (0.25 - level as f32 * 0.005).max(0.1),
            projectile_speed: 250.0 + level as f32 * 10.0,
        }
    }

    /// Better means strictly more mining power.
    pub fn is_better_than(&self, current: &PickaxeStats) -> bool {
        self.mining_power > current.mining_power
    }
}

/// A canister raises carrying capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanisterStats {
    pub capacity_bonus: u32,
}

impl CanisterStats {
    pub fn forged_from(tier: ResourceTier) -> Self {
        Self {
            capacity_bonus: 10 + tier.index() as u32 * 2,
        }
    }

    pub fn is_better_than(&self, current: &CanisterStats) -> bool {
        self.capacity_bonus > current.capacity_bonus
    }
}

/// A shovel speeds up loading from the stockpile while working a crusher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShovelStats {
    /// Multiplier on the collection rate (1.0 = one unit per interval).
    pub speed: f32,
}

impl Default for ShovelStats {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl ShovelStats {
    pub fn forged_from(tier: ResourceTier) -> Self {
        Self {
            speed: 1.0 + tier.index() as f32 * 0.1,
        }
    }

    pub fn is_better_than(&self, current: &ShovelStats) -> bool {
        self.speed > current.speed
    }
}
