//! Miner components: the agent's stats, inventory, state and timers.

use serde::{Deserialize, Serialize};
use yearn_logic::{BalanceTable, CanisterStats, PickaxeStats, ResourceTier, ShovelStats};

use super::common::Vec2;
use super::crusher::CrusherId;

/// Sequential miner identity, stable across save/load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinerId(pub u32);

impl std::fmt::Display for MinerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "miner#{}", self.0)
    }
}

/// What a miner is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinerState {
    /// Roaming up the mine looking for blocks
    MovingUp,
    /// Stationary, launching projectiles at blocks in range
    Mining,
    /// Carrying a load back to the base
    Returning,
    /// Hauling stockpile into an assigned crusher
    Working { crusher: CrusherId },
    /// Parked, waiting for an assignment
    Idle,
}

impl MinerState {
    /// States in which the miner roams and digs on its own.
    pub fn is_free_roaming(&self) -> bool {
        matches!(self, MinerState::MovingUp | MinerState::Mining)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MinerState::MovingUp => "MovingUp",
            MinerState::Mining => "Mining",
            MinerState::Returning => "Returning",
            MinerState::Working { .. } => "Working",
            MinerState::Idle => "Idle",
        }
    }
}

pub const BASE_SPEED: f32 = 150.0;
pub const BODY_RADIUS: f32 = 16.0;
pub const MINING_RANGE: f32 = 64.0;
pub const BASE_CAPACITY: u32 = 10;
pub const BASE_POWER: u32 = 1;
/// Seconds between heading re-rolls while roaming.
pub const HEADING_PERIOD: f32 = 2.0;
/// Seconds per stockpile unit loaded with a standard shovel.
pub const COLLECT_INTERVAL: f32 = 0.25;

/// The miner agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Miner {
    pub id: MinerId,
    pub state: MinerState,
    pub speed: f32,
    pub radius: f32,
    pub mining_range: f32,

    /// Units carried right now
    pub inventory: u32,
    /// Tier of the carried units
    pub cargo: ResourceTier,
    pub base_capacity: u32,
    pub base_power: u32,

    pub experience: u32,
    pub level_threshold: u32,

    pub pickaxe: PickaxeStats,
    pub canister: Option<CanisterStats>,
    pub shovel: ShovelStats,

    pub heading: Vec2,
    pub heading_timer: f32,
    pub attack_timer: f32,
    pub collect_timer: f32,
}

impl Miner {
    pub fn new(id: MinerId, state: MinerState, table: &BalanceTable) -> Self {
        Self {
            id,
            state,
            speed: BASE_SPEED,
            radius: BODY_RADIUS,
            mining_range: MINING_RANGE,
            inventory: 0,
            cargo: ResourceTier::BASE,
            base_capacity: BASE_CAPACITY,
            base_power: BASE_POWER,
            experience: 0,
            level_threshold: table.initial_level_threshold,
            pickaxe: PickaxeStats::default(),
            canister: None,
            shovel: ShovelStats::default(),
            heading: Vec2::from_degrees(-90.0),
            heading_timer: 0.0,
            attack_timer: 0.0,
            collect_timer: 0.0,
        }
    }

    /// Carrying capacity including any canister.
    pub fn capacity(&self) -> u32 {
        self.base_capacity + self.canister.map_or(0, |c| c.capacity_bonus)
    }

    /// Damage dealt per projectile hit.
    pub fn power(&self) -> u32 {
        self.base_power + self.pickaxe.mining_power
    }

    pub fn is_full(&self) -> bool {
        self.inventory >= self.capacity()
    }

    pub fn free_space(&self) -> u32 {
        self.capacity().saturating_sub(self.inventory)
    }

    /// Add `amount` units of `tier`, clamped to free space. Returns how many
    /// units were kept; the rest is lost. A load holds a single tier, so
    /// nothing is kept when `tier` differs from what is already carried.
    pub fn stow(&mut self, tier: ResourceTier, amount: u64) -> u32 {
        if self.inventory == 0 {
            self.cargo = tier;
        } else if self.cargo != tier {
            return 0;
        }
        let kept = amount.min(self.free_space() as u64) as u32;
        self.inventory += kept;
        kept
    }

    /// Empty the inventory, returning what was carried.
    pub fn unload(&mut self) -> (ResourceTier, u32) {
        let load = (self.cargo, self.inventory);
        self.inventory = 0;
        self.cargo = ResourceTier::BASE;
        load
    }

    /// Seconds between loading stockpile units.
    pub fn collect_interval(&self) -> f32 {
        COLLECT_INTERVAL / self.shovel.speed.max(0.01)
    }

    /// Count one experience point; returns true when that levels the miner up.
    pub fn gain_experience(&mut self, table: &BalanceTable) -> bool {
        self.experience += 1;
        if self.experience < self.level_threshold {
            return false;
        }
        self.experience = 0;
        self.base_power += 1;
        self.speed += 1.0;
        self.level_threshold = table.next_level_threshold(self.level_threshold, self.base_power);
        true
    }
}
