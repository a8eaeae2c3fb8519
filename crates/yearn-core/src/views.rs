//! Read-only views handed to a presentation layer.

use serde::Serialize;
use yearn_logic::ResourceTier;

use crate::components::{BlockHandle, CrusherId, MinerId, MinerState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinerView {
    pub id: MinerId,
    pub name: String,
    pub state: MinerState,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub inventory: u32,
    pub capacity: u32,
    pub cargo: ResourceTier,
    pub power: u32,
    pub speed: f32,
    pub experience: u32,
    pub level_threshold: u32,
    pub projectiles_in_flight: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    /// Stable key for the block
    pub id: u64,
    #[serde(skip)]
    pub handle: BlockHandle,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub durability: i64,
    pub yield_amount: u64,
    pub grain: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrusherView {
    pub id: CrusherId,
    pub input: ResourceTier,
    pub output: ResourceTier,
    pub hopper: u32,
    pub buffered: u32,
    pub rate: u32,
    pub hopper_upgrade_cost: u64,
    pub rate_upgrade_cost: u64,
    /// Chain extension would succeed right now
    pub can_extend: bool,
    pub total_converted: u64,
    pub total_produced: u64,
}
