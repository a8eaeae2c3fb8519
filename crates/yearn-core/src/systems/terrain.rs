//! Terrain system - lays, damages and removes blocks

use hecs::World;
use rand::Rng;
use yearn_logic::{BalanceTable, Economy};

use crate::components::{Block, BlockHandle, Vec2};
use crate::config::ColonyConfig;
use crate::generation::GrainWalk;

/// Result of hitting a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The handle no longer resolves; nothing happened.
    Missing,
    Damaged { remaining: i64 },
    /// The block was removed; its yield goes to whoever dealt the blow.
    Destroyed { yield_amount: u64 },
}

/// The depletable terrain above the base.
///
/// Blocks live in their own `hecs::World` so a [`BlockHandle`] is a plain
/// generational entity. Rows are laid upward from the middle of the field;
/// `frontier_y` is where the next row goes.
pub struct BlockField {
    blocks: World,
    width: f32,
    block_size: f32,
    columns: u32,
    start_y: f32,
    frontier_y: f32,
    initial_rows: u32,
    batch_rows: u32,
    low_water_mark: usize,
    frontier_trigger_distance: f32,
    grain: GrainWalk,
    batches_laid: u64,
    destroyed_total: u64,
}

impl BlockField {
    pub fn new(config: &ColonyConfig) -> Self {
        let start_y = config.field_height * 0.5;
        Self {
            blocks: World::new(),
            width: config.field_width,
            block_size: config.block_size,
            columns: (config.field_width / config.block_size).floor() as u32,
            start_y,
            frontier_y: start_y,
            initial_rows: config.initial_rows,
            batch_rows: config.batch_rows,
            low_water_mark: config.low_water_mark,
            frontier_trigger_distance: config.frontier_trigger_distance,
            grain: GrainWalk::default(),
            batches_laid: 0,
            destroyed_total: 0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Top of the next row to be laid.
    pub fn frontier_y(&self) -> f32 {
        self.frontier_y
    }

    /// Top edge of the highest row laid so far.
    pub fn top_row_y(&self) -> f32 {
        self.frontier_y + self.block_size
    }

    pub fn live_count(&self) -> usize {
        self.blocks.len() as usize
    }

    pub fn batches_laid(&self) -> u64 {
        self.batches_laid
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed_total
    }

    /// Clear the field and lay the starting rows at current difficulty.
    /// Difficulty is not escalated, so a reloaded colony keeps its scalars.
    pub fn lay_initial_field(&mut self, economy: &Economy, table: &BalanceTable, rng: &mut impl Rng) {
        self.blocks.clear();
        self.frontier_y = self.start_y;
        self.grain = GrainWalk::default();
        self.lay_rows(self.initial_rows, economy, table, rng);
        log::debug!(
            "Laid initial field: {} blocks, frontier at y={}",
            self.live_count(),
            self.frontier_y
        );
    }

    /// Lay one batch of rows above the frontier, then escalate difficulty.
    pub fn generate_batch(&mut self, economy: &mut Economy, table: &BalanceTable, rng: &mut impl Rng) {
        self.lay_rows(self.batch_rows, economy, table, rng);
        economy.difficulty.escalate(table);
        self.batches_laid += 1;
        log::debug!(
            "Terrain batch {}: {} live blocks, durability x{:.3}, yield bonus {}",
            self.batches_laid,
            self.live_count(),
            economy.difficulty.durability_multiplier,
            economy.difficulty.yield_bonus
        );
    }

    fn lay_rows(&mut self, rows: u32, economy: &Economy, table: &BalanceTable, rng: &mut impl Rng) {
        let difficulty = economy.difficulty;
        for _ in 0..rows {
            for column in 0..self.columns {
                let grain = self.grain.step(rng);
                self.blocks.spawn((Block {
                    x: column as f32 * self.block_size,
                    y: self.frontier_y,
                    size: self.block_size,
                    durability: table.block_durability(grain, difficulty.durability_multiplier),
                    yield_amount: table.block_yield(difficulty.yield_bonus),
                    grain,
                },));
            }
            self.frontier_y -= self.block_size;
        }
    }

    /// Keep the live count above the low-water mark.
    pub fn maintain(&mut self, economy: &mut Economy, table: &BalanceTable, rng: &mut impl Rng) {
        while self.live_count() < self.low_water_mark {
            self.generate_batch(economy, table, rng);
        }
    }

    /// Lay a batch if the highest miner (smallest y) is near the frontier.
    /// Returns whether a batch was laid.
    pub fn ensure_reach(
        &mut self,
        min_miner_y: f32,
        economy: &mut Economy,
        table: &BalanceTable,
        rng: &mut impl Rng,
    ) -> bool {
        if min_miner_y - self.top_row_y() < self.frontier_trigger_distance {
            self.generate_batch(economy, table, rng);
            true
        } else {
            false
        }
    }

    /// Apply `amount` damage. Removes the block the moment durability drops
    /// to zero; later hits through the same handle see `Missing`.
    pub fn apply_damage(&mut self, handle: BlockHandle, amount: u32) -> DamageOutcome {
        let outcome = match self.blocks.get::<&mut Block>(handle.0) {
            Ok(mut block) => {
                block.durability -= amount as i64;
                if block.durability <= 0 {
                    DamageOutcome::Destroyed {
                        yield_amount: block.yield_amount,
                    }
                } else {
                    DamageOutcome::Damaged {
                        remaining: block.durability,
                    }
                }
            }
            Err(_) => return DamageOutcome::Missing,
        };

        if let DamageOutcome::Destroyed { .. } = outcome {
            let _ = self.blocks.despawn(handle.0);
            self.destroyed_total += 1;
        }
        outcome
    }

    pub fn contains(&self, handle: BlockHandle) -> bool {
        self.blocks.contains(handle.0)
    }

    pub fn get(&self, handle: BlockHandle) -> Option<Block> {
        self.blocks.get::<&Block>(handle.0).ok().map(|b| (*b).clone())
    }

    pub fn center_of(&self, handle: BlockHandle) -> Option<Vec2> {
        self.blocks.get::<&Block>(handle.0).ok().map(|b| b.center())
    }

    /// Closest block whose center lies within `range` of `point`, edge included.
    pub fn nearest_in_range(&self, point: Vec2, range: f32) -> Option<BlockHandle> {
        let range_sq = range * range;
        let mut best: Option<(BlockHandle, f32)> = None;
        for (entity, block) in self.blocks.query::<&Block>().iter() {
            let d = block.center().distance_squared(&point);
            if d <= range_sq && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((BlockHandle(entity), d));
            }
        }
        best.map(|(handle, _)| handle)
    }

    /// Whether a circle at `point` would intersect any block.
    pub fn overlaps_circle(&self, point: Vec2, radius: f32) -> bool {
        self.blocks
            .query::<&Block>()
            .iter()
            .any(|(_, block)| block.overlaps_circle(point, radius))
    }

    /// Copy of every live block.
    pub fn iter(&self) -> impl Iterator<Item = (BlockHandle, Block)> {
        self.blocks
            .query::<&Block>()
            .iter()
            .map(|(entity, block)| (BlockHandle(entity), block.clone()))
            .collect::<Vec<_>>()
            .into_iter()
    }
}
