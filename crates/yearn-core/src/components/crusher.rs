//! Crusher component - a converter that compacts one tier into the next.

use serde::{Deserialize, Serialize};
use yearn_logic::balance::{conversion_batch, COMPACTION_RATIO};
use yearn_logic::{Economy, ResourceTier};

use super::base::Base;
use super::common::Vec2;

/// Sequential crusher identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CrusherId(pub u32);

impl std::fmt::Display for CrusherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "crusher#{}", self.0)
    }
}

pub const DEFAULT_HOPPER: u32 = 100;
pub const DEFAULT_RATE: u32 = 1;

/// Crusher footprint on the base, for hauling miners.
const CRUSHER_BOX: f32 = 50.0;
const CRUSHER_SPACING: f32 = 60.0;
const CRUSHER_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crusher {
    pub id: CrusherId,
    pub input: ResourceTier,
    pub output: ResourceTier,
    /// Hopper capacity
    pub hopper: u32,
    /// Input units waiting to be crushed
    pub buffered: u32,
    /// Batches per second (each batch is two input units)
    pub rate: u32,
    /// Sub-second accumulator
    pub timer: f32,
    /// Lifetime input consumed
    pub total_converted: u64,
    /// Lifetime output credited
    pub total_produced: u64,
}

impl Crusher {
    pub fn new(id: CrusherId, input: ResourceTier, output: ResourceTier, hopper: u32) -> Self {
        Self {
            id,
            input,
            output,
            hopper,
            buffered: 0,
            rate: DEFAULT_RATE,
            timer: 0.0,
            total_converted: 0,
            total_produced: 0,
        }
    }

    pub fn space(&self) -> u32 {
        self.hopper.saturating_sub(self.buffered)
    }

    pub fn is_full(&self) -> bool {
        self.buffered >= self.hopper
    }

    /// Add up to `amount` to the hopper; returns the amount accepted.
    pub fn receive(&mut self, amount: u32) -> u32 {
        let accepted = amount.min(self.space());
        self.buffered += accepted;
        accepted
    }

    /// Advance the conversion clock. Every whole second with at least one
    /// batch buffered crushes up to `rate` batches and credits the output
    /// tier. Returns output units produced this call.
    pub fn tick(&mut self, delta_seconds: f32, economy: &mut Economy) -> u64 {
        if self.buffered < COMPACTION_RATIO {
            self.timer = 0.0;
            return 0;
        }

        self.timer += delta_seconds;
        let mut produced = 0u64;
        while self.timer >= 1.0 && self.buffered >= COMPACTION_RATIO {
            self.timer -= 1.0;
            let batch = conversion_batch(self.buffered, self.rate);
            self.buffered -= batch;
            let out = (batch / COMPACTION_RATIO) as u64;
            self.total_converted += batch as u64;
            self.total_produced += out;
            produced += out;
        }
        if self.buffered < COMPACTION_RATIO {
            self.timer = 0.0;
        }

        if produced > 0 {
            economy.credit(self.output, produced);
        }
        produced
    }

    /// Drop-off point for hauling miners, stacked down the left of the base.
    pub fn station(&self, base: &Base) -> Vec2 {
        Vec2::new(
            CRUSHER_MARGIN + CRUSHER_BOX * 0.5,
            base.top() + CRUSHER_MARGIN + CRUSHER_BOX * 0.5 + self.id.0 as f32 * CRUSHER_SPACING,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth_crusher() -> Crusher {
        Crusher::new(CrusherId(0), ResourceTier::Earth, ResourceTier::Stone, DEFAULT_HOPPER)
    }

    #[test]
    fn test_receive_clamps_to_hopper() {
        let mut c = earth_crusher();
        assert_eq!(c.receive(80), 80);
        assert_eq!(c.receive(80), 20);
        assert!(c.is_full());
    }

    #[test]
    fn test_ten_units_over_five_seconds() {
        let mut economy = Economy::new();
        let mut c = earth_crusher();
        c.receive(10);
        for _ in 0..5 {
            c.tick(1.0, &mut economy);
        }
        assert_eq!(c.buffered, 0);
        assert_eq!(economy.balance(ResourceTier::Stone), 5);
        assert_eq!(c.total_converted, 10);
        assert_eq!(c.total_produced, 5);
    }

    #[test]
    fn test_timer_resets_below_minimum() {
        let mut economy = Economy::new();
        let mut c = earth_crusher();
        c.receive(1);
        c.tick(0.9, &mut economy);
        assert_eq!(c.timer, 0.0);

        c.receive(2);
        c.tick(0.5, &mut economy);
        assert_eq!(c.timer, 0.5);
        c.tick(0.6, &mut economy);
        // 3 buffered -> one batch of 2, 1 left over, timer cleared
        assert_eq!(c.buffered, 1);
        assert_eq!(c.timer, 0.0);
        assert_eq!(economy.balance(ResourceTier::Stone), 1);
    }

    #[test]
    fn test_sub_second_ticks_accumulate() {
        let mut economy = Economy::new();
        let mut c = earth_crusher();
        c.rate = 3;
        c.receive(100);
        for _ in 0..4 {
            c.tick(0.25, &mut economy);
        }
        assert_eq!(c.buffered, 94);
        assert_eq!(economy.balance(ResourceTier::Stone), 3);
    }

    #[test]
    fn test_odd_unit_never_converted() {
        let mut economy = Economy::new();
        let mut c = earth_crusher();
        c.rate = 50;
        c.receive(7);
        c.tick(1.0, &mut economy);
        assert_eq!(c.buffered, 1);
        assert_eq!(economy.balance(ResourceTier::Stone), 3);
    }
}
