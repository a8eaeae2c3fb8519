//! Balance formulas: every escalating curve in one versioned table.
//!
//! All formulas are pure functions of the state they are given so they can be
//! checked in isolation. The constants live in [`BalanceTable`] so a config
//! file can tune them without touching the simulation code.

use serde::{Deserialize, Serialize};

/// Two units of tier `i` compact into one unit of tier `i + 1`.
pub const COMPACTION_RATIO: u32 = 2;

/// Version stamp of the formula set below.
pub const BALANCE_VERSION: u32 = 1;

/// Tunable constants for the economy curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTable {
    pub version: u32,

    // Crusher hopper upgrade: base * growth^(hopper / divisor)
    pub hopper_cost_base: f64,
    pub hopper_cost_growth: f64,
    pub hopper_cost_divisor: f64,
    pub hopper_step_base: u32,

    // Crusher rate upgrade: base * growth^(rate / divisor)
    pub rate_cost_base: f64,
    pub rate_cost_growth: f64,
    pub rate_cost_divisor: f64,

    /// Flat price, in output-tier units, of adding the next crusher.
    pub chain_extension_cost: u64,

    // Terrain escalation
    pub durability_growth: f64,
    pub base_yield: u64,

    // Miner leveling
    pub initial_level_threshold: u32,
    pub level_threshold_step: u32,

    // Population
    pub population_threshold_per_miner: f32,
    pub progress_per_block_min: f32,
    pub progress_per_block_max: f32,
}

impl Default for BalanceTable {
    fn default() -> Self {
        Self {
            version: BALANCE_VERSION,
            hopper_cost_base: 10.0,
            hopper_cost_growth: 1.05,
            hopper_cost_divisor: 200.0,
            hopper_step_base: 20,
            rate_cost_base: 20.0,
            rate_cost_growth: 1.05,
            rate_cost_divisor: 1.5,
            chain_extension_cost: 100,
            durability_growth: 1.1,
            base_yield: 1,
            initial_level_threshold: 10,
            level_threshold_step: 10,
            population_threshold_per_miner: 10.0 * 10.0,
            progress_per_block_min: 0.5,
            progress_per_block_max: 1.5,
        }
    }
}

impl BalanceTable {
    /// Price of the next hopper upgrade for a crusher holding `hopper` units.
    pub fn hopper_upgrade_cost(&self, hopper: u32) -> u64 {
        let exponent = hopper as f64 / self.hopper_cost_divisor;
        (self.hopper_cost_base * self.hopper_cost_growth.powf(exponent)).floor() as u64
    }

    /// Capacity added by one hopper upgrade.
    pub fn hopper_upgrade_step(&self, hopper: u32) -> u32 {
        self.hopper_step_base + hopper / 100
    }

    /// Price of the next rate upgrade at conversion rate `rate`.
    pub fn rate_upgrade_cost(&self, rate: u32) -> u64 {
        let exponent = rate as f64 / self.rate_cost_divisor;
        (self.rate_cost_base * self.rate_cost_growth.powf(exponent)).floor() as u64
    }

    /// Rate added by one rate upgrade (tiered step function).
    pub fn rate_upgrade_step(&self, rate: u32) -> u32 {
        match rate {
            0..=9 => 1,
            10..=19 => 2,
            20..=49 => 3,
            _ => 5,
        }
    }

    pub fn next_durability_multiplier(&self, multiplier: f64) -> f64 {
        multiplier * self.durability_growth
    }

    /// Durability for a freshly laid block.
    pub fn block_durability(&self, grain: u8, multiplier: f64) -> i64 {
        let raw = (grain as f64 / 10.0 * multiplier).round() as i64;
        raw.max(1)
    }

    pub fn block_yield(&self, yield_bonus: u64) -> u64 {
        self.base_yield + yield_bonus
    }

    /// Experience needed for the following level.
    pub fn next_level_threshold(&self, threshold: u32, power: u32) -> u32 {
        threshold.saturating_add(self.level_threshold_step.saturating_mul(power))
    }

    /// Progress needed before the next miner spawns.
    pub fn population_threshold(&self, miners: usize) -> f32 {
        self.population_threshold_per_miner * miners as f32
    }
}

/// Yield bonus after one more terrain batch: `bonus + bonus / 10 + 1`.
pub fn next_yield_bonus(bonus: u64) -> u64 {
    bonus.saturating_add(bonus / 10 + 1)
}

/// Input units one conversion cycle consumes: an even amount no larger than
/// the buffer, capped at `rate * 2`.
pub fn conversion_batch(buffered: u32, rate: u32) -> u32 {
    let even = buffered - buffered % COMPACTION_RATIO;
    even.min(rate.saturating_mul(COMPACTION_RATIO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hopper_cost_curve() {
        let table = BalanceTable::default();
        assert_eq!(table.hopper_upgrade_cost(0), 10);
        assert_eq!(table.hopper_upgrade_cost(100), 10); // 10 * 1.05^0.5 = 10.24
        assert_eq!(table.hopper_upgrade_cost(2000), 16); // 10 * 1.05^10 = 16.29
    }

    #[test]
    fn test_hopper_step() {
        let table = BalanceTable::default();
        assert_eq!(table.hopper_upgrade_step(100), 21);
        assert_eq!(table.hopper_upgrade_step(99), 20);
        assert_eq!(table.hopper_upgrade_step(1000), 30);
    }

    #[test]
    fn test_rate_cost_curve() {
        let table = BalanceTable::default();
        assert_eq!(table.rate_upgrade_cost(0), 20);
        assert_eq!(table.rate_upgrade_cost(1), 20); // 20 * 1.05^0.667 = 20.66
        assert_eq!(table.rate_upgrade_cost(15), 32); // 20 * 1.05^10 = 32.58
    }

    #[test]
    fn test_rate_step_function() {
        let table = BalanceTable::default();
        assert_eq!(table.rate_upgrade_step(1), 1);
        assert_eq!(table.rate_upgrade_step(9), 1);
        assert_eq!(table.rate_upgrade_step(10), 2);
        assert_eq!(table.rate_upgrade_step(19), 2);
        assert_eq!(table.rate_upgrade_step(20), 3);
        assert_eq!(table.rate_upgrade_step(49), 3);
        assert_eq!(table.rate_upgrade_step(50), 5);
    }

    #[test]
    fn test_yield_bonus_sequence() {
        // 0 -> 1 -> 2 -> 3 -> ... -> 10 -> 12 (10/10 + 1 = 2)
        let mut bonus = 0;
        let mut seen = Vec::new();
        for _ in 0..12 {
            bonus = next_yield_bonus(bonus);
            seen.push(bonus);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 14]);
    }

    #[test]
    fn test_durability_growth() {
        let table = BalanceTable::default();
        let m = table.next_durability_multiplier(1.0);
        assert!((m - 1.1).abs() < 1e-9);
        let m = table.next_durability_multiplier(m);
        assert!((m - 1.21).abs() < 1e-9);
    }

    #[test]
    fn test_block_durability_never_zero() {
        let table = BalanceTable::default();
        assert_eq!(table.block_durability(100, 1.0), 10);
        assert_eq!(table.block_durability(0, 1.0), 1);
        assert_eq!(table.block_durability(150, 2.0), 30);
    }

    #[test]
    fn test_level_threshold_growth() {
        let table = BalanceTable::default();
        assert_eq!(table.next_level_threshold(10, 2), 30);
        assert_eq!(table.next_level_threshold(30, 3), 60);
    }

    #[test]
    fn test_population_threshold() {
        let table = BalanceTable::default();
        assert_eq!(table.population_threshold(2), 200.0);
        assert_eq!(table.population_threshold(3), 300.0);
    }

    #[test]
    fn test_conversion_batch() {
        assert_eq!(conversion_batch(10, 1), 2);
        assert_eq!(conversion_batch(7, 10), 6);
        assert_eq!(conversion_batch(1, 10), 0);
        assert_eq!(conversion_batch(100, 5), 10);
    }

    #[test]
    fn test_partial_table_deserializes_with_defaults() {
        let table: BalanceTable = serde_json::from_str(r#"{ "chain_extension_cost": 50 }"#).unwrap();
        assert_eq!(table.chain_extension_cost, 50);
        assert_eq!(table.version, BALANCE_VERSION);
        assert_eq!(table.hopper_step_base, 20);
    }
}
