//! The colony economy context: stockpile plus terrain difficulty scalars.
//!
//! Everything that mutates shared economic state receives an `&mut Economy`
//! explicitly, so two simulations never share counters.

use serde::{Deserialize, Serialize};

use crate::balance::{next_yield_bonus, BalanceTable};
use crate::ledger::{LedgerError, ResourceLedger};
use crate::tiers::ResourceTier;

/// Difficulty applied to blocks laid from now on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainDifficulty {
    pub durability_multiplier: f64,
    pub yield_bonus: u64,
}

impl Default for TerrainDifficulty {
    fn default() -> Self {
        Self {
            durability_multiplier: 1.0,
            yield_bonus: 0,
        }
    }
}

impl TerrainDifficulty {
    /// Step both scalars after a terrain batch.
    pub fn escalate(&mut self, table: &BalanceTable) {
        self.durability_multiplier = table.next_durability_multiplier(self.durability_multiplier);
        self.yield_bonus = next_yield_bonus(self.yield_bonus);
    }
}

/// Shared economic state for one colony.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub ledger: ResourceLedger,
    pub difficulty: TerrainDifficulty,
}

impl Economy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, tier: ResourceTier) -> u64 {
        self.ledger.get(tier)
    }

    pub fn credit(&mut self, tier: ResourceTier, amount: u64) {
        self.ledger.credit(tier, amount);
    }

    pub fn debit(&mut self, tier: ResourceTier, amount: u64) -> Result<(), LedgerError> {
        self.ledger.debit(tier, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalate_compounds() {
        let table = BalanceTable::default();
        let mut difficulty = TerrainDifficulty::default();
        difficulty.escalate(&table);
        difficulty.escalate(&table);
        assert_eq!(difficulty.yield_bonus, 2);
        assert!((difficulty.durability_multiplier - 1.21).abs() < 1e-9);
    }

    #[test]
    fn test_economies_are_independent() {
        let mut a = Economy::new();
        let b = Economy::new();
        a.credit(ResourceTier::Earth, 5);
        assert_eq!(a.balance(ResourceTier::Earth), 5);
        assert_eq!(b.balance(ResourceTier::Earth), 0);
    }
}
