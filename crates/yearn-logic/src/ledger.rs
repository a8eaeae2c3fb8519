//! Per-tier resource counters.
//!
//! The ledger is the colony's stockpile: one non-negative counter per
//! [`ResourceTier`]. Credits saturate, debits check availability first and are
//! refused (with no effect) when the balance is short.

use serde::{Deserialize, Serialize};

use crate::tiers::{ResourceTier, TIER_COUNT};

/// Reasons a ledger mutation can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient {tier}: requested {requested}, available {available}")]
    Insufficient {
        tier: ResourceTier,
        requested: u64,
        available: u64,
    },
}

/// Stockpile counts indexed by tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    counts: Vec<u64>,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self {
            counts: vec![0; TIER_COUNT],
        }
    }

    /// Rebuild a ledger from saved counts. Missing trailing tiers read as zero,
    /// extra entries are ignored.
    pub fn from_counts(counts: &[u64]) -> Self {
        let mut ledger = Self::new();
        for (slot, value) in ledger.counts.iter_mut().zip(counts) {
            *slot = *value;
        }
        ledger
    }

    pub fn get(&self, tier: ResourceTier) -> u64 {
        self.counts[tier.index()]
    }

    pub fn has(&self, tier: ResourceTier, amount: u64) -> bool {
        self.get(tier) >= amount
    }

    pub fn credit(&mut self, tier: ResourceTier, amount: u64) {
        let slot = &mut self.counts[tier.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Remove `amount` from `tier`, or do nothing and report the shortfall.
    pub fn debit(&mut self, tier: ResourceTier, amount: u64) -> Result<(), LedgerError> {
        let available = self.get(tier);
        if available < amount {
            return Err(LedgerError::Insufficient {
                tier,
                requested: amount,
                available,
            });
        }
        self.counts[tier.index()] = available - amount;
        Ok(())
    }

    /// Debit up to `amount`, returning how much was actually taken.
    pub fn take_up_to(&mut self, tier: ResourceTier, amount: u64) -> u64 {
        let taken = self.get(tier).min(amount);
        self.counts[tier.index()] -= taken;
        taken
    }

    /// Counts in tier order, as stored in snapshots.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Non-empty balances in tier order.
    pub fn holdings(&self) -> impl Iterator<Item = (ResourceTier, u64)> + '_ {
        ResourceTier::ALL
            .iter()
            .map(move |tier| (*tier, self.get(*tier)))
            .filter(|(_, count)| *count > 0)
    }
}
