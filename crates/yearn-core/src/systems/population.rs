//! Population system - turns destroyed blocks into new miners

use rand::Rng;
use serde::{Deserialize, Serialize};
use yearn_logic::BalanceTable;

/// Accumulates destruction progress toward the next miner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationController {
    pub progress: f32,
    pub threshold: f32,
}

impl PopulationController {
    pub fn new(miners: usize, table: &BalanceTable) -> Self {
        Self {
            progress: 0.0,
            threshold: table.population_threshold(miners),
        }
    }

    /// Add progress; returns true once the threshold is reached.
    pub fn add_progress(&mut self, amount: f32) -> bool {
        self.progress += amount;
        self.is_due()
    }

    pub fn is_due(&self) -> bool {
        self.progress >= self.threshold
    }

    /// Count one destroyed block.
    pub fn record_destruction(&mut self, rng: &mut impl Rng, table: &BalanceTable) -> bool {
        let amount = rng.gen_range(table.progress_per_block_min..table.progress_per_block_max);
        self.add_progress(amount)
    }

    /// Called after the due miner has spawned; `miners` is the new headcount.
    pub fn complete_spawn(&mut self, miners: usize, table: &BalanceTable) {
        self.progress = 0.0;
        self.rescale(miners, table);
    }

    /// Recompute the threshold for a changed headcount, keeping progress.
    pub fn rescale(&mut self, miners: usize, table: &BalanceTable) {
        self.threshold = table.population_threshold(miners);
    }

    /// Fraction of the way to the next miner, for display.
    pub fn fraction(&self) -> f32 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        (self.progress / self.threshold).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_two_miners_need_two_hundred() {
        let table = BalanceTable::default();
        let mut pop = PopulationController::new(2, &table);
        assert_eq!(pop.threshold, 200.0);
        assert!(!pop.add_progress(199.0));
        assert!(pop.add_progress(1.0));
        pop.complete_spawn(3, &table);
        assert_eq!(pop.progress, 0.0);
        assert_eq!(pop.threshold, 300.0);
    }

    #[test]
    fn test_destruction_progress_range() {
        let table = BalanceTable::default();
        let mut pop = PopulationController::new(1, &table);
        let mut rng = StdRng::seed_from_u64(5);
        let mut last = 0.0;
        for _ in 0..50 {
            pop.record_destruction(&mut rng, &table);
            let step = pop.progress - last;
            assert!(step > 0.499 && step < 1.501);
            last = pop.progress;
        }
    }

    #[test]
    fn test_rescale_keeps_progress() {
        let table = BalanceTable::default();
        let mut pop = PopulationController::new(1, &table);
        pop.add_progress(40.0);
        pop.rescale(2, &table);
        assert_eq!(pop.progress, 40.0);
        assert!((pop.fraction() - 0.2).abs() < 1e-6);
    }
}
