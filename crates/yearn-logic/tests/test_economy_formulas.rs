//! Integration tests across the pure economy modules.
//!
//! Exercises: ResourceTier → ResourceLedger → BalanceTable → Economy
//!
//! All tests are pure logic: no ECS world, no engine.

use yearn_logic::balance::{conversion_batch, next_yield_bonus, COMPACTION_RATIO};
use yearn_logic::{BalanceTable, Economy, ResourceLedger, ResourceTier, TIER_COUNT};

// ── Helpers ────────────────────────────────────────────────────────────

/// Run a bare conversion loop for `seconds` whole-second cycles and return
/// (input consumed, output produced).
fn run_conversion(buffered: &mut u32, rate: u32, seconds: u32) -> (u32, u32) {
    let mut consumed = 0;
    let mut produced = 0;
    for _ in 0..seconds {
        let batch = conversion_batch(*buffered, rate);
        *buffered -= batch;
        consumed += batch;
        produced += batch / COMPACTION_RATIO;
    }
    (consumed, produced)
}

// ── Conversion ─────────────────────────────────────────────────────────

#[test]
fn conversion_output_is_half_of_consumed_input() {
    for start in [0u32, 1, 2, 3, 17, 100, 999] {
        for rate in [1u32, 3, 10, 55] {
            let mut buffered = start;
            let (consumed, produced) = run_conversion(&mut buffered, rate, 50);
            assert_eq!(consumed % COMPACTION_RATIO, 0);
            assert_eq!(produced, consumed / COMPACTION_RATIO);
            assert!(buffered < COMPACTION_RATIO || consumed == 50 * rate * COMPACTION_RATIO);
        }
    }
}

#[test]
fn ten_earth_at_rate_one_takes_five_seconds() {
    let mut buffered = 10;
    let (consumed, produced) = run_conversion(&mut buffered, 1, 5);
    assert_eq!(consumed, 10);
    assert_eq!(produced, 5);
    assert_eq!(buffered, 0);
}

// ── Ledger + tiers ─────────────────────────────────────────────────────

#[test]
fn ledger_covers_every_tier() {
    let mut ledger = ResourceLedger::new();
    for tier in ResourceTier::ALL {
        ledger.credit(tier, tier.index() as u64);
    }
    assert_eq!(ledger.counts().len(), TIER_COUNT);
    assert_eq!(ledger.get(ResourceTier::Aetherstone), (TIER_COUNT - 1) as u64);
}

#[test]
fn economy_snapshot_roundtrips_through_json() {
    let mut economy = Economy::new();
    economy.credit(ResourceTier::Stone, 42);
    economy.difficulty.escalate(&BalanceTable::default());

    let json = serde_json::to_string(&economy).unwrap();
    let back: Economy = serde_json::from_str(&json).unwrap();
    assert_eq!(back, economy);
}

// ── Escalation ─────────────────────────────────────────────────────────

#[test]
fn yield_bonus_grows_super_linearly() {
    let mut bonus = 0u64;
    let mut deltas = Vec::new();
    for _ in 0..40 {
        let next = next_yield_bonus(bonus);
        deltas.push(next - bonus);
        bonus = next;
    }
    // Increments never shrink and eventually exceed 1
    assert!(deltas.windows(2).all(|w| w[1] >= w[0]));
    assert!(*deltas.last().unwrap() > 1);
}

#[test]
fn upgrade_costs_never_decrease() {
    let table = BalanceTable::default();
    let mut hopper = 100;
    let mut last_cost = 0;
    for _ in 0..200 {
        let cost = table.hopper_upgrade_cost(hopper);
        assert!(cost >= last_cost);
        last_cost = cost;
        hopper += table.hopper_upgrade_step(hopper);
    }

    let mut rate = 1;
    let mut last_cost = 0;
    for _ in 0..60 {
        let cost = table.rate_upgrade_cost(rate);
        assert!(cost >= last_cost);
        last_cost = cost;
        rate += table.rate_upgrade_step(rate);
    }
}
