//! Pure economy logic for Yearn.
//!
//! This crate holds the parts of the colony economy that don't need an ECS
//! world: the tier progression, the stockpile ledger, the balance formulas and
//! item stats. Functions take plain data and return results, so everything
//! here is unit-testable without spinning up a simulation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`balance`] | Versioned formula table (upgrade costs, terrain escalation, leveling) |
//! | [`economy`] | Ledger + terrain difficulty context passed to every subsystem |
//! | [`items`] | Pickaxe / canister / shovel stats and upgrade comparison |
//! | [`ledger`] | Per-tier non-negative resource counters |
//! | [`tiers`] | The ordered 46-step material progression |

pub mod balance;
pub mod economy;
pub mod items;
pub mod ledger;
pub mod tiers;

pub use balance::BalanceTable;
pub use economy::{Economy, TerrainDifficulty};
pub use items::{CanisterStats, PickaxeStats, ShovelStats};
pub use ledger::{LedgerError, ResourceLedger};
pub use tiers::{ResourceTier, TIER_COUNT};
