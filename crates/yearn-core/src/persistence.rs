//! Save/Load functionality for persisting colony state
//!
//! A save holds the economy, every miner's progression, the crusher chain and
//! the population counter. Terrain and positions are not saved: the field is
//! relaid at the saved difficulty and miners reappear above the base.
//!
//! Two encodings are supported: compact bincode and pretty JSON.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use yearn_logic::{CanisterStats, PickaxeStats, ResourceTier, ShovelStats, TerrainDifficulty};

use crate::components::{Crusher, Miner, MinerId, MinerState, Name};
use crate::error::SaveError;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// On-disk encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Binary,
    Json,
}

impl SaveFormat {
    /// `.json` files are JSON, everything else is binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::Binary,
        }
    }
}

/// One miner's persistent progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerRecord {
    pub id: MinerId,
    pub name: String,
    pub inventory: u32,
    pub cargo: ResourceTier,
    pub base_capacity: u32,
    pub base_power: u32,
    pub speed: f32,
    pub experience: u32,
    pub level_threshold: u32,
    pub pickaxe: PickaxeStats,
    pub canister: Option<CanisterStats>,
    pub shovel: ShovelStats,
}

impl MinerRecord {
    pub fn capture(miner: &Miner, name: &Name) -> Self {
        Self {
            id: miner.id,
            name: name.0.clone(),
            inventory: miner.inventory,
            cargo: miner.cargo,
            base_capacity: miner.base_capacity,
            base_power: miner.base_power,
            speed: miner.speed,
            experience: miner.experience,
            level_threshold: miner.level_threshold,
            pickaxe: miner.pickaxe,
            canister: miner.canister,
            shovel: miner.shovel,
        }
    }

    /// Rebuild the miner. It resumes in MovingUp, or Returning when it was
    /// hauling anything other than the base tier, so that load is banked as
    /// what it is before the miner digs again.
    pub fn restore(&self, template: Miner) -> (Miner, Name) {
        let capacity = self.base_capacity + self.canister.map_or(0, |c| c.capacity_bonus);
        let state = if self.inventory > 0 && self.cargo != ResourceTier::BASE {
            MinerState::Returning
        } else {
            MinerState::MovingUp
        };
        let miner = Miner {
            id: self.id,
            state,
            inventory: self.inventory.min(capacity),
            cargo: self.cargo,
            base_capacity: self.base_capacity,
            base_power: self.base_power,
            speed: self.speed,
            experience: self.experience,
            level_threshold: self.level_threshold,
            pickaxe: self.pickaxe,
            canister: self.canister,
            shovel: self.shovel,
            ..template
        };
        (miner, Name::new(self.name.clone()))
    }
}

/// Serializable snapshot of the colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    /// Save format version
    pub version: u32,
    /// Simulated seconds since the colony was founded
    pub sim_time: f64,
    /// Per-tier stockpile, indexed by tier
    pub ledger: Vec<u64>,
    pub difficulty: TerrainDifficulty,
    pub miners: Vec<MinerRecord>,
    pub crushers: Vec<Crusher>,
    pub next_crusher_id: u32,
    pub population_progress: f32,
    pub next_miner_id: u32,
}

/// Write a snapshot in the given format.
pub fn save_snapshot<W: Write>(
    writer: W,
    snapshot: &ColonySnapshot,
    format: SaveFormat,
) -> Result<(), SaveError> {
    match format {
        SaveFormat::Binary => bincode::serialize_into(writer, snapshot)?,
        SaveFormat::Json => serde_json::to_writer_pretty(writer, snapshot)?,
    }
    Ok(())
}

/// Read a snapshot and check its version.
pub fn load_snapshot<R: Read>(reader: R, format: SaveFormat) -> Result<ColonySnapshot, SaveError> {
    let snapshot: ColonySnapshot = match format {
        SaveFormat::Binary => bincode::deserialize_from(reader)?,
        SaveFormat::Json => serde_json::from_reader(reader)?,
    };

    if snapshot.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CrusherId, DEFAULT_HOPPER};
    use yearn_logic::BalanceTable;

    fn snapshot() -> ColonySnapshot {
        let table = BalanceTable::default();
        let mut miner = Miner::new(MinerId(3), MinerState::Mining, &table);
        miner.inventory = 4;
        miner.base_power = 5;
        miner.canister = Some(CanisterStats { capacity_bonus: 12 });
        let mut crusher = Crusher::new(
            CrusherId(0),
            ResourceTier::Earth,
            ResourceTier::Stone,
            DEFAULT_HOPPER,
        );
        crusher.buffered = 33;
        crusher.timer = 0.5;
        ColonySnapshot {
            version: SAVE_VERSION,
            sim_time: 12.5,
            ledger: vec![7, 3],
            difficulty: TerrainDifficulty {
                durability_multiplier: 1.21,
                yield_bonus: 2,
            },
            miners: vec![MinerRecord::capture(&miner, &Name::new("Kilo"))],
            crushers: vec![crusher],
            next_crusher_id: 1,
            population_progress: 42.0,
            next_miner_id: 4,
        }
    }

    #[test]
    fn test_binary_roundtrip() {
        let original = snapshot();
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &original, SaveFormat::Binary).expect("Save failed");
        let loaded = load_snapshot(&buffer[..], SaveFormat::Binary).expect("Load failed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_json_roundtrip() {
        let original = snapshot();
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &original, SaveFormat::Json).expect("Save failed");
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("\"Kilo\""));
        let loaded = load_snapshot(&buffer[..], SaveFormat::Json).expect("Load failed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_version_mismatch() {
        let mut old = snapshot();
        old.version = SAVE_VERSION + 1;
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &old, SaveFormat::Json).unwrap();
        assert!(matches!(
            load_snapshot(&buffer[..], SaveFormat::Json),
            Err(SaveError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_binary() {
        let garbage = [0xffu8; 7];
        assert!(load_snapshot(&garbage[..], SaveFormat::Binary).is_err());
    }

    #[test]
    fn test_record_restores_in_moving_up() {
        let record = snapshot().miners.remove(0);
        let table = BalanceTable::default();
        let (miner, name) = record.restore(Miner::new(MinerId(0), MinerState::Idle, &table));
        assert_eq!(miner.id, MinerId(3));
        assert_eq!(miner.state, MinerState::MovingUp);
        assert_eq!(miner.base_power, 5);
        assert_eq!(miner.capacity(), 22);
        assert_eq!(name.as_str(), "Kilo");
    }

    #[test]
    fn test_record_with_hauled_cargo_restores_returning() {
        let table = BalanceTable::default();
        let mut miner = Miner::new(
            MinerId(2),
            MinerState::Working {
                crusher: CrusherId(1),
            },
            &table,
        );
        miner.stow(ResourceTier::Stone, 5);
        let record = MinerRecord::capture(&miner, &Name::new("Oscar"));

        let (restored, _) = record.restore(Miner::new(MinerId(0), MinerState::Idle, &table));
        assert_eq!(restored.state, MinerState::Returning);
        assert_eq!(restored.inventory, 5);
        assert_eq!(restored.cargo, ResourceTier::Stone);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SaveFormat::from_path(Path::new("colony.json")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("colony.sav")), SaveFormat::Binary);
    }
}
