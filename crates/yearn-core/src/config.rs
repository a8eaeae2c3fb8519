//! Colony configuration, loadable from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yearn_logic::{BalanceTable, ResourceTier};

use crate::components::DEFAULT_HOPPER;
use crate::error::ConfigError;

/// Everything needed to start a colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Field width in world units
    pub field_width: f32,
    /// Reference height; the base occupies the bottom quarter
    pub field_height: f32,
    pub block_size: f32,
    /// Rows laid at startup (and after loading a save)
    pub initial_rows: u32,
    /// Rows laid per terrain batch
    pub batch_rows: u32,
    /// A batch is laid whenever fewer blocks than this remain
    pub low_water_mark: usize,
    /// A batch is laid whenever a miner gets this close to the frontier
    pub frontier_trigger_distance: f32,
    pub initial_miners: u32,
    /// Fixed RNG seed for replayable runs; random when absent
    pub seed: Option<u64>,
    pub root_input: ResourceTier,
    pub root_output: ResourceTier,
    pub root_hopper: u32,
    pub balance: BalanceTable,
    /// Periodic save; off when absent
    pub autosave: Option<AutosaveConfig>,
}

/// Where and how often the engine saves itself while ticking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// `.json` paths are written as JSON, anything else as bincode
    pub path: PathBuf,
    /// Simulated seconds between saves
    pub interval_seconds: f32,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            field_width: 600.0,
            field_height: 800.0,
            block_size: 50.0,
            initial_rows: 28,
            batch_rows: 20,
            low_water_mark: 150,
            frontier_trigger_distance: 300.0,
            initial_miners: 1,
            seed: None,
            root_input: ResourceTier::Earth,
            root_output: ResourceTier::Stone,
            root_hopper: DEFAULT_HOPPER,
            balance: BalanceTable::default(),
            autosave: None,
        }
    }
}

impl ColonyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Same config with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.block_size > 0.0) {
            return Err(ConfigError::Invalid("block_size must be positive".into()));
        }
        if self.field_width < self.block_size {
            return Err(ConfigError::Invalid(format!(
                "field_width {} is narrower than one block",
                self.field_width
            )));
        }
        if !(self.field_height > 0.0) {
            return Err(ConfigError::Invalid("field_height must be positive".into()));
        }
        if self.batch_rows == 0 {
            return Err(ConfigError::Invalid("batch_rows must be at least 1".into()));
        }
        if self.root_output <= self.root_input {
            return Err(ConfigError::Invalid(format!(
                "root crusher must convert to a higher tier, got {} -> {}",
                self.root_input, self.root_output
            )));
        }
        if self.root_hopper < 2 {
            return Err(ConfigError::Invalid("root_hopper must hold at least 2 units".into()));
        }
        if let Some(autosave) = &self.autosave {
            if !(autosave.interval_seconds > 0.0) {
                return Err(ConfigError::Invalid(
                    "autosave interval_seconds must be positive".into(),
                ));
            }
        }
        let b = &self.balance;
        if b.progress_per_block_min < 0.0 || b.progress_per_block_max <= b.progress_per_block_min {
            return Err(ConfigError::Invalid("progress_per_block range is empty".into()));
        }
        if !(b.durability_growth >= 1.0) {
            return Err(ConfigError::Invalid("durability_growth must be at least 1".into()));
        }
        Ok(())
    }
}
