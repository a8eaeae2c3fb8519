//! Error types for commands, persistence and configuration.

use std::path::PathBuf;

use thiserror::Error;
use yearn_logic::{LedgerError, ResourceTier};

use crate::components::{CrusherId, MinerId};

/// Why a player command was refused. A refused command has no effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no such miner: {0}")]
    UnknownMiner(MinerId),
    #[error("no such crusher: {0}")]
    UnknownCrusher(CrusherId),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0} is the last tier and cannot be crushed further")]
    TerminalTier(ResourceTier),
    #[error("a crusher already produces {0}")]
    TierOccupied(ResourceTier),
    #[error("offered item is not better than the one equipped")]
    NotAnUpgrade,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("binary serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
