//! Yearn Core - Mining Colony Simulation Engine
//!
//! An ECS-based simulation of a mining colony: miners dig upward through
//! depleting terrain, haul the yield back to a mobile base, and feed a chain
//! of crushers that compact each material tier into the next.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Miners (and, in a separate world, terrain blocks)
//! - **Components**: Pure data attached to entities (Miner, Position, Projectiles, Block)
//! - **Systems**: Logic that queries and updates components in a fixed tick order
//!
//! Economic state (stockpile, terrain difficulty) lives in an explicit
//! [`yearn_logic::Economy`] owned by the engine.
//!
//! # Example
//!
//! ```rust,no_run
//! use yearn_core::prelude::*;
//!
//! let config = ColonyConfig::default().with_seed(7);
//! let mut engine = ColonyEngine::from_config(config).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod systems;
pub mod views;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{AutosaveConfig, ColonyConfig};
    pub use crate::engine::ColonyEngine;
    pub use crate::error::{CommandError, ConfigError, SaveError};
    pub use crate::persistence::SaveFormat;
    pub use yearn_logic::{Economy, ResourceTier};
}
