//! Systems - logic that operates on components.
//!
//! Systems query the world for entities with specific components and update
//! them. The engine calls them in a fixed order every tick.

mod crushers;
mod miner;
mod population;
mod projectiles;
mod terrain;

pub use crushers::*;
pub use miner::*;
pub use population::*;
pub use projectiles::*;
pub use terrain::*;
