//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior beyond small accessors - that lives in systems.

mod base;
mod block;
mod common;
mod crusher;
mod miner;
mod projectile;

pub use base::*;
pub use block::*;
pub use common::*;
pub use crusher::*;
pub use miner::*;
pub use projectile::*;
