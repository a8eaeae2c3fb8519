//! Terrain material generation.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const GRAIN_MIN: u8 = 50;
pub const GRAIN_MAX: u8 = 150;
const GRAIN_START: u8 = 100;
const GRAIN_STEP: i16 = 5;

/// Bounded random walk over block grain. Consecutive blocks drift by at most
/// one step, which gives the terrain visible seams of harder and softer rock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrainWalk {
    current: u8,
}

impl Default for GrainWalk {
    fn default() -> Self {
        Self {
            current: GRAIN_START,
        }
    }
}

impl GrainWalk {
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Advance one step (-5, 0 or +5) and return the new grain.
    pub fn step(&mut self, rng: &mut impl Rng) -> u8 {
        let delta = rng.gen_range(-1i16..=1) * GRAIN_STEP;
        let next = (self.current as i16 + delta).clamp(GRAIN_MIN as i16, GRAIN_MAX as i16);
        self.current = next as u8;
        self.current
    }
}
