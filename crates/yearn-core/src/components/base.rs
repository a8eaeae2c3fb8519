//! The mobile base ("caravan") at the bottom of the mine.

use serde::{Deserialize, Serialize};

use super::common::Vec2;

/// Fraction of the field height the base occupies.
const BASE_HEIGHT_FRACTION: f32 = 0.25;
/// The base sits this far (as a fraction of its height) above the field floor.
const BASE_LIFT_FRACTION: f32 = 0.05;
/// Stockpile sits this far above the deposit line.
const PILE_OFFSET: f32 = 100.0;

/// Geometry of the base: deposit line, stockpile and crusher bay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub width: f32,
    /// Deposit line; miners deposit once their bottom edge reaches it
    pub y: f32,
    pub height: f32,
}

impl Base {
    pub fn for_field(field_width: f32, field_height: f32) -> Self {
        let height = field_height * BASE_HEIGHT_FRACTION;
        Self {
            width: field_width,
            y: field_height - height * BASE_LIFT_FRACTION,
            height,
        }
    }

    /// Upper edge of the base body.
    pub fn top(&self) -> f32 {
        self.y - self.height
    }

    pub fn deposit_point(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.y)
    }

    /// Whether a miner of `radius` at `point` has reached the deposit line.
    pub fn reached_deposit(&self, point: Vec2, radius: f32) -> bool {
        point.y >= self.y - radius
    }

    /// Where working miners shovel material from.
    pub fn pile_point(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.y - PILE_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_field_geometry() {
        let base = Base::for_field(600.0, 800.0);
        assert_eq!(base.height, 200.0);
        assert_eq!(base.y, 790.0);
        assert_eq!(base.top(), 590.0);
        assert_eq!(base.deposit_point(), Vec2::new(300.0, 790.0));
        assert_eq!(base.pile_point(), Vec2::new(300.0, 690.0));
    }

    #[test]
    fn test_reached_deposit() {
        let base = Base::for_field(600.0, 800.0);
        assert!(!base.reached_deposit(Vec2::new(300.0, 700.0), 16.0));
        assert!(base.reached_deposit(Vec2::new(300.0, 774.0), 16.0));
    }
}
