//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// 2D vector in world units. Screen convention: +y points down, so "up the
/// mine" means decreasing y.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `degrees` (0 = +x, -90 = up).
    pub fn from_degrees(degrees: f32) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.cos(), radians.sin())
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Distance at which a mover counts as having reached its target.
pub const ARRIVE_DISTANCE: f32 = 5.0;

/// Step `from` toward `target` by `speed * dt`. Returns the new point and
/// whether it landed on the target.
pub fn step_toward(from: Vec2, target: Vec2, speed: f32, dt: f32) -> (Vec2, bool) {
    let diff = target - from;
    let distance = diff.length();
    let step = speed * dt;

    if distance <= ARRIVE_DISTANCE || step >= distance {
        (target, true)
    } else {
        (from + diff.normalize() * step, false)
    }
}

/// Spatial position component - where an entity is in the mine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub point: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            point: Vec2::new(x, y),
        }
    }
}

/// Name component for entities that have names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let diff = b - a;
        assert_eq!(diff.length(), 5.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.y, 4.0);
    }

    #[test]
    fn test_from_degrees_points_up() {
        let up = Vec2::from_degrees(-90.0);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_step_toward_partial_and_arrive() {
        let (p, arrived) = step_toward(Vec2::ZERO, Vec2::new(100.0, 0.0), 10.0, 1.0);
        assert!(!arrived);
        assert!((p.x - 10.0).abs() < 1e-4);

        let (p, arrived) = step_toward(Vec2::ZERO, Vec2::new(8.0, 0.0), 10.0, 1.0);
        assert!(arrived);
        assert_eq!(p, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_name() {
        let name = Name::new("Kilo");
        assert_eq!(name.to_string(), "Kilo");
        assert_eq!(name.as_str(), "Kilo");
    }
}
