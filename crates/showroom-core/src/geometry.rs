//! Minimal 3D point type shared by the catalog, registry and explode rig.
//!
//! Kept engine-agnostic so the core can be driven by any scene graph; the
//! Bevy adapter converts to and from `Vec3` at the boundary.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing restored positions.
pub const POSITION_EPSILON: f32 = 1e-5;

/// Position in model space (Y-up, metres).
///
/// Serialized as a `[x, y, z]` array so catalog files stay compact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a degenerate input.
    pub fn normalize_or_zero(&self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn add(&self, other: Point3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: Point3) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn distance(&self, other: Point3) -> f32 {
        self.sub(other).length()
    }

    pub fn approx_eq(&self, other: Point3) -> bool {
        self.distance(other) <= POSITION_EPSILON
    }
}

impl From<[f32; 3]> for Point3 {
    fn from(arr: [f32; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f32; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Point3::ZERO.normalize_or_zero(), Point3::ZERO);

        let n = Point3::new(3.0, 0.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < POSITION_EPSILON);
        assert!(n.approx_eq(Point3::new(0.6, 0.0, 0.8)));
    }
}
