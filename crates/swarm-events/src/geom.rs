//! World-space geometry.
//!
//! The navigation grid is laid over the x/z plane; y is height and is
//! carried through untouched except where positions are height-normalized.

use serde::{Deserialize, Serialize};

/// A point in world space, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the full 3D space.
    pub fn distance_to(&self, other: &WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance projected onto the ground (x/z) plane.
    pub fn ground_distance_to(&self, other: &WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Returns this position with its height replaced.
    pub fn with_height(&self, y: f32) -> Self {
        Self { x: self.x, y, z: self.z }
    }
}
