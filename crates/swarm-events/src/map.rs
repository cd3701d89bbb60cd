//! Normalized map data.
//!
//! The engine never parses raw OSM/GeoJSON/Places payloads; an external
//! provider hands it road and building lists already reduced to this shape.

use serde::{Deserialize, Serialize};

use crate::geom::WorldPos;

/// A road as an ordered polyline of world-space points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    /// Ordered centerline points. Fewer than two points is malformed.
    pub path: Vec<WorldPos>,
    /// Road width in meters (carried for providers; not used for walkability).
    #[serde(default)]
    pub width: f32,
    /// Provider classification, e.g. "residential" or "primary".
    #[serde(default)]
    pub kind: String,
}

impl Road {
    /// A road needs at least one segment to contribute walkable cells.
    pub fn is_well_formed(&self) -> bool {
        self.path.len() >= 2
    }

    /// Iterate the road's segments as (start, end) pairs.
    pub fn segments(&self) -> impl Iterator<Item = (WorldPos, WorldPos)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Axis-aligned bounds on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundBounds {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl GroundBounds {
    /// Bounding box of a polygon footprint; `None` for an empty footprint.
    pub fn from_footprint(footprint: &[WorldPos]) -> Option<Self> {
        let first = footprint.first()?;
        let mut bounds = GroundBounds {
            min_x: first.x,
            min_z: first.z,
            max_x: first.x,
            max_z: first.z,
        };
        for p in &footprint[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_z = bounds.min_z.min(p.z);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_z = bounds.max_z.max(p.z);
        }
        Some(bounds)
    }
}

/// A building occupying its bounding footprint on the ground plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    /// Polygon footprint vertices. Fewer than three is malformed unless
    /// explicit `bounds` are present.
    #[serde(default)]
    pub footprint: Vec<WorldPos>,
    /// Explicit bounds, for providers that only know the box.
    #[serde(default)]
    pub bounds: Option<GroundBounds>,
    #[serde(default)]
    pub height: f32,
    /// Provider classification, e.g. "office" or "retail".
    #[serde(default)]
    pub kind: String,
}

impl Building {
    /// The ground-plane box this building occludes, if the geometry is usable.
    pub fn occluded_bounds(&self) -> Option<GroundBounds> {
        if let Some(bounds) = self.bounds {
            return Some(bounds);
        }
        if self.footprint.len() < 3 {
            return None;
        }
        GroundBounds::from_footprint(&self.footprint)
    }
}

/// The full normalized map handed to the mesh builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapData {
    pub roads: Vec<Road>,
    pub buildings: Vec<Building>,
}
