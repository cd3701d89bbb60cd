//! Map data acquisition.
//!
//! Normalized map JSON comes from an external provider; this module only
//! deserializes it. For self-contained runs without a provider there is a
//! small built-in street grid.

use std::path::Path;

use swarm_events::{Building, GroundBounds, MapData, Road, WorldPos};

/// Errors while acquiring map data at startup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("could not read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse map file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load normalized map data from a JSON file.
pub fn load_map_file(path: impl AsRef<Path>) -> Result<MapData, SetupError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

/// A built-in street grid covering the given extent.
///
/// Avenues run north-south and streets east-west at fifth-of-extent
/// spacing, with a block of buildings in two of the resulting quarters.
pub fn demo_map(size_x: f32, size_z: f32) -> MapData {
    let mut roads = Vec::new();

    let spacing_x = size_x / 5.0;
    let spacing_z = size_z / 5.0;

    for i in 1..5 {
        let x = spacing_x * i as f32;
        roads.push(Road {
            path: vec![
                WorldPos::new(x, 0.0, 0.0),
                WorldPos::new(x, 0.0, size_z - 1.0),
            ],
            width: 8.0,
            kind: "avenue".to_string(),
        });
        let z = spacing_z * i as f32;
        roads.push(Road {
            path: vec![
                WorldPos::new(0.0, 0.0, z),
                WorldPos::new(size_x - 1.0, 0.0, z),
            ],
            width: 6.0,
            kind: "street".to_string(),
        });
    }

    let buildings = vec![
        Building {
            footprint: vec![
                WorldPos::new(spacing_x * 1.2, 0.0, spacing_z * 1.2),
                WorldPos::new(spacing_x * 1.8, 0.0, spacing_z * 1.2),
                WorldPos::new(spacing_x * 1.8, 0.0, spacing_z * 1.8),
                WorldPos::new(spacing_x * 1.2, 0.0, spacing_z * 1.8),
            ],
            bounds: None,
            height: 40.0,
            kind: "office".to_string(),
        },
        Building {
            footprint: Vec::new(),
            bounds: Some(GroundBounds {
                min_x: spacing_x * 3.2,
                min_z: spacing_z * 2.2,
                max_x: spacing_x * 3.8,
                max_z: spacing_z * 2.8,
            }),
            height: 25.0,
            kind: "retail".to_string(),
        },
    ];

    MapData { roads, buildings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_map_shape() {
        let map = demo_map(5000.0, 5000.0);
        assert_eq!(map.roads.len(), 8);
        assert_eq!(map.buildings.len(), 2);
        assert!(map.roads.iter().all(|r| r.is_well_formed()));
        assert!(map.buildings.iter().all(|b| b.occluded_bounds().is_some()));
    }

    #[test]
    fn test_load_map_file_round_trip() {
        let map = demo_map(500.0, 500.0);
        let dir = std::env::temp_dir().join("city-swarm-test-map");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("map.json");
        std::fs::write(&path, serde_json::to_string(&map).unwrap()).unwrap();

        let loaded = load_map_file(&path).unwrap();
        assert_eq!(loaded.roads.len(), map.roads.len());
        assert_eq!(loaded.buildings.len(), map.buildings.len());
    }

    #[test]
    fn test_load_map_file_missing() {
        let result = load_map_file("/nonexistent/map.json");
        assert!(matches!(result, Err(SetupError::Io(_))));
    }
}
