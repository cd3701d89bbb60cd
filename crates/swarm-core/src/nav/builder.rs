//! Navigation mesh construction from normalized map data.
//!
//! Roads mark cells walkable; buildings stamp their bounding footprint
//! non-walkable afterwards, so a building always wins over a road crossing
//! the same cell. Road marking interpolates every cell a segment passes
//! through (grid traversal), not just segment endpoints — endpoint-only
//! sampling leaves disconnected walkable islands on long segments.

use swarm_events::{MapData, WorldPos};

use super::grid::{GridData, NavigationGrid};

/// Builds walkability grids at a fixed resolution and extent.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    width: usize,
    height: usize,
    grid_size: f32,
    fallback_disc_radius: usize,
}

impl MeshBuilder {
    pub fn new(width: usize, height: usize, grid_size: f32, fallback_disc_radius: usize) -> Self {
        Self {
            width,
            height,
            grid_size,
            fallback_disc_radius,
        }
    }

    /// Build a grid from road and building lists.
    ///
    /// Malformed entities (roads with fewer than two points, buildings
    /// with unusable footprints) are skipped individually; the build never
    /// aborts. A build that ends with zero walkable cells installs a
    /// walkable disc around the grid center so pathfinding never runs on
    /// an empty graph.
    pub fn build(&self, map: &MapData) -> NavigationGrid {
        let mut data = GridData::new(self.width, self.height);

        for (i, road) in map.roads.iter().enumerate() {
            if !road.is_well_formed() {
                tracing::warn!(road = i, points = road.path.len(), "skipping malformed road");
                continue;
            }
            for (a, b) in road.segments() {
                self.mark_segment(&mut data, a, b);
            }
        }

        for (i, building) in map.buildings.iter().enumerate() {
            match building.occluded_bounds() {
                Some(bounds) => self.stamp_blocked(
                    &mut data,
                    bounds.min_x,
                    bounds.min_z,
                    bounds.max_x,
                    bounds.max_z,
                ),
                None => {
                    tracing::warn!(
                        building = i,
                        vertices = building.footprint.len(),
                        "skipping building with unusable footprint"
                    );
                }
            }
        }

        if data.walkable_count() == 0 {
            tracing::warn!(
                radius_cells = self.fallback_disc_radius,
                "no walkable cells after build; installing fallback disc"
            );
            self.carve_fallback_disc(&mut data);
        }

        NavigationGrid::new(data)
    }

    /// Mark every cell the segment passes through, walking cell boundaries
    /// in grid space.
    fn mark_segment(&self, data: &mut GridData, a: WorldPos, b: WorldPos) {
        // Positions in grid units.
        let (ax, az) = (a.x / self.grid_size, a.z / self.grid_size);
        let (bx, bz) = (b.x / self.grid_size, b.z / self.grid_size);

        let mut cx = ax.floor() as i64;
        let mut cz = az.floor() as i64;
        let end_x = bx.floor() as i64;
        let end_z = bz.floor() as i64;

        let dx = bx - ax;
        let dz = bz - az;
        let step_x: i64 = if dx > 0.0 { 1 } else { -1 };
        let step_z: i64 = if dz > 0.0 { 1 } else { -1 };

        // Parametric distance along the segment to the next cell boundary
        // on each axis, and per-cell increments.
        let (mut t_max_x, t_delta_x) = if dx != 0.0 {
            let next = if dx > 0.0 { cx as f32 + 1.0 } else { cx as f32 };
            (((next - ax) / dx).abs().min(f32::MAX), (1.0 / dx).abs())
        } else {
            (f32::INFINITY, f32::INFINITY)
        };
        let (mut t_max_z, t_delta_z) = if dz != 0.0 {
            let next = if dz > 0.0 { cz as f32 + 1.0 } else { cz as f32 };
            (((next - az) / dz).abs().min(f32::MAX), (1.0 / dz).abs())
        } else {
            (f32::INFINITY, f32::INFINITY)
        };

        // Step budget bounds the walk even with degenerate float input.
        let mut budget = (self.width + self.height) as i64 * 2 + 4;
        loop {
            self.mark_cell(data, cx, cz);
            if (cx == end_x && cz == end_z) || budget <= 0 {
                break;
            }
            budget -= 1;
            if t_max_x < t_max_z {
                t_max_x += t_delta_x;
                cx += step_x;
            } else {
                t_max_z += t_delta_z;
                cz += step_z;
            }
        }
    }

    fn mark_cell(&self, data: &mut GridData, x: i64, z: i64) {
        if x >= 0 && z >= 0 {
            data.set_walkable(x as usize, z as usize, true);
        }
    }

    /// Force every cell overlapped by the box non-walkable.
    fn stamp_blocked(&self, data: &mut GridData, min_x: f32, min_z: f32, max_x: f32, max_z: f32) {
        let x0 = (min_x / self.grid_size).floor() as i64;
        let x1 = (max_x / self.grid_size).ceil() as i64;
        let z0 = (min_z / self.grid_size).floor() as i64;
        let z1 = (max_z / self.grid_size).ceil() as i64;

        for x in x0..=x1 {
            for z in z0..=z1 {
                if x >= 0 && z >= 0 {
                    data.set_walkable(x as usize, z as usize, false);
                }
            }
        }
    }

    fn carve_fallback_disc(&self, data: &mut GridData) {
        let center_x = (self.width / 2) as i64;
        let center_z = (self.height / 2) as i64;
        let radius = self.fallback_disc_radius as i64;

        for x in center_x - radius..=center_x + radius {
            for z in center_z - radius..=center_z + radius {
                if x < 0 || z < 0 {
                    continue;
                }
                let dx = x - center_x;
                let dz = z - center_z;
                if dx * dx + dz * dz <= radius * radius {
                    data.set_walkable(x as usize, z as usize, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_events::{Building, GroundBounds, Road};

    fn road(points: &[(f32, f32)]) -> Road {
        Road {
            path: points
                .iter()
                .map(|&(x, z)| WorldPos::new(x, 0.0, z))
                .collect(),
            width: 4.0,
            kind: "residential".to_string(),
        }
    }

    fn builder_10x10() -> MeshBuilder {
        MeshBuilder::new(10, 10, 5.0, 3)
    }

    #[test]
    fn test_straight_road_marks_every_cell() {
        let map = MapData {
            roads: vec![road(&[(0.0, 0.0), (45.0, 0.0)])],
            buildings: vec![],
        };
        let grid = builder_10x10().build(&map);
        for x in 0..=9 {
            assert!(grid.is_walkable(x, 0), "cell ({}, 0) should be walkable", x);
        }
        assert!(!grid.is_walkable(0, 1));
    }

    #[test]
    fn test_diagonal_road_leaves_no_gaps() {
        let map = MapData {
            roads: vec![road(&[(2.5, 2.5), (47.5, 47.5)])],
            buildings: vec![],
        };
        let grid = builder_10x10().build(&map);
        // Every cell on the diagonal is touched, and each consecutive pair
        // of marked cells shares at least an edge or corner.
        for i in 0..10 {
            assert!(grid.is_walkable(i, i), "diagonal cell ({}, {})", i, i);
        }
    }

    #[test]
    fn test_building_overrides_road() {
        let map = MapData {
            roads: vec![road(&[(0.0, 0.0), (45.0, 0.0)])],
            buildings: vec![Building {
                footprint: vec![],
                bounds: Some(GroundBounds {
                    min_x: 20.0,
                    min_z: 0.0,
                    max_x: 30.0,
                    max_z: 0.0,
                }),
                height: 10.0,
                kind: "office".to_string(),
            }],
        };
        let grid = builder_10x10().build(&map);
        assert!(grid.is_walkable(0, 0));
        for x in 4..=6 {
            assert!(!grid.is_walkable(x, 0), "cell ({}, 0) overlaps the building", x);
        }
        assert!(grid.is_walkable(9, 0));
    }

    #[test]
    fn test_malformed_entities_are_skipped() {
        let map = MapData {
            roads: vec![
                road(&[(0.0, 0.0)]), // single point, malformed
                road(&[(0.0, 10.0), (45.0, 10.0)]),
            ],
            buildings: vec![Building {
                footprint: vec![WorldPos::new(0.0, 0.0, 0.0), WorldPos::new(5.0, 0.0, 5.0)],
                bounds: None,
                height: 3.0,
                kind: String::new(),
            }],
        };
        let grid = builder_10x10().build(&map);
        assert!(grid.is_walkable(0, 2), "well-formed road still marked");
        assert!(grid.walkable_count() >= 10);
    }

    #[test]
    fn test_empty_map_installs_fallback_disc() {
        let grid = builder_10x10().build(&MapData::default());
        assert!(grid.walkable_count() > 0);
        assert!(grid.is_walkable(5, 5), "disc is centered on the grid");
        assert!(!grid.is_walkable(0, 0), "corners stay outside the disc");
    }
}
