//! Navigation: walkability grid, mesh construction and pathfinding.

pub mod builder;
pub mod grid;
pub mod path;

pub use builder::MeshBuilder;
pub use grid::{GridCoord, GridData, GridSnapshot, NavigationGrid};
pub use path::find_path;

use rand::rngs::SmallRng;
use rand::Rng;
use swarm_events::{MapData, WorldPos};

/// The walkability grid plus its query operations.
///
/// This is what the rest of the engine talks to: world-space path queries,
/// random navigable sampling and walkability checks. Grid dimensions are
/// fixed for the mesh's lifetime; `rebuild` swaps cells wholesale on a map
/// reload.
#[derive(Debug, Clone)]
pub struct NavigationMesh {
    grid: NavigationGrid,
    builder: MeshBuilder,
    grid_size: f32,
}

impl NavigationMesh {
    /// Build a mesh for a world extent of `size_x` by `size_z` meters.
    pub fn build(
        map: &MapData,
        size_x: f32,
        size_z: f32,
        grid_size: f32,
        fallback_disc_radius: usize,
    ) -> Self {
        let width = (size_x / grid_size).ceil() as usize;
        let height = (size_z / grid_size).ceil() as usize;
        let builder = MeshBuilder::new(width, height, grid_size, fallback_disc_radius);
        let grid = builder.build(map);
        Self {
            grid,
            builder,
            grid_size,
        }
    }

    /// Rebuild the grid from new map data, keeping dimensions.
    pub fn rebuild(&mut self, map: &MapData) {
        self.grid = self.builder.build(map);
    }

    pub fn grid(&self) -> &NavigationGrid {
        &self.grid
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Cell containing a world position, if inside the grid.
    pub fn world_to_cell(&self, pos: WorldPos) -> Option<GridCoord> {
        let x = (pos.x / self.grid_size).floor();
        let z = (pos.z / self.grid_size).floor();
        if x < 0.0 || z < 0.0 {
            return None;
        }
        let coord = GridCoord::new(x as usize, z as usize);
        if coord.x < self.grid.width() && coord.z < self.grid.height() {
            Some(coord)
        } else {
            None
        }
    }

    /// Center of a cell in world space, at ground height.
    pub fn cell_to_world(&self, coord: GridCoord) -> WorldPos {
        WorldPos::new(
            coord.x as f32 * self.grid_size + self.grid_size / 2.0,
            0.0,
            coord.z as f32 * self.grid_size + self.grid_size / 2.0,
        )
    }

    /// World-space route between two positions, as cell-center waypoints.
    /// Empty when either endpoint is off-grid or no route exists.
    pub fn find_world_path(&self, from: WorldPos, to: WorldPos) -> Vec<WorldPos> {
        let (Some(start), Some(goal)) = (self.world_to_cell(from), self.world_to_cell(to)) else {
            return Vec::new();
        };
        find_path(&self.grid.snapshot(), start, goal)
            .into_iter()
            .map(|c| self.cell_to_world(c))
            .collect()
    }

    /// Uniformly random walkable cell center, `None` on an all-blocked
    /// grid (which the builder's fallback disc prevents in practice).
    pub fn random_navigable_position(&self, rng: &mut SmallRng) -> Option<WorldPos> {
        let cells = self.grid.walkable_cells();
        if cells.is_empty() {
            return None;
        }
        let cell = cells[rng.gen_range(0..cells.len())];
        Some(self.cell_to_world(cell))
    }

    pub fn is_position_navigable(&self, pos: WorldPos) -> bool {
        self.world_to_cell(pos)
            .map_or(false, |c| self.grid.is_walkable(c.x, c.z))
    }
}
