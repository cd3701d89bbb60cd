//! A* pathfinding over a grid snapshot.
//!
//! 8-directional movement with octile heuristic. Corner cutting is
//! illegal: a diagonal step is rejected when either orthogonal cell it
//! would cross is blocked. Ties in the open set break by insertion order,
//! which makes the search fully deterministic for a given snapshot.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::grid::{GridCoord, GridSnapshot};

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Find a path from `start` to `goal`, inclusive of both endpoints.
///
/// An unreachable, blocked or out-of-bounds goal yields an empty vec —
/// never an error. Callers treat empty as "no route" and re-roll their
/// target on a later tick.
pub fn find_path(grid: &GridSnapshot, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
    if !grid.is_walkable(start.x, start.z) || !grid.is_walkable(goal.x, goal.z) {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let width = grid.width();
    let cell_count = width * grid.height();
    let start_idx = start.z * width + start.x;
    let goal_idx = goal.z * width + goal.x;

    let mut g_score = vec![f32::INFINITY; cell_count];
    let mut came_from = vec![usize::MAX; cell_count];
    let mut closed = vec![false; cell_count];

    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;

    g_score[start_idx] = 0.0;
    open.push(OpenNode {
        f: octile(start, goal),
        seq: sequence,
        idx: start_idx,
    });

    while let Some(node) = open.pop() {
        if closed[node.idx] {
            continue;
        }
        closed[node.idx] = true;

        if node.idx == goal_idx {
            return reconstruct(&came_from, width, start_idx, goal_idx);
        }

        let x = node.idx % width;
        let z = node.idx / width;

        for (dx, dz) in NEIGHBOR_OFFSETS {
            let nx = x as i64 + dx;
            let nz = z as i64 + dz;
            if nx < 0 || nz < 0 {
                continue;
            }
            let (nx, nz) = (nx as usize, nz as usize);
            if !grid.is_walkable(nx, nz) {
                continue;
            }
            // A diagonal step must not cut a blocked corner.
            if dx != 0 && dz != 0 {
                let ortho_a = grid.is_walkable((x as i64 + dx) as usize, z);
                let ortho_b = grid.is_walkable(x, (z as i64 + dz) as usize);
                if !ortho_a || !ortho_b {
                    continue;
                }
            }

            let neighbor_idx = nz * width + nx;
            if closed[neighbor_idx] {
                continue;
            }

            let step_cost = if dx != 0 && dz != 0 { SQRT_2 } else { 1.0 };
            let tentative = g_score[node.idx] + step_cost;
            if tentative < g_score[neighbor_idx] {
                g_score[neighbor_idx] = tentative;
                came_from[neighbor_idx] = node.idx;
                sequence += 1;
                open.push(OpenNode {
                    f: tentative + octile(GridCoord::new(nx, nz), goal),
                    seq: sequence,
                    idx: neighbor_idx,
                });
            }
        }
    }

    Vec::new()
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Octile distance: straight steps cost 1, diagonal steps √2.
fn octile(a: GridCoord, b: GridCoord) -> f32 {
    let dx = (a.x as f32 - b.x as f32).abs();
    let dz = (a.z as f32 - b.z as f32).abs();
    dx.max(dz) + (SQRT_2 - 1.0) * dx.min(dz)
}

fn reconstruct(came_from: &[usize], width: usize, start_idx: usize, goal_idx: usize) -> Vec<GridCoord> {
    let mut path = Vec::new();
    let mut current = goal_idx;
    while current != start_idx {
        path.push(GridCoord::new(current % width, current / width));
        current = came_from[current];
    }
    path.push(GridCoord::new(start_idx % width, start_idx / width));
    path.reverse();
    path
}

struct OpenNode {
    f: f32,
    seq: u64,
    idx: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    // BinaryHeap is a max-heap: invert so the lowest f pops first, and
    // among equal f the earliest-inserted node pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::grid::{GridData, NavigationGrid};

    /// Build a grid from rows of '.' (walkable) and '#' (blocked).
    fn grid_from_rows(rows: &[&str]) -> NavigationGrid {
        let height = rows.len();
        let width = rows[0].len();
        let mut data = GridData::new(width, height);
        for (z, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                data.set_walkable(x, z, c == '.');
            }
        }
        NavigationGrid::new(data)
    }

    #[test]
    fn test_straight_line_path() {
        let grid = grid_from_rows(&["....."]);
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(4, 0));
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], GridCoord::new(0, 0));
        assert_eq!(path[4], GridCoord::new(4, 0));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = grid_from_rows(&["..", ".."]);
        let path = find_path(&grid.snapshot(), GridCoord::new(1, 1), GridCoord::new(1, 1));
        assert_eq!(path, vec![GridCoord::new(1, 1)]);
    }

    #[test]
    fn test_unreachable_goal_is_empty_not_error() {
        let grid = grid_from_rows(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        // Goal walled in by a non-walkable ring.
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(2, 2));
        assert!(path.is_empty());
    }

    #[test]
    fn test_blocked_goal_is_empty() {
        let grid = grid_from_rows(&["..#"]);
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(2, 0));
        assert!(path.is_empty());
    }

    #[test]
    fn test_no_corner_cutting() {
        // The only diagonal shortcut would cut between two blocked cells.
        let grid = grid_from_rows(&[
            ".#.",
            "#..",
            "...",
        ]);
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(2, 2));
        assert!(path.is_empty(), "start is sealed off without corner cutting");
    }

    #[test]
    fn test_diagonal_requires_both_orthogonals() {
        let grid = grid_from_rows(&[
            "..",
            "#.",
        ]);
        // (0,0) -> (1,1): orthogonal (0,1) is blocked, so the diagonal is
        // rejected and the route goes through (1,0).
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(1, 1));
        assert_eq!(
            path,
            vec![GridCoord::new(0, 0), GridCoord::new(1, 0), GridCoord::new(1, 1)]
        );
    }

    #[test]
    fn test_detour_around_wall() {
        let grid = grid_from_rows(&[
            "...#...",
            "...#...",
            ".......",
        ]);
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(6, 0));
        assert!(!path.is_empty());
        assert!(path.iter().any(|c| c.z == 2), "route dips below the wall");
        for c in &path {
            assert!(grid.is_walkable(c.x, c.z));
        }
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let grid = grid_from_rows(&[
            ".......",
            "..##...",
            "...#...",
            ".......",
        ]);
        let snapshot = grid.snapshot();
        let a = find_path(&snapshot, GridCoord::new(0, 0), GridCoord::new(6, 3));
        for _ in 0..10 {
            let b = find_path(&snapshot, GridCoord::new(0, 0), GridCoord::new(6, 3));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_no_diagonal_step_adjacent_to_two_blocked() {
        let grid = grid_from_rows(&[
            "..#..",
            ".#...",
            ".....",
        ]);
        let path = find_path(&grid.snapshot(), GridCoord::new(0, 0), GridCoord::new(4, 0));
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dx = b.x as i64 - a.x as i64;
            let dz = b.z as i64 - a.z as i64;
            if dx != 0 && dz != 0 {
                let ortho_a = grid.is_walkable((a.x as i64 + dx) as usize, a.z);
                let ortho_b = grid.is_walkable(a.x, (a.z as i64 + dz) as usize);
                assert!(
                    ortho_a && ortho_b,
                    "diagonal step {:?} -> {:?} cuts a corner",
                    a,
                    b
                );
            }
        }
    }
}
