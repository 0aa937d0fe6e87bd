//! # tile_pathfinding
//!
//! Pathfinding on weighted, 8-connected tile maps, built for games that want to *show* the
//! search. A [Grid] is built once per level from a tile factory; [SearchAlgorithm] runs
//! breadth-first search, Dijkstra or A* over it either to completion
//! ([find_path](SearchAlgorithm::find_path)) or one iteration at a time
//! ([find_path_over_time](SearchAlgorithm::find_path_over_time)) so the open and closed sets can
//! be drawn in between. Both forms give the same [SearchResult]. A [PathFollower] then walks a
//! mover along the found path.
//!
//! ```
//! use tile_pathfinding::{Grid, SearchAlgorithm, TileSpec};
//!
//! //  ___
//! // |S  |
//! // | # |
//! // |  E|
//! //  ___
//! let mut grid = Grid::build(3, 3, |p| {
//!     Some(match (p.x, p.y) {
//!         (0, 0) => TileSpec::open(1).start(),
//!         (2, 2) => TileSpec::open(1).end(),
//!         (1, 1) => TileSpec::wall(),
//!         _ => TileSpec::open(1),
//!     })
//! })
//! .unwrap();
//! let result = SearchAlgorithm::astar().find_level_path(&mut grid);
//! assert_eq!(result.path_len, 4);
//! ```
pub mod cell;
pub mod follower;
pub mod settings;
pub mod solver;
pub mod tile_grid;

pub use cell::{Cell, CellId, TileSpec};
pub use follower::{FollowerState, Motion, MotionSignal, PathFollower};
pub use grid_util::point::Point;
pub use settings::{MoverSettings, Settings, TileCosts, TileKind};
pub use solver::{
    octile_distance, step_cost, AlgorithmKind, IncrementalSearch, Progress, SearchAlgorithm,
    SearchResult, SearchStep,
};
pub use tile_grid::{DebugMark, Grid, GridError};

/// Cost multiplier for a diagonal step, an approximation of the square root of two.
pub const DIAGONAL_FACTOR: f32 = 1.4;
/// Scale of the octile estimate, keeping it in the range of integer tile costs.
pub const HEURISTIC_SCALE: f32 = 10.0;

/// Sums [step_cost] over consecutive points. [None] if a point has no tile.
pub fn path_cost(grid: &Grid, path: &[Point]) -> Option<f32> {
    let ids = path
        .iter()
        .map(|p| grid.id_at_point(*p))
        .collect::<Option<Vec<_>>>()?;
    Some(solver::result::cost_of(grid, &ids))
}
