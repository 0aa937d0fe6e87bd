//! Best-first search over a [Grid]. Breadth-first, Dijkstra and A* share one open/closed list
//! driver ([IncrementalSearch]); they only differ in how a newly reached tile's costs are set,
//! which is captured by the [SearchAlgorithm] value.
use grid_util::point::Point;

use crate::cell::{Cell, CellId};
use crate::tile_grid::Grid;
use crate::{DIAGONAL_FACTOR, HEURISTIC_SCALE};

pub mod result;
pub mod search;

pub use result::SearchResult;
pub use search::{IncrementalSearch, Progress, SearchStep};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The search variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlgorithmKind {
    /// Uninformed. Costs stay zero so tiles are evaluated in insertion order.
    BreadthFirst,
    /// Uniform cost, no estimate.
    Dijkstra,
    /// Uniform cost plus the octile estimate to the goal.
    Astar,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 3] = [
        AlgorithmKind::BreadthFirst,
        AlgorithmKind::Dijkstra,
        AlgorithmKind::Astar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::BreadthFirst => "BFS",
            AlgorithmKind::Dijkstra => "Dijkstra",
            AlgorithmKind::Astar => "A*",
        }
    }
}

impl core::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cost of stepping from `current` onto `next`: infinite if `next` cannot be entered, otherwise
/// its traversal cost, times [DIAGONAL_FACTOR] when both coordinates change.
pub fn step_cost(current: &Cell, next: &Cell) -> f32 {
    match next.cost {
        Some(cost) if next.enterable => {
            if current.is_diagonal_to(next) {
                cost as f32 * DIAGONAL_FACTOR
            } else {
                cost as f32
            }
        }
        _ => f32::INFINITY,
    }
}

/// Octile distance between two tiles: straight steps for the difference of the deltas plus
/// diagonal steps for the smaller delta, scaled by [HEURISTIC_SCALE].
pub fn octile_distance(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (long, short) = if dx >= dy { (dx, dy) } else { (dy, dx) };
    ((long - short) as f32 + short as f32 * DIAGONAL_FACTOR) * HEURISTIC_SCALE
}

/// A search variant plus its tuning. Which variant runs is plain data, there is one driver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchAlgorithm {
    pub kind: AlgorithmKind,
    /// Multiplies the A* estimate. Values above 1 give weighted A*, which evaluates fewer tiles
    /// at the price of optimality. Ignored by the other variants.
    pub heuristic_factor: f32,
}

impl Default for SearchAlgorithm {
    fn default() -> SearchAlgorithm {
        SearchAlgorithm::new(AlgorithmKind::Astar)
    }
}

impl SearchAlgorithm {
    pub fn new(kind: AlgorithmKind) -> SearchAlgorithm {
        SearchAlgorithm {
            kind,
            heuristic_factor: 1.0,
        }
    }

    pub fn breadth_first() -> SearchAlgorithm {
        SearchAlgorithm::new(AlgorithmKind::BreadthFirst)
    }

    pub fn dijkstra() -> SearchAlgorithm {
        SearchAlgorithm::new(AlgorithmKind::Dijkstra)
    }

    pub fn astar() -> SearchAlgorithm {
        SearchAlgorithm::new(AlgorithmKind::Astar)
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The `(g, h)` pair a tile at `next` receives when reached with `step` from a tile whose
    /// accumulated cost is `current_g`.
    pub fn cost_update(&self, current_g: f32, step: f32, next: Point, goal: Point) -> (f32, f32) {
        match self.kind {
            AlgorithmKind::BreadthFirst => (0.0, 0.0),
            AlgorithmKind::Dijkstra => (current_g + step, 0.0),
            AlgorithmKind::Astar => (
                current_g + step,
                octile_distance(next, goal) * self.heuristic_factor,
            ),
        }
    }

    /// Runs a search from `start` to `end` to completion.
    pub fn find_path(&self, grid: &mut Grid, start: CellId, end: CellId) -> SearchResult {
        IncrementalSearch::new(grid, *self, start, end, false).run()
    }

    /// Runs a search to completion and hands the result to `on_finish`.
    pub fn find_path_with<F>(&self, grid: &mut Grid, start: CellId, end: CellId, on_finish: F)
    where
        F: FnOnce(SearchResult),
    {
        on_finish(self.find_path(grid, start, end))
    }

    /// Searches between the grid's own start and end tiles.
    pub fn find_level_path(&self, grid: &mut Grid) -> SearchResult {
        let (start, end) = (grid.start(), grid.end());
        self.find_path(grid, start, end)
    }

    /// Starts a search that advances one iteration per [IncrementalSearch::step] and keeps the
    /// grid's debug marks in sync with its open and closed sets.
    pub fn find_path_over_time<'g>(
        &self,
        grid: &'g mut Grid,
        start: CellId,
        end: CellId,
    ) -> IncrementalSearch<'g> {
        IncrementalSearch::new(grid, *self, start, end, true)
    }
}
