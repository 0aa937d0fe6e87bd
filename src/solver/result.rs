use core::fmt;
use std::time::Duration;

use grid_util::point::Point;
use itertools::Itertools;

use super::{step_cost, AlgorithmKind};
use crate::cell::CellId;
use crate::tile_grid::Grid;

/// Outcome of one search. A failed search has no path and zero cost and length; check
/// [found](Self::found) before using the path-derived fields.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub algorithm: AlgorithmKind,
    /// Tiles from start to end inclusive.
    pub path: Option<Vec<Point>>,
    pub start: Point,
    pub end: Point,
    /// Sum of the step costs along the path.
    pub cost: f32,
    /// Number of tiles on the path.
    pub path_len: usize,
    /// Number of tiles that were closed.
    pub evaluated: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    /// The result for a goal that cannot be entered: nothing was searched.
    pub(crate) fn rejected(algorithm: AlgorithmKind, start: Point, end: Point) -> SearchResult {
        SearchResult {
            algorithm,
            path: None,
            start,
            end,
            cost: 0.0,
            path_len: 0,
            evaluated: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    pub fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    pub fn path(&self) -> &[Point] {
        self.path.as_deref().unwrap_or_default()
    }

    /// Whether two results agree on everything but timing.
    pub fn same_outcome(&self, other: &SearchResult) -> bool {
        SearchResult {
            elapsed: other.elapsed,
            ..self.clone()
        } == *other
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.found() {
            write!(
                f,
                "{}: path from {:?} to {:?} with {} tiles, cost {:.1}, {} tiles evaluated in {:.3} ms",
                self.name(),
                self.start,
                self.end,
                self.path_len,
                self.cost,
                self.evaluated,
                self.elapsed.as_secs_f64() * 1000.0
            )
        } else {
            write!(
                f,
                "{}: no path from {:?} to {:?}, {} tiles evaluated in {:.3} ms",
                self.name(),
                self.start,
                self.end,
                self.evaluated,
                self.elapsed.as_secs_f64() * 1000.0
            )
        }
    }
}

pub(crate) fn cost_of(grid: &Grid, path: &[CellId]) -> f32 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| step_cost(grid.cell(*a), grid.cell(*b)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reports_failure() {
        let result = SearchResult::rejected(
            AlgorithmKind::Dijkstra,
            Point::new(0, 0),
            Point::new(3, 1),
        );
        assert!(!result.found());
        assert!(result.path().is_empty());
        assert!(result.to_string().starts_with("Dijkstra: no path from"));
    }

    #[test]
    fn timing_is_ignored_when_comparing_outcomes() {
        let a = SearchResult::rejected(AlgorithmKind::Astar, Point::new(0, 0), Point::new(1, 1));
        let b = SearchResult {
            elapsed: Duration::from_millis(4),
            ..a.clone()
        };
        assert!(a.same_outcome(&b));
        assert!(!a.same_outcome(&SearchResult {
            evaluated: 2,
            ..b
        }));
    }
}
