use std::time::Instant;

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use log::{debug, info, trace, warn};

use super::{step_cost, SearchAlgorithm, SearchResult};
use crate::cell::CellId;
use crate::tile_grid::Grid;

/// Insertion-ordered set; the order decides which of two equally good tiles is picked first.
type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Snapshot handed out after every search iteration that did not finish the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// The tile that was just closed and expanded.
    pub current: CellId,
    pub open: usize,
    pub closed: usize,
}

#[derive(Clone, Debug)]
pub enum SearchStep {
    Pending(Progress),
    Finished(SearchResult),
}

impl SearchStep {
    pub fn into_result(self) -> Option<SearchResult> {
        match self {
            SearchStep::Pending(_) => None,
            SearchStep::Finished(result) => Some(result),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// The goal cannot be entered, the next step reports failure without searching.
    Rejected,
    Running,
    Done,
}

/// A search that can be advanced one iteration at a time.
///
/// Each [step](Self::step) picks the open tile with the lowest f cost (the first one found on
/// ties), closes it and expands its neighbours. The search keeps the grid mutably borrowed
/// for its whole lifetime, so no second search can touch the grid's scratch costs meanwhile;
/// dropping it halfway is fine since every search resets the scratch when it starts.
///
/// Running [step](Self::step) until it yields [SearchStep::Finished] gives exactly the result
/// of [SearchAlgorithm::find_path]. The result is yielded once; afterwards `step` returns
/// [None].
#[derive(Debug)]
pub struct IncrementalSearch<'g> {
    grid: &'g mut Grid,
    algorithm: SearchAlgorithm,
    start: CellId,
    end: CellId,
    open: FxIndexSet<CellId>,
    closed: FxIndexSet<CellId>,
    current: Option<CellId>,
    started: Instant,
    visualize: bool,
    phase: Phase,
}

impl<'g> IncrementalSearch<'g> {
    pub(crate) fn new(
        grid: &'g mut Grid,
        algorithm: SearchAlgorithm,
        start: CellId,
        end: CellId,
        visualize: bool,
    ) -> IncrementalSearch<'g> {
        let started = Instant::now();
        let mut search = IncrementalSearch {
            grid,
            algorithm,
            start,
            end,
            open: FxIndexSet::default(),
            closed: FxIndexSet::default(),
            current: None,
            started,
            visualize,
            phase: Phase::Running,
        };
        if visualize {
            search.grid.clear_debug_marks();
        }
        if !search.grid.cell(end).enterable {
            warn!(
                "{:?} cannot be entered, not searching",
                search.grid.cell(end).point
            );
            search.phase = Phase::Rejected;
            return search;
        }
        search.grid.reset_search_scratch();
        search.open.insert(start);
        search.update_costs(start, start, 0.0);
        debug!(
            "{} search seeded at {:?}",
            algorithm.name(),
            search.grid.cell(start).point
        );
        search
    }

    pub fn algorithm(&self) -> &SearchAlgorithm {
        &self.algorithm
    }

    /// Read access to the grid, including the costs and debug marks of the search so far.
    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// Tiles waiting to be evaluated, in insertion order.
    pub fn open(&self) -> impl ExactSizeIterator<Item = CellId> + '_ {
        self.open.iter().copied()
    }

    /// Tiles already evaluated, in the order they were closed.
    pub fn closed(&self) -> impl ExactSizeIterator<Item = CellId> + '_ {
        self.closed.iter().copied()
    }

    /// The tile most recently closed.
    pub fn current(&self) -> Option<CellId> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Advances the search by one iteration.
    pub fn step(&mut self) -> Option<SearchStep> {
        match self.phase {
            Phase::Done => None,
            Phase::Rejected => {
                self.phase = Phase::Done;
                Some(SearchStep::Finished(SearchResult::rejected(
                    self.algorithm.kind,
                    self.grid.cell(self.start).point,
                    self.grid.cell(self.end).point,
                )))
            }
            Phase::Running => {
                let Some(current) = self.pick_best_from_open() else {
                    return Some(SearchStep::Finished(self.finish(None)));
                };
                self.open.shift_remove(&current);
                self.closed.insert(current);
                self.current = Some(current);
                if current == self.end {
                    let path = self.trace_path(current);
                    return Some(SearchStep::Finished(self.finish(Some(path))));
                }
                self.process_neighbours(current);
                if self.visualize {
                    self.grid.mark_search(&self.open, &self.closed);
                }
                trace!(
                    "Closed {:?}, {} open and {} closed",
                    self.grid.cell(current).point,
                    self.open.len(),
                    self.closed.len()
                );
                Some(SearchStep::Pending(Progress {
                    current,
                    open: self.open.len(),
                    closed: self.closed.len(),
                }))
            }
        }
    }

    /// Drives the search to the end. [None] if the result was already taken by [step](Self::step).
    pub fn finish_search(&mut self) -> Option<SearchResult> {
        self.find_map(SearchStep::into_result)
    }

    pub(crate) fn run(mut self) -> SearchResult {
        while let Some(step) = self.step() {
            if let SearchStep::Finished(result) = step {
                return result;
            }
        }
        self.finish(None)
    }

    /// Linear scan over the open set. Strict comparison keeps the earliest inserted tile on ties.
    fn pick_best_from_open(&self) -> Option<CellId> {
        self.open.iter().copied().reduce(|best, id| {
            if self.grid.f_cost(id) < self.grid.f_cost(best) {
                id
            } else {
                best
            }
        })
    }

    fn update_costs(&mut self, current: CellId, next: CellId, step: f32) {
        let goal = self.grid.cell(self.end).point;
        let (g, h) = self.algorithm.cost_update(
            self.grid.g_cost(current),
            step,
            self.grid.cell(next).point,
            goal,
        );
        self.grid.scratch.g[next.index()] = g;
        self.grid.scratch.h[next.index()] = h;
    }

    fn process_neighbours(&mut self, current: CellId) {
        let neighbours = self.grid.cell(current).neighbours.clone();
        for next in neighbours {
            if self.closed.contains(&next) || !self.grid.cell(next).enterable {
                continue;
            }
            let step = step_cost(self.grid.cell(current), self.grid.cell(next));
            let candidate = self.grid.g_cost(current) + step;
            let is_open = self.open.contains(&next);
            if !is_open || candidate < self.grid.g_cost(next) {
                self.grid.scratch.predecessor[next.index()] = Some(current);
                self.update_costs(current, next, step);
            }
            if !is_open {
                self.open.insert(next);
            }
        }
    }

    /// Walks the predecessor chain back from `end`. The start tile is closed before anything
    /// gets a predecessor, so the chain always stops there.
    fn trace_path(&self, end: CellId) -> Vec<CellId> {
        let mut path =
            std::iter::successors(Some(end), |&id| self.grid.predecessor(id)).collect::<Vec<_>>();
        path.reverse();
        path
    }

    fn finish(&mut self, path: Option<Vec<CellId>>) -> SearchResult {
        self.phase = Phase::Done;
        let grid = &*self.grid;
        let cost = path.as_ref().map_or(0.0, |p| super::result::cost_of(grid, p));
        let result = SearchResult {
            algorithm: self.algorithm.kind,
            path_len: path.as_ref().map_or(0, Vec::len),
            path: path.map(|p| p.into_iter().map(|id| grid.cell(id).point).collect()),
            start: grid.cell(self.start).point,
            end: grid.cell(self.end).point,
            cost,
            evaluated: self.closed.len(),
            elapsed: self.started.elapsed(),
        };
        info!("{}", result);
        result
    }
}

impl Iterator for IncrementalSearch<'_> {
    type Item = SearchStep;

    fn next(&mut self) -> Option<SearchStep> {
        self.step()
    }
}
