use core::fmt;

use glam::Vec3;
use grid_util::point::Point;
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::cell::{Cell, CellId, TileSpec};
use crate::settings::Settings;

/// Relative offsets of the 8 neighbours, in the order they are stored on each cell.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Reasons a level cannot be turned into a [Grid].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("level has no tiles to build a grid from")]
    EmptyGrid,
    #[error("level has no start tile")]
    MissingStart,
    #[error("level has no end tile")]
    MissingEnd,
    #[error("level has two start tiles: {first:?} and {second:?}")]
    DuplicateStart { first: Point, second: Point },
    #[error("level has two end tiles: {first:?} and {second:?}")]
    DuplicateEnd { first: Point, second: Point },
}

/// Visual state of a cell, written by searches that visualise their progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebugMark {
    #[default]
    None,
    Open,
    Closed,
    Path,
}

/// Per-search bookkeeping, stored parallel to the cell arena.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchScratch {
    pub(crate) g: Vec<f32>,
    pub(crate) h: Vec<f32>,
    pub(crate) predecessor: Vec<Option<CellId>>,
}

impl SearchScratch {
    fn new(len: usize) -> SearchScratch {
        SearchScratch {
            g: vec![0.0; len],
            h: vec![0.0; len],
            predecessor: vec![None; len],
        }
    }

    fn reset(&mut self) {
        self.g.fill(0.0);
        self.h.fill(0.0);
        self.predecessor.fill(None);
    }
}

/// [Grid] owns every tile of a level in an arena addressed by [CellId], together with a
/// coordinate lookup table (an empty slot means "no tile"), the 8-connected neighbour lists
/// and the scratch costs used by searches. Connected components of enterable cells are kept
/// in a [UnionFind] for cheap reachability queries.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    map_scale: f32,
    cells: Vec<Cell>,
    slots: Vec<Option<CellId>>,
    start: CellId,
    end: CellId,
    pub(crate) scratch: SearchScratch,
    marks: Vec<DebugMark>,
    components: UnionFind<usize>,
}

impl Grid {
    /// Builds a grid with [Settings::default].
    pub fn build<F>(width: usize, height: usize, factory: F) -> Result<Grid, GridError>
    where
        F: FnMut(Point) -> Option<TileSpec>,
    {
        Grid::build_with(&Settings::default(), width, height, factory)
    }

    /// Asks `factory` for the tile at every coordinate, validates that exactly one start and one
    /// end tile exist and wires up the neighbours.
    pub fn build_with<F>(
        settings: &Settings,
        width: usize,
        height: usize,
        mut factory: F,
    ) -> Result<Grid, GridError>
    where
        F: FnMut(Point) -> Option<TileSpec>,
    {
        if width == 0 || height == 0 {
            warn!("Not a valid level: {}x{} grid", width, height);
            return Err(GridError::EmptyGrid);
        }
        let mut cells: Vec<Cell> = Vec::new();
        let mut slots = vec![None; width * height];
        let mut start: Option<CellId> = None;
        let mut end: Option<CellId> = None;
        for y in 0..height {
            for x in 0..width {
                let point = Point::new(x as i32, y as i32);
                let Some(spec) = factory(point) else {
                    continue;
                };
                let id = CellId(cells.len() as u32);
                if spec.start {
                    if let Some(first) = start {
                        let err = GridError::DuplicateStart {
                            first: cells[first.index()].point,
                            second: point,
                        };
                        warn!("Not a valid level: {}", err);
                        return Err(err);
                    }
                    start = Some(id);
                }
                if spec.end {
                    if let Some(first) = end {
                        let err = GridError::DuplicateEnd {
                            first: cells[first.index()].point,
                            second: point,
                        };
                        warn!("Not a valid level: {}", err);
                        return Err(err);
                    }
                    end = Some(id);
                }
                cells.push(Cell::new(point, &spec));
                slots[y * width + x] = Some(id);
            }
        }
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => {
                warn!("Not a valid level: {}", GridError::MissingStart);
                return Err(GridError::MissingStart);
            }
            (_, None) => {
                warn!("Not a valid level: {}", GridError::MissingEnd);
                return Err(GridError::MissingEnd);
            }
        };
        let n = cells.len();
        let mut grid = Grid {
            width,
            height,
            map_scale: settings.map_scale,
            cells,
            slots,
            start,
            end,
            scratch: SearchScratch::new(n),
            marks: vec![DebugMark::None; n],
            components: UnionFind::new(n),
        };
        grid.connect_neighbours();
        grid.generate_components();
        info!(
            "Built {}x{} grid with {} tiles, start {:?} and end {:?}",
            width,
            height,
            n,
            grid.cell(start).point,
            grid.cell(end).point
        );
        Ok(grid)
    }

    /// Links every tile to the tiles at the 8 surrounding coordinates. Existing lists are
    /// rebuilt, so calling this again never duplicates neighbours.
    pub fn connect_neighbours(&mut self) {
        for ix in 0..self.cells.len() {
            let point = self.cells[ix].point;
            let neighbours = NEIGHBOUR_OFFSETS
                .iter()
                .filter_map(|&(dx, dy)| self.id_at(point.x + dx, point.y + dy))
                .collect();
            self.cells[ix].neighbours = neighbours;
        }
    }

    /// Clears costs and predecessors left behind by a previous search.
    pub fn reset_search_scratch(&mut self) {
        self.scratch.reset();
    }

    /// Removes all open, closed and path marks.
    pub fn clear_debug_marks(&mut self) {
        self.marks.fill(DebugMark::None);
    }

    /// Replaces all marks with the given open and closed sets.
    pub(crate) fn mark_search<'a, O, C>(&mut self, open: O, closed: C)
    where
        O: IntoIterator<Item = &'a CellId>,
        C: IntoIterator<Item = &'a CellId>,
    {
        self.clear_debug_marks();
        for id in open {
            self.marks[id.index()] = DebugMark::Open;
        }
        for id in closed {
            self.marks[id.index()] = DebugMark::Closed;
        }
    }

    /// Highlights a found route. Points without a tile are ignored.
    pub fn mark_path(&mut self, path: &[Point]) {
        for p in path {
            if let Some(id) = self.id_at(p.x, p.y) {
                self.marks[id.index()] = DebugMark::Path;
            }
        }
    }

    pub fn mark(&self, id: CellId) -> DebugMark {
        self.marks[id.index()]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn map_scale(&self) -> f32 {
        self.map_scale
    }

    /// Number of tiles on the grid.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn end(&self) -> CellId {
        self.end
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(ix, cell)| (CellId(ix as u32), cell))
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// The tile id at the coordinates, [None] if out of bounds or if there is no tile.
    pub fn id_at(&self, x: i32, y: i32) -> Option<CellId> {
        if self.in_bounds(x, y) {
            self.slots[y as usize * self.width + x as usize]
        } else {
            None
        }
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.id_at(x, y).map(|id| self.cell(id))
    }

    pub fn id_at_point(&self, point: Point) -> Option<CellId> {
        self.id_at(point.x, point.y)
    }

    /// Centre of the tile at `point` in world space. The grid lies in the y = 0 plane.
    pub fn world_position(&self, point: Point) -> Vec3 {
        Vec3::new(
            point.x as f32 * self.map_scale,
            0.0,
            point.y as f32 * self.map_scale,
        )
    }

    /// The tile closest to a world position, clamped onto the grid. Height is ignored.
    pub fn cell_near(&self, position: Vec3) -> Option<CellId> {
        let scaled = position / self.map_scale;
        let x = scaled.x.round().clamp(0.0, (self.width - 1) as f32) as i32;
        let y = scaled.z.round().clamp(0.0, (self.height - 1) as f32) as i32;
        self.id_at(x, y)
    }

    pub fn g_cost(&self, id: CellId) -> f32 {
        self.scratch.g[id.index()]
    }

    pub fn h_cost(&self, id: CellId) -> f32 {
        self.scratch.h[id.index()]
    }

    pub fn f_cost(&self, id: CellId) -> f32 {
        self.g_cost(id) + self.h_cost(id)
    }

    pub fn predecessor(&self, id: CellId) -> Option<CellId> {
        self.scratch.predecessor[id.index()]
    }

    /// Generates a new [UnionFind] structure and joins every enterable tile with its enterable
    /// neighbours.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        let mut components = UnionFind::new(self.cells.len());
        for (ix, cell) in self.cells.iter().enumerate() {
            if !cell.enterable {
                continue;
            }
            for n in &cell.neighbours {
                if self.cells[n.index()].enterable {
                    components.union(ix, n.index());
                }
            }
        }
        self.components = components;
    }

    /// Checks if both tiles are enterable and on the same component.
    pub fn reachable(&self, from: CellId, to: CellId) -> bool {
        from == to
            || (self.cell(from).enterable
                && self.cell(to).enterable
                && self.components.equiv(from.index(), to.index()))
    }

    /// Collects up to `count` distinct enterable tiles around `origin`, closest rings first.
    /// When the last ring has more tiles than needed, a random selection of it is taken.
    pub fn free_cells_around<R: Rng + ?Sized>(
        &self,
        origin: CellId,
        count: usize,
        rng: &mut R,
    ) -> Vec<CellId> {
        let mut seen = vec![false; self.cells.len()];
        seen[origin.index()] = true;
        let mut found = Vec::with_capacity(count);
        let mut ring = vec![origin];
        while found.len() < count && !ring.is_empty() {
            let mut next_ring = Vec::new();
            for id in &ring {
                for &n in &self.cell(*id).neighbours {
                    if !seen[n.index()] && self.cell(n).enterable {
                        seen[n.index()] = true;
                        next_ring.push(n);
                    }
                }
            }
            let wanted = count - found.len();
            if next_ring.len() <= wanted {
                found.extend_from_slice(&next_ring);
            } else {
                found.extend(next_ring.choose_multiple(rng, wanted).copied());
            }
            ring = next_ring;
        }
        found
    }

    fn glyph(&self, id: CellId) -> char {
        if id == self.start {
            return 'S';
        }
        if id == self.end {
            return 'E';
        }
        match self.marks[id.index()] {
            DebugMark::Path => '*',
            DebugMark::Open => 'o',
            DebugMark::Closed => 'x',
            DebugMark::None => {
                let cell = self.cell(id);
                match cell.cost {
                    _ if !cell.enterable => '#',
                    Some(c) if c < 10 => char::from_digit(c, 10).unwrap_or('+'),
                    _ => '+',
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| self.id_at(x, y).map_or('~', |id| self.glyph(id)))
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
