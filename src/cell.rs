use grid_util::point::Point;
use smallvec::SmallVec;

use crate::settings::{TileCosts, TileKind};

/// Index of a [Cell] in the arena owned by a [Grid](crate::Grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32);

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a level loader produces for one coordinate that holds a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSpec {
    /// [None] means the tile can never be entered.
    pub cost: Option<u32>,
    /// Set by an obstacle that cannot be walked through.
    pub blocked: bool,
    pub start: bool,
    pub end: bool,
}

impl TileSpec {
    pub fn new(cost: Option<u32>) -> TileSpec {
        TileSpec {
            cost,
            blocked: false,
            start: false,
            end: false,
        }
    }

    /// An enterable tile with the given cost.
    pub fn open(cost: u32) -> TileSpec {
        TileSpec::new(Some(cost))
    }

    /// A tile that exists but can never be entered.
    pub fn wall() -> TileSpec {
        TileSpec::new(None)
    }

    /// Resolves a tile kind through the cost table. Kinds without a tile yield [None].
    pub fn from_kind(kind: TileKind, costs: &TileCosts) -> Option<TileSpec> {
        kind.has_tile().then(|| TileSpec::new(costs.cost(kind)))
    }

    pub fn start(mut self) -> TileSpec {
        self.start = true;
        self
    }

    pub fn end(mut self) -> TileSpec {
        self.end = true;
        self
    }

    /// Places an obstacle without pass-through. Ignored on the start and end tiles, whichever
    /// order the builders are called in.
    pub fn blocked(mut self) -> TileSpec {
        self.blocked = true;
        self
    }

    pub fn enterable(&self) -> bool {
        self.cost.is_some() && (!self.blocked || self.start || self.end)
    }
}

/// A tile on the grid. Coordinates, cost and enterability are fixed once the grid is built.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) point: Point,
    pub(crate) cost: Option<u32>,
    pub(crate) enterable: bool,
    pub(crate) neighbours: SmallVec<[CellId; 8]>,
}

impl Cell {
    pub(crate) fn new(point: Point, spec: &TileSpec) -> Cell {
        Cell {
            point,
            cost: spec.cost,
            enterable: spec.enterable(),
            neighbours: SmallVec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Traversal cost, [None] for the "not enterable" sentinel.
    pub fn cost(&self) -> Option<u32> {
        self.cost
    }

    pub fn enterable(&self) -> bool {
        self.enterable
    }

    pub fn neighbours(&self) -> &[CellId] {
        &self.neighbours
    }

    /// Whether moving from `self` to `other` changes both coordinates.
    pub fn is_diagonal_to(&self, other: &Cell) -> bool {
        self.point.x != other.point.x && self.point.y != other.point.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SearchAlgorithm;
    use crate::tile_grid::Grid;

    #[test]
    fn obstacles_never_block_start_or_end() {
        assert!(TileSpec::open(1).start().blocked().enterable());
        assert!(TileSpec::open(1).end().blocked().enterable());
        assert!(!TileSpec::open(1).blocked().enterable());
        assert!(!TileSpec::wall().enterable());
    }

    #[test]
    fn obstacle_order_does_not_matter() {
        assert!(TileSpec::open(1).blocked().start().enterable());
        assert!(TileSpec::open(1).blocked().end().enterable());
        assert!(!TileSpec::wall().blocked().start().enterable());
    }

    #[test]
    fn blocked_start_stays_reachable() {
        let mut grid = Grid::build(3, 1, |p| {
            Some(match p.x {
                0 => TileSpec::open(1).blocked().start(),
                2 => TileSpec::open(1).end().blocked(),
                _ => TileSpec::open(1),
            })
        })
        .unwrap();
        assert!(grid.cell(grid.start()).enterable());
        assert!(grid.cell(grid.end()).enterable());
        assert!(grid.reachable(grid.start(), grid.end()));
        assert!(SearchAlgorithm::dijkstra().find_level_path(&mut grid).found());
    }

    #[test]
    fn water_produces_no_tile() {
        let costs = TileCosts::default();
        assert!(TileSpec::from_kind(TileKind::Water, &costs).is_none());
        assert_eq!(
            TileSpec::from_kind(TileKind::Grass, &costs),
            Some(TileSpec::open(2))
        );
    }
}
