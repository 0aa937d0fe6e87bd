use tile_pathfinding::{AlgorithmKind, Grid, SearchAlgorithm, TileSpec};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Tiles have an 8-neighborhood and all cost 1, so every variant finds the same path but
// evaluates a different number of tiles.

fn main() {
    let mut grid = Grid::build(3, 3, |p| {
        Some(match (p.x, p.y) {
            (0, 0) => TileSpec::open(1).start(),
            (2, 2) => TileSpec::open(1).end(),
            (1, 1) => TileSpec::wall(),
            _ => TileSpec::open(1),
        })
    })
    .unwrap();
    println!("{}", grid);
    for kind in AlgorithmKind::ALL {
        let result = SearchAlgorithm::new(kind).find_level_path(&mut grid);
        println!("{}", result);
        println!("Path:");
        for p in result.path() {
            println!("{:?}", p);
        }
    }
}
