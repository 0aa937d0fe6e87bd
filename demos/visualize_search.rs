use tile_pathfinding::{Grid, SearchAlgorithm, SearchStep, Settings, TileKind, TileSpec};

// A small island: water (~) has no tile, mountains are expensive and a rock blocks the beach.
// The search is stepped one iteration at a time and the grid is printed in between, with
// - o marking open tiles
// - x marking closed tiles
// - * marking the final path
const LEVEL: [&str; 7] = [
    "~~~~~~~~~~",
    "~S.,,MMM.~",
    "~..,MMM..~",
    "~~.,,M...~",
    "~:::r,,..~",
    "~::::,,.E~",
    "~~~~~~~~~~",
];

fn kind(c: u8) -> TileKind {
    match c {
        b'~' => TileKind::Water,
        b',' => TileKind::Grass,
        b':' | b'r' => TileKind::Sand,
        b'M' => TileKind::Mountain,
        _ => TileKind::Dirt,
    }
}

fn main() {
    let settings = Settings::default();
    let mut grid = Grid::build_with(&settings, LEVEL[0].len(), LEVEL.len(), |p| {
        let c = LEVEL[p.y as usize].as_bytes()[p.x as usize];
        let spec = TileSpec::from_kind(kind(c), &settings.tile_costs)?;
        Some(match c {
            b'S' => spec.start(),
            b'E' => spec.end(),
            b'r' => spec.blocked(),
            _ => spec,
        })
    })
    .unwrap();
    println!("{}", grid);

    let (start, end) = (grid.start(), grid.end());
    let mut search = SearchAlgorithm::astar().find_path_over_time(&mut grid, start, end);
    let result = loop {
        match search.step() {
            Some(SearchStep::Pending(progress)) => {
                println!(
                    "Closed {:?}, {} open, {} closed",
                    search.grid().cell(progress.current).point(),
                    progress.open,
                    progress.closed
                );
                println!("{}", search.grid());
            }
            Some(SearchStep::Finished(result)) => break result,
            None => unreachable!("a search yields its result before stopping"),
        }
    };
    println!("{}", result);
    grid.clear_debug_marks();
    grid.mark_path(result.path());
    println!("{}", grid);
}
