/// Fuzzes the search by checking for many random weighted grids that a path is found exactly when
/// the goal lies in the same connected component as the start, that stepping a search gives the
/// same outcome as running it to completion, and that Dijkstra is never beaten on cost.
use rand::prelude::*;
use tile_pathfinding::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng) -> Grid {
    let end = Point::new(w as i32 - 1, h as i32 - 1);
    Grid::build(w, h, |p| {
        if p == Point::new(0, 0) {
            return Some(TileSpec::open(rng.gen_range(1..=5)).start());
        }
        if p == end {
            return Some(TileSpec::open(rng.gen_range(1..=5)).end());
        }
        if rng.gen_bool(0.05) {
            None
        } else if rng.gen_bool(0.3) {
            Some(TileSpec::wall())
        } else {
            Some(TileSpec::open(rng.gen_range(1..=5)))
        }
    })
    .unwrap()
}

fn assert_valid_path(grid: &Grid, result: &SearchResult) {
    let path = result.path();
    assert_eq!(path.first(), Some(&result.start));
    assert_eq!(path.last(), Some(&result.end));
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!((a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1 && a != b);
        assert!(grid.cell(grid.id_at_point(b).unwrap()).enterable());
    }
    let cost = path_cost(grid, path).unwrap();
    assert!((cost - result.cost).abs() < 1e-3);
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng);
        let (start, end) = (grid.start(), grid.end());
        let reachable = grid.reachable(start, end);
        for kind in AlgorithmKind::ALL {
            let algorithm = SearchAlgorithm::new(kind);
            let result = algorithm.find_path(&mut grid, start, end);
            // Show the grid if the outcome disagrees with the components
            if result.found() != reachable {
                println!("{grid}");
            }
            assert_eq!(result.found(), reachable);
            if result.found() {
                assert_valid_path(&grid, &result);
            }
            let stepped = algorithm
                .find_path_over_time(&mut grid, start, end)
                .finish_search()
                .unwrap();
            assert!(result.same_outcome(&stepped));
        }
    }
}

#[test]
fn fuzz_distance() {
    const N: usize = 8;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng);
        if !grid.reachable(grid.start(), grid.end()) {
            continue;
        }
        let dijkstra = SearchAlgorithm::dijkstra().find_level_path(&mut grid);
        for algorithm in [SearchAlgorithm::breadth_first(), SearchAlgorithm::astar()] {
            let other = algorithm.find_level_path(&mut grid);
            if other.cost + 1e-3 < dijkstra.cost {
                println!("{dijkstra}\n{other}");
                grid.mark_path(other.path());
                println!("{grid}");
            }
            assert!(dijkstra.cost <= other.cost + 1e-3);
        }
    }
}
