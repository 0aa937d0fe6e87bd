use tile_pathfinding::{FollowerState, Grid, PathFollower, SearchAlgorithm, Settings, TileSpec};

// Finds a path across a field with a costly patch in the middle (+), then walks a mover along it at
// 60 ticks per second, printing its position and whether it walks or runs.
//  _____
// |S    |
// | ++  |
// | ++  |
// |    E|
//  _____

fn main() {
    let settings = Settings {
        map_scale: 2.0,
        ..Settings::default()
    };
    let mut grid = Grid::build_with(&settings, 5, 4, |p| {
        Some(match (p.x, p.y) {
            (0, 0) => TileSpec::open(1).start(),
            (4, 3) => TileSpec::open(1).end(),
            (1..=2, 1..=2) => TileSpec::open(11),
            _ => TileSpec::open(1),
        })
    })
    .unwrap();
    println!("{}", grid);
    let result = SearchAlgorithm::dijkstra().find_level_path(&mut grid);
    println!("{}", result);

    let mut follower = PathFollower::new(settings.mover);
    follower.follow_path(result.path().to_vec());
    let mut position = grid.world_position(grid.cell(grid.start()).point());
    const DT: f32 = 1.0 / 60.0;
    let mut tick = 0;
    while follower.state() != FollowerState::AtDestination && tick < 6000 {
        let motion = follower.update(&grid, position, DT);
        position += motion.translation;
        if tick % 15 == 0 {
            println!("{:>5} {:?} {:?}", tick, position, motion.signal);
        }
        tick += 1;
    }
    println!(
        "Arrived at {:?} after {} ticks, {:.3} from the end tile",
        position,
        tick,
        position.distance(grid.world_position(result.end))
    );
}
