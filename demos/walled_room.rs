use clearance_pathfinding::{Cell, OccupancyGrid, Pathfinder, Point, SearchConfig, SearchOutcome};

// In this example a path is found through the doorway of a wall
// ##########
// #   G    #
// ####  ####
// #        #
// #   S    #
// ##########
// S marks the start at the Cartesian origin
// G marks the goal
fn main() {
    env_logger::init();
    let mut grid = OccupancyGrid::new(60, 60, Cell::Free).unwrap().pad(4);
    let frame = grid.frame();
    let wall = frame.to_pixel(Point::new(0.0, 30.0));
    grid.fill(wall.row..wall.row + 3, 0..wall.col - 6, Cell::Blocked);
    grid.fill(wall.row..wall.row + 3, wall.col + 6..68, Cell::Blocked);
    let config = SearchConfig::default()
        .with_step(3.0)
        .with_goal_threshold(2.0)
        .with_clearance(2);
    let mut pathfinder = Pathfinder::new(grid, config);
    pathfinder.generate_components(Point::ORIGIN).unwrap();
    println!("{pathfinder}");

    let goal = Point::new(-15.0, 50.0);
    match pathfinder.find_path_from_origin(goal).unwrap() {
        SearchOutcome::Found(solution) => {
            println!("A path has been found:");
            for p in &solution.path {
                println!("{p}");
            }
            println!("cost {:.2}, {:?}", solution.cost(), solution.stats);
        }
        SearchOutcome::NoPath(stats) => println!("No path found, {stats:?}"),
    }

    // Close the doorway and try again.
    pathfinder.fill(wall.row..wall.row + 3, 0..68, Cell::Blocked);
    pathfinder.update().unwrap();
    println!(
        "After closing the doorway: reachable = {:?}",
        pathfinder.reachable(Point::ORIGIN, goal)
    );
}
