use clearance_pathfinding::overlay::{ENDPOINT_COLOR, PATH_COLOR};
use clearance_pathfinding::{
    Cell, Error, GridConfig, Mark, OccupancyGrid, Pathfinder, Point, SearchConfig, SearchOutcome,
};
use image::{Rgb, RgbImage};

fn open_image() -> RgbImage {
    RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]))
}

fn scenario_config() -> SearchConfig {
    SearchConfig::default()
        .with_step(20.0)
        .with_goal_threshold(10.0)
        .with_clearance(5)
}

fn grid_config() -> GridConfig {
    GridConfig::default().with_padding(20)
}

#[test]
fn open_grid_reaches_goal_and_marks_path() {
    let pathfinder =
        Pathfinder::from_image(&open_image(), &grid_config(), scenario_config()).unwrap();
    assert_eq!(
        (pathfinder.grid.width(), pathfinder.grid.height()),
        (240, 240)
    );
    let goal = Point::new(50.0, 50.0);
    let solution = pathfinder
        .find_path_from_origin(goal)
        .unwrap()
        .into_solution()
        .unwrap();
    assert!(solution.reached().distance(&goal) <= 10.0);
    assert_eq!(solution.path[0], Point::ORIGIN);

    let frame = pathfinder.grid.frame();
    let overlay = &solution.overlay;
    assert_eq!(
        overlay.mark_at(frame.to_pixel(Point::ORIGIN)),
        Some(Mark::Endpoint)
    );
    assert_eq!(overlay.mark_at(frame.to_pixel(goal)), Some(Mark::Endpoint));
    let inner = &solution.path[1..solution.path.len() - 1];
    assert!(!inner.is_empty());
    for point in inner {
        assert_eq!(overlay.mark_at(frame.to_pixel(*point)), Some(Mark::Path));
    }

    let image = overlay.render(&pathfinder.grid);
    let start = frame.to_pixel(Point::ORIGIN);
    assert_eq!(
        *image.get_pixel(start.col as u32, start.row as u32),
        ENDPOINT_COLOR
    );
    let middle = frame.to_pixel(inner[0]);
    assert_eq!(
        *image.get_pixel(middle.col as u32, middle.row as u32),
        PATH_COLOR
    );
    // Marks live in the overlay only.
    assert_eq!(pathfinder.grid.blocked_count(), 0);
}

#[test]
fn full_height_wall_yields_no_path() {
    let image = RgbImage::from_fn(200, 200, |x, _| {
        if (150..160).contains(&x) {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut pathfinder = Pathfinder::from_image(&image, &grid_config(), scenario_config()).unwrap();
    // Continue the wall through the free padding rows.
    let height = pathfinder.grid.height() as i64;
    pathfinder.grid.fill(0..height, 170..180, Cell::Blocked);

    let goal = Point::new(100.0, 100.0);
    let outcome = pathfinder.find_path_from_origin(goal).unwrap();
    match outcome {
        SearchOutcome::NoPath(stats) => {
            assert!(!stats.budget_exhausted);
            assert!(stats.expanded > 0);
        }
        SearchOutcome::Found(solution) => panic!("crossed the wall: {:?}", solution.path),
    }

    pathfinder.generate_components(Point::ORIGIN).unwrap();
    assert_eq!(pathfinder.reachable(Point::ORIGIN, goal), Some(false));
}

#[test]
fn enclosed_start_yields_no_path() {
    let mut grid = OccupancyGrid::new(100, 100, Cell::Free).unwrap().pad(10);
    let center = grid.frame().to_pixel(Point::new(0.0, 30.0));
    // A closed ring of blocked cells around (0, 30).
    let (r, c) = (center.row, center.col);
    grid.fill(r - 20..r - 18, c - 20..c + 20, Cell::Blocked);
    grid.fill(r + 18..r + 20, c - 20..c + 20, Cell::Blocked);
    grid.fill(r - 20..r + 20, c - 20..c - 18, Cell::Blocked);
    grid.fill(r - 20..r + 20, c + 18..c + 20, Cell::Blocked);
    let config = SearchConfig::default()
        .with_step(4.0)
        .with_goal_threshold(2.0)
        .with_clearance(2);
    let pathfinder = Pathfinder::new(grid, config);
    let outcome = pathfinder
        .find_path(Point::new(0.0, 30.0), Point::new(-40.0, 80.0))
        .unwrap();
    assert!(!outcome.is_found());
}

#[test]
fn expansion_budget_reports_no_path() {
    let config = scenario_config().with_step(2.0).with_max_expansions(10);
    let pathfinder = Pathfinder::from_image(&open_image(), &grid_config(), config).unwrap();
    let outcome = pathfinder
        .find_path_from_origin(Point::new(80.0, 150.0))
        .unwrap();
    assert!(!outcome.is_found());
    assert!(outcome.stats().budget_exhausted);
    assert_eq!(outcome.stats().expanded, 10);
}

#[test]
fn blocked_goal_is_rejected_before_search() {
    let pathfinder =
        Pathfinder::from_image(&open_image(), &grid_config(), scenario_config()).unwrap();
    // Closer to the padded border than the clearance allows.
    let result = pathfinder.find_path_from_origin(Point::new(117.0, 50.0));
    assert!(matches!(result, Err(Error::InvalidGoal { .. })));
}

#[test]
fn empty_image_is_malformed() {
    let image = RgbImage::new(0, 10);
    let result = Pathfinder::from_image(&image, &grid_config(), scenario_config());
    assert!(matches!(result, Err(Error::MalformedInput { .. })));
}

#[test]
fn repeated_queries_are_deterministic() {
    let pathfinder = Pathfinder::from_image(
        &open_image(),
        &grid_config(),
        scenario_config().with_step(5.0).with_goal_threshold(3.0),
    )
    .unwrap();
    let goal = Point::new(-37.0, 121.0);
    let first = pathfinder.find_path_from_origin(goal).unwrap();
    let second = pathfinder.find_path_from_origin(goal).unwrap();
    assert_eq!(
        first.solution().unwrap().path,
        second.solution().unwrap().path
    );
    assert_eq!(first.stats().expanded, second.stats().expanded);
}
