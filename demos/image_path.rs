use clearance_pathfinding::{
    GridConfig, OccupancyGrid, Pathfinder, Point, SearchConfig, SearchOutcome,
};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use log::info;
use std::env;
use std::path::{Path, PathBuf};

const SIDE: u32 = 400;

// Plans a path over a map image and writes the annotated result.
//
// usage: image_path [input.png] [output.png] [goal_x goal_y]
//
// The thresholded grid is cached next to the output and reused on later runs.
// Without an input image a synthetic map with two walls is used.
fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let input = args.first().map(PathBuf::from);
    let output = PathBuf::from(args.get(1).map_or("path.png", String::as_str));
    let goal = match (args.get(2), args.get(3)) {
        (Some(x), Some(y)) => Point::new(x.parse().unwrap(), y.parse().unwrap()),
        _ => Point::new(0.0, 300.0),
    };

    let grid_config = GridConfig::default();
    let grid = load_grid(input.as_deref(), &output.with_extension("grid.png"), &grid_config);
    let pathfinder = Pathfinder::new(grid, SearchConfig::default());

    match pathfinder.find_path_from_origin(goal) {
        Ok(SearchOutcome::Found(solution)) => {
            println!(
                "Found a path of {} nodes, cost {:.1}, {} expansions",
                solution.path.len(),
                solution.cost(),
                solution.stats.expanded
            );
            solution
                .overlay
                .render(&pathfinder.grid)
                .save(&output)
                .unwrap();
            println!("Wrote {}", output.display());
        }
        Ok(SearchOutcome::NoPath(stats)) => println!("No path found after {} expansions", stats.expanded),
        Err(err) => println!("Query rejected: {err}"),
    }
}

fn load_grid(input: Option<&Path>, cache: &Path, config: &GridConfig) -> OccupancyGrid {
    if let Ok(snapshot) = image::open(cache) {
        info!("Loading cached grid from {}", cache.display());
        return OccupancyGrid::build(&snapshot.to_luma8(), config).unwrap();
    }
    let source = match input {
        Some(path) => image::open(path).unwrap().to_rgb8(),
        None => image::DynamicImage::ImageLuma8(synthetic_map()).to_rgb8(),
    };
    let resized = imageops::resize(&source, SIDE, SIDE, FilterType::Triangle);
    let grid = OccupancyGrid::build(&resized, config).unwrap();
    grid.to_image().save(cache).unwrap();
    info!("Cached grid at {}", cache.display());
    grid
}

fn synthetic_map() -> GrayImage {
    GrayImage::from_fn(SIDE, SIDE, |x, y| {
        let lower = (240..250).contains(&y) && x < 260;
        let upper = (120..130).contains(&y) && x > 140;
        Luma([if lower || upper { 0 } else { 255 }])
    })
}
