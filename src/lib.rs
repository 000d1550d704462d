//! # clearance_pathfinding
//!
//! Path planning over occupancy grids built from images. Searches a lattice
//! of fixed-length steps in continuous Cartesian coordinates with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm), accepting only
//! positions that keep a square of free cells around them, so the path
//! suits a body with some physical extent. Optionally pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! of the step lattice to avoid flood-filling behaviour if no path exists.
//!
//! ```no_run
//! use clearance_pathfinding::{GridConfig, Pathfinder, Point, SearchConfig};
//!
//! let image = image::open("map.png").unwrap();
//! let pathfinder =
//!     Pathfinder::from_image(&image, &GridConfig::default(), SearchConfig::default()).unwrap();
//! let outcome = pathfinder.find_path_from_origin(Point::new(50.0, 50.0)).unwrap();
//! if let Some(solution) = outcome.solution() {
//!     solution.overlay.render(&pathfinder.grid).save("path.png").unwrap();
//! }
//! ```
use fxhash::FxBuildHasher;
use indexmap::IndexMap;

pub mod components;
pub mod config;
pub mod error;
pub mod node;
pub mod occupancy;
pub mod overlay;
pub mod pathfinder;
pub mod search;
pub mod solution;
pub mod solver;
pub mod transform;

pub use crate::components::LatticeComponents;
pub use crate::config::{GridConfig, SearchConfig};
pub use crate::error::{Error, Result};
pub use crate::occupancy::{Cell, OccupancyGrid};
pub use crate::overlay::{Mark, Overlay};
pub use crate::pathfinder::Pathfinder;
pub use crate::search::SearchContext;
pub use crate::solution::{SearchOutcome, SearchStats, Solution};
pub use crate::solver::astar::AstarSolver;
pub use crate::solver::dijkstra::DijkstraSolver;
pub use crate::solver::GridSolver;
pub use crate::transform::{Frame, Pixel, Point};

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
