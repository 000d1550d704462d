use core::fmt;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

use image::GenericImageView;
use log::info;

use crate::components::LatticeComponents;
use crate::config::{GridConfig, SearchConfig};
use crate::error::{Error, Result};
use crate::occupancy::{Cell, OccupancyGrid};
use crate::search::SearchContext;
use crate::solution::{SearchOutcome, SearchStats};
use crate::solver::astar::AstarSolver;
use crate::solver::GridSolver;
use crate::transform::{Pixel, Point};

/// [Pathfinder] owns an [OccupancyGrid] together with the search settings,
/// a [GridSolver] and reusable search buffers. Optionally it maintains
/// [LatticeComponents] for one start position, which lets unreachable goals
/// be rejected without running the search. Editing the grid marks the
/// components as dirty; call [update](Self::update) to regenerate them.
#[derive(Clone, Debug)]
pub struct Pathfinder<S: GridSolver = AstarSolver> {
    pub grid: OccupancyGrid,
    pub config: SearchConfig,
    pub solver: S,
    pub components: Option<LatticeComponents>,
    pub components_dirty: bool,
    context: Arc<Mutex<SearchContext>>,
}

impl Pathfinder<AstarSolver> {
    pub fn new(grid: OccupancyGrid, config: SearchConfig) -> Self {
        Pathfinder::with_solver(grid, config, AstarSolver::new())
    }

    /// Builds the grid from an image and wraps it with the default solver.
    pub fn from_image<I>(image: &I, grid_config: &GridConfig, config: SearchConfig) -> Result<Self>
    where
        I: GenericImageView,
        I::Pixel: image::Pixel<Subpixel = u8>,
    {
        let grid = OccupancyGrid::build(image, grid_config)?;
        Ok(Pathfinder::new(grid, config))
    }
}

impl<S: GridSolver> Pathfinder<S> {
    pub fn with_solver(grid: OccupancyGrid, config: SearchConfig, solver: S) -> Self {
        Pathfinder {
            grid,
            config,
            solver,
            components: None,
            components_dirty: false,
            context: Arc::new(Mutex::new(SearchContext::new())),
        }
    }

    /// Updates a cell of the grid. Any change may split or join lattice
    /// components, so the components are flagged as dirty.
    pub fn set_cell(&mut self, pixel: Pixel, cell: Cell) -> Result<()> {
        let previous = self.grid.get(pixel);
        self.grid.set_cell(pixel, cell)?;
        if previous != Some(cell) && self.components.is_some() {
            self.components_dirty = true;
        }
        Ok(())
    }

    /// Sets every cell in the given ranges, clipped to the grid, and flags the
    /// components as dirty if any cell changed. Returns how many changed.
    pub fn fill(&mut self, rows: Range<i64>, cols: Range<i64>, cell: Cell) -> usize {
        let changed = self.grid.fill(rows, cols, cell);
        if changed > 0 && self.components.is_some() {
            self.components_dirty = true;
        }
        changed
    }

    /// Generates the components of the lattice anchored at `start` under the
    /// current search settings.
    pub fn generate_components(&mut self, start: Point) -> Result<()> {
        self.components = Some(LatticeComponents::new(&self.grid, start, &self.config)?);
        self.components_dirty = false;
        Ok(())
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) -> Result<()> {
        if self.components_dirty {
            if let Some(start) = self.components.as_ref().map(|c| c.start()) {
                self.generate_components(start)?;
            }
        }
        Ok(())
    }

    fn current_components(&self, start: Point) -> Option<&LatticeComponents> {
        self.components
            .as_ref()
            .filter(|c| !self.components_dirty && c.matches(start, &self.config))
    }

    /// Whether an unbounded search from `start` would reach `goal`, if
    /// up-to-date components for `start` are available.
    pub fn reachable(&self, start: Point, goal: Point) -> Option<bool> {
        self.current_components(start)
            .map(|components| components.goal_reachable(goal))
    }

    /// Computes a path from `start` to `goal`.
    ///
    /// Fails if the settings are invalid or the goal lacks clearance. When the
    /// components for `start` are up to date and show the goal cannot be
    /// reached, [SearchOutcome::NoPath] is returned without searching.
    pub fn find_path(&self, start: Point, goal: Point) -> Result<SearchOutcome> {
        self.config.validate()?;
        if !self.grid.is_valid(goal, self.config.clearance) {
            return Err(Error::InvalidGoal {
                x: goal.x,
                y: goal.y,
            });
        }
        if self.reachable(start, goal) == Some(false) {
            info!("{} is not in the lattice component of {}", goal, start);
            return Ok(SearchOutcome::NoPath(SearchStats::default()));
        }
        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        self.solver
            .find_path_with_context(&mut context, &self.grid, start, goal, &self.config)
    }

    /// Computes a path from the Cartesian origin to `goal`.
    pub fn find_path_from_origin(&self, goal: Point) -> Result<SearchOutcome> {
        self.find_path(Point::ORIGIN, goal)
    }
}

impl<S: GridSolver> fmt::Display for Pathfinder<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Grid {}x{} (padding {}):",
            self.grid.width(),
            self.grid.height(),
            self.grid.padding()
        )?;
        write!(f, "{}", self.grid)
    }
}
