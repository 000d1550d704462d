use itertools::Itertools;
use log::{info, warn};

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::node::euclidean_distance;
use crate::occupancy::OccupancyGrid;
use crate::overlay::Overlay;
use crate::search::SearchContext;
use crate::solution::{SearchOutcome, Solution};
use crate::transform::Point;

pub mod astar;
pub mod dijkstra;

/// A search strategy over an [OccupancyGrid]. Implementors choose the
/// heuristic (and optionally the edge cost); the provided methods run the
/// search with clearance checks and build the visualization overlay.
pub trait GridSolver {
    /// Estimated remaining cost from `point` to `goal`.
    fn heuristic(&self, point: &Point, goal: &Point) -> f64;

    /// Cost of moving between two positions. Euclidean by default, so
    /// diagonal steps cost `step * sqrt(2)`.
    fn cost(&self, p1: &Point, p2: &Point) -> f64 {
        euclidean_distance(p1, p2)
    }

    /// Total cost of a path under [cost](Self::cost).
    fn path_cost(&self, path: &[Point]) -> f64 {
        path.iter()
            .tuple_windows()
            .map(|(a, b)| self.cost(a, b))
            .sum()
    }

    /// Computes a path from `start` to `goal`, reusing the buffers of `ctx`.
    ///
    /// Fails with [Error::InvalidGoal] if the goal does not pass the
    /// clearance test. On success the overlay of the returned [Solution]
    /// marks the explored nodes, every node on the path and both endpoints.
    fn find_path_with_context(
        &self,
        ctx: &mut SearchContext,
        grid: &OccupancyGrid,
        start: Point,
        goal: Point,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        config.validate()?;
        if !grid.is_valid(goal, config.clearance) {
            return Err(Error::InvalidGoal {
                x: goal.x,
                y: goal.y,
            });
        }
        if !grid.is_valid(start, config.clearance) {
            warn!(
                "Start {} lacks clearance {}, searching anyway",
                start, config.clearance
            );
        }
        info!("Searching path from {} to {}", start, goal);
        let result = ctx.astar_clearance(
            start,
            goal,
            config,
            |p1, p2| self.cost(p1, p2),
            |p| self.heuristic(p, &goal),
            |p| grid.is_valid(*p, config.clearance),
        );
        let stats = result.stats;
        let Some(path) = result.path else {
            info!(
                "No path from {} to {} after {} expansions",
                start, goal, stats.expanded
            );
            return Ok(SearchOutcome::NoPath(stats));
        };
        info!(
            "Found path of {} nodes after {} expansions",
            path.len(),
            stats.expanded
        );

        let mut overlay = Overlay::for_grid(grid);
        for point in ctx.explored() {
            overlay.mark_explored(point);
        }
        for point in &path {
            overlay.mark_path(*point);
        }
        overlay.mark_endpoint(start);
        overlay.mark_endpoint(goal);
        Ok(SearchOutcome::Found(Solution {
            path,
            start,
            goal,
            stats,
            overlay,
        }))
    }

    /// Like [find_path_with_context](Self::find_path_with_context) with fresh
    /// search buffers.
    fn find_path(
        &self,
        grid: &OccupancyGrid,
        start: Point,
        goal: Point,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        let mut ctx = SearchContext::new();
        self.find_path_with_context(&mut ctx, grid, start, goal, config)
    }

    /// Searches from the Cartesian origin.
    fn find_path_from_origin(
        &self,
        grid: &OccupancyGrid,
        goal: Point,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        self.find_path(grid, Point::ORIGIN, goal, config)
    }
}
