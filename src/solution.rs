use std::time::Duration;

use itertools::Itertools;

use crate::node::euclidean_distance;
use crate::overlay::Overlay;
use crate::transform::{Pixel, Point};

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes popped from the open set and expanded
    pub expanded: usize,
    /// Successors generated
    pub generated: usize,
    /// Successors dropped because a cheaper node already held their position
    pub rejected_dominated: usize,
    /// Successors dropped by the clearance test
    pub rejected_invalid: usize,
    /// Popped nodes whose position had already been expanded at no greater cost
    pub skipped_stale: usize,
    /// Whether the search stopped on an expansion or time budget
    pub budget_exhausted: bool,
    pub elapsed: Duration,
}

/// A path from start to goal together with its visualization marks.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Positions from the start to the node that reached the goal
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    pub stats: SearchStats,
    /// Path and endpoint marks over the searched grid
    pub overlay: Overlay,
}

impl Solution {
    /// The last position of the path.
    pub fn reached(&self) -> Point {
        self.path.last().copied().unwrap_or(self.start)
    }

    /// Sum of Euclidean segment lengths.
    pub fn cost(&self) -> f64 {
        self.path
            .iter()
            .tuple_windows()
            .map(|(a, b)| euclidean_distance(a, b))
            .sum()
    }

    /// The path quantized to grid pixels.
    pub fn pixels(&self) -> Vec<Pixel> {
        let frame = self.overlay.frame();
        self.path.iter().map(|p| frame.to_pixel(*p)).collect()
    }
}

/// Result of a path query that passed its preconditions. Not finding a path
/// is an ordinary outcome, not an error.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Found(Solution),
    NoPath(SearchStats),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            SearchOutcome::NoPath(_) => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            SearchOutcome::NoPath(_) => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found(solution) => &solution.stats,
            SearchOutcome::NoPath(stats) => stats,
        }
    }
}
