use crate::solver::GridSolver;
use crate::transform::Point;

/// A* with a scaled Euclidean heuristic. A factor above 1 gives weighted A*,
/// which expands fewer nodes at the price of optimality.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic_factor: f64,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }

    pub fn weighted(heuristic_factor: f64) -> AstarSolver {
        AstarSolver { heuristic_factor }
    }
}

impl Default for AstarSolver {
    fn default() -> Self {
        AstarSolver::new()
    }
}

impl GridSolver for AstarSolver {
    /// Straight-line distance times the heuristic factor.
    fn heuristic(&self, point: &Point, goal: &Point) -> f64 {
        point.distance(goal) * self.heuristic_factor
    }
}
