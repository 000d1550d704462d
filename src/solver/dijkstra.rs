use crate::solver::GridSolver;
use crate::transform::Point;

/// Uniform-cost search: the same loop with a zero heuristic.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: &Point, _: &Point) -> f64 {
        0.0
    }
}
