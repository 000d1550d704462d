//! Connected components of the step lattice, used to answer "can this goal be
//! reached at all" without flood-filling the grid with a search.
//!
//! The search can only expand the start and lattice positions that pass the
//! clearance test, and it expands every such position connected to the start
//! through 8-neighbour steps. A goal is therefore reachable exactly when some
//! expandable position in the start's component would end the search: a
//! neighbour lies within the goal threshold, or the goal can be snapped to.
use itertools::iproduct;
use log::info;
use petgraph::unionfind::UnionFind;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::node::{Lattice, LatticeIndex};
use crate::occupancy::OccupancyGrid;
use crate::transform::Point;

/// Upper bound on lattice positions per grid cell (grid grown by two cells on
/// each side). Finer steps are rejected rather than allocated.
pub const MAX_POSITIONS_PER_CELL: f64 = 16.0;

#[derive(Clone, Debug)]
pub struct LatticeComponents {
    lattice: Lattice,
    clearance: usize,
    goal_threshold: f64,
    snap_to_goal: bool,
    min: LatticeIndex,
    cols: usize,
    rows: usize,
    valid: Vec<bool>,
    start_ix: usize,
    components: UnionFind<usize>,
}

impl LatticeComponents {
    /// Builds components for searches from `start` with the lattice step,
    /// clearance and goal rules of `config`. Costs one clearance test per
    /// lattice position covering the grid.
    ///
    /// Fails with [Error::InvalidParameter] if the step is so fine, or the
    /// start so far from the grid, that the lattice would exceed
    /// [MAX_POSITIONS_PER_CELL] positions per cell.
    pub fn new(grid: &OccupancyGrid, start: Point, config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        if !start.is_finite() {
            return Err(Error::InvalidParameter {
                name: "start",
                value: if start.x.is_finite() { start.y } else { start.x },
            });
        }
        let lattice = Lattice::new(start, config.step);
        let frame = grid.frame();
        let (origin_col, origin_row) = frame.origin();
        // Cartesian extent of every point that rounds onto a grid pixel.
        let x_range = (-origin_col - 0.5, frame.width as f64 - 0.5 - origin_col);
        let y_range = (origin_row + 0.5 - frame.height as f64, origin_row + 0.5);
        let span = |(lo, hi): (f64, f64), origin: f64| {
            (
                ((lo - origin) / config.step).floor() - 1.0,
                ((hi - origin) / config.step).ceil() + 1.0,
            )
        };
        let (x_span, y_span) = (span(x_range, start.x), span(y_range, start.y));
        let limit =
            MAX_POSITIONS_PER_CELL * ((frame.width + 4) * (frame.height + 4)) as f64;
        let count = |(i_lo, i_hi): (f64, f64), (j_lo, j_hi): (f64, f64)| {
            (i_hi - i_lo + 1.0) * (j_hi - j_lo + 1.0)
        };
        // Negated so that NaN counts fail too.
        if !(count(x_span, y_span) <= limit) {
            return Err(Error::InvalidParameter {
                name: "step",
                value: config.step,
            });
        }
        // The lattice must also hold the start itself.
        let include_start = |(lo, hi): (f64, f64)| (lo.min(0.0), hi.max(0.0));
        let (x_span, y_span) = (include_start(x_span), include_start(y_span));
        if !(count(x_span, y_span) <= limit) {
            return Err(Error::InvalidParameter {
                name: "start",
                value: if x_span.1 - x_span.0 > y_span.1 - y_span.0 {
                    start.x
                } else {
                    start.y
                },
            });
        }
        let fits = |(lo, hi): (f64, f64)| lo >= i32::MIN as f64 && hi <= i32::MAX as f64;
        if !fits(x_span) || !fits(y_span) {
            return Err(Error::InvalidParameter {
                name: "step",
                value: config.step,
            });
        }
        let (i_lo, i_hi) = (x_span.0 as i32, x_span.1 as i32);
        let (j_lo, j_hi) = (y_span.0 as i32, y_span.1 as i32);
        let min = LatticeIndex::new(i_lo, j_lo);
        let cols = (x_span.1 - x_span.0) as usize + 1;
        let rows = (y_span.1 - y_span.0) as usize + 1;

        let mut components = LatticeComponents {
            lattice,
            clearance: config.clearance,
            goal_threshold: config.goal_threshold,
            snap_to_goal: config.snap_to_goal,
            min,
            cols,
            rows,
            valid: Vec::with_capacity(cols * rows),
            start_ix: 0,
            components: UnionFind::new(cols * rows),
        };
        for (j, i) in iproduct!(j_lo..=j_hi, i_lo..=i_hi) {
            let position = lattice.position(LatticeIndex::new(i, j));
            components
                .valid
                .push(grid.is_valid(position, config.clearance));
        }
        components.start_ix = components.ix(LatticeIndex::default()).unwrap_or(0);
        components.link();
        info!(
            "Generated lattice components over {}x{} positions",
            cols, rows
        );
        Ok(components)
    }

    fn ix(&self, index: LatticeIndex) -> Option<usize> {
        let col = usize::try_from(index.i - self.min.i).ok()?;
        let row = usize::try_from(index.j - self.min.j).ok()?;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    fn lattice_index(&self, ix: usize) -> LatticeIndex {
        LatticeIndex::new(
            self.min.i + (ix % self.cols) as i32,
            self.min.j + (ix / self.cols) as i32,
        )
    }

    fn expandable(&self, ix: usize) -> bool {
        ix == self.start_ix || self.valid[ix]
    }

    /// Joins every expandable position with its valid neighbours.
    fn link(&mut self) {
        for ix in 0..self.valid.len() {
            if !self.expandable(ix) {
                continue;
            }
            for neighbour in self.lattice_index(ix).moore_neighborhood() {
                if let Some(n) = self.ix(neighbour) {
                    if self.valid[n] {
                        self.components.union(ix, n);
                    }
                }
            }
        }
    }

    /// Whether these components answer queries for searches from `start`
    /// under `config`.
    pub fn matches(&self, start: Point, config: &SearchConfig) -> bool {
        self.lattice == Lattice::new(start, config.step)
            && self.clearance == config.clearance
            && self.goal_threshold == config.goal_threshold
            && self.snap_to_goal == config.snap_to_goal
    }

    pub fn start(&self) -> Point {
        self.lattice.origin
    }

    /// Number of lattice positions covered.
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    /// Whether the lattice position `index` can be expanded by a search from
    /// the start. Positions off the grid are never connected.
    pub fn connected(&self, index: LatticeIndex) -> bool {
        self.ix(index)
            .is_some_and(|ix| self.expandable(ix) && self.components.equiv(ix, self.start_ix))
    }

    /// Whether expanding the lattice position `index` would end a search for
    /// `goal`.
    fn ends_search(&self, index: LatticeIndex, goal: &Point) -> bool {
        let reaches = index
            .moore_neighborhood()
            .iter()
            .any(|&n| self.lattice.position(n).distance(goal) < self.goal_threshold);
        reaches
            || (self.snap_to_goal
                && self.lattice.position(index).chebyshev_distance(goal) <= self.lattice.step)
    }

    /// Whether an unbounded search from the start would reach `goal`.
    pub fn goal_reachable(&self, goal: Point) -> bool {
        if !goal.is_finite() {
            return false;
        }
        if self.lattice.origin.distance(&goal) < self.goal_threshold {
            return true;
        }
        let step = self.lattice.step;
        let radius = step * std::f64::consts::SQRT_2 + self.goal_threshold;
        let origin = self.lattice.origin;
        let i_lo = (((goal.x - radius - origin.x) / step).floor() as i32).max(self.min.i);
        let i_hi = (((goal.x + radius - origin.x) / step).ceil() as i32)
            .min(self.min.i + self.cols as i32 - 1);
        let j_lo = (((goal.y - radius - origin.y) / step).floor() as i32).max(self.min.j);
        let j_hi = (((goal.y + radius - origin.y) / step).ceil() as i32)
            .min(self.min.j + self.rows as i32 - 1);
        iproduct!(i_lo..=i_hi, j_lo..=j_hi).any(|(i, j)| {
            let index = LatticeIndex::new(i, j);
            self.connected(index) && self.ends_search(index, &goal)
        })
    }

    pub fn goal_unreachable(&self, goal: Point) -> bool {
        !self.goal_reachable(goal)
    }
}
