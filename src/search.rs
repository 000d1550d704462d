//! The A* loop over the step lattice.
//!
//! Nodes live in a [NodeArena]; the open set is a binary heap of handles
//! ordered by `f` with FIFO tie-breaking, backed by a map from lattice
//! position to the lowest `f` queued there. The closed set maps positions to
//! the node they were expanded with, in expansion order.
use fxhash::FxHashMap;
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::node::{Lattice, LatticeIndex, Node, NodeArena, NodeId};
use crate::solution::SearchStats;
use crate::transform::Point;
use crate::FxIndexMap;

#[derive(Debug)]
struct SmallestCostHolder {
    estimated_cost: f64,
    seq: u64,
    node: NodeId,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first, then earliest insertion
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// What a single run of [SearchContext::astar_clearance] produced.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub path: Option<Vec<Point>>,
    pub stats: SearchStats,
}

/// Reusable search state. Buffers are cleared, not freed, between runs.
#[derive(Debug, Default)]
pub struct SearchContext {
    arena: NodeArena,
    to_see: BinaryHeap<SmallestCostHolder>,
    open: FxHashMap<LatticeIndex, f64>,
    closed: FxIndexMap<LatticeIndex, NodeId>,
    seq: u64,
}

impl SearchContext {
    pub fn new() -> SearchContext {
        SearchContext::default()
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.to_see.clear();
        self.open.clear();
        self.closed.clear();
        self.seq = 0;
    }

    fn push_open(&mut self, id: NodeId, node: &Node) {
        let best = self.open.entry(node.index).or_insert(node.f);
        if node.f < *best {
            *best = node.f;
        }
        self.to_see.push(SmallestCostHolder {
            estimated_cost: node.f,
            seq: self.seq,
            node: id,
        });
        self.seq += 1;
    }

    /// A successor is dominated if its position is already queued or expanded
    /// with a strictly lower `f`. Equal `f` lets both copies coexist.
    fn dominated(&self, node: &Node) -> bool {
        self.open.get(&node.index).is_some_and(|&f| f < node.f)
            || self
                .closed
                .get(&node.index)
                .is_some_and(|&id| self.arena.get(id).f < node.f)
    }

    /// Positions expanded by the last run, in expansion order.
    pub fn explored(&self) -> impl Iterator<Item = Point> + '_ {
        self.closed.values().map(|id| self.arena.get(*id).position)
    }

    /// Runs A* from `start` over the lattice of `config.step` sized moves.
    ///
    /// The search ends successfully as soon as a generated successor lies
    /// closer than `config.goal_threshold` to `goal`, before that successor is
    /// checked against `valid`. With `config.snap_to_goal`, an expanded node
    /// whose move square contains the goal also ends the search with a final
    /// step onto the goal, and every returned path ends exactly at `goal`.
    pub fn astar_clearance<FC, FH, FV>(
        &mut self,
        start: Point,
        goal: Point,
        config: &SearchConfig,
        mut cost: FC,
        mut heuristic: FH,
        mut valid: FV,
    ) -> SearchResult
    where
        FC: FnMut(&Point, &Point) -> f64,
        FH: FnMut(&Point) -> f64,
        FV: FnMut(&Point) -> bool,
    {
        let started = Instant::now();
        self.clear();
        let mut stats = SearchStats::default();
        let lattice = Lattice::new(start, config.step);
        let root = Node::root(&lattice);
        let root_id = self.arena.push(root);

        let finish = |mut path: Vec<Point>, mut stats: SearchStats| {
            if config.snap_to_goal && path.last() != Some(&goal) {
                path.push(goal);
            }
            stats.elapsed = started.elapsed();
            SearchResult {
                path: Some(path),
                stats,
            }
        };

        if start.distance(&goal) < config.goal_threshold {
            debug!("Start {} already within threshold of {}", start, goal);
            return finish(vec![start], stats);
        }

        self.push_open(root_id, &root);
        while let Some(SmallestCostHolder { node: id, .. }) = self.to_see.pop() {
            let over_expansions = config
                .max_expansions
                .is_some_and(|max| stats.expanded >= max);
            let over_time = config
                .time_budget
                .is_some_and(|budget| started.elapsed() >= budget);
            if over_expansions || over_time {
                warn!(
                    "Search budget exhausted after {} expansions, giving up on {}",
                    stats.expanded, goal
                );
                stats.budget_exhausted = true;
                break;
            }

            let q = *self.arena.get(id);
            if let Some(&closed_id) = self.closed.get(&q.index) {
                if self.arena.get(closed_id).f <= q.f {
                    stats.skipped_stale += 1;
                    continue;
                }
            }
            stats.expanded += 1;
            trace!("Expanding {} (g = {:.3}, f = {:.3})", q.position, q.g, q.f);

            for mut s in q.successors(id, &lattice) {
                stats.generated += 1;
                if s.position.distance(&goal) < config.goal_threshold {
                    let s_id = self.arena.push(s);
                    debug!("Reached {} from {}", s.position, q.position);
                    return finish(self.arena.path_to(s_id), stats);
                }
                s.g = q.g + cost(&q.position, &s.position);
                s.f = s.g + heuristic(&s.position);
                if self.dominated(&s) {
                    stats.rejected_dominated += 1;
                    continue;
                }
                if !valid(&s.position) {
                    stats.rejected_invalid += 1;
                    continue;
                }
                let s_id = self.arena.push(s);
                self.push_open(s_id, &s);
            }

            if config.snap_to_goal && q.position.chebyshev_distance(&goal) <= config.step {
                debug!("Snapping from {} onto {}", q.position, goal);
                return finish(self.arena.path_to(id), stats);
            }
            self.closed.insert(q.index, id);
        }

        if !stats.budget_exhausted {
            debug!(
                "Open set exhausted after {} expansions without reaching {}",
                stats.expanded, goal
            );
        }
        stats.elapsed = started.elapsed();
        SearchResult { path: None, stats }
    }
}
