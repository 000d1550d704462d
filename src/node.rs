//! Search vertices and the arena that owns them.
use smallvec::SmallVec;

use crate::transform::Point;

/// Successor lists never exceed the Moore neighbourhood.
pub const N_SMALLVEC_SIZE: usize = 8;

/// Offset of a node from the start in whole steps. Node positions are always
/// derived from their index, so equal indices mean bit-identical positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeIndex {
    pub i: i32,
    pub j: i32,
}

impl LatticeIndex {
    pub fn new(i: i32, j: i32) -> LatticeIndex {
        LatticeIndex { i, j }
    }

    pub fn step(&self, direction: Direction) -> LatticeIndex {
        let (di, dj) = direction.delta();
        LatticeIndex::new(self.i + di, self.j + dj)
    }

    /// The eight neighbouring indices in [Direction::ALL] order.
    pub fn moore_neighborhood(&self) -> SmallVec<[LatticeIndex; N_SMALLVEC_SIZE]> {
        Direction::ALL.iter().map(|&d| self.step(d)).collect()
    }
}

/// The eight expansion directions, in the order successors are generated.
/// Diagonal moves advance one full step along both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
    ];

    /// Unit offset along the Cartesian axes, `y` pointing north.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
        }
    }

    pub fn diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

/// The set of positions reachable from `origin` in steps of `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    pub origin: Point,
    pub step: f64,
}

impl Lattice {
    pub fn new(origin: Point, step: f64) -> Lattice {
        Lattice { origin, step }
    }

    pub fn position(&self, index: LatticeIndex) -> Point {
        Point::new(
            self.origin.x + index.i as f64 * self.step,
            self.origin.y + index.j as f64 * self.step,
        )
    }
}

/// Handle of a [Node] inside a [NodeArena].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub index: LatticeIndex,
    pub position: Point,
    /// Accumulated path cost
    pub g: f64,
    /// `g` plus the heuristic estimate
    pub f: f64,
    pub parent: Option<NodeId>,
}

impl Node {
    /// The start node. Its `f` is seeded with zero rather than the heuristic.
    pub fn root(lattice: &Lattice) -> Node {
        Node {
            index: LatticeIndex::default(),
            position: lattice.origin,
            g: 0.0,
            f: 0.0,
            parent: None,
        }
    }

    /// A node one step away in `direction`, parented to `id` (the handle of
    /// `self`). Costs are left at zero for the caller to fill in.
    pub fn translate(&self, id: NodeId, direction: Direction, lattice: &Lattice) -> Node {
        let index = self.index.step(direction);
        Node {
            index,
            position: lattice.position(index),
            g: 0.0,
            f: 0.0,
            parent: Some(id),
        }
    }

    /// All eight successors of `self`, in [Direction::ALL] order.
    pub fn successors(&self, id: NodeId, lattice: &Lattice) -> SmallVec<[Node; N_SMALLVEC_SIZE]> {
        Direction::ALL
            .iter()
            .map(|&direction| self.translate(id, direction, lattice))
            .collect()
    }
}

/// Edge cost between two positions.
pub fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    a.distance(b)
}

/// Owns every node created during a search; nodes refer to their parent by
/// [NodeId], so predecessor links form a tree rooted at the start.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Positions from the root down to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<Point> {
        let mut path: Vec<Point> =
            std::iter::successors(Some(self.get(id)), |node| node.parent.map(|p| self.get(p)))
                .map(|node| node.position)
                .collect();
        path.reverse();
        path
    }
}
