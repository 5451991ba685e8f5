//! Road network representation and builder.
//!
//! # Data layout
//!
//! Roads are undirected.  Each road is stored twice (once per endpoint) in a
//! **Compressed Sparse Row** adjacency: the neighbors of node `n` occupy
//!
//! ```text
//! targets[ start[n] .. start[n+1] ]
//! ```
//!
//! sorted ascending with duplicates and self-loops removed, so iteration
//! order (and therefore every random draw over it) is deterministic.
//!
//! Besides the full adjacency the network can carry one restricted adjacency
//! per area (see [`crate::area`]).  [`RoadNetwork::view`] returns the
//! adjacency an agent in a given area moves on.

use cdfl_core::{AreaId, NodeId, Point};

use crate::{SpatialError, SpatialResult};

// ── Adjacency ─────────────────────────────────────────────────────────────────

/// Symmetric neighbor lists in CSR form.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    /// Row pointer, length `node_count + 1`.
    pub start:   Vec<u32>,
    /// Neighbor ids, sorted ascending within each row.
    pub targets: Vec<NodeId>,
}

impl Adjacency {
    /// Build from undirected pairs.  Self-loops and repeated pairs are dropped.
    pub(crate) fn from_pairs(node_count: usize, pairs: &[(NodeId, NodeId)]) -> Self {
        let mut directed: Vec<(u32, u32)> = Vec::with_capacity(pairs.len() * 2);
        for &(a, b) in pairs {
            if a != b {
                directed.push((a.0, b.0));
                directed.push((b.0, a.0));
            }
        }
        directed.sort_unstable();
        directed.dedup();

        let mut start = vec![0u32; node_count + 1];
        for &(from, _) in &directed {
            start[from as usize + 1] += 1;
        }
        for i in 1..=node_count {
            start[i] += start[i - 1];
        }
        let targets = directed.into_iter().map(|(_, to)| NodeId(to)).collect();
        Self { start, targets }
    }

    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let s = self.start[node.index()] as usize;
        let e = self.start[node.index() + 1] as usize;
        &self.targets[s..e]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Nodes with at least one neighbor, ascending.  Agents spawn only here.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        (0..self.start.len().saturating_sub(1))
            .map(|i| NodeId(i as u32))
            .filter(|&n| self.degree(n) > 0)
            .collect()
    }

    /// Number of undirected roads.
    pub fn road_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Undirected roads as `(a, b)` pairs with `a < b`.
    pub(crate) fn roads(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.start.len().saturating_sub(1)).flat_map(move |i| {
            let a = NodeId(i as u32);
            self.neighbors(a).iter().filter(move |&&b| a < b).map(move |&b| (a, b))
        })
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph with optional per-area restrictions.
///
/// Immutable once built; shared read-only by the mobility engine.  Use
/// [`RoadNetworkBuilder`] or [`crate::load_edges_csv`] to construct one.
pub struct RoadNetwork {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    /// Unrestricted adjacency.
    pub adjacency: Adjacency,

    /// Area of each node; all `AreaId::UNRESTRICTED` until areas are applied.
    pub node_area: Vec<AreaId>,

    /// Restricted adjacency for area `k` at index `k - 1`.
    pub(crate) area_adjacency: Vec<Adjacency>,
}

impl RoadNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of undirected roads.
    pub fn road_count(&self) -> usize {
        self.adjacency.road_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Number of areas applied with [`RoadNetwork::apply_areas`].
    pub fn area_count(&self) -> usize {
        self.area_adjacency.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    #[inline]
    pub fn pos(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.neighbors(node)
    }

    /// The adjacency an agent confined to `area` moves on.  Area 0 is the
    /// full graph.
    pub fn view(&self, area: AreaId) -> SpatialResult<&Adjacency> {
        if area.is_unrestricted() {
            return Ok(&self.adjacency);
        }
        self.area_adjacency
            .get(area.0 as usize - 1)
            .ok_or(SpatialError::UnknownArea { area, defined: self.area_adjacency.len() })
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cdfl_core::Point;
/// use cdfl_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Point::new(40.75, -73.99));
/// let c = b.add_node(Point::new(40.76, -73.98));
/// b.add_road(a, c);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.road_count(), 1);
/// ```
pub struct RoadNetworkBuilder {
    nodes: Vec<Point>,
    roads: Vec<(NodeId, NodeId)>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), roads: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            roads: Vec::with_capacity(roads),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add an undirected road between `a` and `b`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) {
        self.roads.push((a, b));
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Fails if any road references an unknown node or any node ends up
    /// with no neighbors.
    pub fn build(self) -> SpatialResult<RoadNetwork> {
        let node_count = self.nodes.len();
        if let Some(&(a, b)) = self
            .roads
            .iter()
            .find(|(a, b)| a.index() >= node_count || b.index() >= node_count)
        {
            let missing = if a.index() >= node_count { a } else { b };
            return Err(SpatialError::NodeNotFound(missing));
        }

        let adjacency = Adjacency::from_pairs(node_count, &self.roads);
        if let Some(isolated) = (0..node_count)
            .map(|i| NodeId(i as u32))
            .find(|&n| adjacency.degree(n) == 0)
        {
            return Err(SpatialError::IsolatedNode(isolated));
        }

        Ok(RoadNetwork {
            node_area: vec![AreaId::UNRESTRICTED; node_count],
            node_pos: self.nodes,
            adjacency,
            area_adjacency: Vec::new(),
        })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
