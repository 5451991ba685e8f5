//! Area partitioning of the road network.
//!
//! Typed agents can be confined to one area: they only ever travel along
//! roads whose two endpoints lie in their area.  A partition assigns every
//! node an `AreaId` in `1..=num_areas`; applying it to a [`RoadNetwork`]
//! builds one restricted adjacency per area.

use cdfl_core::{AreaId, NodeId};

use crate::network::Adjacency;
use crate::{RoadNetwork, SpatialError, SpatialResult};

/// Assignment of nodes to areas.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaPartition {
    pub node_area: Vec<AreaId>,
    pub num_areas: u16,
}

impl AreaPartition {
    /// Split nodes into `num_areas` bands of (near) equal node count, ordered
    /// west to east by longitude (ties by latitude, then id).
    pub fn longitude_bands(net: &RoadNetwork, num_areas: u16) -> Self {
        let n = net.node_count();
        let k = num_areas.max(1) as usize;

        let mut order: Vec<NodeId> = (0..n).map(|i| NodeId(i as u32)).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (net.pos(a), net.pos(b));
            pa.lon
                .total_cmp(&pb.lon)
                .then(pa.lat.total_cmp(&pb.lat))
                .then(a.cmp(&b))
        });

        let mut node_area = vec![AreaId(1); n];
        for (rank, node) in order.into_iter().enumerate() {
            // rank * k / n maps ranks onto 0..k with band sizes differing by at most one.
            node_area[node.index()] = AreaId((rank * k / n.max(1)) as u16 + 1);
        }
        Self { node_area, num_areas: k as u16 }
    }

    /// Use an explicit per-node assignment.
    pub fn from_assignment(node_area: Vec<AreaId>) -> Self {
        let num_areas = node_area.iter().map(|a| a.0).max().unwrap_or(0);
        Self { node_area, num_areas }
    }

    pub fn area_of(&self, node: NodeId) -> AreaId {
        self.node_area[node.index()]
    }
}

impl RoadNetwork {
    /// Build the restricted adjacency of every area in `partition`.
    ///
    /// Fails if the partition does not cover every node, or if some area has
    /// no road fully inside it (an agent confined there could never move).
    pub fn apply_areas(&mut self, partition: &AreaPartition) -> SpatialResult<()> {
        if partition.node_area.len() != self.node_count() {
            return Err(SpatialError::PartitionSize {
                expected: self.node_count(),
                got:      partition.node_area.len(),
            });
        }

        let roads: Vec<(NodeId, NodeId)> = self.adjacency.roads().collect();
        let mut views = Vec::with_capacity(partition.num_areas as usize);
        for k in 1..=partition.num_areas {
            let area = AreaId(k);
            let inside: Vec<(NodeId, NodeId)> = roads
                .iter()
                .copied()
                .filter(|&(a, b)| partition.area_of(a) == area && partition.area_of(b) == area)
                .collect();
            if inside.is_empty() {
                return Err(SpatialError::EmptyArea(area));
            }
            views.push(Adjacency::from_pairs(self.node_count(), &inside));
        }

        self.node_area = partition.node_area.clone();
        self.area_adjacency = views;
        Ok(())
    }
}
