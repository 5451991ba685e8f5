//! Per-agent movement state.

use cdfl_core::{AgentId, AgentType, AreaId, NodeId, Point};

/// A moving agent.
///
/// `position` always lies on the segment from `source` to `destination`.
/// `heading` is the unit direction of that segment scaled by `unit_speed`,
/// or the zero vector when the two nodes coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id:              AgentId,
    pub agent_type:      AgentType,

    /// Area whose restricted adjacency this car moves on (0 = full graph).
    pub area:            AreaId,

    pub source:          NodeId,
    pub destination:     NodeId,

    /// Node the car left before `source`.  Excluded from the next turn
    /// choice unless it is the only neighbor.
    pub previous_source: NodeId,

    pub position:        Point,

    /// Coordinate units travelled per second.
    pub unit_speed:      f64,

    /// Velocity vector: displacement per second.
    pub heading:         Point,
}

impl Car {
    /// Displacement per second along the segment `from -> to`.
    #[inline]
    pub fn heading_between(from: Point, to: Point, unit_speed: f64) -> Point {
        (to - from).normalized() * unit_speed
    }
}
