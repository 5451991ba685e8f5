//! Edge-list CSV loader.
//!
//! # Format
//!
//! ```text
//! StartLat,StartLong,EndLat,EndLong
//! 40.7580,-73.9855,40.7590,-73.9845
//! 40.7590,-73.9845,40.7601,-73.9836
//! ```
//!
//! Each row is one undirected road.  Endpoints within `snap_tolerance` of an
//! existing node reuse that node, so segments that share an intersection are
//! joined.  Rows whose two endpoints collapse onto the same node are skipped.

use std::io::Read;
use std::path::Path;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::Deserialize;
use tracing::{info, warn};

use cdfl_core::{NodeId, Point};

use crate::{RoadNetwork, RoadNetworkBuilder, SpatialError, SpatialResult};

/// Endpoints closer than this (in coordinate units) are merged.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-9;

/// One row of the edge-list CSV.
#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "StartLat")]
    pub start_lat: f64,
    #[serde(rename = "StartLong")]
    pub start_lon: f64,
    #[serde(rename = "EndLat")]
    pub end_lat: f64,
    #[serde(rename = "EndLong")]
    pub end_lon: f64,
}

/// Load a road network from a CSV file.
pub fn load_edges_csv(path: &Path, snap_tolerance: f64) -> SpatialResult<RoadNetwork> {
    let file = std::fs::File::open(path)?;
    load_edges_reader(file, snap_tolerance)
}

/// Load a road network from any `Read` source (e.g. an in-memory buffer in
/// tests).
pub fn load_edges_reader<R: Read>(reader: R, snap_tolerance: f64) -> SpatialResult<RoadNetwork> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut interner = NodeInterner::new(snap_tolerance);
    let mut skipped = 0usize;

    for (row, result) in csv.deserialize::<EdgeRecord>().enumerate() {
        let rec = result?;
        let a = interner.intern(Point::new(rec.start_lat, rec.start_lon));
        let b = interner.intern(Point::new(rec.end_lat, rec.end_lon));
        if a == b {
            warn!(row, "skipping degenerate road segment");
            skipped += 1;
            continue;
        }
        interner.builder.add_road(a, b);
    }

    if interner.builder.road_count() == 0 {
        return Err(SpatialError::Empty);
    }
    let net = interner.builder.build()?;
    info!(nodes = net.node_count(), roads = net.road_count(), skipped, "road network loaded");
    Ok(net)
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Endpoint interning ────────────────────────────────────────────────────────

/// Deduplicates endpoint coordinates into node ids.
struct NodeInterner {
    builder:   RoadNetworkBuilder,
    index:     RTree<NodeEntry>,
    tol_sq:    f64,
}

impl NodeInterner {
    fn new(tolerance: f64) -> Self {
        Self {
            builder: RoadNetworkBuilder::new(),
            index:   RTree::new(),
            tol_sq:  tolerance * tolerance,
        }
    }

    fn intern(&mut self, pos: Point) -> NodeId {
        let key = pos.to_array();
        if let Some(hit) = self.index.nearest_neighbor(&key) {
            if pos.distance_sq(Point::new(hit.point[0], hit.point[1])) <= self.tol_sq {
                return hit.id;
            }
        }
        let id = self.builder.add_node(pos);
        self.index.insert(NodeEntry { point: key, id });
        id
    }
}
