//! Synthetic road network used when no edge CSV is given.

use cdfl_core::{NodeId, Point};
use cdfl_spatial::{RoadNetwork, RoadNetworkBuilder, SpatialResult};

/// Build a `side × side` street grid with `spacing` coordinate units between
/// intersections, anchored at `origin`.
pub fn build_grid(side: u32, spacing: f64, origin: Point) -> SpatialResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(
        (side * side) as usize,
        2 * (side * side.saturating_sub(1)) as usize,
    );

    for r in 0..side {
        for c in 0..side {
            b.add_node(origin + Point::new(r as f64 * spacing, c as f64 * spacing));
        }
    }

    let id = |r: u32, c: u32| NodeId(r * side + c);
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                b.add_road(id(r, c), id(r, c + 1));
            }
            if r + 1 < side {
                b.add_road(id(r, c), id(r + 1, c));
            }
        }
    }
    b.build()
}
