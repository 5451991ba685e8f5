//! Mobility engine: placement and per-tick advancement of every car.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use cdfl_core::{AgentId, AgentRng, AgentRngs, AgentType, AreaId, NodeId, Point};
use cdfl_spatial::RoadNetwork;
use tracing::debug;

use crate::{Car, MobilityError, MobilityResult, choose_next_destination};

/// Move `car` forward by `dt` seconds.
///
/// While the remaining distance to `destination` covers the whole step the
/// car simply travels `heading * dt`.  Otherwise it arrives, chooses the next
/// destination, and spends the residual time on the new edge.  Only one
/// arrival is processed per call.
pub fn advance(car: &mut Car, dt: f64, net: &RoadNetwork, rng: &mut AgentRng) -> MobilityResult<()> {
    let target    = net.pos(car.destination);
    let remaining = car.position.distance(target);

    if remaining >= car.unit_speed * dt {
        car.position = car.position + car.heading * dt;
        return Ok(());
    }

    let time_to_arrive = remaining / car.unit_speed;
    let residual       = dt - time_to_arrive;

    let view = net.view(car.area)?;
    let next = choose_next_destination(net, view, car.destination, car.source, car.heading, rng)
        .ok_or(MobilityError::DeadEnd { agent: car.id, node: car.destination })?;

    car.previous_source = car.source;
    car.source          = car.destination;
    car.destination     = next;

    let from = net.pos(car.source);
    car.heading  = Car::heading_between(from, net.pos(next), car.unit_speed);
    car.position = from + car.heading * residual;
    Ok(())
}

/// Place a car at a uniformly random point of a random road in its area.
///
/// `spawn` lists the nodes of the area's view that have at least one
/// neighbor.  `previous_source` starts equal to `source`.
pub fn place_random(
    net:        &RoadNetwork,
    area:       AreaId,
    spawn:      &[NodeId],
    id:         AgentId,
    agent_type: AgentType,
    unit_speed: f64,
    rng:        &mut AgentRng,
) -> MobilityResult<Car> {
    let view = net.view(area)?;
    let source = *rng.choose(spawn).ok_or(MobilityError::NoSpawnNode(area))?;
    let destination = *rng
        .choose(view.neighbors(source))
        .ok_or(MobilityError::DeadEnd { agent: id, node: source })?;

    let from = net.pos(source);
    let to   = net.pos(destination);
    let t: f64 = rng.gen_range(0.0..1.0);

    Ok(Car {
        id,
        agent_type,
        area,
        source,
        destination,
        previous_source: source,
        position:        from.lerp(to, t),
        unit_speed,
        heading:         Car::heading_between(from, to, unit_speed),
    })
}

/// Owns every car and the shared road network.
pub struct MobilityEngine {
    pub network: Arc<RoadNetwork>,

    /// Cars indexed by `AgentId`.
    pub cars: Vec<Car>,
}

impl MobilityEngine {
    pub fn new(network: Arc<RoadNetwork>) -> Self {
        Self { network, cars: Vec::new() }
    }

    /// Create one car per `(type, area)` pair at a random point of a random
    /// edge in its area.  Car `i` uses `rngs.inner[i]`.
    pub fn populate(
        &mut self,
        agents:     &[(AgentType, AreaId)],
        unit_speed: f64,
        rngs:       &mut AgentRngs,
    ) -> MobilityResult<()> {
        if rngs.len() != agents.len() {
            return Err(MobilityError::RngCountMismatch { expected: agents.len(), got: rngs.len() });
        }

        let mut spawn_nodes: BTreeMap<AreaId, Vec<NodeId>> = BTreeMap::new();
        self.cars = Vec::with_capacity(agents.len());

        for (i, &(agent_type, area)) in agents.iter().enumerate() {
            let spawn = match spawn_nodes.entry(area) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e)   => e.insert(self.network.view(area)?.active_nodes()),
            };
            let id  = AgentId(i as u32);
            let car = place_random(&self.network, area, spawn, id, agent_type, unit_speed, rngs.get_mut(id))?;
            self.cars.push(car);
        }
        debug!(cars = self.cars.len(), areas = spawn_nodes.len(), "cars placed");
        Ok(())
    }

    /// Advance every car by `dt` seconds.
    pub fn step(&mut self, dt: f64, rngs: &mut AgentRngs) -> MobilityResult<()> {
        if rngs.len() != self.cars.len() {
            return Err(MobilityError::RngCountMismatch { expected: self.cars.len(), got: rngs.len() });
        }
        let net = &*self.network;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.cars
                .par_iter_mut()
                .zip(rngs.inner.par_iter_mut())
                .try_for_each(|(car, rng)| advance(car, dt, net, rng))
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.cars
                .iter_mut()
                .zip(rngs.inner.iter_mut())
                .try_for_each(|(car, rng)| advance(car, dt, net, rng))
        }
    }

    /// Current position of every car, indexed by `AgentId`.
    pub fn positions(&self) -> Vec<Point> {
        self.cars.iter().map(|c| c.position).collect()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}
