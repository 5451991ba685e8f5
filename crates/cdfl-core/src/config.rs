//! Mobility and contact parameters shared by the whole run.
//!
//! Physical quantities (`speed` in m/s, `communication_distance` in metres)
//! are converted to coordinate units with `coord_scale`, the number of degree
//! units per metre.  The default scale turns 13.59 m/s into roughly 1.97e-4
//! degrees per second.

use crate::{CoreError, CoreResult};

/// Coordinate units per metre used when no explicit scale is configured.
pub const DEFAULT_COORD_SCALE: f64 = 0.00145 / 100.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical schedules.
    pub seed: u64,

    pub num_agents: usize,

    pub num_rounds: u32,

    /// Ticks (seconds) of mobility per round.
    pub epoch_time: u32,

    /// Constant agent speed in metres per second.
    pub speed: f64,

    /// Radio range in metres.
    pub communication_distance: f64,

    /// Coordinate units per metre.
    pub coord_scale: f64,

    /// Confine typed agents to their home area and only pair compatible types.
    pub area_restricted: bool,

    /// Number of longitude bands the road network is split into when area
    /// restriction is on.
    pub num_areas: u16,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                   0,
            num_agents:             100,
            num_rounds:             100,
            epoch_time:             60,
            speed:                  13.59,
            communication_distance: 100.0,
            coord_scale:            DEFAULT_COORD_SCALE,
            area_restricted:        false,
            num_areas:              3,
        }
    }
}

impl SimConfig {
    /// Agent displacement per tick, in coordinate units.
    #[inline]
    pub fn unit_speed(&self) -> f64 {
        self.speed * self.coord_scale
    }

    /// Contact radius in coordinate units.
    #[inline]
    pub fn contact_radius(&self) -> f64 {
        self.communication_distance * self.coord_scale
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.num_agents == 0 {
            return Err(CoreError::Config("num_agents must be > 0".into()));
        }
        if self.epoch_time == 0 {
            return Err(CoreError::Config("epoch_time must be > 0".into()));
        }
        for (name, v) in [
            ("speed", self.speed),
            ("communication_distance", self.communication_distance),
            ("coord_scale", self.coord_scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CoreError::Config(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if self.area_restricted && self.num_areas == 0 {
            return Err(CoreError::Config(
                "num_areas must be > 0 when area_restricted is set".into(),
            ));
        }
        Ok(())
    }
}
