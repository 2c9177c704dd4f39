#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hifitime::Duration;

use crate::{
    constants::{DEFAULT_DEVIATION_THRESHOLD_M, DEFAULT_MAX_LINES_PER_SAMPLE},
    coordinate::Coordinate,
    error::Error,
    routing::PolylineFormat,
};

mod profile;
mod vehicle;

pub use profile::TransportMode;
pub use vehicle::VehicleProfile;

fn default_threshold() -> f64 {
    DEFAULT_DEVIATION_THRESHOLD_M
}

fn default_read_timeout() -> Duration {
    Duration::from_seconds(1.0)
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES_PER_SAMPLE
}

/// [PositionStrategy] selects how positions are acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionStrategy {
    /// Always returns this [Coordinate]. Used in testing and simulation,
    /// this strategy never fails and does not model noise or signal loss.
    #[cfg_attr(feature = "serde", serde(alias = "fixed"))]
    Fixed(Coordinate),
    /// Reads position sentences from a live source.
    #[cfg_attr(feature = "serde", serde(alias = "live"))]
    Live {
        /// Maximal time we may block waiting for a single line
        #[cfg_attr(feature = "serde", serde(default = "default_read_timeout"))]
        read_timeout: Duration,
        /// Maximal number of lines consumed per sampling attempt
        #[cfg_attr(feature = "serde", serde(default = "default_max_lines"))]
        max_lines: usize,
    },
}

impl Default for PositionStrategy {
    fn default() -> Self {
        Self::Live {
            read_timeout: default_read_timeout(),
            max_lines: default_max_lines(),
        }
    }
}

impl std::fmt::Display for PositionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fixed(coords) => write!(f, "fixed ({})", coords),
            Self::Live {
                read_timeout,
                max_lines,
            } => write!(f, "live (timeout={}, max-lines={})", read_timeout, max_lines),
        }
    }
}

/// [NavigationPlanner](crate::prelude::NavigationPlanner) configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximal distance (in meters) between the vehicle and the closest
    /// route waypoint, before we consider the vehicle deviated.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "threshold", default = "default_threshold")
    )]
    pub deviation_threshold_m: f64,
    /// [PositionStrategy]
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: PositionStrategy,
    /// [VehicleProfile] forwarded to the routing service
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicle: VehicleProfile,
    /// Expected path encoding in routing responses
    #[cfg_attr(feature = "serde", serde(default))]
    pub polyline: PolylineFormat,
    /// Routing service credential
    #[cfg_attr(feature = "serde", serde(default))]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deviation_threshold_m: default_threshold(),
            position: PositionStrategy::default(),
            vehicle: VehicleProfile::default(),
            polyline: PolylineFormat::default(),
            api_key: None,
        }
    }
}

impl Config {
    /// Returns [Config] for simulation, where the vehicle
    /// is held at this [Coordinate]. You can then customize [Self] as you will.
    pub fn simulation_preset(position: Coordinate) -> Self {
        let mut s = Self::default();
        s.position = PositionStrategy::Fixed(position);
        s
    }

    /// Returns [Config] for live operation, with desired read timeout.
    /// You can then customize [Self] as you will.
    pub fn live_preset(read_timeout: Duration) -> Self {
        let mut s = Self::default();
        s.position = PositionStrategy::Live {
            read_timeout,
            max_lines: default_max_lines(),
        };
        s
    }

    /// Copies and returns [Config] with updated deviation threshold.
    pub fn with_deviation_threshold(&self, threshold_m: f64) -> Self {
        let mut s = self.clone();
        s.deviation_threshold_m = threshold_m;
        s
    }

    /// Copies and returns [Config] with updated [VehicleProfile].
    pub fn with_vehicle(&self, vehicle: VehicleProfile) -> Self {
        let mut s = self.clone();
        s.vehicle = vehicle;
        s
    }

    /// Copies and returns [Config] with routing service credential.
    pub fn with_api_key(&self, api_key: &str) -> Self {
        let mut s = self.clone();
        s.api_key = Some(api_key.to_string());
        s
    }

    /// Verifies this [Config] may be deployed.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.deviation_threshold_m.is_finite() || self.deviation_threshold_m < 0.0 {
            return Err(Error::InvalidConfig("deviation threshold must be positive"));
        }
        match self.position {
            PositionStrategy::Fixed(coords) => {
                if !Coordinate::is_valid(coords.latitude, coords.longitude) {
                    return Err(Error::InvalidCoordinate(coords.latitude, coords.longitude));
                }
            },
            PositionStrategy::Live {
                read_timeout,
                max_lines,
            } => {
                if read_timeout <= Duration::ZERO {
                    return Err(Error::InvalidConfig("read timeout must be positive"));
                }
                if max_lines == 0 {
                    return Err(Error::InvalidConfig("max lines must be at least 1"));
                }
            },
        }
        Ok(())
    }
}
