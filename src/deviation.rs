//! Route deviation monitoring
use crate::{constants::DEFAULT_DEVIATION_THRESHOLD_M, coordinate::Coordinate, route::Route};

/// True if `position` is farther than `threshold_m` from every [Route] waypoint.
/// An empty [Route] is always deviated: there is nothing to conform to.
/// The scan stops on the first waypoint within threshold.
pub fn is_deviated(position: &Coordinate, route: &Route, threshold_m: f64) -> bool {
    !route
        .waypoints()
        .iter()
        .any(|waypoint| position.distance_m(waypoint) <= threshold_m)
}

/// [DeviationMonitor] verifies the vehicle follows the planned [Route].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationMonitor {
    /// Default threshold, in meters
    threshold_m: f64,
}

impl Default for DeviationMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_DEVIATION_THRESHOLD_M)
    }
}

impl DeviationMonitor {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Default threshold, in meters
    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// True if `position` deviates from [Route], using default threshold.
    pub fn is_deviated(&self, position: &Coordinate, route: &Route) -> bool {
        is_deviated(position, route, self.threshold_m)
    }

    /// True if `position` deviates from [Route], using custom threshold.
    pub fn is_deviated_with(&self, position: &Coordinate, route: &Route, threshold_m: f64) -> bool {
        is_deviated(position, route, threshold_m)
    }

    /// Returns index and distance (in meters) of the waypoint closest to `position`.
    pub fn nearest(&self, position: &Coordinate, route: &Route) -> Option<(usize, f64)> {
        route
            .waypoints()
            .iter()
            .map(|waypoint| position.distance_m(waypoint))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}
