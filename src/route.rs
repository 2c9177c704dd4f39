//! Planned route
use itertools::Itertools;

use hifitime::Duration;

use crate::coordinate::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [RouteSummary] as reported by the routing service.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSummary {
    /// Total length in meters
    pub length_m: f64,
    /// Expected travel [Duration]
    pub duration: Duration,
}

impl std::ops::AddAssign for RouteSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.length_m += rhs.length_m;
        self.duration += rhs.duration;
    }
}

/// [Route] is the ordered list of waypoints from origin to destination,
/// in traversal order. A [Route] is replaced wholesale on recalculation,
/// it is never edited.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    waypoints: Vec<Coordinate>,
    summary: Option<RouteSummary>,
}

impl Route {
    /// Builds a new [Route] from waypoints in traversal order.
    pub fn new(waypoints: Vec<Coordinate>) -> Self {
        Self {
            waypoints,
            summary: None,
        }
    }

    /// Builds an empty [Route], meaning there is no plan.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copies and returns [Route] with attached [RouteSummary].
    pub fn with_summary(&self, summary: RouteSummary) -> Self {
        let mut s = self.clone();
        s.summary = Some(summary);
        s
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint
    pub fn origin(&self) -> Option<&Coordinate> {
        self.waypoints.first()
    }

    /// Last waypoint
    pub fn destination(&self) -> Option<&Coordinate> {
        self.waypoints.last()
    }

    /// [RouteSummary], when provided by the routing service.
    pub fn summary(&self) -> Option<&RouteSummary> {
        self.summary.as_ref()
    }

    /// Length of this [Route] in meters, summing consecutive great circle legs.
    pub fn length_m(&self) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance_m(b))
            .sum()
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.origin(), self.destination()) {
            (Some(origin), Some(destination)) => write!(
                f,
                "{} waypoints from ({}) to ({})",
                self.len(),
                origin,
                destination
            ),
            _ => write!(f, "empty route"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Route, RouteSummary};
    use crate::prelude::{Coordinate, Duration};

    #[test]
    fn empty_route() {
        let route = Route::empty();
        assert!(route.is_empty());
        assert_eq!(route.len(), 0);
        assert!(route.origin().is_none());
        assert_eq!(route.length_m(), 0.0);
        assert_eq!(route.to_string(), "empty route");
    }

    #[test]
    fn route_length() {
        let route = Route::new(vec![
            Coordinate::new_unchecked(35.0, 139.0),
            Coordinate::new_unchecked(36.0, 139.0),
            Coordinate::new_unchecked(37.0, 139.0),
        ]);
        assert_eq!(route.len(), 3);
        assert_eq!(route.origin(), Some(&Coordinate::new_unchecked(35.0, 139.0)));
        assert_eq!(
            route.destination(),
            Some(&Coordinate::new_unchecked(37.0, 139.0))
        );
        let length = route.length_m();
        assert!((length - 222_390.0).abs() < 200.0, "got {}", length);
    }

    #[test]
    fn summary_accumulation() {
        let mut summary = RouteSummary {
            length_m: 1000.0,
            duration: Duration::from_seconds(60.0),
        };
        summary += RouteSummary {
            length_m: 500.0,
            duration: Duration::from_seconds(30.0),
        };
        assert_eq!(summary.length_m, 1500.0);
        assert_eq!(summary.duration, Duration::from_seconds(90.0));

        let route = Route::new(vec![Coordinate::default()]).with_summary(summary);
        assert_eq!(route.summary(), Some(&summary));
    }
}
