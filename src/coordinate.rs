//! Geodetic coordinates
use crate::{constants::EARTH_MEAN_RADIUS_M, error::Error};

use hifitime::{Duration, Epoch};
use log::error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Coordinate] is a (latitude, longitude) pair in decimal degrees.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in decimal degrees, within [-90, 90]
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    #[cfg_attr(feature = "serde", serde(alias = "lon", alias = "lng"))]
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a new [Coordinate], verifying the geodetic range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !Self::is_valid(latitude, longitude) {
            return Err(Error::InvalidCoordinate(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a new [Coordinate] without range verification.
    /// Decoders use this so suspicious values (like a 0.0 fallback)
    /// are forwarded untouched.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True if (latitude, longitude) is a valid geodetic pair.
    pub fn is_valid(latitude: f64, longitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
    }

    /// Great circle (haversine) distance to `rhs`, in meters.
    pub fn distance_m(&self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), rhs.latitude.to_radians());
        let dlat = (rhs.latitude - self.latitude).to_radians();
        let dlon = (rhs.longitude - self.longitude).to_radians();

        let sin_dlat = (dlat / 2.0).sin();
        let sin_dlon = (dlon / 2.0).sin();

        let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_MEAN_RADIUS_M * c
    }

    /// Initial forward azimuth towards `rhs`, in degrees within [0, 360[.
    pub fn bearing_deg(&self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), rhs.latitude.to_radians());
        let dlon = (rhs.longitude - self.longitude).to_radians();

        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "lat={:.6}°, lon={:.6}°", self.latitude, self.longitude)
    }
}

/// [Fix] is a single position sample, with its capture [Epoch].
/// A new [Fix] supersedes the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    /// Sampled [Coordinate]
    pub coordinate: Coordinate,
    /// Capture [Epoch]
    pub epoch: Epoch,
}

impl Fix {
    pub fn new(coordinate: Coordinate, epoch: Epoch) -> Self {
        Self { coordinate, epoch }
    }

    /// Creates a [Fix] captured right now.
    pub fn now(coordinate: Coordinate) -> Self {
        let epoch = Epoch::now().unwrap_or_else(|e| {
            error!("failed to read system time: {}", e);
            Epoch::default()
        });
        Self::new(coordinate, epoch)
    }

    /// Age of this [Fix] at `now`
    pub fn age(&self, now: Epoch) -> Duration {
        now - self.epoch
    }
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.epoch, self.coordinate)
    }
}

#[cfg(test)]
mod test {
    use super::{Coordinate, Fix};
    use hifitime::{Duration, Epoch};

    #[test]
    fn coordinate_range() {
        assert!(Coordinate::new(55.8659, -4.2829).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let a = Coordinate::new_unchecked(35.0, 139.0);
        let b = Coordinate::new_unchecked(36.0, 139.0);
        let d = a.distance_m(&b);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
        assert!(a.bearing_deg(&b) < 1.0E-6);
    }

    #[test]
    fn haversine_glasgow() {
        let a = Coordinate::new_unchecked(55.8659, -4.2829);
        let b = Coordinate::new_unchecked(55.9000, -4.3000);
        let d = a.distance_m(&b);
        assert!(d > 3_500.0 && d < 4_500.0, "got {}", d);
        assert_eq!(a.distance_m(&a), 0.0);
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1.0E-6);
    }

    #[test]
    fn bearing_east() {
        let a = Coordinate::new_unchecked(0.0, 0.0);
        let b = Coordinate::new_unchecked(0.0, 1.0);
        assert!((a.bearing_deg(&b) - 90.0).abs() < 1.0E-9);
        assert!((b.bearing_deg(&a) - 270.0).abs() < 1.0E-9);
    }

    #[test]
    fn fix_age() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2026, 10, 19);
        let fix = Fix::new(Coordinate::new_unchecked(55.8659, -4.2829), t0);

        assert_eq!(fix.age(t0), Duration::ZERO);
        assert_eq!(
            fix.age(t0 + Duration::from_seconds(1.5)),
            Duration::from_seconds(1.5)
        );

        let later = Fix::now(fix.coordinate);
        assert!(later.age(later.epoch + Duration::from_seconds(1.0)) > Duration::ZERO);
    }
}
