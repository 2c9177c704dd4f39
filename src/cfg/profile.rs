use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [TransportMode] selects the road network and restrictions
/// the routing service applies to the planned path.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransportMode {
    /// [TransportMode::Car]: passenger vehicle
    #[cfg_attr(feature = "serde", serde(alias = "car", alias = "Car"))]
    Car,
    /// [TransportMode::Truck]: heavy vehicle. Dimensions and weight
    /// of the [super::VehicleProfile] only apply to this mode.
    /// This is our default mode.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "truck", alias = "Truck"))]
    Truck,
    /// [TransportMode::Pedestrian]: walking paths
    #[cfg_attr(feature = "serde", serde(alias = "pedestrian", alias = "Pedestrian"))]
    Pedestrian,
    /// [TransportMode::Bicycle]: cycling paths
    #[cfg_attr(feature = "serde", serde(alias = "bicycle", alias = "Bicycle"))]
    Bicycle,
    /// [TransportMode::Scooter]: light two wheelers
    #[cfg_attr(feature = "serde", serde(alias = "scooter", alias = "Scooter"))]
    Scooter,
}

impl TransportMode {
    /// True if dimensional and weight restrictions apply to this mode.
    pub fn is_restricted(&self) -> bool {
        *self == Self::Truck
    }
}

impl std::str::FromStr for TransportMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        let trimmed = s.trim();
        match trimmed {
            "car" => Ok(Self::Car),
            "truck" => Ok(Self::Truck),
            "pedestrian" => Ok(Self::Pedestrian),
            "bicycle" => Ok(Self::Bicycle),
            "scooter" => Ok(Self::Scooter),
            _ => Err(Error::UnknownTransportMode),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Car => write!(f, "car"),
            Self::Truck => write!(f, "truck"),
            Self::Pedestrian => write!(f, "pedestrian"),
            Self::Bicycle => write!(f, "bicycle"),
            Self::Scooter => write!(f, "scooter"),
        }
    }
}
