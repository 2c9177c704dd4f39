use crate::cfg::TransportMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default vehicle height (cm)
const fn default_height_cm() -> Option<u32> {
    Some(380)
}

/// Default vehicle width (cm)
const fn default_width_cm() -> Option<u32> {
    Some(250)
}

/// Default vehicle length (cm)
const fn default_length_cm() -> Option<u32> {
    Some(1200)
}

/// Default gross weight (kg)
const fn default_gross_weight_kg() -> Option<u32> {
    Some(18_000)
}

/// Default number of axles
const fn default_axle_count() -> Option<u8> {
    Some(3)
}

/// [VehicleProfile] is forwarded to the routing service with each request,
/// so the planned path complies with the vehicle restrictions.
/// Restrictions that are not defined are not sent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleProfile {
    /// [TransportMode] of this vehicle
    #[cfg_attr(feature = "serde", serde(default, alias = "mode"))]
    pub transport_mode: TransportMode,

    /// Vehicle height in centimeters
    #[cfg_attr(
        feature = "serde",
        serde(alias = "height", default = "default_height_cm")
    )]
    pub height_cm: Option<u32>,

    /// Vehicle width in centimeters
    #[cfg_attr(feature = "serde", serde(alias = "width", default = "default_width_cm"))]
    pub width_cm: Option<u32>,

    /// Vehicle length in centimeters
    #[cfg_attr(
        feature = "serde",
        serde(alias = "length", default = "default_length_cm")
    )]
    pub length_cm: Option<u32>,

    /// Gross weight in kilograms
    #[cfg_attr(
        feature = "serde",
        serde(alias = "weight", default = "default_gross_weight_kg")
    )]
    pub gross_weight_kg: Option<u32>,

    /// Number of axles
    #[cfg_attr(feature = "serde", serde(alias = "axles", default = "default_axle_count"))]
    pub axle_count: Option<u8>,
}

impl std::fmt::Display for VehicleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "mode=\"{}\"", self.transport_mode)?;
        if let Some(height) = self.height_cm {
            write!(f, " height={}cm", height)?;
        }
        if let Some(width) = self.width_cm {
            write!(f, " width={}cm", width)?;
        }
        if let Some(length) = self.length_cm {
            write!(f, " length={}cm", length)?;
        }
        if let Some(weight) = self.gross_weight_kg {
            write!(f, " weight={}kg", weight)?;
        }
        if let Some(axles) = self.axle_count {
            write!(f, " axles={}", axles)?;
        }
        Ok(())
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            transport_mode: TransportMode::default(),
            height_cm: default_height_cm(),
            width_cm: default_width_cm(),
            length_cm: default_length_cm(),
            gross_weight_kg: default_gross_weight_kg(),
            axle_count: default_axle_count(),
        }
    }
}

impl VehicleProfile {
    /// Creates an unrestricted [VehicleProfile] for this [TransportMode].
    pub fn unrestricted(transport_mode: TransportMode) -> Self {
        Self {
            transport_mode,
            height_cm: None,
            width_cm: None,
            length_cm: None,
            gross_weight_kg: None,
            axle_count: None,
        }
    }

    /// Returns the (key, value) vehicle parameters of a routing request.
    /// Dimensions and weight are only emitted for restricted modes.
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("transportMode".to_string(), self.transport_mode.to_string())];
        if !self.transport_mode.is_restricted() {
            return pairs;
        }
        let restrictions = [
            ("vehicle[height]", self.height_cm),
            ("vehicle[width]", self.width_cm),
            ("vehicle[length]", self.length_cm),
            ("vehicle[grossWeight]", self.gross_weight_kg),
            ("vehicle[axleCount]", self.axle_count.map(u32::from)),
        ];
        for (key, value) in restrictions {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        pairs
    }
}
