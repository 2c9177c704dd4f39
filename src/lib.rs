#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod coordinate;
mod deviation;
mod diagnostics;
mod error;
mod planner;
mod position;
mod route;
mod routing;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, PositionStrategy, TransportMode, VehicleProfile};
    pub use crate::constants::{DEFAULT_DEVIATION_THRESHOLD_M, EARTH_MEAN_RADIUS_M};
    pub use crate::coordinate::{Coordinate, Fix};
    pub use crate::deviation::{is_deviated, DeviationMonitor};
    pub use crate::diagnostics::{
        Category, Diagnostics, FixCounter, LogDiagnostics, NullDiagnostics,
    };
    pub use crate::error::{Error, PolylineError};
    pub use crate::planner::{NavigationPlanner, NavigationState, Snapshot, Transition};
    pub use crate::position::{LineSource, PositionAcquisition, ReaderSource};
    pub use crate::route::{Route, RouteSummary};
    pub use crate::routing::{
        PolylineFormat, RouteProvider, RouteRequest, RoutingResponse, RoutingService,
    };
    // re-export
    pub use hifitime::{Duration, Epoch};
}

/// Position sentence and angle decoding
pub mod nmea {
    pub use crate::position::{decode_angle, is_position_sentence, parse_position};
}

/// Compact path encodings
pub mod polyline {
    pub use crate::routing::{decode, decode_flexible, encode, PolylineFormat};
}

// pub export
pub use error::Error;
