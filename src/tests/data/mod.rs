use serde_json::{json, Value};

use crate::prelude::{Coordinate, RoutingResponse};
use crate::routing::encode;

/// Glasgow, George Square
pub const GLASGOW: Coordinate = Coordinate::new_unchecked(55.8659, -4.2829);

/// North west of Glasgow, about 4km away
pub const MARYHILL: Coordinate = Coordinate::new_unchecked(55.9000, -4.3000);

/// Edinburgh, Waverley
pub const EDINBURGH: Coordinate = Coordinate::new_unchecked(55.9520, -3.1890);

/// Short path starting at [GLASGOW], heading east
pub fn glasgow_path() -> Vec<Coordinate> {
    vec![
        GLASGOW,
        Coordinate::new_unchecked(55.8661, -4.2800),
        Coordinate::new_unchecked(55.8670, -4.2700),
        Coordinate::new_unchecked(55.8700, -4.2500),
    ]
}

/// Short path starting at [MARYHILL]
pub fn maryhill_path() -> Vec<Coordinate> {
    vec![
        MARYHILL,
        Coordinate::new_unchecked(55.9010, -4.2900),
        Coordinate::new_unchecked(55.9030, -4.2700),
    ]
}

/// Routing service section
pub fn section(path: &[Coordinate], length_m: f64, duration_s: f64) -> Value {
    json!({
        "id": "section-0",
        "type": "vehicle",
        "polyline": encode(path, 5),
        "summary": {
            "length": length_m,
            "duration": duration_s,
        },
    })
}

/// Successful routing service response, made of these sections
pub fn route_response(sections: Vec<Value>) -> RoutingResponse {
    RoutingResponse::new(
        200,
        json!({
            "routes": [
                {
                    "id": "route-0",
                    "sections": sections,
                }
            ]
        }),
    )
}

/// Successful routing service response, single section
pub fn single_route_response(path: &[Coordinate]) -> RoutingResponse {
    route_response(vec![section(path, 1_500.0, 180.0)])
}

/// Routing service failure
pub fn error_response(status: u16) -> RoutingResponse {
    RoutingResponse::new(
        status,
        json!({
            "title": "Malformed request",
            "status": status,
        }),
    )
}
