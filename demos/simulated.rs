// Simulated navigation example.
// The vehicle is held at a fixed position and the routing service is emulated
// by a closure, which is where you would plug your HTTP client.
use nav_planner::{
    polyline::encode,
    prelude::{
        Config, Coordinate, Error, LogDiagnostics, NavigationPlanner, PositionAcquisition,
        RouteRequest, RoutingResponse,
    },
};

use serde_json::json;

// Emulated routing service: straight line from origin to destination.
fn routing_service(request: &RouteRequest) -> Result<RoutingResponse, Error> {
    // You would typically URL encode these and issue an HTTP GET request
    for (key, value) in request.query_pairs() {
        log::debug!("{}={}", key, value);
    }

    let steps = 10;
    let (origin, destination) = (request.origin, request.destination);

    let path = (0..=steps)
        .map(|i| {
            let k = i as f64 / steps as f64;
            Coordinate::new_unchecked(
                origin.latitude + k * (destination.latitude - origin.latitude),
                origin.longitude + k * (destination.longitude - origin.longitude),
            )
        })
        .collect::<Vec<_>>();

    let length_m = origin.distance_m(&destination);

    Ok(RoutingResponse::new(
        200,
        json!({
            "routes": [{
                "sections": [{
                    "polyline": encode(&path, 5),
                    "summary": {
                        "length": length_m,
                        "duration": length_m / 13.0,
                    }
                }]
            }]
        }),
    ))
}

pub fn main() -> Result<(), Error> {
    env_logger::init();

    let glasgow = Coordinate::new(55.8659, -4.2829)?;

    // The preset API is useful to quickly deploy depending on your application.
    let cfg = Config::simulation_preset(glasgow).with_api_key("demo");

    // Position source opening is the only fatal step.
    // Fixed strategy ignores the source.
    let acquisition = PositionAcquisition::from_config(&cfg, None)?;

    let mut planner =
        NavigationPlanner::new(&cfg, acquisition, routing_service, LogDiagnostics::default())?;

    planner.set_destination(55.9520, -3.1890)?;

    // You drive the update cycles.
    for _ in 0..5 {
        match planner.update() {
            Some(snapshot) => println!("{} | {}", snapshot.transition, snapshot.state),
            None => println!("no fix"),
        }
    }

    planner.cleanup();
    Ok(())
}
