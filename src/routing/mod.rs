//! Route planning, through a remote routing service.
use log::{debug, error, info};

use serde_json::Value;

use crate::{
    cfg::{Config, VehicleProfile},
    coordinate::Coordinate,
    error::Error,
    route::{Route, RouteSummary},
};

use hifitime::Duration;

mod polyline;

pub use polyline::{decode, decode_flexible, encode, PolylineFormat};

/// Response format we request: encoded path plus summary
const RETURN_FIELDS: &str = "polyline,summary";

/// [RouteRequest] describes a single remote route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Where the route should start
    pub origin: Coordinate,
    /// Where the route should end
    pub destination: Coordinate,
    /// [VehicleProfile] the route must comply with
    pub vehicle: VehicleProfile,
    /// Routing service credential
    pub api_key: Option<String>,
}

impl RouteRequest {
    /// Returns the (key, value) parameters of this request,
    /// ready to be URL encoded by the transport.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.vehicle.query_pairs();
        pairs.push((
            "origin".to_string(),
            format!("{},{}", self.origin.latitude, self.origin.longitude),
        ));
        pairs.push((
            "destination".to_string(),
            format!(
                "{},{}",
                self.destination.latitude, self.destination.longitude
            ),
        ));
        pairs.push(("return".to_string(), RETURN_FIELDS.to_string()));
        if let Some(api_key) = &self.api_key {
            pairs.push(("apiKey".to_string(), api_key.clone()));
        }
        pairs
    }
}

/// [RoutingResponse] is the raw (status, JSON body) returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Decoded JSON body
    pub body: Value,
}

impl RoutingResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// True if the service reported a success status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Any routing service client should implement the [RoutingService] trait.
///
/// The client only needs to send the [RouteRequest] and return the decoded
/// JSON body along its status code. Transport failures (unreachable host,
/// invalid JSON..) should be reported as [Error::RoutingTransport].
/// This call may block for the duration of the round trip:
/// we never issue more than one request at a time.
pub trait RoutingService {
    fn request(&mut self, request: &RouteRequest) -> Result<RoutingResponse, Error>;
}

impl<F> RoutingService for F
where
    F: FnMut(&RouteRequest) -> Result<RoutingResponse, Error>,
{
    fn request(&mut self, request: &RouteRequest) -> Result<RoutingResponse, Error> {
        (self)(request)
    }
}

/// [RouteProvider] obtains [Route]s from a [RoutingService].
/// It does not retry: a failed attempt is retried on the next cycle.
pub struct RouteProvider<S: RoutingService> {
    /// [RoutingService] client
    service: S,
    /// Expected [PolylineFormat]
    format: PolylineFormat,
    /// [VehicleProfile] sent with each request
    vehicle: VehicleProfile,
    /// Service credential
    api_key: Option<String>,
}

fn section_summary(section: &Value) -> Option<RouteSummary> {
    let summary = section.get("summary")?;
    let length_m = summary.get("length")?.as_f64()?;
    let duration_s = summary.get("duration")?.as_f64()?;
    Some(RouteSummary {
        length_m,
        duration: Duration::from_seconds(duration_s),
    })
}

impl<S: RoutingService> RouteProvider<S> {
    /// Creates a new [RouteProvider] from the [Config] preset.
    pub fn new(cfg: &Config, service: S) -> Self {
        Self {
            service,
            format: cfg.polyline,
            vehicle: cfg.vehicle,
            api_key: cfg.api_key.clone(),
        }
    }

    /// Forms the [RouteRequest] from `origin` to `destination`.
    pub fn request(&self, origin: Coordinate, destination: Coordinate) -> RouteRequest {
        RouteRequest {
            origin,
            destination,
            vehicle: self.vehicle,
            api_key: self.api_key.clone(),
        }
    }

    /// [Route] planning attempt, from `origin` to `destination`.
    /// Any failure is reported with its cause.
    pub fn try_plan(&mut self, origin: Coordinate, destination: Coordinate) -> Result<Route, Error> {
        let request = self.request(origin, destination);

        debug!("route request from ({}) to ({})", origin, destination);

        let response = self.service.request(&request)?;

        if !response.is_success() {
            return Err(Error::RoutingStatus(response.status));
        }

        self.decode(&response.body)
    }

    /// [Route] planning from `origin` to `destination`.
    /// Returns an empty [Route] on failure, which is then logged.
    pub fn plan(&mut self, origin: Coordinate, destination: Coordinate) -> Route {
        match self.try_plan(origin, destination) {
            Ok(route) => route,
            Err(e) => {
                error!("route planning failure: {}", e);
                Route::empty()
            },
        }
    }

    /// Interprets the routing response body.
    /// Sections of the first route are concatenated in order.
    fn decode(&self, body: &Value) -> Result<Route, Error> {
        let route = body
            .get("routes")
            .and_then(Value::as_array)
            .and_then(|routes| routes.first())
            .ok_or(Error::MissingField("routes"))?;

        let sections = route
            .get("sections")
            .and_then(Value::as_array)
            .filter(|sections| !sections.is_empty())
            .ok_or(Error::MissingField("sections"))?;

        let mut waypoints = Vec::<Coordinate>::new();
        let mut summary = Some(RouteSummary::default());

        for section in sections {
            let encoded = section
                .get("polyline")
                .and_then(Value::as_str)
                .ok_or(Error::MissingField("polyline"))?;

            let decoded = self.format.decode(encoded)?;

            // consecutive sections share their junction
            let skip = match (waypoints.last(), decoded.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };

            waypoints.extend(decoded.into_iter().skip(skip));

            summary = match (summary, section_summary(section)) {
                (Some(mut total), Some(section)) => {
                    total += section;
                    Some(total)
                },
                _ => None,
            };
        }

        if waypoints.is_empty() {
            return Err(Error::EmptyRoute);
        }

        let route = Route::new(waypoints);

        let route = match summary {
            Some(summary) => {
                info!(
                    "new route: {} ({:.1} km, {})",
                    route,
                    summary.length_m / 1000.0,
                    summary.duration
                );
                route.with_summary(summary)
            },
            None => {
                info!("new route: {}", route);
                route
            },
        };

        Ok(route)
    }
}
