//! Navigation planner
use hifitime::Epoch;
use log::{error, info, warn};

use crate::{
    cfg::Config,
    coordinate::{Coordinate, Fix},
    deviation::DeviationMonitor,
    diagnostics::{Category, Diagnostics, NullDiagnostics},
    error::Error,
    position::PositionAcquisition,
    route::Route,
    routing::{RouteProvider, RoutingService},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [NavigationState]. A [Route] only exists along the destination
/// that produced it.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavigationState {
    /// No destination: no route work
    #[default]
    NoDestination,
    /// Destination is set, no [Route] yet
    AwaitingRoute { destination: Coordinate },
    /// Following this [Route] to destination
    OnRoute {
        destination: Coordinate,
        route: Route,
    },
}

impl NavigationState {
    /// Current destination
    pub fn destination(&self) -> Option<&Coordinate> {
        match self {
            Self::NoDestination => None,
            Self::AwaitingRoute { destination } | Self::OnRoute { destination, .. } => {
                Some(destination)
            },
        }
    }

    /// Current [Route]
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::OnRoute { route, .. } => Some(route),
            _ => None,
        }
    }
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoDestination => write!(f, "no destination"),
            Self::AwaitingRoute { destination } => write!(f, "awaiting route to ({})", destination),
            Self::OnRoute { route, .. } => write!(f, "on route: {}", route),
        }
    }
}

/// [Transition] that occurred during a single update cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Transition {
    /// No destination, nothing to do
    Idle,
    /// First [Route] obtained
    Planned,
    /// [Route] planning failed: retried next cycle
    PlanFailed,
    /// Vehicle follows the route, `distance_m` away from closest waypoint
    Tracking { distance_m: f64 },
    /// Vehicle was deviated, new [Route] obtained
    Replanned { distance_m: f64 },
    /// Vehicle was deviated, [Route] planning failed: retried next cycle
    ReplanFailed { distance_m: f64 },
}

impl Transition {
    /// True if the vehicle was found deviated this cycle
    pub fn is_deviation(&self) -> bool {
        matches!(self, Self::Replanned { .. } | Self::ReplanFailed { .. })
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Planned => write!(f, "planned"),
            Self::PlanFailed => write!(f, "planning failed"),
            Self::Tracking { distance_m } => write!(f, "tracking ({:.1}m)", distance_m),
            Self::Replanned { distance_m } => write!(f, "deviated ({:.1}m): replanned", distance_m),
            Self::ReplanFailed { distance_m } => {
                write!(f, "deviated ({:.1}m): replanning failed", distance_m)
            },
        }
    }
}

/// [Snapshot] of the navigation state, emitted on each update cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Latest [Fix]
    pub fix: Fix,
    /// [NavigationState] at the end of the cycle
    pub state: NavigationState,
    /// [Transition] of this cycle
    pub transition: Transition,
    /// Update [Epoch]
    pub updated: Epoch,
}

impl Snapshot {
    /// Current position
    pub fn position(&self) -> &Coordinate {
        &self.fix.coordinate
    }

    /// Current destination
    pub fn destination(&self) -> Option<&Coordinate> {
        self.state.destination()
    }

    /// Current [Route]
    pub fn route(&self) -> Option<&Route> {
        self.state.route()
    }
}

/// [NavigationPlanner] samples the vehicle position, plans a [Route]
/// to destination and replans whenever the vehicle deviates from it.
/// It is fully synchronous: each [NavigationPlanner::update] runs one cycle,
/// driven by your own loop.
pub struct NavigationPlanner<S: RoutingService, D: Diagnostics = NullDiagnostics> {
    /// [Config] preset
    cfg: Config,
    /// [PositionAcquisition]
    acquisition: PositionAcquisition,
    /// [RouteProvider]
    provider: RouteProvider<S>,
    /// [DeviationMonitor]
    monitor: DeviationMonitor,
    /// [Diagnostics] sink
    diagnostics: D,
    /// [NavigationState]
    state: NavigationState,
    /// Latest [Fix]
    last_fix: Option<Fix>,
}

impl<S: RoutingService, D: Diagnostics> NavigationPlanner<S, D> {
    /// Creates a new [NavigationPlanner].
    /// ## Inputs
    /// - cfg: [Config] preset
    /// - acquisition: [PositionAcquisition], usually built with
    ///   [PositionAcquisition::open] which is the only fatal step
    /// - service: [RoutingService] client
    /// - diagnostics: [Diagnostics] sink, use [NullDiagnostics] if you do not need any.
    pub fn new(
        cfg: &Config,
        acquisition: PositionAcquisition,
        service: S,
        diagnostics: D,
    ) -> Result<Self, Error> {
        cfg.validate()?;

        info!(
            "navigation planner: position={} threshold={}m vehicle: {}",
            cfg.position, cfg.deviation_threshold_m, cfg.vehicle
        );

        if cfg.api_key.is_none() {
            warn!("no routing service credential");
        }

        Ok(Self {
            cfg: cfg.clone(),
            acquisition,
            provider: RouteProvider::new(cfg, service),
            monitor: DeviationMonitor::new(cfg.deviation_threshold_m),
            diagnostics,
            state: NavigationState::NoDestination,
            last_fix: None,
        })
    }

    /// Sets a new destination. Any existing [Route] is dropped
    /// and the next cycle will plan a new one.
    pub fn set_destination(&mut self, latitude: f64, longitude: f64) -> Result<(), Error> {
        let destination = Coordinate::new(latitude, longitude)?;
        info!("new destination ({})", destination);
        self.diagnostics.event(
            Category::Control,
            &format!("destination set to ({})", destination),
        );
        self.state = NavigationState::AwaitingRoute { destination };
        Ok(())
    }

    /// Clears the destination, dropping any [Route].
    pub fn clear_destination(&mut self) {
        info!("destination cleared");
        self.diagnostics
            .event(Category::Control, "destination cleared");
        self.state = NavigationState::NoDestination;
    }

    /// Runs a single update cycle. Returns None when no [Fix] was obtained,
    /// in which case nothing changed. Failures never abort the cycle:
    /// they are reported and retried on the next one.
    pub fn update(&mut self) -> Option<Snapshot> {
        let fix = self.acquisition.sample()?;

        self.diagnostics.fix(&fix);
        self.diagnostics
            .event(Category::Sensor, &format!("fix {}", fix));

        if let Some(previous) = self.last_fix {
            self.diagnostics.event(
                Category::Sync,
                &format!("{} since previous fix", previous.age(fix.epoch)),
            );
        }

        self.last_fix = Some(fix);

        let position = fix.coordinate;
        let state = std::mem::take(&mut self.state);

        let (state, transition) = match state {
            NavigationState::NoDestination => (NavigationState::NoDestination, Transition::Idle),
            NavigationState::AwaitingRoute { destination } => {
                match self.provider.try_plan(position, destination) {
                    Ok(route) => (
                        NavigationState::OnRoute { destination, route },
                        Transition::Planned,
                    ),
                    Err(e) => {
                        self.report(&e);
                        (
                            NavigationState::AwaitingRoute { destination },
                            Transition::PlanFailed,
                        )
                    },
                }
            },
            NavigationState::OnRoute { destination, route } => {
                let distance_m = self
                    .monitor
                    .nearest(&position, &route)
                    .map(|(_, distance_m)| distance_m)
                    .unwrap_or(f64::INFINITY);

                if !self.monitor.is_deviated(&position, &route) {
                    (
                        NavigationState::OnRoute { destination, route },
                        Transition::Tracking { distance_m },
                    )
                } else {
                    warn!("deviated from route ({:.1}m)", distance_m);
                    match self.provider.try_plan(position, destination) {
                        Ok(route) => (
                            NavigationState::OnRoute { destination, route },
                            Transition::Replanned { distance_m },
                        ),
                        Err(e) => {
                            self.report(&e);
                            (
                                NavigationState::AwaitingRoute { destination },
                                Transition::ReplanFailed { distance_m },
                            )
                        },
                    }
                }
            },
        };

        self.state = state;

        if transition != Transition::Idle {
            self.diagnostics
                .event(Category::Control, &format!("{}: {}", transition, self.state));
        }

        Some(Snapshot {
            fix,
            transition,
            state: self.state.clone(),
            updated: fix.epoch,
        })
    }

    fn report(&mut self, e: &Error) {
        if e.is_transient() {
            warn!("route planning failure: {}", e);
        } else {
            error!("route planning failure: {}", e);
        }
        self.diagnostics
            .event(Category::Diagnostic, &format!("route planning failure: {}", e));
    }

    /// Releases the position source, if live.
    pub fn cleanup(&mut self) {
        self.acquisition.close();
        self.diagnostics
            .event(Category::Diagnostic, "position source released");
    }

    /// Current [NavigationState]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Latest [Fix]
    pub fn position(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    /// Current destination
    pub fn destination(&self) -> Option<&Coordinate> {
        self.state.destination()
    }

    /// Current [Route]
    pub fn route(&self) -> Option<&Route> {
        self.state.route()
    }

    /// [Config] preset
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// [Diagnostics] sink
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
