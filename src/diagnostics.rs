//! Diagnostics sinks
use std::{collections::HashMap, time::Instant};

use hifitime::{Duration, Epoch};
use log::{log, Level};

use crate::{coordinate::Fix, error::Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diagnostics event [Category]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// System health
    Diagnostic,
    /// Sensor (position source) metrics
    Sensor,
    /// Synchronization
    Sync,
    /// Control decisions (state transitions)
    Control,
    /// Performance monitoring
    Performance,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Diagnostic,
        Self::Sensor,
        Self::Sync,
        Self::Control,
        Self::Performance,
    ];

    /// `log` target of this [Category]
    pub fn target(&self) -> &'static str {
        match self {
            Self::Diagnostic => "nav::diagnostic",
            Self::Sensor => "nav::sensor",
            Self::Sync => "nav::sync",
            Self::Control => "nav::control",
            Self::Performance => "nav::performance",
        }
    }

    /// Default [Level] of this [Category]
    pub fn level(&self) -> Level {
        match self {
            Self::Diagnostic => Level::Warn,
            Self::Performance | Self::Sync => Level::Debug,
            Self::Sensor | Self::Control => Level::Info,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Diagnostic => write!(f, "diagnostic"),
            Self::Sensor => write!(f, "sensor"),
            Self::Sync => write!(f, "sync"),
            Self::Control => write!(f, "control"),
            Self::Performance => write!(f, "performance"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diagnostic" => Ok(Self::Diagnostic),
            "sensor" => Ok(Self::Sensor),
            "sync" => Ok(Self::Sync),
            "control" => Ok(Self::Control),
            "performance" => Ok(Self::Performance),
            _ => Err(Error::InvalidConfig("unknown diagnostics category")),
        }
    }
}

/// Any diagnostics sink should implement the [Diagnostics] trait.
/// Diagnostics are never required for correctness:
/// [NullDiagnostics] may be used instead, with no behavior change.
pub trait Diagnostics {
    /// Reports a (category, message) event
    fn event(&mut self, category: Category, message: &str);

    /// Reports a new [Fix]
    fn fix(&mut self, _fix: &Fix) {}
}

/// [NullDiagnostics] discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn event(&mut self, _: Category, _: &str) {}
}

/// Events are forwarded to both sinks.
impl<A: Diagnostics, B: Diagnostics> Diagnostics for (A, B) {
    fn event(&mut self, category: Category, message: &str) {
        self.0.event(category, message);
        self.1.event(category, message);
    }

    fn fix(&mut self, fix: &Fix) {
        self.0.fix(fix);
        self.1.fix(fix);
    }
}

/// [LogDiagnostics] forwards events to the `log` facade,
/// each [Category] having its own target.
#[derive(Debug, Clone)]
pub struct LogDiagnostics {
    /// Disabled [Category]s
    disabled: Vec<Category>,
    /// Minimal interval between two events of the same [Category]
    min_interval: Option<Duration>,
    /// Last emission, per [Category]
    last: HashMap<Category, Instant>,
    /// [Level] overrides, per [Category]
    levels: HashMap<Category, Level>,
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self {
            disabled: Vec::with_capacity(Category::ALL.len()),
            min_interval: None,
            last: HashMap::with_capacity(Category::ALL.len()),
            levels: HashMap::with_capacity(Category::ALL.len()),
        }
    }
}

impl LogDiagnostics {
    /// Creates a new [LogDiagnostics] where each [Category] emits at most
    /// one event per `min_interval`.
    pub fn rate_limited(min_interval: Duration) -> Self {
        let mut s = Self::default();
        s.min_interval = Some(min_interval);
        s
    }

    /// Enables or disables this [Category]
    pub fn toggle(&mut self, category: Category, enable: bool) {
        self.disabled.retain(|c| *c != category);
        if !enable {
            self.disabled.push(category);
        }
        log::info!(
            "{} {} logging",
            if enable { "enabled" } else { "disabled" },
            category
        );
    }

    /// Changes the [Level] this [Category] is emitted at
    pub fn set_level(&mut self, category: Category, level: Level) {
        self.levels.insert(category, level);
        log::info!("{} logging level set to {}", category, level);
    }

    /// [Level] this [Category] is currently emitted at
    pub fn level(&self, category: Category) -> Level {
        self.levels
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.level())
    }

    /// True if this [Category] is currently emitted
    pub fn is_enabled(&self, category: Category) -> bool {
        !self.disabled.contains(&category)
    }

    fn allowed(&mut self, category: Category) -> bool {
        let Some(min_interval) = self.min_interval else {
            return true;
        };
        let now = Instant::now();
        if let Some(last) = self.last.get(&category) {
            if now.duration_since(*last).as_secs_f64() < min_interval.to_seconds() {
                return false;
            }
        }
        self.last.insert(category, now);
        true
    }
}

impl Diagnostics for LogDiagnostics {
    fn event(&mut self, category: Category, message: &str) {
        if self.is_enabled(category) && self.allowed(category) {
            log!(target: category.target(), self.level(category), "{}", message);
        }
    }
}

/// [FixCounter] counts the [Fix]es and remembers the latest capture [Epoch].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixCounter {
    count: usize,
    last: Option<Epoch>,
}

impl FixCounter {
    /// Number of [Fix]es so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Latest [Fix] capture [Epoch]
    pub fn last(&self) -> Option<Epoch> {
        self.last
    }
}

impl Diagnostics for FixCounter {
    fn event(&mut self, _: Category, _: &str) {}

    fn fix(&mut self, fix: &Fix) {
        self.count += 1;
        self.last = Some(fix.epoch);
    }
}

#[cfg(test)]
mod test {
    use super::{Category, Diagnostics, FixCounter, LogDiagnostics, NullDiagnostics};
    use crate::{
        prelude::{Coordinate, Duration, Epoch, Fix},
        tests::init_logger,
    };
    use log::Level;
    use std::str::FromStr;

    #[test]
    fn categories() {
        for category in Category::ALL {
            let parsed = Category::from_str(&category.to_string()).unwrap();
            assert_eq!(parsed, category);
            assert!(category.target().starts_with("nav::"));
        }
        assert!(Category::from_str("ui").is_err());
    }

    #[test]
    fn fix_counter() {
        let mut counter = FixCounter::default();
        assert_eq!(counter.count(), 0);
        assert!(counter.last().is_none());

        let t0 = Epoch::from_gregorian_utc_at_midnight(2026, 10, 19);
        let t1 = t0 + Duration::from_seconds(1.0);

        counter.fix(&Fix::new(Coordinate::default(), t0));
        counter.event(Category::Sensor, "ignored");
        counter.fix(&Fix::new(Coordinate::default(), t1));

        assert_eq!(counter.count(), 2);
        assert_eq!(counter.last(), Some(t1));
    }

    #[test]
    fn fan_out() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2026, 10, 19);
        let mut sinks = (FixCounter::default(), NullDiagnostics);
        sinks.fix(&Fix::new(Coordinate::default(), t0));
        sinks.event(Category::Control, "event");
        assert_eq!(sinks.0.count(), 1);
    }

    #[test]
    fn log_diagnostics() {
        init_logger();

        let mut diag = LogDiagnostics::default();
        for category in Category::ALL {
            assert!(diag.is_enabled(category));
            diag.event(category, "event");
        }

        diag.toggle(Category::Sensor, false);
        assert!(!diag.is_enabled(Category::Sensor));
        assert!(diag.is_enabled(Category::Control));

        diag.toggle(Category::Sensor, true);
        assert!(diag.is_enabled(Category::Sensor));
    }

    #[test]
    fn level_override() {
        init_logger();

        let mut diag = LogDiagnostics::default();
        assert_eq!(diag.level(Category::Sensor), Level::Info);
        assert_eq!(diag.level(Category::Diagnostic), Level::Warn);

        diag.set_level(Category::Sensor, Level::Trace);
        assert_eq!(diag.level(Category::Sensor), Level::Trace);
        assert_eq!(diag.level(Category::Control), Category::Control.level());

        diag.event(Category::Sensor, "event");
    }

    #[test]
    fn rate_limiting() {
        let mut diag = LogDiagnostics::rate_limited(Duration::from_seconds(3600.0));
        assert!(diag.allowed(Category::Sensor));
        assert!(!diag.allowed(Category::Sensor));
        assert!(diag.allowed(Category::Control));

        let mut diag = LogDiagnostics::default();
        assert!(diag.allowed(Category::Sensor));
        assert!(diag.allowed(Category::Sensor));
    }
}
