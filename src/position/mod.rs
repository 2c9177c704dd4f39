//! Position acquisition
use hifitime::Duration;
use log::{debug, info, warn};

use crate::{
    cfg::{Config, PositionStrategy},
    coordinate::{Coordinate, Fix},
    error::Error,
};

mod nmea;
mod source;

pub use nmea::{decode_angle, is_position_sentence, parse_position};
pub use source::{LineSource, ReaderSource};

enum Strategy {
    /// Always returns this [Coordinate]
    Fixed(Coordinate),
    /// Reads the [LineSource], released once closed
    Live {
        source: Option<Box<dyn LineSource>>,
        read_timeout: Duration,
        max_lines: usize,
    },
}

/// [PositionAcquisition] produces timestamped [Fix]es,
/// either from a live [LineSource] or a fixed substitute [Coordinate].
pub struct PositionAcquisition {
    strategy: Strategy,
}

impl PositionAcquisition {
    /// Creates a fixed [PositionAcquisition]. It always succeeds.
    pub fn fixed(coordinate: Coordinate) -> Self {
        info!("fixed position acquisition ({})", coordinate);
        Self {
            strategy: Strategy::Fixed(coordinate),
        }
    }

    /// Creates a live [PositionAcquisition] reading this [LineSource].
    /// ## Inputs
    /// - source: [LineSource]
    /// - read_timeout: maximal wait for a single line
    /// - max_lines: maximal number of lines consumed per sample
    pub fn live(source: Box<dyn LineSource>, read_timeout: Duration, max_lines: usize) -> Self {
        info!("live position acquisition (timeout={})", read_timeout);
        Self {
            strategy: Strategy::Live {
                source: Some(source),
                read_timeout,
                max_lines: max_lines.max(1),
            },
        }
    }

    /// Creates a [PositionAcquisition] as described by [Config].
    /// The live strategy requires a [LineSource], ignored by the fixed strategy.
    pub fn from_config(cfg: &Config, source: Option<Box<dyn LineSource>>) -> Result<Self, Error> {
        match cfg.position {
            PositionStrategy::Fixed(coordinate) => Ok(Self::fixed(coordinate)),
            PositionStrategy::Live {
                read_timeout,
                max_lines,
            } => {
                let source = source.ok_or(Error::InvalidConfig(
                    "live strategy requires a position source",
                ))?;
                Ok(Self::live(source, read_timeout, max_lines))
            },
        }
    }

    /// Creates a [PositionAcquisition] as described by [Config],
    /// opening the live source at `path`. Opening failure is fatal.
    /// The resulting [ReaderSource] does not enforce the read timeout:
    /// a blocking device may stall a cycle. Configure the device timeout
    /// beforehand, or use [Self::live] with a [LineSource] that honors it.
    pub fn open<P: AsRef<std::path::Path>>(cfg: &Config, path: P) -> Result<Self, Error> {
        match cfg.position {
            PositionStrategy::Fixed(coordinate) => Ok(Self::fixed(coordinate)),
            PositionStrategy::Live { .. } => {
                let source = ReaderSource::open(path)?;
                Self::from_config(cfg, Some(Box::new(source)))
            },
        }
    }

    /// True if this acquisition reads a live source
    pub fn is_live(&self) -> bool {
        matches!(self.strategy, Strategy::Live { .. })
    }

    /// [Coordinate] sampling attempt, reporting why nothing was obtained.
    pub fn try_sample(&mut self) -> Result<Coordinate, Error> {
        match &mut self.strategy {
            Strategy::Fixed(coordinate) => Ok(*coordinate),
            Strategy::Live {
                source,
                read_timeout,
                max_lines,
            } => {
                let source = source.as_mut().ok_or(Error::SourceClosed)?;

                for _ in 0..*max_lines {
                    let line = match source.read_line(*read_timeout) {
                        Ok(Some(line)) => line,
                        Ok(None) => return Err(Error::NoSentence),
                        Err(e) => return Err(Error::SourceRead(e)),
                    };

                    if is_position_sentence(&line) {
                        return parse_position(&line);
                    }
                }

                Err(Error::NoSentence)
            },
        }
    }

    /// Samples a new [Fix]. Returns None when nothing could be obtained
    /// this cycle, which is not fatal: retry on a later cycle.
    pub fn sample(&mut self) -> Option<Fix> {
        match self.try_sample() {
            Ok(coordinate) => Some(Fix::now(coordinate)),
            Err(e) => {
                if e.is_transient() {
                    debug!("no fix: {}", e);
                } else {
                    warn!("no fix: {}", e);
                }
                None
            },
        }
    }

    /// Releases the live source. Following samples will not produce anything.
    pub fn close(&mut self) {
        if let Strategy::Live { source, .. } = &mut self.strategy {
            if let Some(mut source) = source.take() {
                source.close();
                info!("position source released");
            }
        }
    }
}
