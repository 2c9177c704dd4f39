use thiserror::Error;

/// Polyline decoding error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    /// Character does not belong to the encoding alphabet
    #[error("invalid polyline character '{0}' at offset {1}")]
    InvalidCharacter(char, usize),

    /// Input ended in the middle of a value
    #[error("truncated polyline value")]
    Truncated,

    /// Value does not fit into 64 bits
    #[error("polyline value overflow")]
    Overflow,

    /// Flexible polyline header version we do not know
    #[error("unsupported polyline version {0}")]
    UnsupportedVersion(u64),

    /// Flexible polyline header is malformed
    #[error("invalid polyline header")]
    InvalidHeader,

    /// Coordinates come in pairs (or triplets): we're left with a dangling value.
    #[error("odd number of polyline values")]
    IncompletePair,

    /// Decoded value is not a valid geodetic coordinate
    #[error("decoded coordinate out of range: lat={0}, lon={1}")]
    OutOfRange(f64, f64),
}

#[derive(Debug, Error)]
pub enum Error {
    /// Position source could not be opened. This is the only fatal
    /// error: nothing can be acquired once we wind up here.
    #[error("failed to open position source: {0}")]
    SourceUnavailable(std::io::Error),

    /// Position source I/O failure while reading a line.
    /// Treated as "no fix this cycle".
    #[error("position source read error: {0}")]
    SourceRead(std::io::Error),

    /// Position source has been released with [crate::prelude::NavigationPlanner::cleanup]
    #[error("position source is closed")]
    SourceClosed,

    /// No position sentence came out of the source within the read budget.
    #[error("no position sentence available")]
    NoSentence,

    /// Position sentence was received but does not carry the valid fix marker.
    #[error("position sentence without valid fix")]
    NoFix,

    /// Position sentence could not be interpreted
    #[error("malformed position sentence: {0}")]
    MalformedSentence(String),

    /// Position sentence checksum does not match its content
    #[error("checksum mismatch: expected {expected:02X}, got {computed:02X}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    /// Coordinate outside of the geodetic range
    #[error("invalid coordinate: lat={0}, lon={1}")]
    InvalidCoordinate(f64, f64),

    /// Routing service could not be reached
    #[error("routing service failure: {0}")]
    RoutingTransport(String),

    /// Routing service responded with a non success status code
    #[error("routing service returned status {0}")]
    RoutingStatus(u16),

    /// Routing service response does not contain the expected path
    #[error("routing response is missing field \"{0}\"")]
    MissingField(&'static str),

    /// Routing service returned a path without a single waypoint
    #[error("routing service returned an empty path")]
    EmptyRoute,

    /// Path encoding could not be decoded
    #[error("polyline decoding error: {0}")]
    Polyline(#[from] PolylineError),

    /// Unknown transport mode
    #[error("unknown transport mode")]
    UnknownTransportMode,

    /// Unknown polyline format
    #[error("unknown polyline format")]
    UnknownPolylineFormat,

    /// Configuration value that cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Error {
    /// True when this [Error] only means "nothing this cycle":
    /// a later cycle may succeed without any intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NoSentence | Self::NoFix | Self::RoutingTransport(_) => true,
            Self::RoutingStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, PolylineError};
    use std::io::ErrorKind;

    #[test]
    fn transient_errors() {
        for e in [
            Error::NoSentence,
            Error::NoFix,
            Error::RoutingTransport("connection reset".to_string()),
            Error::RoutingStatus(429),
            Error::RoutingStatus(503),
        ] {
            assert!(e.is_transient(), "{}", e);
        }

        for e in [
            Error::SourceUnavailable(ErrorKind::NotFound.into()),
            Error::SourceClosed,
            Error::ChecksumMismatch {
                expected: 0x5F,
                computed: 0x5E,
            },
            Error::RoutingStatus(401),
            Error::MissingField("routes"),
            Error::Polyline(PolylineError::Overflow),
            Error::InvalidConfig("max_lines"),
        ] {
            assert!(!e.is_transient(), "{}", e);
        }
    }
}
