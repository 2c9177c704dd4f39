//! Compact path encodings.
//!
//! Both formats describe an ordered list of coordinates as zig-zag encoded deltas,
//! split in 5-bit chunks, each chunk being printed as a single character:
//! - the classic format uses fixed precision and the `?`..`~` character range
//! - the flexible format uses a URL-safe alphabet and starts with a header
//!   carrying its own precision and optional third dimension.
use crate::{
    constants::DEFAULT_POLYLINE_PRECISION,
    coordinate::Coordinate,
    error::{Error, PolylineError},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const FLEXIBLE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const FLEXIBLE_VERSION: u64 = 1;

/// [PolylineFormat] describes the path encoding used by the routing service.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolylineFormat {
    /// Picks [PolylineFormat::Flexible] when the encoded string starts with
    /// a valid flexible header, [PolylineFormat::Encoded] with default precision otherwise.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "auto"))]
    Auto,
    /// Classic encoding with fixed decimal precision (5 is standard)
    #[cfg_attr(feature = "serde", serde(alias = "encoded"))]
    Encoded { precision: u32 },
    /// Header-versioned flexible encoding
    #[cfg_attr(feature = "serde", serde(alias = "flexible"))]
    Flexible,
}

impl std::str::FromStr for PolylineFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "encoded" | "polyline" => Ok(Self::Encoded {
                precision: DEFAULT_POLYLINE_PRECISION,
            }),
            "flexible" => Ok(Self::Flexible),
            _ => Err(Error::UnknownPolylineFormat),
        }
    }
}

impl std::fmt::Display for PolylineFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Encoded { precision } => write!(f, "encoded (1e-{})", precision),
            Self::Flexible => write!(f, "flexible"),
        }
    }
}

impl PolylineFormat {
    /// Decodes this `encoded` path into an ordered list of [Coordinate]s.
    pub fn decode(&self, encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
        match self {
            Self::Encoded { precision } => decode(encoded, *precision),
            Self::Flexible => decode_flexible(encoded),
            Self::Auto => {
                if encoded.starts_with('B') {
                    if let Ok(coords) = decode_flexible(encoded) {
                        return Ok(coords);
                    }
                }
                decode(encoded, DEFAULT_POLYLINE_PRECISION)
            },
        }
    }
}

fn zigzag(value: u64) -> i64 {
    if value & 1 == 1 {
        !((value >> 1) as i64)
    } else {
        (value >> 1) as i64
    }
}

/// Accumulates the next deltas into the running (`lat`, `lon`) and converts
/// the result. Crafted deltas may overflow the accumulator.
fn next_coordinate(
    lat: &mut i64,
    lon: &mut i64,
    deltas: &[u64],
    factor: f64,
) -> Result<Coordinate, PolylineError> {
    *lat = lat
        .checked_add(zigzag(deltas[0]))
        .ok_or(PolylineError::Overflow)?;
    *lon = lon
        .checked_add(zigzag(deltas[1]))
        .ok_or(PolylineError::Overflow)?;
    checked_coordinate(*lat, *lon, factor)
}

fn checked_coordinate(lat: i64, lon: i64, factor: f64) -> Result<Coordinate, PolylineError> {
    let (lat, lon) = (lat as f64 / factor, lon as f64 / factor);
    if !Coordinate::is_valid(lat, lon) {
        return Err(PolylineError::OutOfRange(lat, lon));
    }
    Ok(Coordinate::new_unchecked(lat, lon))
}

/// Collects all unsigned values, each value being a sequence of 5-bit chunks,
/// the 0x20 bit flagging continuation.
fn chunks<F>(encoded: &str, to_chunk: F) -> Result<Vec<u64>, PolylineError>
where
    F: Fn(u8) -> Option<u64>,
{
    let mut values = Vec::with_capacity(encoded.len() / 2);
    let (mut value, mut shift) = (0_u64, 0_u32);
    let mut pending = false;

    for (offset, byte) in encoded.bytes().enumerate() {
        let chunk = to_chunk(byte)
            .ok_or_else(|| PolylineError::InvalidCharacter(byte as char, offset))?;

        if shift > 60 {
            return Err(PolylineError::Overflow);
        }

        value |= (chunk & 0x1f) << shift;

        if chunk & 0x20 == 0 {
            values.push(value);
            value = 0;
            shift = 0;
            pending = false;
        } else {
            shift += 5;
            pending = true;
        }
    }

    if pending {
        return Err(PolylineError::Truncated);
    }

    Ok(values)
}

/// Decodes a classic polyline with given decimal `precision`.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let values = chunks(encoded, |byte| match byte {
        63..=126 => Some((byte - 63) as u64),
        _ => None,
    })?;

    if values.len() % 2 != 0 {
        return Err(PolylineError::IncompletePair);
    }

    let factor = 10.0_f64.powi(precision as i32);
    let (mut lat, mut lon) = (0_i64, 0_i64);

    values
        .chunks_exact(2)
        .map(|pair| next_coordinate(&mut lat, &mut lon, pair, factor))
        .collect()
}

/// Decodes a flexible polyline. The optional third dimension is dropped.
pub fn decode_flexible(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let values = chunks(encoded, |byte| {
        FLEXIBLE_ALPHABET
            .iter()
            .position(|c| *c == byte)
            .map(|pos| pos as u64)
    })?;

    let (version, header) = match values.as_slice() {
        [version, header, ..] => (*version, *header),
        _ => return Err(PolylineError::InvalidHeader),
    };

    if version != FLEXIBLE_VERSION {
        return Err(PolylineError::UnsupportedVersion(version));
    }

    let precision = (header & 0x0f) as i32;
    let third_dim = (header >> 4) & 0x07;
    let stride = if third_dim == 0 { 2 } else { 3 };

    let body = &values[2..];
    if body.len() % stride != 0 {
        return Err(PolylineError::IncompletePair);
    }

    let factor = 10.0_f64.powi(precision);
    let (mut lat, mut lon) = (0_i64, 0_i64);

    body.chunks_exact(stride)
        .map(|point| next_coordinate(&mut lat, &mut lon, point, factor))
        .collect()
}

/// Encodes [Coordinate]s as a classic polyline with given decimal `precision`.
pub fn encode(coordinates: &[Coordinate], precision: u32) -> String {
    let factor = 10.0_f64.powi(precision as i32);
    let mut encoded = String::with_capacity(coordinates.len() * 8);
    let (mut prev_lat, mut prev_lon) = (0_i64, 0_i64);

    for coords in coordinates {
        let lat = (coords.latitude * factor).round() as i64;
        let lon = (coords.longitude * factor).round() as i64;

        for delta in [lat - prev_lat, lon - prev_lon] {
            let mut value = ((delta << 1) ^ (delta >> 63)) as u64;
            while value >= 0x20 {
                encoded.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
                value >>= 5;
            }
            encoded.push((value as u8 + 63) as char);
        }

        prev_lat = lat;
        prev_lon = lon;
    }

    encoded
}

#[cfg(test)]
mod test {
    use super::{decode, decode_flexible, encode, PolylineFormat};
    use crate::{coordinate::Coordinate, error::PolylineError};
    use std::str::FromStr;

    fn assert_coords(decoded: &[Coordinate], expected: &[(f64, f64)]) {
        assert_eq!(decoded.len(), expected.len());
        for (coords, (lat, lon)) in decoded.iter().zip(expected.iter()) {
            assert!((coords.latitude - lat).abs() < 1.0E-9, "{} != {}", coords, lat);
            assert!((coords.longitude - lon).abs() < 1.0E-9, "{} != {}", coords, lon);
        }
    }

    #[test]
    fn classic_reference_path() {
        let decoded = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();
        assert_coords(
            &decoded,
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)],
        );
    }

    #[test]
    fn classic_encoding() {
        let coords = [
            Coordinate::new_unchecked(38.5, -120.2),
            Coordinate::new_unchecked(40.7, -120.95),
            Coordinate::new_unchecked(43.252, -126.453),
        ];
        assert_eq!(encode(&coords, 5), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn flexible_reference_path() {
        let expected = [
            (50.10228, 8.69821),
            (50.10201, 8.69567),
            (50.10063, 8.69150),
            (50.09878, 8.68752),
        ];
        let decoded = decode_flexible("BFoz5xJ67i1B1B7PzIhaxL7Y").unwrap();
        assert_coords(&decoded, &expected);

        // same path, with altitude
        let decoded = decode_flexible("BlBoz5xJ67i1BU1B7PUzIhaUxL7YU").unwrap();
        assert_coords(&decoded, &expected);
    }

    #[test]
    fn format_selection() {
        let auto = PolylineFormat::Auto;
        assert_eq!(auto.decode("BFoz5xJ67i1B1B7PzIhaxL7Y").unwrap().len(), 4);
        assert_eq!(auto.decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap().len(), 3);

        assert_eq!(
            PolylineFormat::from_str("polyline").unwrap(),
            PolylineFormat::Encoded { precision: 5 }
        );
        assert_eq!(
            PolylineFormat::from_str("Flexible").unwrap(),
            PolylineFormat::Flexible
        );
        assert!(PolylineFormat::from_str("geojson").is_err());
    }

    #[test]
    fn empty_path() {
        assert!(decode("", 5).unwrap().is_empty());
    }

    #[test]
    fn decoding_errors() {
        assert_eq!(
            decode("_p~iF~ps|U _ulL", 5),
            Err(PolylineError::InvalidCharacter(' ', 10))
        );
        // last value continues
        assert_eq!(decode("_p~iF~ps|U_", 5), Err(PolylineError::Truncated));
        // latitude without longitude
        assert_eq!(decode("_p~iF", 5), Err(PolylineError::IncompletePair));
        assert_eq!(decode_flexible("B"), Err(PolylineError::InvalidHeader));
        assert_eq!(
            decode_flexible("CFoz5xJ67i1B"),
            Err(PolylineError::UnsupportedVersion(2))
        );
        assert!(matches!(
            decode_flexible("BF?"),
            Err(PolylineError::InvalidCharacter('?', 2))
        ));
    }

    #[test]
    fn accumulator_overflow() {
        // first point in range, then a latitude delta of i64::MAX
        assert_eq!(
            decode("A?}~~~~~~~~~~~N?", 5),
            Err(PolylineError::Overflow)
        );
        assert_eq!(
            decode_flexible("BFCA-___________PA"),
            Err(PolylineError::Overflow)
        );
        assert!(PolylineFormat::Auto.decode("BFCA-___________PA").is_err());
    }

    #[test]
    fn out_of_range_coordinates() {
        let encoded = encode(&[Coordinate::new_unchecked(95.0, 0.0)], 5);
        assert!(matches!(
            decode(&encoded, 5),
            Err(PolylineError::OutOfRange(..))
        ));
    }
}
