//! Position sentence interpretation
use log::error;

use crate::{coordinate::Coordinate, error::Error};

/// Recommended minimum data sentence, carries the valid fix marker
const POSITION_SENTENCE: &str = "RMC";

/// Valid fix marker
const VALID_FIX: &str = "A";

/// Converts a raw `DDMM.mmmm` (or `DDDMM.mmmm`) angle to decimal degrees,
/// negated for southern and western `hemisphere`.
/// Malformed angles decode to 0.0: this is logged but not prevented,
/// treat 0.0 with suspicion.
pub fn decode_angle(raw: &str, hemisphere: &str) -> f64 {
    let value = match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            error!("invalid raw angle \"{}\"", raw);
            return 0.0;
        },
    };

    let degrees = (value / 100.0).trunc();
    let minutes = value - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere.trim() {
        "S" | "W" => -decimal,
        _ => decimal,
    }
}

/// XOR checksum of the sentence content (between `$` and `*`)
fn checksum(content: &str) -> u8 {
    content.bytes().fold(0, |acc, b| acc ^ b)
}

/// Returns the sentence content, verifying the checksum when present.
fn content(line: &str) -> Result<&str, Error> {
    let line = line
        .trim()
        .strip_prefix('$')
        .ok_or_else(|| Error::MalformedSentence(line.to_string()))?;

    match line.split_once('*') {
        Some((content, hex)) => {
            let hex = hex.get(..2).unwrap_or(hex);
            let expected = u8::from_str_radix(hex, 16)
                .map_err(|_| Error::MalformedSentence(line.to_string()))?;
            let computed = checksum(content);
            if expected != computed {
                return Err(Error::ChecksumMismatch { expected, computed });
            }
            Ok(content)
        },
        None => Ok(line),
    }
}

/// True if this line is a position fix sentence, whatever the talker.
pub fn is_position_sentence(line: &str) -> bool {
    let line = line.trim_start();
    let Some(line) = line.strip_prefix('$') else {
        return false;
    };
    let address = line.split([',', '*']).next().unwrap_or_default();
    address.len() == 2 + POSITION_SENTENCE.len() && address.ends_with(POSITION_SENTENCE)
}

/// Interprets a position fix sentence.
/// The sentence is only accepted when it carries the valid fix marker.
pub fn parse_position(line: &str) -> Result<Coordinate, Error> {
    // not nmea0183: it drops the whole sentence on one bad field, malformed angles must decode to 0.0
    if !is_position_sentence(line) {
        return Err(Error::MalformedSentence(line.trim().to_string()));
    }

    let content = content(line)?;
    let fields = content.split(',').collect::<Vec<_>>();

    // address, time, status, lat, N/S, lon, E/W
    if fields.len() < 7 {
        return Err(Error::MalformedSentence(line.trim().to_string()));
    }

    if fields[2] != VALID_FIX {
        return Err(Error::NoFix);
    }

    let latitude = decode_angle(fields[3], fields[4]);
    let longitude = decode_angle(fields[5], fields[6]);

    Ok(Coordinate::new_unchecked(latitude, longitude))
}
