/// Mean Earth radius (IUGG), in meters, used for great circle distances
/// over the WGS84 sphere approximation.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Default deviation threshold (meters)
pub const DEFAULT_DEVIATION_THRESHOLD_M: f64 = 30.0;

/// Classic polyline encoding precision (decimals)
pub const DEFAULT_POLYLINE_PRECISION: u32 = 5;

/// Maximal number of lines consumed from the position source in a single cycle
pub const DEFAULT_MAX_LINES_PER_SAMPLE: usize = 16;
