//! Geodesic math for route planning and guidance.
//!
//! All coordinates are WGS84 decimal degrees. Distances use the Haversine
//! formula on a sphere with the mean Earth radius.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NavError;
use crate::models::{Obstacle, Point};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters. Fails on non-finite input.
pub fn distance(a: Point, b: Point) -> Result<f64, NavError> {
    a.validate()?;
    b.validate()?;
    Ok(haversine_distance(a, b))
}

/// Initial bearing from `a` to `b` in degrees, in [0, 360).
/// Fails on non-finite input.
pub fn bearing(a: Point, b: Point) -> Result<f64, NavError> {
    a.validate()?;
    b.validate()?;
    Ok(initial_bearing(a, b))
}

/// Unchecked Haversine distance in meters; inputs must already be validated.
pub(crate) fn haversine_distance(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Unchecked initial bearing in degrees [0, 360); 0 = north, 90 = east.
pub(crate) fn initial_bearing(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Wrap any angle in degrees into [0, 360).
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid returns 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a bearing difference into [-180, 180]. Positive = clockwise.
pub fn signed_bearing_delta(from_deg: f64, to_deg: f64) -> f64 {
    let mut delta = to_deg - from_deg;
    if delta < 0.0 {
        delta += 360.0;
    }
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Project `origin` along `bearing_deg` by a fixed offset expressed in
/// coordinate degrees rather than meters.
///
/// Latitude moves by `offset_deg * cos(b)` and longitude by
/// `offset_deg * sin(b)`, so the ground distance shrinks east-west with
/// latitude. The avoidance constants are defined in these units.
pub fn offset_degrees(origin: Point, bearing_deg: f64, offset_deg: f64) -> Point {
    let theta = bearing_deg.to_radians();
    Point::new(
        origin.lat + offset_deg * theta.cos(),
        origin.lng + offset_deg * theta.sin(),
    )
}

/// Total length of a polyline in meters.
pub fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

/// Number of obstacles within `radius_m` (inclusive) of `point`.
pub fn count_within(point: Point, obstacles: &[Obstacle], radius_m: f64) -> usize {
    obstacles
        .iter()
        .filter(|o| haversine_distance(point, o.position) <= radius_m)
        .count()
}

/// Eight-way compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

const COMPASS_POINTS: [CompassDirection; 8] = [
    CompassDirection::North,
    CompassDirection::NorthEast,
    CompassDirection::East,
    CompassDirection::SouthEast,
    CompassDirection::South,
    CompassDirection::SouthWest,
    CompassDirection::West,
    CompassDirection::NorthWest,
];

impl CompassDirection {
    /// Bucket a bearing into 45° sectors centred on the compass points.
    ///
    /// Sector edges sit at 22.5° + 45°·k; anything at or past 337.5°
    /// wraps to north. A NaN bearing also maps to north.
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let b = normalize_bearing(bearing_deg);
        if !b.is_finite() {
            return CompassDirection::North;
        }
        let sector = ((b + 22.5) / 45.0).floor() as usize % 8;
        COMPASS_POINTS[sector]
    }

    pub fn label(self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::NorthEast => "NE",
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::South => "S",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compass label ("N", "NE", ...) for a bearing in degrees.
pub fn compass_text(bearing_deg: f64) -> &'static str {
    CompassDirection::from_bearing(bearing_deg).label()
}

/// Human-readable distance, rounded to 10 m below a kilometre.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", (meters / 10.0).round() as i64 * 10)
    }
}
