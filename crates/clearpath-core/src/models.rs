//! Core data models for walking routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::geo;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Reject NaN/infinite components.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(NavError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

/// A point location the route should keep clear of.
///
/// The exclusion radius is not stored per obstacle; it comes from
/// [`NavigationConfig::safety_radius_m`](crate::config::NavigationConfig).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Obstacle {
    pub position: Point,
}

impl Obstacle {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            position: Point::new(lat, lng),
        }
    }
}

impl From<Point> for Obstacle {
    fn from(position: Point) -> Self {
        Self { position }
    }
}

/// Ordered waypoint polyline with at least two points.
///
/// Routes are built once and replaced wholesale; there is no API for
/// editing one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Route {
    points: Vec<Point>,
}

impl Route {
    pub fn new(points: Vec<Point>) -> Result<Self, NavError> {
        if points.len() < 2 {
            return Err(NavError::RouteTooShort(points.len()));
        }
        for point in &points {
            point.validate()?;
        }
        Ok(Self { points })
    }

    /// Build a route that starts at `origin` and ends at `destination`.
    ///
    /// Endpoints are prepended/appended only when the polyline does not
    /// already carry them, so snapped provider geometry keeps its own
    /// first and last vertices as interior points.
    pub fn anchored(origin: Point, destination: Point, points: Vec<Point>) -> Result<Self, NavError> {
        let mut anchored = Vec::with_capacity(points.len() + 2);
        if points.first() != Some(&origin) {
            anchored.push(origin);
        }
        anchored.extend(points);
        if anchored.last() != Some(&destination) {
            anchored.push(destination);
        }
        Self::new(anchored)
    }

    pub(crate) fn from_points_unchecked(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 2);
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Total polyline length in meters.
    pub fn length_m(&self) -> f64 {
        geo::path_length(&self.points)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl TryFrom<Vec<Point>> for Route {
    type Error = NavError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Route::new(points)
    }
}

impl From<Route> for Vec<Point> {
    fn from(route: Route) -> Self {
        route.points
    }
}

/// Directional instruction attached to a route vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnInstruction {
    Straight,
    Left,
    Right,
    UTurn,
}

impl TurnInstruction {
    pub fn is_turn(self) -> bool {
        !matches!(self, TurnInstruction::Straight)
    }

    pub fn label(self) -> &'static str {
        match self {
            TurnInstruction::Straight => "continue straight",
            TurnInstruction::Left => "turn left",
            TurnInstruction::Right => "turn right",
            TurnInstruction::UTurn => "make a U-turn",
        }
    }
}

/// One leg of a route: its start vertex, the bearing of the leg, and the
/// instruction to give at that vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub point: Point,
    /// Degrees in [0, 360).
    pub bearing_deg: f64,
    pub instruction: TurnInstruction,
}

/// Timestamped coordinate reading from a location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub point: Point,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    /// Fix stamped with the current time.
    pub fn now(point: Point) -> Self {
        Self {
            point,
            timestamp: Utc::now(),
        }
    }

    pub fn at(point: Point, timestamp: DateTime<Utc>) -> Self {
        Self { point, timestamp }
    }
}

/// Result of a place lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub point: Point,
    pub label: String,
}
