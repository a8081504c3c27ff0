//! Error taxonomy shared by the routing engine and its adapters.

use thiserror::Error;

use crate::session::SessionState;

/// Reasons a walking route could not be obtained from a route provider.
///
/// The session never surfaces these to its caller; any of them switches the
/// request over to the fallback synthesizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteUnavailable {
    #[error("route provider timed out after {0} ms")]
    Timeout(u64),
    #[error("route provider transport error: {0}")]
    Transport(String),
    #[error("route provider returned HTTP {0}")]
    Status(u16),
    #[error("route provider response malformed: {0}")]
    Malformed(String),
    #[error("route geometry has {0} point(s), need at least 3")]
    TooFewPoints(usize),
    #[error("no route provider configured")]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// Non-finite latitude or longitude. Caller precondition violation.
    #[error("invalid coordinate (lat={lat}, lng={lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error(transparent)]
    RouteUnavailable(#[from] RouteUnavailable),
    #[error("no place found for '{keyword}'")]
    NotFound { keyword: String },
    #[error("{operation} not allowed in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("route needs at least 2 points, got {0}")]
    RouteTooShort(usize),
}
