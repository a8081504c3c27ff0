pub mod avoidance;
pub mod config;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod models;
pub mod provider;
pub mod segments;
pub mod session;

pub use config::{NavigationConfig, TurnThresholds};
pub use error::{NavError, RouteUnavailable};
pub use geo::{bearing, compass_text, distance, format_distance, CompassDirection};
pub use models::{Obstacle, Place, Point, PositionFix, Route, Segment, TurnInstruction};
pub use provider::{
    resolve_place, MapRenderer, ObstacleZone, OfflineRouteProvider, PlaceSearch, RouteOverlay,
    RouteProvider,
};
pub use segments::{analyze, classify_turn, turn_points};
pub use session::{
    Guidance, NavigationSession, NextTurn, RouteRequest, RouteSource, SessionState,
};
