//! Collaborator interfaces injected into a navigation session.
//!
//! Route lookup, place search and map drawing live outside this crate.
//! They are handed in explicitly, never reached through shared globals.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::{NavError, RouteUnavailable};
use crate::models::{Obstacle, Place, Point, Route, Segment};

/// Source of real walking routes.
///
/// Implementations should bound their own latency; callers also wrap the
/// returned future in a timeout. Any error switches the session to the
/// fallback synthesizer.
pub trait RouteProvider {
    fn fetch_walking_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> impl Future<Output = Result<Route, RouteUnavailable>> + Send;
}

/// Provider used when no routing service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRouteProvider;

impl RouteProvider for OfflineRouteProvider {
    fn fetch_walking_route(
        &self,
        _origin: Point,
        _destination: Point,
    ) -> impl Future<Output = Result<Route, RouteUnavailable>> + Send {
        std::future::ready(Err(RouteUnavailable::Offline))
    }
}

/// Keyword geocoder.
pub trait PlaceSearch {
    fn search(&self, keyword: &str) -> impl Future<Output = Option<Place>> + Send;
}

/// Resolve a keyword to a place, mapping an empty result to `NotFound`.
///
/// Exactly one search is issued; retry policy belongs to the caller.
pub async fn resolve_place<S: PlaceSearch>(search: &S, keyword: &str) -> Result<Place, NavError> {
    let keyword = keyword.trim();
    match search.search(keyword).await {
        Some(place) => {
            place.point.validate()?;
            Ok(place)
        }
        None => Err(NavError::NotFound {
            keyword: keyword.to_string(),
        }),
    }
}

/// Circular exclusion zone drawn around an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleZone {
    pub center: Point,
    pub radius_m: f64,
}

/// Everything a map needs to draw a planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub route: Vec<Point>,
    /// Turn markers; straight segments are omitted.
    pub turns: Vec<Segment>,
    pub obstacles: Vec<ObstacleZone>,
}

impl RouteOverlay {
    pub fn new(route: &Route, turns: Vec<Segment>, obstacles: &[Obstacle], radius_m: f64) -> Self {
        Self {
            route: route.points().to_vec(),
            turns,
            obstacles: obstacles
                .iter()
                .map(|o| ObstacleZone {
                    center: o.position,
                    radius_m,
                })
                .collect(),
        }
    }
}

/// Receiver of route overlays. Drawing is entirely the implementor's concern.
pub trait MapRenderer {
    fn render_route(&mut self, overlay: &RouteOverlay);

    fn clear_route(&mut self) {}
}
