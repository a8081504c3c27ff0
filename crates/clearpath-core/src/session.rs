//! Navigation session state machine.
//!
//! A session is created per navigation attempt and moves through
//! `Idle -> RouteRequested -> RouteReady -> Navigating -> Arrived`, with
//! `Cancelled` reachable from any non-terminal state. It is driven
//! synchronously: the caller performs the provider call and feeds the
//! result back through [`NavigationSession::complete_route`], tagged with
//! the [`RouteRequest`] ticket returned by [`NavigationSession::start`].
//! Results for an outdated ticket, or arriving after cancellation, are
//! dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avoidance;
use crate::config::{NavigationConfig, MIN_PROVIDER_POINTS};
use crate::error::{NavError, RouteUnavailable};
use crate::fallback;
use crate::geo::{count_within, haversine_distance, initial_bearing, CompassDirection};
use crate::models::{Obstacle, Point, PositionFix, Route, Segment, TurnInstruction};
use crate::provider::{MapRenderer, RouteOverlay};
use crate::segments::{analyze, turn_points};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    RouteRequested,
    RouteReady,
    Navigating,
    /// Terminal
    Arrived,
    /// Terminal
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Arrived | SessionState::Cancelled)
    }
}

/// Which strategy produced the active route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Provider,
    Fallback,
}

/// Ticket for one in-flight provider call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub id: u64,
    pub origin: Point,
    pub destination: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextTurn {
    pub instruction: TurnInstruction,
    pub distance_m: f64,
    /// Route vertex where the turn happens.
    pub vertex_index: usize,
}

/// Guidance computed from the latest position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub heading: Option<CompassDirection>,
    pub heading_deg: Option<f64>,
    pub next_turn: Option<NextTurn>,
    pub distance_to_destination_m: f64,
    /// Route vertex nearest to the position.
    pub closest_index: usize,
    pub arrived: bool,
    /// Timestamp of the fix this was computed from; `None` for the
    /// initial guidance issued from the origin.
    pub fix_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Trip {
    origin: Point,
    destination: Point,
    obstacles: Vec<Obstacle>,
}

#[derive(Debug)]
pub struct NavigationSession {
    config: NavigationConfig,
    state: SessionState,
    trip: Option<Trip>,
    next_request_id: u64,
    pending_request: Option<u64>,
    route: Option<Route>,
    segments: Vec<Segment>,
    source: Option<RouteSource>,
    guidance: Option<Guidance>,
    last_fix: Option<PositionFix>,
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl NavigationSession {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            trip: None,
            next_request_id: 1,
            pending_request: None,
            route: None,
            segments: Vec::new(),
            source: None,
            guidance: None,
            last_fix: None,
        }
    }

    /// Begin a routing request. Fixes the trip for the session lifetime.
    pub fn start(
        &mut self,
        origin: Point,
        destination: Point,
        obstacles: &[Obstacle],
    ) -> Result<RouteRequest, NavError> {
        self.expect_state("start", SessionState::Idle)?;
        origin.validate()?;
        destination.validate()?;
        for obstacle in obstacles {
            obstacle.position.validate()?;
        }

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request = Some(id);
        self.trip = Some(Trip {
            origin,
            destination,
            obstacles: obstacles.to_vec(),
        });
        self.state = SessionState::RouteRequested;

        tracing::info!(
            "Route requested #{} ({:.6},{:.6}) -> ({:.6},{:.6}), {} obstacle(s)",
            id,
            origin.lat,
            origin.lng,
            destination.lat,
            destination.lng,
            obstacles.len()
        );

        Ok(RouteRequest {
            id,
            origin,
            destination,
        })
    }

    /// Apply a provider result. Returns `false` when the result was stale
    /// and discarded.
    ///
    /// Provider failures and degenerate geometry fall back to the
    /// synthesized route; both strategies then go through the same
    /// avoidance and segmentation passes.
    pub fn complete_route(
        &mut self,
        request: &RouteRequest,
        result: Result<Route, RouteUnavailable>,
    ) -> bool {
        if self.state != SessionState::RouteRequested || self.pending_request != Some(request.id) {
            tracing::debug!(
                "Discarding stale route result #{} (state {:?})",
                request.id,
                self.state
            );
            return false;
        }
        let Some(trip) = self.trip.as_ref() else {
            return false;
        };

        let provided = result.and_then(|route| {
            if route.len() < MIN_PROVIDER_POINTS {
                return Err(RouteUnavailable::TooFewPoints(route.len()));
            }
            Route::anchored(trip.origin, trip.destination, route.into_points())
                .map_err(|e| RouteUnavailable::Malformed(e.to_string()))
        });

        let (raw, source) = match provided {
            Ok(route) => (route, RouteSource::Provider),
            Err(reason) => {
                tracing::warn!("Route provider unavailable ({}), using fallback route", reason);
                let synthesized =
                    fallback::synthesize(trip.origin, trip.destination, &trip.obstacles, &self.config);
                (synthesized, RouteSource::Fallback)
            }
        };

        let safe = avoidance::process(&raw, &trip.obstacles, &self.config);
        let segments = analyze(&safe, &self.config.turns);

        tracing::info!(
            "Route #{} ready: {} points, {:.0} m, {} turn(s), source {:?}",
            request.id,
            safe.len(),
            safe.length_m(),
            segments.iter().filter(|s| s.instruction.is_turn()).count(),
            source
        );

        self.route = Some(safe);
        self.segments = segments;
        self.source = Some(source);
        self.pending_request = None;
        self.state = SessionState::RouteReady;
        true
    }

    /// Switch to live guidance and compute guidance from the origin.
    pub fn begin_navigating(&mut self) -> Result<Guidance, NavError> {
        self.expect_state("begin_navigating", SessionState::RouteReady)?;
        let (Some(trip), Some(route)) = (self.trip.as_ref(), self.route.as_ref()) else {
            return Err(self.invalid_state("begin_navigating"));
        };

        let origin = trip.origin;
        let heading_deg = route.get(1).map(|next| initial_bearing(origin, next));
        let next_turn = self.next_turn_from(origin, 0);
        let guidance = Guidance {
            heading: heading_deg.map(CompassDirection::from_bearing),
            heading_deg,
            next_turn,
            distance_to_destination_m: haversine_distance(origin, trip.destination),
            closest_index: 0,
            arrived: false,
            fix_time: None,
        };

        self.guidance = Some(guidance.clone());
        self.state = SessionState::Navigating;
        tracing::info!("Navigation started, {:.0} m to go", guidance.distance_to_destination_m);
        Ok(guidance)
    }

    /// Update guidance from a live position fix.
    ///
    /// Non-finite fixes are rejected without touching the session. Fixes
    /// outside `Navigating` are ignored and yield `Ok(None)`.
    pub fn on_position_fix(&mut self, fix: PositionFix) -> Result<Option<Guidance>, NavError> {
        fix.point.validate()?;
        if self.state != SessionState::Navigating {
            tracing::trace!("Ignoring position fix in state {:?}", self.state);
            return Ok(None);
        }
        let (Some(trip), Some(route)) = (self.trip.as_ref(), self.route.as_ref()) else {
            return Ok(None);
        };

        let position = fix.point;
        let closest_index = closest_vertex(route.points(), position);

        let previous_heading = self.guidance.as_ref().and_then(|g| g.heading_deg);
        let heading_deg = match route.get(closest_index + 1) {
            Some(next) => Some(initial_bearing(position, next)),
            None => previous_heading,
        };

        let distance_to_destination_m = haversine_distance(position, trip.destination);
        let arrived = distance_to_destination_m < self.config.arrival_radius_m;

        let guidance = Guidance {
            heading: heading_deg.map(CompassDirection::from_bearing),
            heading_deg,
            next_turn: self.next_turn_from(position, closest_index),
            distance_to_destination_m,
            closest_index,
            arrived,
            fix_time: Some(fix.timestamp),
        };

        self.guidance = Some(guidance.clone());
        self.last_fix = Some(fix);
        if arrived {
            self.state = SessionState::Arrived;
            tracing::info!(
                "Arrived at destination ({:.1} m away)",
                distance_to_destination_m
            );
        }
        Ok(Some(guidance))
    }

    /// Cancel the session. Returns `false` if it was already terminal.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        tracing::info!("Navigation cancelled in state {:?}", self.state);
        self.state = SessionState::Cancelled;
        self.pending_request = None;
        self.route = None;
        self.segments = Vec::new();
        true
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn origin(&self) -> Option<Point> {
        self.trip.as_ref().map(|t| t.origin)
    }

    pub fn destination(&self) -> Option<Point> {
        self.trip.as_ref().map(|t| t.destination)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.trip.as_ref().map(|t| t.obstacles.as_slice()).unwrap_or(&[])
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn route_source(&self) -> Option<RouteSource> {
        self.source
    }

    pub fn guidance(&self) -> Option<&Guidance> {
        self.guidance.as_ref()
    }

    pub fn last_fix(&self) -> Option<PositionFix> {
        self.last_fix
    }

    /// Obstacles within the configured nearby radius of `point`.
    pub fn nearby_obstacles(&self, point: Point) -> usize {
        count_within(point, self.obstacles(), self.config.nearby_radius_m)
    }

    /// Map overlay for the current route, if one is ready.
    pub fn overlay(&self) -> Option<RouteOverlay> {
        let route = self.route.as_ref()?;
        Some(RouteOverlay::new(
            route,
            turn_points(&self.segments),
            self.obstacles(),
            self.config.safety_radius_m,
        ))
    }

    /// Hand the current overlay to `renderer`, or clear it when the session
    /// holds no route.
    pub fn render<R: MapRenderer + ?Sized>(&self, renderer: &mut R) {
        match self.overlay() {
            Some(overlay) => renderer.render_route(&overlay),
            None => renderer.clear_route(),
        }
    }

    /// First turn at or after `start_index`. The closest vertex is included,
    /// so a turn the walker is standing on is still announced.
    fn next_turn_from(&self, position: Point, start_index: usize) -> Option<NextTurn> {
        self.segments
            .iter()
            .enumerate()
            .skip(start_index)
            .find(|(_, segment)| segment.instruction.is_turn())
            .map(|(index, segment)| NextTurn {
                instruction: segment.instruction,
                distance_m: haversine_distance(position, segment.point),
                vertex_index: index,
            })
    }

    fn expect_state(&self, operation: &'static str, expected: SessionState) -> Result<(), NavError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    fn invalid_state(&self, operation: &'static str) -> NavError {
        NavError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

/// Index of the vertex nearest to `position`; ties keep the lowest index.
fn closest_vertex(points: &[Point], position: Point) -> usize {
    let mut closest_index = 0;
    let mut min_dist = f64::INFINITY;
    for (i, point) in points.iter().enumerate() {
        let dist = haversine_distance(position, *point);
        if dist < min_dist {
            min_dist = dist;
            closest_index = i;
        }
    }
    closest_index
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Point = Point::new(37.5665, 126.9780);
    const DESTINATION: Point = Point::new(37.5675, 126.9790);
    const OBSTACLE: Obstacle = Obstacle::new(37.5670, 126.9785);

    fn fix(lat: f64, lng: f64) -> PositionFix {
        PositionFix::now(Point::new(lat, lng))
    }

    /// East 0.001°, then north 0.001°: one left turn at the corner.
    fn l_shaped_route() -> Route {
        Route::new(vec![
            ORIGIN,
            Point::new(37.5665, 126.9785),
            Point::new(37.5665, 126.9790),
            Point::new(37.5670, 126.9790),
            DESTINATION,
        ])
        .unwrap()
    }

    fn ready_session(result: Result<Route, RouteUnavailable>, obstacles: &[Obstacle]) -> NavigationSession {
        let mut session = NavigationSession::default();
        let request = session.start(ORIGIN, DESTINATION, obstacles).unwrap();
        assert!(session.complete_route(&request, result));
        session
    }

    #[test]
    fn fallback_route_avoids_obstacle_end_to_end() {
        let session = ready_session(Err(RouteUnavailable::Offline), &[OBSTACLE]);

        assert_eq!(session.state(), SessionState::RouteReady);
        assert_eq!(session.route_source(), Some(RouteSource::Fallback));

        let route = session.route().unwrap();
        assert!(route.len() >= 11);
        assert_eq!(route.first(), ORIGIN);
        assert_eq!(route.last(), DESTINATION);
        for point in &route.points()[1..route.len() - 1] {
            let d = haversine_distance(*point, OBSTACLE.position);
            assert!(d >= 50.0, "vertex {point:?} only {d:.1} m from obstacle");
        }
        assert_eq!(session.segments().len(), route.len() - 1);
    }

    #[test]
    fn provider_route_is_used_and_segmented() {
        let session = ready_session(Ok(l_shaped_route()), &[]);
        assert_eq!(session.route_source(), Some(RouteSource::Provider));
        assert_eq!(session.route().unwrap(), &l_shaped_route());

        let turns: Vec<_> = session
            .segments()
            .iter()
            .map(|s| s.instruction)
            .collect();
        assert_eq!(
            turns,
            vec![
                TurnInstruction::Straight,
                TurnInstruction::Straight,
                TurnInstruction::Left,
                TurnInstruction::Straight,
            ]
        );
    }

    #[test]
    fn degenerate_provider_route_falls_back() {
        let two_points = Route::new(vec![ORIGIN, DESTINATION]).unwrap();
        let session = ready_session(Ok(two_points), &[]);
        assert_eq!(session.route_source(), Some(RouteSource::Fallback));
        assert_eq!(session.route().unwrap().len(), 11);
    }

    #[test]
    fn snapped_provider_route_is_anchored_to_trip() {
        let snapped = Route::new(vec![
            Point::new(37.56652, 126.97801),
            Point::new(37.5670, 126.9780),
            Point::new(37.56748, 126.97899),
        ])
        .unwrap();
        let session = ready_session(Ok(snapped), &[]);
        let route = session.route().unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.first(), ORIGIN);
        assert_eq!(route.last(), DESTINATION);
    }

    #[test]
    fn begin_navigating_reports_initial_guidance() {
        let mut session = ready_session(Ok(l_shaped_route()), &[]);
        let guidance = session.begin_navigating().unwrap();

        assert_eq!(session.state(), SessionState::Navigating);
        assert_eq!(guidance.heading, Some(CompassDirection::East));
        assert_eq!(guidance.closest_index, 0);
        assert!(!guidance.arrived);
        let turn = guidance.next_turn.unwrap();
        assert_eq!(turn.instruction, TurnInstruction::Left);
        assert_eq!(turn.vertex_index, 2);
        let expected = haversine_distance(ORIGIN, Point::new(37.5665, 126.9790));
        assert!((turn.distance_m - expected).abs() < 1e-6);
        let direct = haversine_distance(ORIGIN, DESTINATION);
        assert!((guidance.distance_to_destination_m - direct).abs() < 1e-6);
    }

    #[test]
    fn position_fix_tracks_next_turn_and_heading() {
        let mut session = ready_session(Ok(l_shaped_route()), &[]);
        session.begin_navigating().unwrap();

        // just past the first vertex, still heading east toward the corner
        let guidance = session
            .on_position_fix(fix(37.5665, 126.97852))
            .unwrap()
            .unwrap();
        assert_eq!(guidance.closest_index, 1);
        assert_eq!(guidance.heading, Some(CompassDirection::East));
        assert_eq!(guidance.next_turn.unwrap().instruction, TurnInstruction::Left);

        // after the corner, heading north with no turns left
        let guidance = session
            .on_position_fix(fix(37.56702, 126.9790))
            .unwrap()
            .unwrap();
        assert_eq!(guidance.closest_index, 3);
        assert_eq!(guidance.heading, Some(CompassDirection::North));
        assert!(guidance.next_turn.is_none());
        assert_eq!(session.last_fix().unwrap().point, Point::new(37.56702, 126.9790));
    }

    #[test]
    fn heading_unchanged_at_final_vertex() {
        let config = NavigationConfig {
            arrival_radius_m: 1.0,
            ..NavigationConfig::default()
        };
        let mut session = NavigationSession::new(config);
        let request = session.start(ORIGIN, DESTINATION, &[]).unwrap();
        session.complete_route(&request, Ok(l_shaped_route()));
        session.begin_navigating().unwrap();

        let before = session
            .on_position_fix(fix(37.56702, 126.9790))
            .unwrap()
            .unwrap();
        // 3 m short of the destination: nearest vertex is the last one
        let near_end = session
            .on_position_fix(fix(37.56747, 126.9790))
            .unwrap()
            .unwrap();
        assert_eq!(near_end.closest_index, 4);
        assert_eq!(near_end.heading_deg, before.heading_deg);
        assert!(!near_end.arrived);
    }

    #[test]
    fn approaching_destination_arrives() {
        let mut session = ready_session(Err(RouteUnavailable::Timeout(10_000)), &[]);
        session.begin_navigating().unwrap();

        let mut last = None;
        for i in 0..=20 {
            let ratio = i as f64 / 20.0;
            let p = fix(
                ORIGIN.lat + (DESTINATION.lat - ORIGIN.lat) * ratio,
                ORIGIN.lng + (DESTINATION.lng - ORIGIN.lng) * ratio,
            );
            if let Some(guidance) = session.on_position_fix(p).unwrap() {
                last = Some(guidance);
            }
            if session.state() == SessionState::Arrived {
                break;
            }
        }

        assert_eq!(session.state(), SessionState::Arrived);
        let last = last.unwrap();
        assert!(last.arrived);
        assert!(last.distance_to_destination_m < 10.0);

        // terminal: later fixes are ignored
        assert_eq!(session.on_position_fix(fix(37.0, 127.0)).unwrap(), None);
        assert!(!session.cancel());
        assert_eq!(session.state(), SessionState::Arrived);
    }

    #[test]
    fn cancel_is_permanent_and_freezes_guidance() {
        let mut session = ready_session(Ok(l_shaped_route()), &[]);
        session.begin_navigating().unwrap();
        session
            .on_position_fix(fix(37.5665, 126.97852))
            .unwrap()
            .unwrap();
        let frozen = session.guidance().cloned();

        assert!(session.cancel());
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(session.route().is_none());
        assert!(session.segments().is_empty());

        assert_eq!(session.on_position_fix(fix(37.5675, 126.9790)).unwrap(), None);
        assert_eq!(session.guidance().cloned(), frozen);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(!session.cancel());
    }

    #[test]
    fn cancel_during_request_discards_late_result() {
        let mut session = NavigationSession::default();
        let request = session.start(ORIGIN, DESTINATION, &[]).unwrap();
        assert!(session.cancel());

        assert!(!session.complete_route(&request, Ok(l_shaped_route())));
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(session.route().is_none());
    }

    #[test]
    fn mismatched_ticket_is_ignored() {
        let mut session = NavigationSession::default();
        let request = session.start(ORIGIN, DESTINATION, &[]).unwrap();
        let forged = RouteRequest {
            id: request.id + 1,
            ..request
        };
        assert!(!session.complete_route(&forged, Ok(l_shaped_route())));
        assert_eq!(session.state(), SessionState::RouteRequested);

        assert!(session.complete_route(&request, Ok(l_shaped_route())));
        // a duplicate delivery after completion is stale too
        assert!(!session.complete_route(&request, Err(RouteUnavailable::Offline)));
        assert_eq!(session.route_source(), Some(RouteSource::Provider));
    }

    #[test]
    fn invalid_fix_is_rejected_without_state_change() {
        let mut session = ready_session(Ok(l_shaped_route()), &[]);
        session.begin_navigating().unwrap();
        let before = session.guidance().cloned();

        let err = session.on_position_fix(fix(f64::NAN, 126.9)).unwrap_err();
        assert!(matches!(err, NavError::InvalidCoordinate { .. }));
        assert_eq!(session.state(), SessionState::Navigating);
        assert_eq!(session.guidance().cloned(), before);
        assert!(session.last_fix().is_none());
    }

    #[test]
    fn fixes_before_navigating_are_ignored() {
        let mut session = NavigationSession::default();
        assert_eq!(session.on_position_fix(fix(37.5, 127.0)).unwrap(), None);
        let request = session.start(ORIGIN, DESTINATION, &[]).unwrap();
        assert_eq!(session.on_position_fix(fix(37.5, 127.0)).unwrap(), None);
        session.complete_route(&request, Err(RouteUnavailable::Offline));
        assert_eq!(session.on_position_fix(fix(37.5, 127.0)).unwrap(), None);
        assert!(session.guidance().is_none());
    }

    #[test]
    fn lifecycle_calls_out_of_order_are_invalid_state() {
        let mut session = NavigationSession::default();
        assert!(matches!(
            session.begin_navigating(),
            Err(NavError::InvalidState {
                operation: "begin_navigating",
                state: SessionState::Idle
            })
        ));

        session.start(ORIGIN, DESTINATION, &[]).unwrap();
        assert!(matches!(
            session.start(ORIGIN, DESTINATION, &[]),
            Err(NavError::InvalidState { operation: "start", .. })
        ));
    }

    #[test]
    fn start_rejects_non_finite_input() {
        let mut session = NavigationSession::default();
        let bad = Point::new(f64::INFINITY, 127.0);
        assert!(session.start(bad, DESTINATION, &[]).is_err());
        assert!(session
            .start(ORIGIN, DESTINATION, &[Obstacle::new(37.0, f64::NAN)])
            .is_err());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn closest_vertex_prefers_lowest_index_on_tie() {
        let points = [
            Point::new(37.0, 127.0),
            Point::new(37.001, 127.0),
            Point::new(37.0, 127.0),
        ];
        assert_eq!(closest_vertex(&points, Point::new(37.0, 127.0)), 0);
        assert_eq!(closest_vertex(&points, Point::new(37.0011, 127.0)), 1);
    }

    #[test]
    fn overlay_lists_turns_and_zones() {
        let session = ready_session(Ok(l_shaped_route()), &[Obstacle::new(37.60, 127.0)]);
        let overlay = session.overlay().unwrap();
        assert_eq!(overlay.route.len(), 5);
        assert_eq!(overlay.turns.len(), 1);
        assert_eq!(overlay.obstacles.len(), 1);
        assert_eq!(overlay.obstacles[0].radius_m, 50.0);
    }

    #[derive(Default)]
    struct RecordingRenderer {
        drawn: Vec<RouteOverlay>,
        cleared: usize,
    }

    impl MapRenderer for RecordingRenderer {
        fn render_route(&mut self, overlay: &RouteOverlay) {
            self.drawn.push(overlay.clone());
        }

        fn clear_route(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn renderer_receives_route_turns_and_zones() {
        let obstacle = Obstacle::new(37.60, 127.0);
        let mut session = ready_session(Ok(l_shaped_route()), &[obstacle]);
        let mut renderer = RecordingRenderer::default();

        session.render(&mut renderer);
        assert_eq!(renderer.drawn.len(), 1);
        let overlay = &renderer.drawn[0];
        assert_eq!(overlay.route, l_shaped_route().points());
        assert_eq!(overlay.turns.len(), 1);
        assert_eq!(overlay.turns[0].instruction, TurnInstruction::Left);
        assert_eq!(overlay.turns[0].point, Point::new(37.5665, 126.9790));
        assert_eq!(overlay.obstacles.len(), 1);
        assert_eq!(overlay.obstacles[0].center, obstacle.position);
        assert_eq!(overlay.obstacles[0].radius_m, 50.0);

        session.cancel();
        session.render(&mut renderer);
        assert_eq!(renderer.drawn.len(), 1);
        assert_eq!(renderer.cleared, 1);
    }

    #[test]
    fn turn_at_closest_vertex_is_still_announced() {
        let mut session = ready_session(Ok(l_shaped_route()), &[]);
        session.begin_navigating().unwrap();

        // ~1.4 m short of the corner, so the corner is the closest vertex
        let guidance = session
            .on_position_fix(fix(37.5665, 126.978984))
            .unwrap()
            .unwrap();
        assert_eq!(guidance.closest_index, 2);
        let turn = guidance.next_turn.unwrap();
        assert_eq!(turn.instruction, TurnInstruction::Left);
        assert_eq!(turn.vertex_index, 2);
        assert!(turn.distance_m < 2.0);
    }

    #[test]
    fn nearby_obstacle_count_uses_config_radius() {
        let obstacles = [OBSTACLE, Obstacle::new(37.60, 127.0)];
        let session = ready_session(Err(RouteUnavailable::Offline), &obstacles);
        assert_eq!(session.nearby_obstacles(ORIGIN), 1);
    }
}
