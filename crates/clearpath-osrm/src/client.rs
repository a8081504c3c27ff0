//! OSRM route API HTTP client.

use std::future::Future;

use clearpath_core::config::MIN_PROVIDER_POINTS;
use clearpath_core::{Point, Route, RouteProvider, RouteUnavailable};
use reqwest::Client;
use serde::Deserialize;

use crate::config::OsrmConfig;

/// HTTP client for an OSRM-compatible routing server.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    profile: String,
    timeout_ms: u64,
}

/// Provider route plus the summary OSRM reports for it.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingRoute {
    pub route: Route,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// GeoJSON LineString. Coordinates are `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmClient {
    pub fn new(config: &OsrmConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            base_url: config.base_url.clone(),
            profile: config.profile.clone(),
            timeout_ms: config.timeout_ms(),
        })
    }

    pub fn route_url(&self, origin: Point, destination: Point) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url, self.profile, origin.lng, origin.lat, destination.lng, destination.lat
        )
    }

    /// Fetch a walking route between two points.
    pub async fn fetch_route_with_summary(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<WalkingRoute, RouteUnavailable> {
        let url = self.route_url(origin, destination);
        tracing::debug!("Requesting walking route: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Route provider returned {}", status);
            return Err(RouteUnavailable::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let walking = decode_route(&body)?;
        tracing::info!(
            "Provider route: {} points, {:.0} m, {:.0} s",
            walking.route.len(),
            walking.distance_m,
            walking.duration_s
        );
        Ok(walking)
    }

    fn transport_error(&self, err: reqwest::Error) -> RouteUnavailable {
        if err.is_timeout() {
            RouteUnavailable::Timeout(self.timeout_ms)
        } else {
            RouteUnavailable::Transport(err.to_string())
        }
    }
}

impl RouteProvider for OsrmClient {
    fn fetch_walking_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> impl Future<Output = Result<Route, RouteUnavailable>> + Send {
        async move {
            self.fetch_route_with_summary(origin, destination)
                .await
                .map(|walking| walking.route)
        }
    }
}

/// Decode an OSRM route response body, taking the first route.
pub fn decode_route(body: &str) -> Result<WalkingRoute, RouteUnavailable> {
    let response: RouteResponse =
        serde_json::from_str(body).map_err(|e| RouteUnavailable::Malformed(e.to_string()))?;

    if let Some(code) = response.code.as_deref() {
        if code != "Ok" {
            let detail = response.message.as_deref().unwrap_or("no message");
            return Err(RouteUnavailable::Malformed(format!("{code}: {detail}")));
        }
    }

    let first = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RouteUnavailable::Malformed("no routes in response".to_string()))?;

    let coordinates = first.geometry.coordinates;
    if coordinates.len() < MIN_PROVIDER_POINTS {
        return Err(RouteUnavailable::TooFewPoints(coordinates.len()));
    }

    let points = coordinates
        .into_iter()
        .map(|[lng, lat]| Point::new(lat, lng))
        .collect();
    let route = Route::new(points).map_err(|e| RouteUnavailable::Malformed(e.to_string()))?;

    Ok(WalkingRoute {
        route,
        distance_m: first.distance,
        duration_s: first.duration,
    })
}
