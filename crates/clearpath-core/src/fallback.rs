//! Straight-line route synthesis used when no provider route is available.

use crate::config::NavigationConfig;
use crate::geo::{haversine_distance, initial_bearing, offset_degrees};
use crate::models::{Obstacle, Point, Route};

/// Interpolate `origin -> destination` into `config.fallback_steps` legs.
///
/// Interior points closer than the safety radius to an obstacle are pushed
/// away from it by `fallback_offset_deg`. Each obstacle is measured against
/// the raw interpolated point and the nudges add up. Endpoints are never
/// moved. Inputs must already be validated.
pub fn synthesize(
    origin: Point,
    destination: Point,
    obstacles: &[Obstacle],
    config: &NavigationConfig,
) -> Route {
    let steps = config.fallback_steps.max(1);
    let mut points = Vec::with_capacity(steps + 1);
    points.push(origin);

    for i in 1..steps {
        let ratio = i as f64 / steps as f64;
        let raw = Point::new(
            origin.lat + (destination.lat - origin.lat) * ratio,
            origin.lng + (destination.lng - origin.lng) * ratio,
        );

        let mut adjusted = raw;
        for obstacle in obstacles {
            if haversine_distance(raw, obstacle.position) < config.safety_radius_m {
                let away = initial_bearing(obstacle.position, raw);
                adjusted = offset_degrees(adjusted, away, config.fallback_offset_deg);
            }
        }
        points.push(adjusted);
    }

    points.push(destination);
    Route::from_points_unchecked(points)
}
