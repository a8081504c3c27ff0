//! Obstacle-avoidance pass over a route polyline.
//!
//! Any interior vertex closer than the safety radius to an obstacle is
//! replaced by a point projected out from that obstacle, on the side facing
//! the previously accepted vertex. The pass is sequential: each displaced
//! vertex becomes the reference for the next one.
//!
//! A displaced vertex is not re-checked against other obstacles, so tightly
//! clustered obstacles can still leave a vertex inside some other obstacle's
//! radius.

use crate::config::NavigationConfig;
use crate::geo::{haversine_distance, initial_bearing, offset_degrees};
use crate::models::{Obstacle, Point, Route};

/// Rewrite vertices that fall inside an obstacle's safety radius.
///
/// The first and last points are kept as-is. The output has the same
/// length as the input.
pub fn process(route: &Route, obstacles: &[Obstacle], config: &NavigationConfig) -> Route {
    let points = route.points();
    if obstacles.is_empty() || points.len() <= 2 {
        return route.clone();
    }

    let mut accepted: Vec<Point> = Vec::with_capacity(points.len());
    accepted.push(points[0]);
    let mut displaced = 0usize;

    for &point in &points[1..points.len() - 1] {
        let Some(obstacle) = nearest_within(point, obstacles, config.safety_radius_m) else {
            accepted.push(point);
            continue;
        };

        let previous = accepted[accepted.len() - 1];
        let away = initial_bearing(obstacle.position, previous);
        accepted.push(offset_degrees(obstacle.position, away, config.displacement_deg));
        displaced += 1;
    }

    accepted.push(route.last());

    if displaced > 0 {
        tracing::debug!(
            "Avoidance displaced {} of {} vertices",
            displaced,
            points.len()
        );
    }

    Route::from_points_unchecked(accepted)
}

/// Nearest obstacle strictly inside `radius_m`; ties keep the first one.
fn nearest_within(point: Point, obstacles: &[Obstacle], radius_m: f64) -> Option<&Obstacle> {
    let mut best: Option<(&Obstacle, f64)> = None;
    for obstacle in obstacles {
        let dist = haversine_distance(point, obstacle.position);
        if dist >= radius_m {
            continue;
        }
        let is_better = match best {
            Some((_, best_dist)) => dist < best_dist,
            None => true,
        };
        if is_better {
            best = Some((obstacle, dist));
        }
    }
    best.map(|(obstacle, _)| obstacle)
}
