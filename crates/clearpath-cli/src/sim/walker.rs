//! Walking simulation along a route polyline.

use chrono::{DateTime, Utc};
use clearpath_core::geo::path_length;
use clearpath_core::{Point, PositionFix, Route};
use rand::Rng;

/// Meters per degree of latitude (approximate).
const METERS_PER_DEG: f64 = 111_320.0;

/// Walks a route at constant speed, producing position fixes with optional
/// GPS-like jitter.
pub struct RouteWalker {
    points: Vec<Point>,
    /// Distance from the start to each vertex.
    cumulative_m: Vec<f64>,
    speed_mps: f64,
    jitter_m: f64,
}

impl RouteWalker {
    pub fn new(route: &Route, speed_mps: f64) -> Self {
        let points = route.points().to_vec();
        let mut cumulative_m = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative_m.push(total);
        for leg in points.windows(2) {
            total += path_length(leg);
            cumulative_m.push(total);
        }

        Self {
            points,
            cumulative_m,
            speed_mps,
            jitter_m: 0.0,
        }
    }

    /// Add uniform noise of up to `jitter_m` meters on each axis.
    pub fn with_jitter(mut self, jitter_m: f64) -> Self {
        self.jitter_m = jitter_m.max(0.0);
        self
    }

    pub fn length_m(&self) -> f64 {
        self.cumulative_m.last().copied().unwrap_or(0.0)
    }

    pub fn duration_s(&self) -> f64 {
        if self.speed_mps > 0.0 {
            self.length_m() / self.speed_mps
        } else {
            0.0
        }
    }

    /// Noise-free position `t` seconds after leaving the start.
    pub fn position_at(&self, t: f64) -> Point {
        let length = self.length_m();
        let traveled = t.max(0.0) * self.speed_mps;
        if traveled >= length - 1e-6 && self.speed_mps > 0.0 {
            return self.points[self.points.len() - 1];
        }

        // first vertex at or beyond the traveled distance
        let next = self
            .cumulative_m
            .iter()
            .position(|&d| d >= traveled)
            .unwrap_or(self.points.len() - 1);
        if next == 0 {
            return self.points[0];
        }

        let start = self.points[next - 1];
        let end = self.points[next];
        let leg = self.cumulative_m[next] - self.cumulative_m[next - 1];
        let progress = if leg > 0.0 {
            (traveled - self.cumulative_m[next - 1]) / leg
        } else {
            1.0
        };

        Point::new(
            start.lat + progress * (end.lat - start.lat),
            start.lng + progress * (end.lng - start.lng),
        )
    }

    /// One fix every `interval_s` seconds from start to finish. The last fix
    /// is always taken at the end of the route.
    pub fn fixes<R: Rng>(
        &self,
        interval_s: f64,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<PositionFix> {
        let duration = self.duration_s();
        let mut times = Vec::new();
        if interval_s > 0.0 {
            let mut t = 0.0;
            while t < duration {
                times.push(t);
                t += interval_s;
            }
        }
        times.push(duration);

        times
            .into_iter()
            .map(|t| {
                let point = self.jittered(self.position_at(t), rng);
                let timestamp = started_at + chrono::Duration::milliseconds((t * 1000.0) as i64);
                PositionFix::at(point, timestamp)
            })
            .collect()
    }

    fn jittered<R: Rng>(&self, point: Point, rng: &mut R) -> Point {
        if self.jitter_m <= 0.0 {
            return point;
        }
        let north_m = rng.random_range(-self.jitter_m..=self.jitter_m);
        let east_m = rng.random_range(-self.jitter_m..=self.jitter_m);
        Point::new(
            point.lat + north_m / METERS_PER_DEG,
            point.lng + east_m / (METERS_PER_DEG * point.lat.to_radians().cos()),
        )
    }
}
