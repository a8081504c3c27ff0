//! Initial origin lookup.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use clearpath_core::Point;

/// Seoul City Hall, used when no position can be acquired.
pub const DEFAULT_ORIGIN: Point = Point::new(37.5665, 126.9780);

/// How long to wait for the first position fix.
pub const INITIAL_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the trip origin from a position source.
///
/// Falls back to `default` if the source fails, yields a non-finite point
/// or does not answer within `timeout`.
pub async fn bootstrap_origin<F, E>(acquire: F, timeout: Duration, default: Point) -> Point
where
    F: Future<Output = Result<Point, E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, acquire).await {
        Ok(Ok(point)) if point.is_finite() => point,
        Ok(Ok(point)) => {
            tracing::warn!("Position source returned invalid point {:?}, using default", point);
            default
        }
        Ok(Err(e)) => {
            tracing::warn!("Position unavailable ({}), using default origin", e);
            default
        }
        Err(_) => {
            tracing::warn!(
                "No position within {} ms, using default origin",
                timeout.as_millis()
            );
            default
        }
    }
}
