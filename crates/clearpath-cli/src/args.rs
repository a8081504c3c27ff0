//! Shared helpers for the CLI binaries.

use clearpath_core::Point;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse `"lat,lng"` into a point. Used as a clap value parser.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng', got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;

    let point = Point::new(lat, lng);
    point.validate().map_err(|e| e.to_string())?;
    Ok(point)
}

/// Install the fmt subscriber on stderr, honoring `RUST_LOG` on top of the
/// comma-separated `directives`.
pub fn init_tracing(directives: &str) -> anyhow::Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
        filter = filter.add_directive(directive.trim().parse()?);
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}
