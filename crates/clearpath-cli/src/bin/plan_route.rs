//! Plan a single obstacle-aware walking route and print it.
//!
//! Usage:
//!   cargo run -p clearpath-cli --bin plan_route -- \
//!     --from 37.5665,126.9780 --to 37.5675,126.9790 --obstacle 37.5670,126.9785

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use clearpath_cli::{init_tracing, parse_point, JsonRenderer, TextRenderer};
use clearpath_core::{
    format_distance, MapRenderer, NavigationConfig, NavigationSession, Obstacle, Point,
    RouteProvider, RouteUnavailable,
};
use clearpath_osrm::{OsrmClient, OsrmConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan an obstacle-aware walking route")]
struct Args {
    /// Start as "lat,lng"
    #[arg(long, value_parser = parse_point)]
    from: Point,

    /// Destination as "lat,lng"
    #[arg(long, value_parser = parse_point)]
    to: Point,

    /// Obstacle as "lat,lng" (repeatable)
    #[arg(long = "obstacle", value_parser = parse_point)]
    obstacles: Vec<Point>,

    /// Skip the routing server and use the straight-line fallback
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Print the route overlay as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Safety radius around obstacles in meters
    #[arg(long, default_value_t = 50.0)]
    safety_radius: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("clearpath=info,plan_route=info")?;
    let args = Args::parse();

    let config = NavigationConfig {
        safety_radius_m: args.safety_radius,
        ..NavigationConfig::default()
    };
    let obstacles: Vec<Obstacle> = args.obstacles.iter().copied().map(Obstacle::from).collect();

    let mut session = NavigationSession::new(config);
    let request = session.start(args.from, args.to, &obstacles)?;

    let result = if args.offline {
        Err(RouteUnavailable::Offline)
    } else {
        let osrm = OsrmConfig::from_env();
        let client = OsrmClient::new(&osrm).context("Failed to create HTTP client")?;
        tracing::info!("Requesting route from {} ({})", osrm.base_url, osrm.profile);
        match tokio::time::timeout(
            osrm.timeout,
            client.fetch_walking_route(request.origin, request.destination),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RouteUnavailable::Timeout(osrm.timeout_ms())),
        }
    };
    if let Err(reason) = &result {
        tracing::warn!("Routing server unavailable: {}", reason);
    }
    session.complete_route(&request, result);

    let source = session.route_source().context("Route was not produced")?;
    tracing::info!(
        "Route source {:?}, {} obstacle(s) within {}",
        source,
        session.nearby_obstacles(args.from),
        format_distance(session.config().nearby_radius_m)
    );

    let stdout = io::stdout().lock();
    let mut renderer: Box<dyn MapRenderer> = if args.json {
        Box::new(JsonRenderer::new(stdout))
    } else {
        Box::new(TextRenderer::new(stdout))
    };
    session.render(renderer.as_mut());

    Ok(())
}
