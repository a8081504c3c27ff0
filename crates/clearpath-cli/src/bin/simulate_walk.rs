//! Walk a planned route with simulated GPS fixes and print live guidance.
//!
//! The session runs on its own task; fixes are generated along the route
//! and pushed at a (sped-up) walking pace until arrival.
//!
//! Usage:
//!   cargo run -p clearpath-cli --bin simulate_walk -- \
//!     --to 37.5675,126.9790 --obstacle 37.5670,126.9785 --offline

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use clearpath_cli::sim::RouteWalker;
use clearpath_cli::{init_tracing, parse_point};
use clearpath_core::{format_distance, Obstacle, OfflineRouteProvider, Point, Route, RouteProvider};
use clearpath_osrm::{OsrmClient, OsrmConfig};
use clearpath_sdk::{
    bootstrap_origin, spawn_navigation, GuidanceEvent, RunnerConfig, DEFAULT_ORIGIN,
    INITIAL_FIX_TIMEOUT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate a guided walk along an obstacle-aware route")]
struct Args {
    /// Start as "lat,lng" (defaults to Seoul City Hall)
    #[arg(long, value_parser = parse_point)]
    from: Option<Point>,

    /// Destination as "lat,lng"
    #[arg(long, value_parser = parse_point)]
    to: Point,

    /// Obstacle as "lat,lng" (repeatable)
    #[arg(long = "obstacle", value_parser = parse_point)]
    obstacles: Vec<Point>,

    /// Skip the routing server and use the straight-line fallback
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Walking speed in m/s
    #[arg(long, default_value_t = 1.4)]
    speed: f64,

    /// Seconds of simulated time between fixes
    #[arg(long, default_value_t = 5.0)]
    interval: f64,

    /// Simulation speed multiplier
    #[arg(long, default_value_t = 10.0)]
    speedup: f64,

    /// Max GPS noise per axis in meters
    #[arg(long, default_value_t = 3.0)]
    jitter: f64,

    /// RNG seed for GPS noise
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("clearpath=info,simulate_walk=info")?;
    let args = Args::parse();

    let from = args.from;
    let origin = bootstrap_origin(
        async move { from.ok_or("no --from given") },
        INITIAL_FIX_TIMEOUT,
        DEFAULT_ORIGIN,
    )
    .await;
    tracing::info!(
        "Navigating from ({}, {}) to ({}, {})",
        origin.lat,
        origin.lng,
        args.to.lat,
        args.to.lng
    );

    if args.offline {
        run(OfflineRouteProvider, RunnerConfig::default(), origin, &args).await
    } else {
        let osrm = OsrmConfig::from_env();
        let client = OsrmClient::new(&osrm).context("Failed to create HTTP client")?;
        let config = RunnerConfig {
            route_timeout: osrm.timeout,
            ..RunnerConfig::default()
        };
        run(client, config, origin, &args).await
    }
}

async fn run<P>(provider: P, config: RunnerConfig, origin: Point, args: &Args) -> Result<()>
where
    P: RouteProvider + Send + Sync + 'static,
{
    let obstacles: Vec<Obstacle> = args.obstacles.iter().copied().map(Obstacle::from).collect();
    let (handle, mut events) = spawn_navigation(provider, config, origin, args.to, obstacles)?;

    let route = match next_event(&mut events).await? {
        GuidanceEvent::RouteReady { source, overlay } => {
            println!(
                "Route ready ({:?}): {} points, {} turn(s)",
                source,
                overlay.route.len(),
                overlay.turns.len()
            );
            Route::new(overlay.route)?
        }
        GuidanceEvent::Cancelled => bail!("Session cancelled before a route was ready"),
        other => bail!("Unexpected event before route: {:?}", other),
    };

    handle.begin_navigating().await?;
    print_event(&next_event(&mut events).await?);

    let walker = RouteWalker::new(&route, args.speed).with_jitter(args.jitter);
    println!(
        "Walking {} at {:.1} m/s (~{:.0} s)",
        format_distance(walker.length_m()),
        args.speed,
        walker.duration_s()
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let pause = Duration::from_secs_f64((args.interval / args.speedup.max(0.1)).max(0.0));
    for fix in walker.fixes(args.interval, Utc::now(), &mut rng) {
        tokio::time::sleep(pause).await;
        handle.push_fix(fix).await?;

        let event = next_event(&mut events).await?;
        print_event(&event);
        if matches!(event, GuidanceEvent::Arrived(_)) {
            return Ok(());
        }
    }

    // jitter can keep the last fix outside the arrival radius
    tracing::warn!("Route finished without arrival");
    handle.cancel().await?;
    println!("Route finished without arrival, session cancelled");
    Ok(())
}

async fn next_event(events: &mut mpsc::Receiver<GuidanceEvent>) -> Result<GuidanceEvent> {
    events.recv().await.context("Navigation session ended unexpectedly")
}

fn print_event(event: &GuidanceEvent) {
    match event {
        GuidanceEvent::Guidance(guidance) => {
            let heading = guidance.heading.map(|h| h.label()).unwrap_or("-");
            let next = match &guidance.next_turn {
                Some(turn) => format!(
                    "{} in {}",
                    turn.instruction.label(),
                    format_distance(turn.distance_m)
                ),
                None => "no more turns".to_string(),
            };
            println!(
                "[{}] head {}, {}, {} to go",
                guidance.closest_index,
                heading,
                next,
                format_distance(guidance.distance_to_destination_m)
            );
        }
        GuidanceEvent::Arrived(guidance) => println!(
            "Arrived ({} from destination)",
            format_distance(guidance.distance_to_destination_m)
        ),
        GuidanceEvent::FixRejected { reason } => println!("Fix rejected: {}", reason),
        GuidanceEvent::Cancelled => println!("Cancelled"),
        GuidanceEvent::RouteReady { source, .. } => println!("Route ready ({:?})", source),
    }
}
