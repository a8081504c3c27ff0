//! Clearpath OSRM - walking-route provider
//!
//! Talks to an OSRM-compatible `route/v1` endpoint and hands the geometry to
//! the core session as a `RouteProvider`.

pub mod client;
pub mod config;

pub use client::{decode_route, OsrmClient, WalkingRoute};
pub use config::OsrmConfig;
