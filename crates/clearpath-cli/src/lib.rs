//! Clearpath CLI - demo harnesses around the navigation core.
//!
//! - plan_route: plan one route and print it
//! - simulate_walk: walk a planned route with simulated GPS fixes

pub mod args;
pub mod render;
pub mod sim;

pub use args::{init_tracing, parse_point};
pub use render::{JsonRenderer, TextRenderer};
