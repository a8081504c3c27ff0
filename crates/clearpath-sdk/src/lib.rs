//! Clearpath SDK - async navigation sessions
//!
//! Runs a `NavigationSession` on its own task, fed by a route provider and a
//! stream of position fixes.

pub mod bootstrap;
pub mod runner;

pub use bootstrap::{bootstrap_origin, DEFAULT_ORIGIN, INITIAL_FIX_TIMEOUT};
pub use clearpath_core::{Guidance, NavError, Obstacle, Point, PositionFix, RouteSource};
pub use runner::{spawn_navigation, GuidanceEvent, NavigationHandle, RunnerConfig, SdkError};
