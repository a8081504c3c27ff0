//! Position fix simulation.

pub mod walker;

pub use walker::RouteWalker;
