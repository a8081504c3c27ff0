//! Tunable constants for avoidance, turn classification and arrival.
//!
//! Calibrated defaults; each can be overridden per session.

use serde::{Deserialize, Serialize};

/// Exclusion radius around each obstacle (meters).
pub const DEFAULT_SAFETY_RADIUS_M: f64 = 50.0;
/// Displacement applied by the avoidance pass, in coordinate degrees (~60-70 m).
pub const DEFAULT_DISPLACEMENT_DEG: f64 = 0.0006;
/// Nudge applied to fallback points, in coordinate degrees (~50 m).
pub const DEFAULT_FALLBACK_OFFSET_DEG: f64 = 0.0005;
/// Interpolation steps for the fallback polyline (steps + 1 points).
pub const DEFAULT_FALLBACK_STEPS: usize = 10;
/// Distance to destination under which the walk counts as arrived (meters).
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 10.0;
/// Provider geometry shorter than this is treated as unavailable.
pub const MIN_PROVIDER_POINTS: usize = 3;
/// Radius used when counting obstacles around the walker (meters).
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 500.0;

/// Bearing-change thresholds (degrees) for turn classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnThresholds {
    /// Smallest bearing change reported as a left/right turn.
    pub turn_min_deg: f64,
    /// Upper bound (exclusive) of the left/right band.
    pub turn_max_deg: f64,
    /// Smallest bearing change reported as a U-turn.
    pub u_turn_min_deg: f64,
}

impl Default for TurnThresholds {
    fn default() -> Self {
        Self {
            turn_min_deg: 45.0,
            turn_max_deg: 135.0,
            u_turn_min_deg: 160.0,
        }
    }
}

/// Configuration for one navigation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub safety_radius_m: f64,
    pub displacement_deg: f64,
    pub fallback_offset_deg: f64,
    pub fallback_steps: usize,
    pub arrival_radius_m: f64,
    pub nearby_radius_m: f64,
    pub turns: TurnThresholds,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            safety_radius_m: DEFAULT_SAFETY_RADIUS_M,
            displacement_deg: DEFAULT_DISPLACEMENT_DEG,
            fallback_offset_deg: DEFAULT_FALLBACK_OFFSET_DEG,
            fallback_steps: DEFAULT_FALLBACK_STEPS,
            arrival_radius_m: DEFAULT_ARRIVAL_RADIUS_M,
            nearby_radius_m: DEFAULT_NEARBY_RADIUS_M,
            turns: TurnThresholds::default(),
        }
    }
}
