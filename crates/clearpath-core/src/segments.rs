//! Route segmentation into turn-by-turn instructions.

use crate::config::TurnThresholds;
use crate::geo::{initial_bearing, signed_bearing_delta};
use crate::models::{Route, Segment, TurnInstruction};

/// Split a route into one segment per leg and classify each vertex.
///
/// The instruction on segment `i` describes the turn taken at
/// `route[i]`, i.e. the change from leg `i - 1` to leg `i`. The first
/// segment has no previous leg and is always straight.
pub fn analyze(route: &Route, thresholds: &TurnThresholds) -> Vec<Segment> {
    let points = route.points();
    let mut segments: Vec<Segment> = Vec::with_capacity(points.len().saturating_sub(1));

    for leg in points.windows(2) {
        let bearing_deg = initial_bearing(leg[0], leg[1]);
        let instruction = match segments.last() {
            Some(prev) => classify_turn(prev.bearing_deg, bearing_deg, thresholds),
            None => TurnInstruction::Straight,
        };
        segments.push(Segment {
            point: leg[0],
            bearing_deg,
            instruction,
        });
    }

    segments
}

/// Classify the bearing change between two consecutive legs.
///
/// The unsigned change is folded into [0, 180]. Changes in
/// `[turn_min, turn_max)` turn left or right depending on the sign of the
/// wrapped difference; changes at or above `u_turn_min` are U-turns;
/// everything else, including the gap between `turn_max` and
/// `u_turn_min`, stays straight.
pub fn classify_turn(
    prev_bearing_deg: f64,
    bearing_deg: f64,
    thresholds: &TurnThresholds,
) -> TurnInstruction {
    let mut diff = (bearing_deg - prev_bearing_deg).abs();
    if diff > 180.0 {
        diff = 360.0 - diff;
    }

    if diff >= thresholds.u_turn_min_deg {
        TurnInstruction::UTurn
    } else if diff >= thresholds.turn_min_deg && diff < thresholds.turn_max_deg {
        if signed_bearing_delta(prev_bearing_deg, bearing_deg) > 0.0 {
            TurnInstruction::Right
        } else {
            TurnInstruction::Left
        }
    } else {
        TurnInstruction::Straight
    }
}

/// Segments that carry an actual turn, for map markers.
pub fn turn_points(segments: &[Segment]) -> Vec<Segment> {
    segments
        .iter()
        .filter(|s| s.instruction.is_turn())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn route(points: &[(f64, f64)]) -> Route {
        Route::new(points.iter().map(|&(lat, lng)| Point::new(lat, lng)).collect()).unwrap()
    }

    #[test]
    fn collinear_route_is_all_straight() {
        let r = route(&[
            (37.5000, 127.0),
            (37.5010, 127.0),
            (37.5020, 127.0),
            (37.5030, 127.0),
            (37.5040, 127.0),
        ]);
        let segments = analyze(&r, &TurnThresholds::default());
        assert_eq!(segments.len(), 4);
        assert!(segments
            .iter()
            .all(|s| s.instruction == TurnInstruction::Straight));
    }

    #[test]
    fn east_then_north_is_left() {
        let r = route(&[(37.5, 127.000), (37.5, 127.001), (37.501, 127.001)]);
        let segments = analyze(&r, &TurnThresholds::default());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].instruction, TurnInstruction::Straight);
        assert_eq!(segments[1].instruction, TurnInstruction::Left);
        assert_eq!(segments[1].point, Point::new(37.5, 127.001));
    }

    #[test]
    fn north_then_east_is_right() {
        let r = route(&[(37.500, 127.0), (37.501, 127.0), (37.501, 127.001)]);
        let segments = analyze(&r, &TurnThresholds::default());
        assert_eq!(segments[1].instruction, TurnInstruction::Right);
    }

    #[test]
    fn reversal_is_u_turn() {
        let r = route(&[(37.500, 127.0), (37.501, 127.0), (37.5005, 127.0)]);
        let segments = analyze(&r, &TurnThresholds::default());
        assert_eq!(segments[1].instruction, TurnInstruction::UTurn);
    }

    #[test]
    fn classify_threshold_bands() {
        let t = TurnThresholds::default();
        assert_eq!(classify_turn(0.0, 44.9, &t), TurnInstruction::Straight);
        assert_eq!(classify_turn(0.0, 45.0, &t), TurnInstruction::Right);
        assert_eq!(classify_turn(0.0, 315.0, &t), TurnInstruction::Left);
        assert_eq!(classify_turn(0.0, 134.9, &t), TurnInstruction::Right);
        // gap between the turn band and the U-turn band
        assert_eq!(classify_turn(0.0, 135.0, &t), TurnInstruction::Straight);
        assert_eq!(classify_turn(0.0, 159.9, &t), TurnInstruction::Straight);
        assert_eq!(classify_turn(0.0, 160.0, &t), TurnInstruction::UTurn);
        assert_eq!(classify_turn(10.0, 190.0, &t), TurnInstruction::UTurn);
    }

    #[test]
    fn classify_wraps_through_north() {
        let t = TurnThresholds::default();
        assert_eq!(classify_turn(350.0, 80.0, &t), TurnInstruction::Right);
        assert_eq!(classify_turn(80.0, 350.0, &t), TurnInstruction::Left);
        assert_eq!(classify_turn(355.0, 5.0, &t), TurnInstruction::Straight);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let strict = TurnThresholds {
            turn_min_deg: 20.0,
            turn_max_deg: 170.0,
            u_turn_min_deg: 175.0,
        };
        assert_eq!(classify_turn(0.0, 30.0, &strict), TurnInstruction::Right);
        assert_eq!(classify_turn(0.0, 150.0, &strict), TurnInstruction::Right);
    }

    #[test]
    fn bearings_are_in_range() {
        let r = route(&[(37.5, 127.0), (37.499, 126.999), (37.5, 126.998)]);
        for segment in analyze(&r, &TurnThresholds::default()) {
            assert!((0.0..360.0).contains(&segment.bearing_deg));
        }
    }

    #[test]
    fn turn_points_filters_straight() {
        let r = route(&[(37.5, 127.000), (37.5, 127.001), (37.501, 127.001)]);
        let turns = turn_points(&analyze(&r, &TurnThresholds::default()));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].instruction, TurnInstruction::Left);
    }
}
