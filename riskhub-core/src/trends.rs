//! Synthetic RIx trend history
//!
//! Produces an illustrative series of past readings for display. The series
//! is not a forecast and must not be treated as recorded history.
//!
//! Global invariants enforced:
//! - Exactly 10 points, `t` strictly increasing from 0
//! - Values clamped to [5, 99]

use crate::rng::UniformSource;
use serde::{Deserialize, Serialize};

/// Points per generated history
pub const TREND_POINTS: usize = 10;

const TREND_FLOOR: f64 = 5.0;
const TREND_CEILING: f64 = 99.0;

/// Width of the uniform jitter around the base value
const JITTER_SPAN: f64 = 20.0;

/// Per-step offset; older points sit lower than the base
const DECAY_PER_STEP: f64 = 0.5;

/// Number of most recent points compared by the direction indicator
const DIRECTION_WINDOW: usize = 4;

/// Minimum history length for a direction
const MIN_DIRECTION_POINTS: usize = 3;

/// Change below which a trend counts as stable
const STABLE_DELTA: f64 = 3.0;

/// One reading; `t = 0` is the oldest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub t: u32,
    pub value: f64,
}

/// Direction of recent movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Worsening,
    Improving,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Stable => "stable",
            TrendDirection::Worsening => "worsening",
            TrendDirection::Improving => "improving",
        }
    }
}

/// Direction plus the change that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    /// Last value minus first value of the recent window
    pub delta: f64,
}

/// Generate a synthetic history around `base_rix`
///
/// value(t) = clamp(base + (u - 0.5) * 20 - (9 - t) * 0.5, 5, 99)
pub fn generate_trend<R: UniformSource + ?Sized>(base_rix: u8, rng: &mut R) -> Vec<TrendPoint> {
    let base = f64::from(base_rix);
    let newest = (TREND_POINTS - 1) as f64;

    (0..TREND_POINTS)
        .map(|i| {
            let jitter = (rng.next_uniform() - 0.5) * JITTER_SPAN;
            let decay = (newest - i as f64) * DECAY_PER_STEP;
            TrendPoint {
                t: i as u32,
                value: (base + jitter - decay).clamp(TREND_FLOOR, TREND_CEILING),
            }
        })
        .collect()
}

/// Compare the first and last points of the most recent 4-point window
///
/// Returns `None` for histories shorter than 3 points.
pub fn trend_direction(points: &[TrendPoint]) -> Option<TrendIndicator> {
    if points.len() < MIN_DIRECTION_POINTS {
        return None;
    }
    let window = &points[points.len().saturating_sub(DIRECTION_WINDOW)..];
    let delta = window.last()?.value - window.first()?.value;

    let direction = if delta.abs() < STABLE_DELTA {
        TrendDirection::Stable
    } else if delta > 0.0 {
        TrendDirection::Worsening
    } else {
        TrendDirection::Improving
    };
    Some(TrendIndicator { direction, delta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSequence, RngSource};

    fn points(values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint { t: i as u32, value })
            .collect()
    }

    #[test]
    fn test_generate_shape() {
        let trend = generate_trend(50, &mut RngSource::seeded(42));
        assert_eq!(trend.len(), TREND_POINTS);
        for (i, point) in trend.iter().enumerate() {
            assert_eq!(point.t, i as u32);
            assert!((5.0..=99.0).contains(&point.value));
        }
    }

    #[test]
    fn test_midpoint_draws_give_linear_decay() {
        let trend = generate_trend(50, &mut FixedSequence::constant(0.5));
        assert_eq!(trend[0].value, 45.5);
        assert_eq!(trend[9].value, 50.0);
    }

    #[test]
    fn test_values_clamped() {
        let high = generate_trend(99, &mut FixedSequence::constant(1.0));
        assert!(high.iter().all(|p| p.value <= 99.0));
        assert_eq!(high[9].value, 99.0);

        let low = generate_trend(0, &mut FixedSequence::constant(0.0));
        assert!(low.iter().all(|p| p.value == 5.0));
    }

    #[test]
    fn test_direction_needs_three_points() {
        assert!(trend_direction(&points(&[10.0, 20.0])).is_none());
        assert!(trend_direction(&points(&[10.0, 20.0, 30.0])).is_some());
    }

    #[test]
    fn test_direction_uses_last_four_points() {
        // Window is [40, 41, 42, 42.5]: delta 2.5 is stable despite the early jump
        let indicator = trend_direction(&points(&[5.0, 90.0, 40.0, 41.0, 42.0, 42.5])).unwrap();
        assert_eq!(indicator.direction, TrendDirection::Stable);
        assert_eq!(indicator.delta, 2.5);
    }

    #[test]
    fn test_direction_thresholds() {
        let worse = trend_direction(&points(&[40.0, 41.0, 42.0, 43.0])).unwrap();
        assert_eq!(worse.direction, TrendDirection::Worsening);

        let better = trend_direction(&points(&[43.0, 42.0, 41.0, 40.0])).unwrap();
        assert_eq!(better.direction, TrendDirection::Improving);

        let flat = trend_direction(&points(&[40.0, 45.0, 41.0, 42.9])).unwrap();
        assert_eq!(flat.direction, TrendDirection::Stable);
    }
}
