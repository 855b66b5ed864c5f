use serde::Serialize;

use crate::fitness::ActivityMetrics;

pub const MAX_HEART_POINTS: f64 = 100.0;
pub const MAX_CALORIES_BURNT: f64 = 5000.0;
pub const MAX_TOTAL_STEPS: f64 = 10000.0;

pub const WEIGHT_HEART_POINTS: f64 = 0.5;
pub const WEIGHT_CALORIES_BURNT: f64 = 0.3;
pub const WEIGHT_TOTAL_STEPS: f64 = 0.2;

pub const MIN_TOKENS: i64 = 0;
pub const MAX_TOKENS: i64 = 1000;

/// Normalized and weighted contribution of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScore {
    pub normalized: f64,
    pub weighted: f64,
}

impl SubScore {
    fn new(raw: f64, cap: f64, weight: f64) -> Self {
        // Not clamped: a value above the cap normalizes above 1.
        let normalized = raw / cap;
        Self {
            normalized,
            weighted: normalized * weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositeScore {
    pub heart_points: SubScore,
    pub calories: SubScore,
    pub steps: SubScore,
    pub composite: f64,
}

pub fn composite_score(metrics: &ActivityMetrics) -> CompositeScore {
    let heart_points = SubScore::new(metrics.heart_points, MAX_HEART_POINTS, WEIGHT_HEART_POINTS);
    let calories = SubScore::new(metrics.calories, MAX_CALORIES_BURNT, WEIGHT_CALORIES_BURNT);
    let steps = SubScore::new(metrics.steps as f64, MAX_TOTAL_STEPS, WEIGHT_TOTAL_STEPS);

    CompositeScore {
        heart_points,
        calories,
        steps,
        composite: heart_points.weighted + calories.weighted + steps.weighted,
    }
}

/// Linear map of the composite onto `[MIN_TOKENS, MAX_TOKENS]`, rounded half
/// up. The result is deliberately left unclamped.
pub fn tokens_for_score(composite: f64) -> i64 {
    let scaled = composite * (MAX_TOKENS - MIN_TOKENS) as f64 + MIN_TOKENS as f64;
    (scaled + 0.5).floor() as i64
}
