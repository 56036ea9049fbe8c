use crate::cumulative::sanitize;
use crate::target::{RequiredAverage, MAX_GRADE};

const MIN_SCORE: i64 = 2;
const MAX_SCORE: i64 = 98;
const INFEASIBLE_SCORE: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityInputs {
    pub current_average: f64,
    pub target: f64,
    pub average_delta: f64,
    pub required: RequiredAverage,
    pub recent_average: f64,
    pub remaining_semesters: usize,
}

/// Heuristic chance (percent) of graduating Cumlaude. Always in 2..=98.
pub fn estimate_probability(inputs: &ProbabilityInputs) -> u8 {
    let score = raw_score(inputs).clamp(MIN_SCORE, MAX_SCORE);
    score as u8
}

fn raw_score(inputs: &ProbabilityInputs) -> i64 {
    if inputs.remaining_semesters == 0 {
        return if inputs.current_average >= inputs.target {
            100
        } else {
            50
        };
    }

    let required = match inputs.required.value() {
        Some(value) if value.is_finite() && value <= MAX_GRADE => value,
        _ => return INFEASIBLE_SCORE,
    };

    let gap = (required - sanitize(inputs.recent_average)).max(0.0);
    if gap <= 0.0 {
        return 85 + round_half_up(gap.abs() * 20.0).min(15);
    }

    let trend_boost = round_half_up(sanitize(inputs.average_delta) * 40.0).clamp(-10, 20);
    let remaining_boost = inputs.remaining_semesters.saturating_mul(6).min(20) as i64;
    // Unclamped stored grades can put `required` far below zero.
    let difficulty = round_half_up((MAX_GRADE - required) * 12.0).clamp(-100, 100);
    20 + difficulty + trend_boost + remaining_boost
}

/// Rounds .5 towards positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
