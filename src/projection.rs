use crate::models::ProjectionResult;
use crate::target::{RequiredAverage, MAX_GRADE};
use crate::trend::round_to;

/// Straight-line path from the last cumulative average towards the required
/// average (or 4.0 when there is none). A display aid, not a forecast.
pub fn project_trajectory(
    cumulative_average: &[f64],
    remaining_semesters: usize,
    required: RequiredAverage,
) -> ProjectionResult {
    if remaining_semesters == 0 {
        return ProjectionResult::default();
    }

    let last = cumulative_average
        .last()
        .copied()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0);
    let future_average = required
        .value()
        .filter(|value| value.is_finite())
        .unwrap_or(MAX_GRADE);
    let steps = (remaining_semesters + 1) as f64;

    let (labels, values) = (1..=remaining_semesters)
        .map(|step| {
            let point = last + (future_average - last) * (step as f64 / steps);
            (format!("P{step}"), round_to(point.clamp(0.0, MAX_GRADE), 3))
        })
        .unzip();

    ProjectionResult { labels, values }
}
