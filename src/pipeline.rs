use serde::Serialize;

use crate::cumulative::{cumulative_snapshot, ips_sequence, recent_average};
use crate::honors;
use crate::models::{
    AcademicLevel, Classification, CumulativeSnapshot, GradeHistory, ProjectionResult,
    TrendResult,
};
use crate::probability::{estimate_probability, ProbabilityInputs};
use crate::projection::project_trajectory;
use crate::target::{historical_load, solve_required_average, TargetOutcome};
use crate::trend::analyze_trend;

/// Semesters that feed the "recent average" used by the probability score.
const RECENT_WINDOW: usize = 3;

/// Everything the front end shows, recomputed from scratch on each pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub level: AcademicLevel,
    pub ips: Vec<f64>,
    pub snapshot: CumulativeSnapshot,
    pub trend: TrendResult,
    pub classification: Classification,
    pub remaining_semesters: usize,
    pub recent_average: f64,
    pub outcome: TargetOutcome,
    pub probability: u8,
    pub projection: ProjectionResult,
}

pub fn analyze(history: &GradeHistory) -> Analysis {
    let semesters = &history.semesters;
    let ips = ips_sequence(semesters);
    let snapshot = cumulative_snapshot(semesters);
    let trend = analyze_trend(&ips);
    let classification = honors::resolve(snapshot.current_average, &history.jenjang);

    let remaining_semesters = history.jenjang.remaining_semesters(semesters.len());
    let load = historical_load(&snapshot, semesters.len());
    let outcome = solve_required_average(
        &snapshot,
        classification.target,
        load,
        remaining_semesters,
    );

    let recent_average = recent_average(&ips, RECENT_WINDOW);
    let probability = estimate_probability(&ProbabilityInputs {
        current_average: snapshot.current_average,
        target: classification.target,
        average_delta: trend.average_delta,
        required: outcome.required,
        recent_average,
        remaining_semesters,
    });
    let projection = project_trajectory(
        &snapshot.cumulative_average,
        remaining_semesters,
        outcome.required,
    );

    Analysis {
        level: history.jenjang.clone(),
        ips,
        snapshot,
        trend,
        classification,
        remaining_semesters,
        recent_average,
        outcome,
        probability,
        projection,
    }
}

impl Analysis {
    /// Short human-readable lines shown under the headline numbers.
    pub fn insights(&self) -> Vec<String> {
        let requirement = match (self.remaining_semesters, self.outcome.required.value()) {
            (0, _) => "Final semester reached".to_string(),
            (remaining, Some(required)) if self.outcome.feasible => format!(
                "Needs an IPS of about {required:.2} per semester for {remaining} semesters"
            ),
            _ => "Needs an IPS above 4.00, not realistic without another plan".to_string(),
        };

        vec![
            format!(
                "IPS trend: {} (average change per semester: {:.3})",
                self.trend.label.as_str(),
                self.trend.average_delta
            ),
            format!("Current IPK estimate: {:.3}", self.snapshot.current_average),
            requirement,
        ]
    }
}
