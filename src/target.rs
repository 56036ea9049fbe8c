use serde::Serialize;

use crate::models::CumulativeSnapshot;

/// Highest semester average a student can earn.
pub const MAX_GRADE: f64 = 4.0;
/// Per-semester load assumed when the history gives nothing better.
pub const NOMINAL_CREDIT_LOAD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RequiredAverage {
    Value(f64),
    /// No semesters remain, so no future average can move the IPK.
    Unavailable,
}

impl RequiredAverage {
    pub fn value(&self) -> Option<f64> {
        match self {
            RequiredAverage::Value(value) => Some(*value),
            RequiredAverage::Unavailable => None,
        }
    }

    pub fn exceeds_max(&self) -> bool {
        match self {
            RequiredAverage::Value(value) => *value > MAX_GRADE,
            RequiredAverage::Unavailable => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    OnTrack,
    Needed,
    Unreachable,
    NoSemestersLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub target: f64,
    pub remaining_semesters: usize,
    pub required: RequiredAverage,
    pub feasible: bool,
    pub status: TargetStatus,
}

impl TargetOutcome {
    pub fn message(&self) -> String {
        match (self.status, self.required) {
            (TargetStatus::NoSemestersLeft, _) => {
                "Final semester reached: no semesters remain to improve the IPK.".to_string()
            }
            (TargetStatus::OnTrack, _) if self.remaining_semesters == 0 => {
                "Final semester reached: the Cumlaude target is met!".to_string()
            }
            (TargetStatus::OnTrack, _) => "On track for Cumlaude, keep it up!".to_string(),
            (TargetStatus::Unreachable, required) => format!(
                "Not realistic: needs an average IPS of {} (>4.00) over {} remaining semesters.",
                format_required(required),
                self.remaining_semesters
            ),
            (TargetStatus::Needed, required) => format!(
                "Needs an average IPS of about {} over {} remaining semesters to reach an IPK of {:.2}.",
                format_required(required),
                self.remaining_semesters,
                self.target
            ),
        }
    }
}

fn format_required(required: RequiredAverage) -> String {
    match required {
        RequiredAverage::Value(value) => format!("{value:.2}"),
        RequiredAverage::Unavailable => "-".to_string(),
    }
}

/// Mean SKS per recorded semester, or the nominal load for an empty history.
pub fn historical_load(snapshot: &CumulativeSnapshot, semester_count: usize) -> f64 {
    if semester_count > 0 {
        snapshot.total_credits / semester_count as f64
    } else {
        NOMINAL_CREDIT_LOAD
    }
}

/// Solves for the uniform future semester average that lands the final
/// cumulative average exactly on `target`.
pub fn solve_required_average(
    snapshot: &CumulativeSnapshot,
    target: f64,
    load: f64,
    remaining_semesters: usize,
) -> TargetOutcome {
    let ipk = snapshot.current_average;
    let on_track = ipk >= target;

    if remaining_semesters == 0 {
        let (required, status) = if on_track {
            (RequiredAverage::Value(0.0), TargetStatus::OnTrack)
        } else {
            (RequiredAverage::Unavailable, TargetStatus::NoSemestersLeft)
        };
        return TargetOutcome {
            target,
            remaining_semesters,
            required,
            feasible: on_track,
            status,
        };
    }

    let load = if load.is_finite() && load > 0.0 {
        load
    } else {
        NOMINAL_CREDIT_LOAD
    };
    let future_credits = load * remaining_semesters as f64;
    let final_credits = snapshot.total_credits + future_credits;
    let needed_weighted = target * final_credits - snapshot.total_weighted_grade;
    let required = needed_weighted / future_credits;
    let feasible = required <= MAX_GRADE;

    let status = if on_track {
        TargetStatus::OnTrack
    } else if !feasible {
        TargetStatus::Unreachable
    } else {
        TargetStatus::Needed
    };

    TargetOutcome {
        target,
        remaining_semesters,
        required: RequiredAverage::Value(required),
        feasible,
        status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Mustahil,
    SangatSulit,
    Sulit,
    Menantang,
    Realistis,
}

impl Difficulty {
    pub fn for_required(required: f64) -> Self {
        if required > MAX_GRADE {
            Difficulty::Mustahil
        } else if required > 3.6 {
            Difficulty::SangatSulit
        } else if required > 3.2 {
            Difficulty::Sulit
        } else if required > 2.9 {
            Difficulty::Menantang
        } else {
            Difficulty::Realistis
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Mustahil => "Mustahil",
            Difficulty::SangatSulit => "Sangat Sulit",
            Difficulty::Sulit => "Sulit",
            Difficulty::Menantang => "Menantang",
            Difficulty::Realistis => "Realistis",
        }
    }
}

/// What-if run against an arbitrary target IPK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Simulation {
    pub target: f64,
    pub remaining_semesters: usize,
    pub required: Option<f64>,
    pub difficulty: Option<Difficulty>,
}

impl Simulation {
    pub fn message(&self) -> String {
        match (self.required, self.difficulty) {
            (Some(required), Some(difficulty)) => format!(
                "For a target IPK of {:.2}, an average IPS of about {:.2} is needed in each of the {} remaining semesters. Verdict: {}.",
                self.target,
                required,
                self.remaining_semesters,
                difficulty.label()
            ),
            _ => "Final semester reached: no semesters left to simulate.".to_string(),
        }
    }
}

pub fn simulate(
    snapshot: &CumulativeSnapshot,
    semester_count: usize,
    remaining_semesters: usize,
    target: f64,
) -> Simulation {
    if remaining_semesters == 0 {
        return Simulation {
            target,
            remaining_semesters,
            required: None,
            difficulty: None,
        };
    }

    let load = historical_load(snapshot, semester_count);
    let outcome = solve_required_average(snapshot, target, load, remaining_semesters);
    let required = outcome.required.value();
    Simulation {
        target,
        remaining_semesters,
        required,
        difficulty: required.map(Difficulty::for_required),
    }
}
