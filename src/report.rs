use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::GradeHistory;
use crate::pipeline::Analysis;

pub fn build_report(
    namespace: &str,
    history: &GradeHistory,
    analysis: &Analysis,
    generated_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Cumlaude Progress Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        namespace,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(updated_at) = updated_at {
        let _ = writeln!(
            output,
            "History last committed {}",
            updated_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Level: {} ({} standard semesters, {} remaining)",
        analysis.level,
        analysis.level.standard_semesters(),
        analysis.remaining_semesters
    );
    let _ = writeln!(output, "- IPK: {:.2}", analysis.snapshot.current_average);
    let _ = writeln!(
        output,
        "- Classification: {} (Cumlaude target {:.2})",
        analysis.classification.tier.label(),
        analysis.classification.target
    );
    let _ = writeln!(
        output,
        "- Trend: {} (average change {:.3}, slope {:.4})",
        analysis.trend.label.as_str(),
        analysis.trend.average_delta,
        analysis.trend.slope
    );
    let _ = writeln!(output, "- Target: {}", analysis.outcome.message());
    let _ = writeln!(output, "- Cumlaude chance: about {}%", analysis.probability);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semesters");

    if history.semesters.is_empty() {
        let _ = writeln!(output, "No semesters recorded yet.");
    } else {
        let _ = writeln!(output, "| Semester | IPS | SKS | IPK |");
        let _ = writeln!(output, "|---|---|---|---|");
        for (index, (semester, ipk)) in history
            .semesters
            .iter()
            .zip(analysis.snapshot.cumulative_average.iter())
            .enumerate()
        {
            let _ = writeln!(
                output,
                "| S{} | {:.2} | {} | {:.4} |",
                index + 1,
                semester.ips,
                semester.sks,
                ipk
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Projected IPK");

    if analysis.projection.values.is_empty() {
        let _ = writeln!(output, "No semesters left to project.");
    } else {
        for (label, value) in analysis
            .projection
            .labels
            .iter()
            .zip(analysis.projection.values.iter())
        {
            let _ = writeln!(output, "- {label}: {value:.3}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for insight in analysis.insights() {
        let _ = writeln!(output, "- {insight}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicLevel, SemesterRecord};
    use crate::pipeline::analyze;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn report_lists_semesters_and_projection() {
        let history = GradeHistory {
            jenjang: AcademicLevel::S1,
            semesters: vec![
                SemesterRecord::new(3.2, 20.0),
                SemesterRecord::new(3.6, 20.0),
            ],
        };
        let analysis = analyze(&history);
        let report = build_report("smartIpkData", &history, &analysis, generated_at(), None);

        assert!(report.starts_with("# Cumlaude Progress Report"));
        assert!(report.contains("Generated for smartIpkData on 2026-02-02 09:30 UTC"));
        assert!(report.contains("- Level: S1 (8 standard semesters, 6 remaining)"));
        assert!(report.contains("| S1 | 3.20 | 20 | 3.2000 |"));
        assert!(report.contains("| S2 | 3.60 | 20 | 3.4000 |"));
        assert!(report.contains("- P6: "));
        assert!(!report.contains("History last committed"));
    }

    #[test]
    fn empty_history_report() {
        let history = GradeHistory::new(AcademicLevel::S2);
        let analysis = analyze(&history);
        let report = build_report(
            "demo",
            &history,
            &analysis,
            generated_at(),
            Some(generated_at()),
        );

        assert!(report.contains("No semesters recorded yet."));
        assert!(report.contains("History last committed 2026-02-02 09:30 UTC"));
        assert!(report.contains("- P4: "));
    }

    #[test]
    fn finished_program_has_no_projection() {
        let history = GradeHistory {
            jenjang: AcademicLevel::S2,
            semesters: vec![SemesterRecord::new(3.8, 12.0); 4],
        };
        let analysis = analyze(&history);
        let report = build_report("demo", &history, &analysis, generated_at(), None);

        assert!(report.contains("No semesters left to project."));
        assert!(report.contains("Classification: Cumlaude"));
    }
}
