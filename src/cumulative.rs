use crate::models::{CumulativeSnapshot, SemesterRecord};

/// Non-finite values count as 0 so a corrupt row cannot poison the fold.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn cumulative_snapshot(semesters: &[SemesterRecord]) -> CumulativeSnapshot {
    let mut total_credits = 0.0;
    let mut total_weighted_grade = 0.0;
    let mut ips_sum = 0.0;
    let mut cumulative_average = Vec::with_capacity(semesters.len());

    for semester in semesters {
        let ips = sanitize(semester.ips);
        let sks = sanitize(semester.sks);
        total_credits += sks;
        total_weighted_grade += ips * sks;
        ips_sum += ips;
        cumulative_average.push(ratio_or_zero(total_weighted_grade, total_credits));
    }

    CumulativeSnapshot {
        per_semester_average: ratio_or_zero(ips_sum, semesters.len() as f64),
        cumulative_average,
        current_average: ratio_or_zero(total_weighted_grade, total_credits),
        total_credits,
        total_weighted_grade,
    }
}

/// IPS values in semester order, sanitized the same way the fold sees them.
pub fn ips_sequence(semesters: &[SemesterRecord]) -> Vec<f64> {
    semesters.iter().map(|semester| sanitize(semester.ips)).collect()
}

/// Mean of the last `window` values; 0 for an empty slice.
pub fn recent_average(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    let recent = &values[start..];
    ratio_or_zero(recent.iter().sum(), recent.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(f64, f64)]) -> Vec<SemesterRecord> {
        pairs
            .iter()
            .map(|(ips, sks)| SemesterRecord::new(*ips, *sks))
            .collect()
    }

    #[test]
    fn weights_grades_by_credit_load() {
        let snapshot = cumulative_snapshot(&records(&[(3.0, 20.0), (4.0, 10.0)]));

        assert_eq!(snapshot.total_credits, 30.0);
        assert_eq!(snapshot.total_weighted_grade, 100.0);
        assert!((snapshot.current_average - 100.0 / 30.0).abs() < 1e-12);
        assert!((snapshot.per_semester_average - 3.5).abs() < 1e-12);
    }

    #[test]
    fn running_average_only_sees_earlier_semesters() {
        let snapshot =
            cumulative_snapshot(&records(&[(2.0, 10.0), (4.0, 10.0), (3.0, 20.0)]));

        assert_eq!(snapshot.cumulative_average.len(), 3);
        assert!((snapshot.cumulative_average[0] - 2.0).abs() < 1e-12);
        assert!((snapshot.cumulative_average[1] - 3.0).abs() < 1e-12);
        assert!((snapshot.cumulative_average[2] - 3.0).abs() < 1e-12);
        assert_eq!(
            snapshot.cumulative_average.last().copied(),
            Some(snapshot.current_average)
        );
    }

    #[test]
    fn empty_history_is_all_zero() {
        let snapshot = cumulative_snapshot(&[]);

        assert!(snapshot.cumulative_average.is_empty());
        assert_eq!(snapshot.current_average, 0.0);
        assert_eq!(snapshot.total_credits, 0.0);
        assert_eq!(snapshot.per_semester_average, 0.0);
    }

    #[test]
    fn zero_credit_semesters_do_not_divide_by_zero() {
        let snapshot = cumulative_snapshot(&records(&[(3.5, 0.0), (3.0, 0.0)]));

        assert_eq!(snapshot.cumulative_average, vec![0.0, 0.0]);
        assert_eq!(snapshot.current_average, 0.0);
    }

    #[test]
    fn tolerates_out_of_range_and_non_finite_input() {
        let snapshot = cumulative_snapshot(&records(&[(f64::NAN, 20.0), (5.0, f64::INFINITY)]));

        assert_eq!(snapshot.total_credits, 20.0);
        assert_eq!(snapshot.current_average, 0.0);

        let wide = cumulative_snapshot(&records(&[(5.0, 10.0)]));
        assert_eq!(wide.current_average, 5.0);
    }

    #[test]
    fn recent_average_uses_trailing_window() {
        assert_eq!(recent_average(&[1.0, 2.0, 3.0, 4.0], 3), 3.0);
        assert_eq!(recent_average(&[2.0], 3), 2.0);
        assert_eq!(recent_average(&[], 3), 0.0);
    }
}
