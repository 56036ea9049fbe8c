use crate::models::{TrendLabel, TrendResult};

const RISING_THRESHOLD: f64 = 0.05;
const FALLING_THRESHOLD: f64 = -0.05;

pub fn analyze_trend(ips: &[f64]) -> TrendResult {
    if ips.len() <= 1 {
        return TrendResult {
            average_delta: 0.0,
            slope: 0.0,
            label: TrendLabel::InsufficientData,
        };
    }

    let average_delta = ips.windows(2).map(|pair| pair[1] - pair[0]).sum::<f64>()
        / (ips.len() - 1) as f64;

    let label = if average_delta > RISING_THRESHOLD {
        TrendLabel::Rising
    } else if average_delta < FALLING_THRESHOLD {
        TrendLabel::Falling
    } else {
        TrendLabel::Stable
    };

    TrendResult {
        average_delta: round_to(average_delta, 3),
        slope: round_to(least_squares_slope(ips), 4),
        label,
    }
}

/// OLS slope of the values against their 1-based positions.
pub fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (index, y) in values.iter().enumerate() {
        let x = (index + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sequences_have_no_trend() {
        for ips in [vec![], vec![3.2]] {
            let trend = analyze_trend(&ips);
            assert_eq!(trend.average_delta, 0.0);
            assert_eq!(trend.slope, 0.0);
            assert_eq!(trend.label, TrendLabel::InsufficientData);
        }
    }

    #[test]
    fn increasing_sequence_is_rising() {
        let trend = analyze_trend(&[2.0, 2.5, 3.0]);

        assert_eq!(trend.average_delta, 0.5);
        assert_eq!(trend.slope, 0.5);
        assert_eq!(trend.label, TrendLabel::Rising);
    }

    #[test]
    fn decreasing_sequence_is_falling() {
        let trend = analyze_trend(&[3.6, 3.4, 3.0]);

        assert_eq!(trend.average_delta, -0.3);
        assert_eq!(trend.slope, -0.3);
        assert_eq!(trend.label, TrendLabel::Falling);
    }

    #[test]
    fn small_moves_are_stable() {
        let trend = analyze_trend(&[3.40, 3.44, 3.42]);

        assert_eq!(trend.label, TrendLabel::Stable);
        assert_eq!(trend.average_delta, 0.01);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(analyze_trend(&[3.0, 3.05]).label, TrendLabel::Stable);
        assert_eq!(analyze_trend(&[3.0, 3.1]).label, TrendLabel::Rising);
    }

    #[test]
    fn slope_and_delta_can_disagree() {
        // Delta only looks at the endpoints; the fit sees the dip.
        let trend = analyze_trend(&[3.0, 2.0, 2.0, 3.2]);
        assert_eq!(trend.label, TrendLabel::Rising);
        assert!(trend.slope < trend.average_delta);
    }

    #[test]
    fn slope_of_single_point_is_zero() {
        assert_eq!(least_squares_slope(&[3.0]), 0.0);
        assert_eq!(least_squares_slope(&[]), 0.0);
    }
}
