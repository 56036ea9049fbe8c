use crate::models::{AcademicLevel, Classification, HonorsTier};

const SATISFACTORY_FLOOR: f64 = 2.75;
const HIGHLY_SATISFACTORY_FLOOR: f64 = 3.0;

impl AcademicLevel {
    /// Cumulative average needed for a Cumlaude classification.
    pub fn honors_target(&self) -> f64 {
        match self {
            AcademicLevel::S1 => 3.51,
            AcademicLevel::S2 => 3.7,
            AcademicLevel::S3 => 3.8,
            AcademicLevel::D3 | AcademicLevel::Unrecognized(_) => 3.5,
        }
    }

    /// Semesters in a standard-length program. Unknown levels count as S1
    /// here even though their honors target falls back to 3.5.
    pub fn standard_semesters(&self) -> usize {
        match self {
            AcademicLevel::D3 | AcademicLevel::S3 => 6,
            AcademicLevel::S2 => 4,
            AcademicLevel::S1 | AcademicLevel::Unrecognized(_) => 8,
        }
    }

    pub fn remaining_semesters(&self, completed: usize) -> usize {
        self.standard_semesters().saturating_sub(completed)
    }
}

pub fn classify(current_average: f64, target: f64) -> HonorsTier {
    if current_average >= target {
        HonorsTier::Cumlaude
    } else if current_average >= HIGHLY_SATISFACTORY_FLOOR {
        HonorsTier::SangatMemuaskan
    } else if current_average >= SATISFACTORY_FLOOR {
        HonorsTier::Memuaskan
    } else {
        HonorsTier::Cukup
    }
}

pub fn resolve(current_average: f64, level: &AcademicLevel) -> Classification {
    let target = level.honors_target();
    let tier = classify(current_average, target);
    Classification {
        target,
        tier,
        accent: tier.accent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_level() {
        assert_eq!(AcademicLevel::D3.honors_target(), 3.5);
        assert_eq!(AcademicLevel::S1.honors_target(), 3.51);
        assert_eq!(AcademicLevel::S2.honors_target(), 3.7);
        assert_eq!(AcademicLevel::S3.honors_target(), 3.8);
    }

    #[test]
    fn unknown_level_mixes_fallbacks() {
        let level = AcademicLevel::parse("Profesi");
        assert_eq!(level.honors_target(), 3.5);
        assert_eq!(level.standard_semesters(), 8);
    }

    #[test]
    fn remaining_semesters_never_negative() {
        assert_eq!(AcademicLevel::S2.remaining_semesters(1), 3);
        assert_eq!(AcademicLevel::S2.remaining_semesters(6), 0);
        assert_eq!(AcademicLevel::D3.remaining_semesters(0), 6);
    }

    #[test]
    fn tiers_use_half_open_bands() {
        assert_eq!(classify(2.74, 3.51), HonorsTier::Cukup);
        assert_eq!(classify(2.75, 3.51), HonorsTier::Memuaskan);
        assert_eq!(classify(2.99, 3.51), HonorsTier::Memuaskan);
        assert_eq!(classify(3.0, 3.51), HonorsTier::SangatMemuaskan);
        assert_eq!(classify(3.50, 3.51), HonorsTier::SangatMemuaskan);
        assert_eq!(classify(3.51, 3.51), HonorsTier::Cumlaude);
    }

    #[test]
    fn resolve_carries_target_and_accent() {
        let classification = resolve(3.75, &AcademicLevel::S2);
        assert_eq!(classification.target, 3.7);
        assert_eq!(classification.tier, HonorsTier::Cumlaude);
        assert_eq!(classification.tier.label(), "Cumlaude");
        assert_eq!(classification.accent, "var(--accent)");

        let below = resolve(3.75, &AcademicLevel::S3);
        assert_eq!(below.tier, HonorsTier::SangatMemuaskan);
        assert_eq!(below.accent, "#f59e0b");
    }
}
