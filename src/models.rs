use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Credit load given to a semester created without one.
pub const DEFAULT_SEMESTER_SKS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub ips: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sks: f64,
}

impl SemesterRecord {
    pub fn new(ips: f64, sks: f64) -> Self {
        Self { ips, sks }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AcademicLevel {
    D3,
    #[default]
    S1,
    S2,
    S3,
    /// Any other token; kept verbatim so it survives a store round trip.
    Unrecognized(String),
}

impl AcademicLevel {
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "" | "S1" => AcademicLevel::S1,
            "D3" => AcademicLevel::D3,
            "S2" => AcademicLevel::S2,
            "S3" => AcademicLevel::S3,
            _ => AcademicLevel::Unrecognized(token.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AcademicLevel::D3 => "D3",
            AcademicLevel::S1 => "S1",
            AcademicLevel::S2 => "S2",
            AcademicLevel::S3 => "S3",
            AcademicLevel::Unrecognized(token) => token,
        }
    }
}

impl From<String> for AcademicLevel {
    fn from(value: String) -> Self {
        AcademicLevel::parse(&value)
    }
}

impl From<AcademicLevel> for String {
    fn from(value: AcademicLevel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted record: one per namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeHistory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jenjang: AcademicLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub semesters: Vec<SemesterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeSnapshot {
    pub per_semester_average: f64,
    pub cumulative_average: Vec<f64>,
    pub current_average: f64,
    pub total_credits: f64,
    pub total_weighted_grade: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendLabel {
    #[serde(rename = "rising")]
    Rising,
    #[serde(rename = "falling")]
    Falling,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Rising => "rising",
            TrendLabel::Falling => "falling",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    pub average_delta: f64,
    pub slope: f64,
    pub label: TrendLabel,
}

/// Classification tiers, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HonorsTier {
    Cukup,
    Memuaskan,
    SangatMemuaskan,
    Cumlaude,
}

impl HonorsTier {
    pub fn label(&self) -> &'static str {
        match self {
            HonorsTier::Cukup => "Cukup",
            HonorsTier::Memuaskan => "Memuaskan",
            HonorsTier::SangatMemuaskan => "Sangat Memuaskan",
            HonorsTier::Cumlaude => "Cumlaude",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            HonorsTier::Cukup => "var(--muted)",
            HonorsTier::Memuaskan => "#eab308",
            HonorsTier::SangatMemuaskan => "#f59e0b",
            HonorsTier::Cumlaude => "var(--accent)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub target: f64,
    pub tier: HonorsTier,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a number the way a browser form field would: numbers pass
/// through, strings are parsed by their leading numeric prefix, anything
/// else becomes 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(value) if value.is_finite() => value,
        Raw::Number(_) => 0.0,
        Raw::Text(text) => parse_lenient(&text),
        Raw::Other(_) => 0.0,
    };
    Ok(value)
}

pub fn parse_lenient(text: &str) -> f64 {
    let trimmed = text.trim();
    (1..=trimmed.len())
        .rev()
        .filter(|end| trimmed.is_char_boundary(*end))
        .find_map(|end| trimmed[..end].parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
