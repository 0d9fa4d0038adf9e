//! Qualitative scales for UV, air quality and geomagnetic activity

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("{kind} value {value} is below the bottom of the scale")]
    BelowScale { kind: ScaleKind, value: f64 },

    #[error("{kind} value is not a number")]
    NotANumber { kind: ScaleKind },
}

/// Which scale a categorical field is measured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Uv,
    Aqi,
    Kp,
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleKind::Uv => write!(f, "UV"),
            ScaleKind::Aqi => write!(f, "AQI"),
            ScaleKind::Kp => write!(f, "Kp"),
        }
    }
}

/// Band tables: (inclusive lower bound, label), ascending.
const UV_BANDS: &[(f64, &str)] = &[
    (0.0, "green"),
    (3.0, "yellow"),
    (6.0, "orange"),
    (8.0, "red"),
    (11.0, "purple"),
];

const AQI_BANDS: &[(f64, &str)] = &[
    (0.0, "very good"),
    (34.0, "good"),
    (67.0, "fair"),
    (100.0, "poor"),
    (150.0, "very poor"),
    (201.0, "hazardous"),
];

const KP_BANDS: &[(f64, &str)] = &[
    (0.0, "quiet"),
    (3.0, "unsettled"),
    (4.0, "active"),
    (5.0, "minor storm"),
    (6.0, "moderate storm"),
    (7.0, "strong storm"),
    (8.0, "severe storm"),
    (9.0, "intense storm"),
];

impl ScaleKind {
    fn bands(self) -> &'static [(f64, &'static str)] {
        match self {
            ScaleKind::Uv => UV_BANDS,
            ScaleKind::Aqi => AQI_BANDS,
            ScaleKind::Kp => KP_BANDS,
        }
    }
}

/// Map a measurement onto its scale. The last band whose lower bound is
/// not above `value` wins; the top band is open-ended.
pub fn classify(kind: ScaleKind, value: f64) -> Result<&'static str, ScaleError> {
    if value.is_nan() {
        return Err(ScaleError::NotANumber { kind });
    }
    kind.bands()
        .iter()
        .rev()
        .find(|(lower, _)| value >= *lower)
        .map(|(_, label)| *label)
        .ok_or(ScaleError::BelowScale { kind, value })
}

pub fn uv_level(uv: f64) -> Result<&'static str, ScaleError> {
    classify(ScaleKind::Uv, uv)
}

pub fn aqi_level(aqi: i64) -> Result<&'static str, ScaleError> {
    classify(ScaleKind::Aqi, aqi as f64)
}

pub fn kp_level(kp: i64) -> Result<&'static str, ScaleError> {
    classify(ScaleKind::Kp, kp as f64)
}

/// Upper-case the first character and lower-case the rest ("very good" -> "Very good").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
