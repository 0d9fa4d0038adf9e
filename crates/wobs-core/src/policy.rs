//! Field policy and payload normalization
//!
//! A [`FieldPolicy`] binds each provider field to a canonical label, a
//! rendering rule (and through it, a unit) and a display group. It is the
//! only place that knows what a raw field means.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::scales::ScaleKind;
use crate::types::{ObservationRecord, RawPayload};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("field policy entry has an empty raw field name")]
    EmptyRawName,

    #[error("raw field `{0}` appears more than once in the field policy")]
    DuplicateRaw(String),

    #[error("canonical name `{0}` is produced by more than one raw field")]
    DuplicateCanonical(String),
}

/// How a field is rendered, and therefore which unit its raw value is in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderRule {
    /// Value followed by `%`
    Percentage,
    /// Millibar, shown with mmHg and kPa equivalents
    Pressure,
    /// Celsius, shown with Fahrenheit and Kelvin equivalents
    Temperature,
    /// Numeric value plus its category on a scale
    Scale(ScaleKind),
    /// Value followed by a unit label
    Unit(String),
    /// Value as-is
    #[default]
    Plain,
}

/// Policy entry for one raw provider field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as the provider spells it
    pub raw: String,

    /// Canonical name; defaults to the raw name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// Drop the field even though it is known
    #[serde(default)]
    pub drop: bool,

    #[serde(default)]
    pub rule: RenderRule,

    /// Consecutive fields with the same group render as one block
    #[serde(default)]
    pub group: u8,
}

impl FieldSpec {
    pub fn keep(raw: &str, rule: RenderRule) -> Self {
        Self {
            raw: raw.to_string(),
            rename: None,
            drop: false,
            rule,
            group: 0,
        }
    }

    pub fn rename(raw: &str, canonical: &str, rule: RenderRule) -> Self {
        Self {
            rename: Some(canonical.to_string()),
            ..Self::keep(raw, rule)
        }
    }

    pub fn drop(raw: &str) -> Self {
        Self {
            drop: true,
            ..Self::keep(raw, RenderRule::Plain)
        }
    }

    pub fn in_group(mut self, group: u8) -> Self {
        self.group = group;
        self
    }

    pub fn canonical(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.raw)
    }
}

/// Ordered set of field specs; order is display order. Deserializes from a
/// plain list and goes through the same checks as [`FieldPolicy::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldPolicy {
    fields: Vec<FieldSpec>,
}

impl TryFrom<Vec<FieldSpec>> for FieldPolicy {
    type Error = PolicyError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldPolicy> for Vec<FieldSpec> {
    fn from(policy: FieldPolicy) -> Self {
        policy.fields
    }
}

/// Weatherbit fields the reports never show
const WEATHERBIT_DROPPED: &[&str] = &[
    "lon",
    "timezone",
    "ob_time",
    "country_code",
    "gust",
    "ts",
    "state_code",
    "city_name",
    "wind_cdir_full",
    "vis",
    "sources",
    "h_angle",
    "sunset",
    "dni",
    "dewpt",
    "precip",
    "wind_dir",
    "sunrise",
    "ghi",
    "dhi",
    "lat",
    "weather",
    "datetime",
    "station",
    "elev_angle",
];

impl FieldPolicy {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, PolicyError> {
        let mut raws = HashSet::new();
        let mut canonicals = HashSet::new();
        for spec in &fields {
            if spec.raw.trim().is_empty() {
                return Err(PolicyError::EmptyRawName);
            }
            if !raws.insert(spec.raw.as_str()) {
                return Err(PolicyError::DuplicateRaw(spec.raw.clone()));
            }
            if !spec.drop && !canonicals.insert(spec.canonical()) {
                return Err(PolicyError::DuplicateCanonical(spec.canonical().to_string()));
            }
        }
        Ok(Self { fields })
    }

    /// Policy for the Weatherbit current-conditions payload
    pub fn weatherbit() -> Self {
        use RenderRule::*;

        let mut fields = vec![
            FieldSpec::rename("pod", "Part of a day", Plain).in_group(1),
            FieldSpec::rename("pres", "Pressure", Pressure).in_group(2),
            FieldSpec::rename("slp", "Sea level pressure", Pressure).in_group(2),
            FieldSpec::rename("wind_spd", "Wind speed", Unit("m/s".into())).in_group(3),
            FieldSpec::rename("wind_cdir", "Wind direction", Plain).in_group(3),
            FieldSpec::rename("rh", "Relative humidity", Percentage).in_group(3),
            FieldSpec::rename("clouds", "Cloud percents", Percentage).in_group(3),
            FieldSpec::rename("solar_rad", "Solar radiation", Unit("Watt/m^2".into())).in_group(3),
            FieldSpec::rename("snow", "Snowfall", Unit("mm/hr".into())).in_group(3),
            FieldSpec::rename("uv", "UV (UltraViolet)", Scale(ScaleKind::Uv)).in_group(4),
            FieldSpec::rename("aqi", "AQI (Air Quality Index)", Scale(ScaleKind::Aqi)).in_group(4),
            FieldSpec::rename("temp", "Temperature", Temperature).in_group(5),
            FieldSpec::rename("app_temp", "Apparent temperature", Temperature).in_group(5),
        ];
        fields.extend(WEATHERBIT_DROPPED.iter().map(|raw| FieldSpec::drop(raw)));

        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Spec of a retained field, looked up by canonical name
    pub fn spec_for(&self, canonical: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|s| !s.drop && s.canonical() == canonical)
    }

    /// Group of the last retained field, used for fields appended after the record
    pub fn last_group(&self) -> u8 {
        self.fields
            .iter()
            .filter(|s| !s.drop)
            .map(|s| s.group)
            .last()
            .unwrap_or(0)
    }

    /// Filter and rename a raw payload.
    ///
    /// Values are copied unchanged. Fields the policy drops or does not know
    /// are left out, as are `null` values.
    pub fn normalize(&self, payload: &RawPayload) -> ObservationRecord {
        let mut record = ObservationRecord::new();
        for spec in self.fields.iter().filter(|s| !s.drop) {
            match payload.get(&spec.raw) {
                Some(value) if !value.is_null() => record.insert(spec.canonical(), value.clone()),
                _ => {}
            }
        }

        let unknown: Vec<&str> = payload
            .keys()
            .filter(|k| !self.fields.iter().any(|s| s.raw == **k))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            debug!(?unknown, "ignoring fields not covered by the field policy");
        }

        record
    }
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::weatherbit()
    }
}

/// Free-function form of [`FieldPolicy::normalize`]
pub fn normalize(payload: &RawPayload, policy: &FieldPolicy) -> ObservationRecord {
    policy.normalize(payload)
}
