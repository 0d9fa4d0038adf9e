//! Core data types for weather observations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Raw provider payload (provider field name -> value)
pub type RawPayload = HashMap<String, ObservationValue>;

/// A single measurement value. The unit is implied by the field it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ObservationValue {
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl ObservationValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ObservationValue::Float(v) => Some(*v),
            ObservationValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ObservationValue::Integer(v) => Some(*v),
            ObservationValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ObservationValue::Null)
    }

    /// Convert a JSON scalar. Objects and arrays have no scalar form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(ObservationValue::Null),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(ObservationValue::Integer)
                .or_else(|| n.as_f64().map(ObservationValue::Float)),
            serde_json::Value::String(s) => Some(ObservationValue::String(s.clone())),
            serde_json::Value::Bool(b) => Some(ObservationValue::String(b.to_string())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<f64> for ObservationValue {
    fn from(v: f64) -> Self {
        ObservationValue::Float(v)
    }
}

impl From<i64> for ObservationValue {
    fn from(v: i64) -> Self {
        ObservationValue::Integer(v)
    }
}

impl From<&str> for ObservationValue {
    fn from(v: &str) -> Self {
        ObservationValue::String(v.to_string())
    }
}

impl fmt::Display for ObservationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationValue::Integer(v) => write!(f, "{}", v),
            ObservationValue::Float(v) => write!(f, "{}", format_float(*v)),
            ObservationValue::String(s) => write!(f, "{}", s),
            ObservationValue::Null => write!(f, "None"),
        }
    }
}

/// Format a float the way reports show it: whole numbers keep one decimal
/// place (`20.0`), everything else uses the shortest exact representation.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Build a raw payload from a JSON object, skipping non-scalar members.
pub fn payload_from_json(object: &serde_json::Map<String, serde_json::Value>) -> RawPayload {
    object
        .iter()
        .filter_map(|(k, v)| ObservationValue::from_json(v).map(|v| (k.clone(), v)))
        .collect()
}

/// A location name plus the attributes resolved for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub country_name: String,
    pub country_code: String,
}

/// Location and time metadata rendered as the report header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub country_name: String,
    pub country_code: String,
    pub city_name: String,
    pub timezone: String,
    /// Local time at the target, `%Y-%m-%d %H:%M:%S %z`
    pub local_time: Option<String>,
    /// Meters above sea level
    pub elevation: Option<i64>,
    /// Celsius
    pub water_temperature: Option<f64>,
    /// Planetary Kp index
    pub geomagnetic_index: Option<i64>,
}

impl Envelope {
    pub fn for_location(location: &TargetLocation) -> Self {
        Self {
            country_name: location.country_name.clone(),
            country_code: location.country_code.clone(),
            city_name: location.name.clone(),
            timezone: location.timezone.clone(),
            ..Default::default()
        }
    }
}

/// Canonical, policy-filtered observation for one target at one time.
///
/// Fields keep the display order of the policy that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    fields: Vec<(String, ObservationValue)>,
}

impl ObservationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing an existing value of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: ObservationValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ObservationValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObservationValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Everything needed to render one report section
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub envelope: Envelope,
    pub record: ObservationRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_value_conversions() {
        let float_val = ObservationValue::Float(25.5);
        assert_eq!(float_val.as_f64(), Some(25.5));

        let int_val = ObservationValue::Integer(42);
        assert_eq!(int_val.as_i64(), Some(42));
        assert_eq!(int_val.as_f64(), Some(42.0));

        let null_val = ObservationValue::Null;
        assert!(null_val.is_null());
        assert_eq!(null_val.as_f64(), None);
    }

    #[test]
    fn test_untagged_keeps_integers() {
        let v: ObservationValue = serde_json::from_str("55").unwrap();
        assert_eq!(v, ObservationValue::Integer(55));
        let v: ObservationValue = serde_json::from_str("1012.5").unwrap();
        assert_eq!(v, ObservationValue::Float(1012.5));
    }

    #[test]
    fn test_payload_from_json_skips_nested() {
        let json = serde_json::json!({
            "temp": 21.5,
            "rh": 40,
            "pod": "d",
            "weather": {"code": 800},
            "sources": ["a", "b"],
            "snow": null
        });
        let payload = payload_from_json(json.as_object().unwrap());
        assert_eq!(payload.len(), 4);
        assert_eq!(payload["rh"], ObservationValue::Integer(40));
        assert!(payload["snow"].is_null());
        assert!(!payload.contains_key("weather"));
    }

    #[test]
    fn test_display_matches_report_precision() {
        assert_eq!(ObservationValue::Float(20.0).to_string(), "20.0");
        assert_eq!(ObservationValue::Float(750.06).to_string(), "750.06");
        assert_eq!(ObservationValue::Integer(7).to_string(), "7");
        assert_eq!(ObservationValue::from("SSW").to_string(), "SSW");
    }

    #[test]
    fn test_record_preserves_insert_order() {
        let mut record = ObservationRecord::new();
        record.insert("b", 1i64.into());
        record.insert("a", 2i64.into());
        record.insert("b", 3i64.into());
        assert_eq!(record.names(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&ObservationValue::Integer(3)));
    }
}
