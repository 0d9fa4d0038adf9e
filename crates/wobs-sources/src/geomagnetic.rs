//! Planetary K index from NOAA SWPC
//!
//! Kp is a global index, so the coordinates a caller passes are not sent
//! anywhere. The feed has been published both as rows of strings with a
//! header row and as an array of objects; both shapes are accepted.

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use wobs_core::GeomagneticSource;

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "noaa swpc";

pub struct SwpcKpClient {
    http: Client,
    base_url: String,
}

impl SwpcKpClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Latest Kp in the feed, rounded to the nearest whole index
pub fn parse_latest_kp(body: &Value) -> SourceResult<i64> {
    let missing = SourceError::MissingField {
        provider: PROVIDER,
        field: "Kp",
    };
    let latest = body
        .as_array()
        .and_then(|rows| rows.last())
        .ok_or_else(|| SourceError::Parse(format!("{}: expected a JSON array", PROVIDER)))?;

    let kp = match latest {
        Value::Array(row) => row.get(1).and_then(number),
        Value::Object(row) => row
            .get("Kp")
            .or_else(|| row.get("kp_index"))
            .or_else(|| row.get("kp"))
            .and_then(number),
        _ => None,
    };
    kp.map(|k| k.round() as i64).ok_or(missing)
}

#[async_trait::async_trait]
impl GeomagneticSource for SwpcKpClient {
    async fn geomagnetic_index(&self, _latitude: f64, _longitude: f64) -> Result<i64> {
        let url = format!("{}/products/noaa-planetary-k-index.json", self.base_url);
        let body: Value = fetch_json(PROVIDER, self.http.get(&url)).await?;
        Ok(parse_latest_kp(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rows_with_header() {
        let body = json!([
            ["time_tag", "Kp", "a_running", "station_count"],
            ["2024-05-10 18:00:00.000", "8.67", "207", "8"],
            ["2024-05-10 21:00:00.000", "2.33", "9", "8"]
        ]);
        assert_eq!(parse_latest_kp(&body).unwrap(), 2);
    }

    #[test]
    fn test_parse_object_rows() {
        let body = json!([
            {"time_tag": "2024-05-10T18:00:00", "Kp": 8.67, "a_running": 207, "station_count": 8},
            {"time_tag": "2024-05-10T21:00:00", "Kp": 4.67, "a_running": 39, "station_count": 8}
        ]);
        assert_eq!(parse_latest_kp(&body).unwrap(), 5);
    }

    #[test]
    fn test_header_only_feed_has_no_kp() {
        let body = json!([["time_tag", "Kp", "a_running", "station_count"]]);
        assert!(parse_latest_kp(&body).is_err());
        assert!(parse_latest_kp(&json!({"Kp": 3})).is_err());
    }
}
