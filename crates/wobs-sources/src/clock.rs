//! Local time in a timezone via WorldTimeAPI

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Timelike};
use reqwest::Client;
use wobs_core::LocalClock;

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "worldtimeapi";

pub struct WorldTimeClock {
    http: Client,
    base_url: String,
}

impl WorldTimeClock {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

/// `datetime` of the response, truncated to whole seconds
pub fn parse_local_time(body: &serde_json::Value) -> SourceResult<DateTime<FixedOffset>> {
    let raw = body
        .get("datetime")
        .and_then(|d| d.as_str())
        .ok_or(SourceError::MissingField {
            provider: PROVIDER,
            field: "datetime",
        })?;
    let time = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| SourceError::Parse(format!("{}: `{}`: {}", PROVIDER, raw, e)))?;
    Ok(time.with_nanosecond(0).unwrap_or(time))
}

#[async_trait::async_trait]
impl LocalClock for WorldTimeClock {
    async fn local_time(&self, timezone: &str) -> Result<DateTime<FixedOffset>> {
        let url = format!("{}/api/timezone/{}", self.base_url, timezone);
        let body: serde_json::Value = fetch_json(PROVIDER, self.http.get(&url)).await?;
        Ok(parse_local_time(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wobs_core::format_local_time;

    #[test]
    fn test_parse_local_time() {
        let body = json!({
            "abbreviation": "CET",
            "datetime": "2024-01-01T08:00:00.734512+01:00",
            "timezone": "Europe/Madrid",
            "utc_offset": "+01:00"
        });
        let time = parse_local_time(&body).unwrap();
        assert_eq!(format_local_time(&time), "2024-01-01 08:00:00 +0100");
        assert_eq!(time.nanosecond(), 0);
    }

    #[test]
    fn test_bad_datetime() {
        assert!(parse_local_time(&json!({"datetime": "yesterday"})).is_err());
        assert!(parse_local_time(&json!({"error": "unknown location"})).is_err());
    }
}
