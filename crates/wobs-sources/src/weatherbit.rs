//! Current conditions from Weatherbit

use anyhow::Result;
use reqwest::Client;
use wobs_core::{payload_from_json, RawPayload, WeatherSource};

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "weatherbit";

pub struct WeatherbitClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherbitClient {
    pub fn new(http: Client, base_url: &str, api_key: String) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
            api_key,
        }
    }

    async fn current(&self, country_code: &str, city_name: &str) -> SourceResult<RawPayload> {
        let url = format!("{}/v2.0/current", self.base_url);
        let request = self.http.get(&url).query(&[
            ("city", city_name),
            ("country", country_code),
            ("key", self.api_key.as_str()),
        ]);
        let body: serde_json::Value = fetch_json(PROVIDER, request).await?;
        parse_current(&body)
    }
}

/// Scalar fields of the first `data` entry
pub fn parse_current(body: &serde_json::Value) -> SourceResult<RawPayload> {
    let observation = body
        .get("data")
        .and_then(|d| d.get(0))
        .and_then(|o| o.as_object())
        .ok_or(SourceError::MissingField {
            provider: PROVIDER,
            field: "data",
        })?;
    Ok(payload_from_json(observation))
}

#[async_trait::async_trait]
impl WeatherSource for WeatherbitClient {
    async fn current_weather(&self, country_code: &str, city_name: &str) -> Result<RawPayload> {
        Ok(self.current(country_code, city_name).await?)
    }
}
