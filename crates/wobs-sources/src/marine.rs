//! Sea surface temperature via the Open-Meteo marine API

use anyhow::Result;
use reqwest::Client;
use wobs_core::WaterTemperatureSource;

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "open-meteo marine";

pub struct OpenMeteoMarineClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoMarineClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

/// `current.sea_surface_temperature`; null inland
pub fn parse_sea_temperature(body: &serde_json::Value) -> SourceResult<f64> {
    body.get("current")
        .and_then(|c| c.get("sea_surface_temperature"))
        .and_then(|t| t.as_f64())
        .ok_or(SourceError::MissingField {
            provider: PROVIDER,
            field: "sea_surface_temperature",
        })
}

#[async_trait::async_trait]
impl WaterTemperatureSource for OpenMeteoMarineClient {
    async fn water_temperature(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let url = format!("{}/v1/marine", self.base_url);
        let request = self.http.get(&url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", "sea_surface_temperature".to_string()),
        ]);
        let body: serde_json::Value = fetch_json(PROVIDER, request).await?;
        Ok(parse_sea_temperature(&body)?)
    }
}
