//! Location resolution via the Open-Meteo geocoding API

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use wobs_core::{LocationResolver, TargetLocation};

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "open-meteo geocoding";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

pub struct OpenMeteoGeocoder {
    http: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }

    async fn lookup(&self, name: &str) -> SourceResult<TargetLocation> {
        let url = format!("{}/v1/search", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("name", name), ("count", "1"), ("format", "json")]);
        let body: serde_json::Value = fetch_json(PROVIDER, request).await?;
        parse_location(name, body)
    }
}

/// Take the best match of a search response
pub fn parse_location(name: &str, body: serde_json::Value) -> SourceResult<TargetLocation> {
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    let place = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NotFound {
            provider: PROVIDER,
            query: name.to_string(),
        })?;
    let timezone = place.timezone.ok_or(SourceError::MissingField {
        provider: PROVIDER,
        field: "timezone",
    })?;

    Ok(TargetLocation {
        name: name.to_string(),
        latitude: place.latitude,
        longitude: place.longitude,
        timezone,
        country_name: place.country.unwrap_or_default(),
        country_code: place.country_code.unwrap_or_default().to_lowercase(),
    })
}

#[async_trait::async_trait]
impl LocationResolver for OpenMeteoGeocoder {
    async fn resolve(&self, name: &str) -> Result<TargetLocation> {
        let location = self.lookup(name).await?;
        debug!(
            target_name = name,
            lat = location.latitude,
            lon = location.longitude,
            tz = %location.timezone,
            "location resolved"
        );
        Ok(location)
    }
}
