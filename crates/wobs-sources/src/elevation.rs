//! Elevation lookup via Open-Elevation

use anyhow::Result;
use reqwest::Client;
use wobs_core::ElevationSource;

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "open-elevation";

pub struct OpenElevationClient {
    http: Client,
    base_url: String,
}

impl OpenElevationClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

pub fn parse_elevation(body: &serde_json::Value) -> SourceResult<i64> {
    body.get("results")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("elevation"))
        .and_then(|e| e.as_f64())
        .map(|e| e.round() as i64)
        .ok_or(SourceError::MissingField {
            provider: PROVIDER,
            field: "elevation",
        })
}

#[async_trait::async_trait]
impl ElevationSource for OpenElevationClient {
    async fn elevation(&self, latitude: f64, longitude: f64) -> Result<i64> {
        let url = format!("{}/api/v1/lookup", self.base_url);
        let locations = format!("{},{}", latitude, longitude);
        let request = self.http.get(&url).query(&[("locations", locations)]);
        let body: serde_json::Value = fetch_json(PROVIDER, request).await?;
        Ok(parse_elevation(&body)?)
    }
}
