use anyhow::Result;
use chrono::{DateTime, FixedOffset};

use crate::{RawPayload, ReportStyle, TargetLocation};

/// Geocodes a free-text location name
#[async_trait::async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<TargetLocation>;
}

/// Current conditions, as the provider spells them
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, country_code: &str, city_name: &str) -> Result<RawPayload>;
}

/// Meters above sea level
#[async_trait::async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, latitude: f64, longitude: f64) -> Result<i64>;
}

/// Sea surface temperature in Celsius
#[async_trait::async_trait]
pub trait WaterTemperatureSource: Send + Sync {
    async fn water_temperature(&self, latitude: f64, longitude: f64) -> Result<f64>;
}

/// Kp index
#[async_trait::async_trait]
pub trait GeomagneticSource: Send + Sync {
    async fn geomagnetic_index(&self, latitude: f64, longitude: f64) -> Result<i64>;
}

/// Current wall-clock time in a timezone
#[async_trait::async_trait]
pub trait LocalClock: Send + Sync {
    async fn local_time(&self, timezone: &str) -> Result<DateTime<FixedOffset>>;
}

/// City of the machine running the observer
#[async_trait::async_trait]
pub trait NetworkLocator: Send + Sync {
    async fn current_city(&self) -> Result<String>;
}

/// Names of the locations to report on
#[async_trait::async_trait]
pub trait TargetSelector: Send + Sync {
    async fn load_targets(&self) -> Result<Vec<String>>;
}

/// Delivery endpoint for rendered reports
#[async_trait::async_trait]
pub trait Sink: Send {
    fn name(&self) -> &str;

    /// Markup this sink expects
    fn style(&self) -> ReportStyle;

    async fn deliver(&mut self, report: &str) -> Result<()>;
}
