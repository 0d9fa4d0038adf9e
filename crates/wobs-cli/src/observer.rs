//! Observation orchestrator
//!
//! Each target goes through RESOLVE, COLLECT and EMIT in turn. Only a failed
//! resolution skips a target; a failed measurement leaves its field out of
//! the report.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use wobs_core::{
    format_local_time, ElevationSource, Envelope, GeomagneticSource, LocalClock,
    LocationResolver, ObservationRecord, Report, TargetLocation, WaterTemperatureSource,
    WeatherSource,
};
use wobs_sinks::{DeliveryResult, SinkDispatcher};

/// Data sources consulted for every target
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn LocationResolver>,
    pub weather: Arc<dyn WeatherSource>,
    pub elevation: Arc<dyn ElevationSource>,
    pub water: Arc<dyn WaterTemperatureSource>,
    pub geomagnetic: Arc<dyn GeomagneticSource>,
    pub clock: Arc<dyn LocalClock>,
}

pub struct Observer {
    sources: Collaborators,
    dispatcher: SinkDispatcher,
}

async fn measure<T, F>(what: &'static str, fetch: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match fetch.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(measurement = what, error = %e, "measurement unavailable");
            None
        }
    }
}

impl Observer {
    pub fn new(sources: Collaborators, dispatcher: SinkDispatcher) -> Self {
        Self {
            sources,
            dispatcher,
        }
    }

    pub fn sink_name(&self) -> &str {
        self.dispatcher.sink_name()
    }

    /// RESOLVE
    pub async fn resolve(&self, name: &str) -> Option<TargetLocation> {
        match self.sources.resolver.resolve(name).await {
            Ok(location) => {
                debug!(
                    target_name = name,
                    latitude = location.latitude,
                    longitude = location.longitude,
                    timezone = %location.timezone,
                    "resolved"
                );
                Some(location)
            }
            Err(e) => {
                error!(target_name = name, error = %e, "cannot resolve target, skipping");
                None
            }
        }
    }

    pub async fn local_now(&self, location: &TargetLocation) -> Option<DateTime<FixedOffset>> {
        measure("local time", self.sources.clock.local_time(&location.timezone)).await
    }

    /// COLLECT. Never fails; whatever could be fetched ends up in the report.
    pub async fn collect(
        &self,
        location: &TargetLocation,
        local_time: Option<DateTime<FixedOffset>>,
    ) -> Report {
        let (lat, lon) = (location.latitude, location.longitude);
        let mut envelope = Envelope::for_location(location);
        envelope.local_time = local_time.as_ref().map(format_local_time);
        envelope.elevation = measure("elevation", self.sources.elevation.elevation(lat, lon)).await;
        envelope.water_temperature = measure(
            "water temperature",
            self.sources.water.water_temperature(lat, lon),
        )
        .await;
        envelope.geomagnetic_index = measure(
            "geomagnetic field",
            self.sources.geomagnetic.geomagnetic_index(lat, lon),
        )
        .await;

        let record = match measure(
            "weather",
            self.sources
                .weather
                .current_weather(&location.country_code, &location.name),
        )
        .await
        {
            Some(payload) => self.dispatcher.renderer().policy().normalize(&payload),
            None => ObservationRecord::new(),
        };

        Report { envelope, record }
    }

    /// EMIT
    pub async fn emit(&mut self, report: &Report) -> DeliveryResult {
        self.dispatcher.dispatch(report).await
    }

    /// Full pass for one target. `None` when it could not be resolved.
    #[instrument(skip(self))]
    pub async fn observe(&mut self, name: &str) -> Option<DeliveryResult> {
        let started = Instant::now();
        debug!("gathering info");
        let location = self.resolve(name).await?;
        let local_time = self.local_now(&location).await;
        let report = self.collect(&location, local_time).await;
        let result = self.emit(&report).await;
        debug!(elapsed_secs = started.elapsed().as_secs_f64(), "target processed");
        Some(result)
    }

    /// One pass over all targets, strictly in order
    pub async fn observe_all(&mut self, targets: &[String]) -> usize {
        let mut delivered = 0;
        for name in targets {
            if let Some(result) = self.observe(name).await {
                if result.is_delivered() {
                    delivered += 1;
                }
            }
        }
        info!(targets = targets.len(), delivered, "pass complete");
        delivered
    }
}
