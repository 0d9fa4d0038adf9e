#![allow(dead_code)]

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wobs_cli::{Collaborators, Observer};
use wobs_core::{
    ElevationSource, FieldPolicy, GeomagneticSource, LocalClock, LocationResolver,
    ObservationValue, RawPayload, ReportRenderer, ReportStyle, Sink, TargetLocation,
    WaterTemperatureSource, WeatherSource,
};
use wobs_sinks::SinkDispatcher;

pub struct Atlas(pub Vec<TargetLocation>);

#[async_trait::async_trait]
impl LocationResolver for Atlas {
    async fn resolve(&self, name: &str) -> Result<TargetLocation> {
        self.0
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| anyhow!("no location named {}", name))
    }
}

/// Counts lookups before answering from its atlas
pub struct Counted {
    pub atlas: Atlas,
    pub calls: AtomicUsize,
}

impl Counted {
    pub fn new(atlas: Atlas) -> Self {
        Self {
            atlas,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LocationResolver for Counted {
    async fn resolve(&self, name: &str) -> Result<TargetLocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.atlas.resolve(name).await
    }
}

pub fn madrid() -> TargetLocation {
    TargetLocation {
        name: "Madrid".into(),
        latitude: 40.4165,
        longitude: -3.70256,
        timezone: "Europe/Madrid".into(),
        country_name: "Spain".into(),
        country_code: "es".into(),
    }
}

pub fn oslo() -> TargetLocation {
    TargetLocation {
        name: "Oslo".into(),
        latitude: 59.91273,
        longitude: 10.74609,
        timezone: "Europe/Oslo".into(),
        country_name: "Norway".into(),
        country_code: "no".into(),
    }
}

/// Weatherbit-shaped payload; counts calls per city
#[derive(Default)]
pub struct Weather {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl WeatherSource for Weather {
    async fn current_weather(&self, _country_code: &str, city_name: &str) -> Result<RawPayload> {
        self.calls.lock().unwrap().push(city_name.to_string());
        let mut payload = HashMap::new();
        payload.insert("temp".to_string(), ObservationValue::Float(20.0));
        payload.insert("pres".to_string(), ObservationValue::Float(1000.0));
        payload.insert("rh".to_string(), ObservationValue::Integer(40));
        payload.insert("uv".to_string(), ObservationValue::Float(6.0));
        payload.insert("city_name".to_string(), ObservationValue::from(city_name));
        payload.insert("gust".to_string(), ObservationValue::Null);
        Ok(payload)
    }
}

pub struct Down;

#[async_trait::async_trait]
impl WeatherSource for Down {
    async fn current_weather(&self, _: &str, _: &str) -> Result<RawPayload> {
        Err(anyhow!("503 Service Unavailable"))
    }
}

#[async_trait::async_trait]
impl ElevationSource for Down {
    async fn elevation(&self, _: f64, _: f64) -> Result<i64> {
        Err(anyhow!("timeout"))
    }
}

#[async_trait::async_trait]
impl WaterTemperatureSource for Down {
    async fn water_temperature(&self, _: f64, _: f64) -> Result<f64> {
        Err(anyhow!("no sea here"))
    }
}

#[async_trait::async_trait]
impl GeomagneticSource for Down {
    async fn geomagnetic_index(&self, _: f64, _: f64) -> Result<i64> {
        Err(anyhow!("feed empty"))
    }
}

#[async_trait::async_trait]
impl LocalClock for Down {
    async fn local_time(&self, _: &str) -> Result<DateTime<FixedOffset>> {
        Err(anyhow!("unknown timezone"))
    }
}

pub struct Fixed;

#[async_trait::async_trait]
impl ElevationSource for Fixed {
    async fn elevation(&self, _: f64, _: f64) -> Result<i64> {
        Ok(657)
    }
}

#[async_trait::async_trait]
impl WaterTemperatureSource for Fixed {
    async fn water_temperature(&self, _: f64, _: f64) -> Result<f64> {
        Ok(14.5)
    }
}

#[async_trait::async_trait]
impl GeomagneticSource for Fixed {
    async fn geomagnetic_index(&self, _: f64, _: f64) -> Result<i64> {
        Ok(3)
    }
}

/// A clock the test moves by hand; every timezone reads the same
#[derive(Clone)]
pub struct ManualClock(pub Arc<Mutex<DateTime<FixedOffset>>>);

impl ManualClock {
    pub fn at(time: &str) -> Self {
        Self(Arc::new(Mutex::new(parse_time(time))))
    }

    pub fn set(&self, time: &str) {
        *self.0.lock().unwrap() = parse_time(time);
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        *self.0.lock().unwrap()
    }
}

pub fn parse_time(time: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(time).unwrap()
}

#[async_trait::async_trait]
impl LocalClock for ManualClock {
    async fn local_time(&self, _: &str) -> Result<DateTime<FixedOffset>> {
        Ok(self.now())
    }
}

/// Records what it was asked to deliver
pub struct Outbox {
    pub style: ReportStyle,
    pub sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Sink for Outbox {
    fn name(&self) -> &str {
        "outbox"
    }

    fn style(&self) -> ReportStyle {
        self.style
    }

    async fn deliver(&mut self, report: &str) -> Result<()> {
        self.sent.lock().unwrap().push(report.to_string());
        Ok(())
    }
}

pub fn healthy(clock: Arc<dyn LocalClock>) -> Collaborators {
    Collaborators {
        resolver: Arc::new(Atlas(vec![madrid(), oslo()])),
        weather: Arc::new(Weather::default()),
        elevation: Arc::new(Fixed),
        water: Arc::new(Fixed),
        geomagnetic: Arc::new(Fixed),
        clock,
    }
}

pub fn observer(sources: Collaborators, style: ReportStyle) -> (Observer, Arc<Mutex<Vec<String>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let sink = Outbox {
        style,
        sent: sent.clone(),
    };
    let dispatcher = SinkDispatcher::new(ReportRenderer::new(FieldPolicy::weatherbit()), Box::new(sink));
    (Observer::new(sources, dispatcher), sent)
}
