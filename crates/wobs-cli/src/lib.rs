//! Weather observer: wiring between the configuration, the providers and the
//! selected sink.

pub mod args;
pub mod observer;
pub mod scheduler;

pub use args::Args;
pub use observer::{Collaborators, Observer};
pub use scheduler::Scheduler;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use reqwest::Client;
use std::sync::Arc;
use tracing::warn;
use wobs_config::AppConfig;
use wobs_core::{ReportRenderer, Sink, TargetSelector};
use wobs_sinks::{
    telegram::DEFAULT_TELEGRAM_URL, ConsoleSink, FileSink, SinkDispatcher, SinkSelection,
    TelegramCredentials, TelegramSink,
};
use wobs_sources::{
    CurrentCity, Endpoints, IpInfoLocator, OpenElevationClient, OpenMeteoGeocoder,
    OpenMeteoMarineClient, SwpcKpClient, TargetListFile, WeatherbitClient, WorldTimeClock,
};

pub fn build_collaborators(http: &Client, endpoints: &Endpoints, api_key: &str) -> Collaborators {
    Collaborators {
        resolver: Arc::new(OpenMeteoGeocoder::new(http.clone(), &endpoints.geocoding)),
        weather: Arc::new(WeatherbitClient::new(
            http.clone(),
            &endpoints.weatherbit,
            api_key.to_string(),
        )),
        elevation: Arc::new(OpenElevationClient::new(http.clone(), &endpoints.elevation)),
        water: Arc::new(OpenMeteoMarineClient::new(http.clone(), &endpoints.marine)),
        geomagnetic: Arc::new(SwpcKpClient::new(http.clone(), &endpoints.geomagnetic)),
        clock: Arc::new(WorldTimeClock::new(http.clone(), &endpoints.clock)),
    }
}

/// `--input-file` reads the target list, otherwise the current city is the only target
pub fn build_selector(
    http: &Client,
    endpoints: &Endpoints,
    config: &AppConfig,
    input_file: bool,
) -> Arc<dyn TargetSelector> {
    let locator = Arc::new(IpInfoLocator::new(http.clone(), &endpoints.ipinfo));
    if input_file {
        Arc::new(TargetListFile::new(config.targets_file(), locator))
    } else {
        Arc::new(CurrentCity::new(locator))
    }
}

pub fn build_sink(
    selection: SinkSelection,
    http: &Client,
    config: &AppConfig,
    started: NaiveDateTime,
) -> Result<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match selection {
        SinkSelection::File => Box::new(
            FileSink::new(config.report_dir(), config.report_prefix(), started)
                .context("Failed to prepare report directory")?,
        ),
        SinkSelection::Messaging => {
            let credentials = TelegramCredentials::from_env();
            if credentials.bot_token.is_none() || credentials.chat_id.is_none() {
                warn!("telegram credentials incomplete, reports will not be sent");
            }
            Box::new(TelegramSink::new(
                http.clone(),
                config.telegram_url().unwrap_or(DEFAULT_TELEGRAM_URL),
                credentials,
            ))
        }
        SinkSelection::Interactive => Box::new(ConsoleSink::stdio()),
    };
    Ok(sink)
}

/// Everything a run needs, built from the parsed flags and the config file
pub fn build_observer(
    args: &Args,
    config: &AppConfig,
    api_key: &str,
    started: NaiveDateTime,
) -> Result<(Observer, Arc<dyn TargetSelector>)> {
    let endpoints = config.endpoints()?;
    let http = wobs_sources::build_client().context("Failed to build HTTP client")?;

    let renderer = ReportRenderer::new(config.field_policy()?);
    let sink = build_sink(args.sink_selection(), &http, config, started)?;
    let observer = Observer::new(
        build_collaborators(&http, &endpoints, api_key),
        SinkDispatcher::new(renderer, sink),
    );
    let selector = build_selector(&http, &endpoints, config, args.input_file);
    Ok((observer, selector))
}
