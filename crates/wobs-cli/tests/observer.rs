mod common;

use std::sync::Arc;

use common::*;
use wobs_core::ReportStyle;

#[tokio::test]
async fn one_pass_reports_every_target_in_order() {
    let clock = ManualClock::at("2024-01-01T08:00:00+01:00");
    let (mut observer, sent) = observer(healthy(Arc::new(clock)), ReportStyle::Plain);

    let delivered = observer
        .observe_all(&["Madrid".to_string(), "Oslo".to_string()])
        .await;
    assert_eq!(delivered, 2);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    insta::assert_snapshot!(sent[0].as_str(), @r###"
    Country: Spain | City name: Madrid
    Timezone: Europe/Madrid
    Time: 2024-01-01 08:00:00 +0100

    Elevation above sea level: 657 m
    Geomagnetic field: 3 - Unsettled

    Pressure: 1000.0 mb | 750.06 mmHg | 100.0 kPa

    Relative humidity: 40%

    UV (UltraViolet): 6.0 - Orange

    Temperature: 20.0 C | 68.0 F | 293.15 K
    Water temperature: 14.5 C | 58.1 F | 287.65 K
    "###);
    assert!(sent[1].starts_with("Country: Norway | City name: Oslo\n"));
}

#[tokio::test]
async fn unresolvable_target_is_skipped() {
    let clock = ManualClock::at("2024-01-01T08:00:00+01:00");
    let (mut observer, sent) = observer(healthy(Arc::new(clock)), ReportStyle::Plain);

    assert!(observer.observe("Atlantis").await.is_none());
    let delivered = observer
        .observe_all(&["Atlantis".to_string(), "Oslo".to_string()])
        .await;
    assert_eq!(delivered, 1);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_measurements_leave_fields_out() {
    let sources = wobs_cli::Collaborators {
        weather: Arc::new(Down),
        elevation: Arc::new(Down),
        water: Arc::new(Down),
        geomagnetic: Arc::new(Down),
        clock: Arc::new(Down),
        ..healthy(Arc::new(Down))
    };
    let (mut observer, sent) = observer(sources, ReportStyle::Markdown);

    let result = observer.observe("madrid").await.unwrap();
    assert!(result.is_delivered());

    let sent = sent.lock().unwrap();
    assert_eq!(
        sent[0],
        "## Country: Spain | City name: Madrid\n### Timezone: Europe/Madrid\n"
    );
}

#[tokio::test]
async fn weather_lookup_uses_resolved_name() {
    let weather = Arc::new(Weather::default());
    let clock = ManualClock::at("2024-01-01T08:00:00+01:00");
    let sources = wobs_cli::Collaborators {
        weather: weather.clone(),
        ..healthy(Arc::new(clock))
    };
    let (observer, _) = observer(sources, ReportStyle::Plain);

    let location = observer.resolve("oslo").await.unwrap();
    let report = observer.collect(&location, None).await;
    assert_eq!(*weather.calls.lock().unwrap(), vec!["Oslo"]);
    assert_eq!(report.envelope.local_time, None);
    assert_eq!(report.envelope.elevation, Some(657));
    // dropped provider fields never reach the record
    assert!(!report.record.contains("city_name"));
    assert!(report.record.contains("Temperature"));
}
