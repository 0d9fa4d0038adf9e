use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use wobs_core::{
    ElevationSource, GeomagneticSource, LocalClock, LocationResolver, NetworkLocator,
    ObservationValue, WaterTemperatureSource, WeatherSource,
};
use wobs_sources::{
    build_client, IpInfoLocator, OpenElevationClient, OpenMeteoGeocoder, OpenMeteoMarineClient,
    SwpcKpClient, WeatherbitClient, WorldTimeClock,
};

async fn search(Query(q): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    if q.get("name").map(String::as_str) == Some("Madrid") {
        Json(json!({"results": [{
            "name": "Madrid", "latitude": 40.4165, "longitude": -3.70256,
            "timezone": "Europe/Madrid", "country": "Spain", "country_code": "ES"
        }]}))
    } else {
        Json(json!({"generationtime_ms": 0.1}))
    }
}

async fn current(Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<serde_json::Value>) {
    if q.get("key").map(String::as_str) != Some("secret") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "API key not valid"})),
        );
    }
    let city = q.get("city").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({"count": 1, "data": [{
            "city_name": city, "temp": 20.0, "pres": 1000.0, "uv": 4.5, "rh": 40
        }]})),
    )
}

async fn serve() -> String {
    let app = Router::new()
        .route("/v1/search", get(search))
        .route("/v2.0/current", get(current))
        .route(
            "/api/v1/lookup",
            get(|| async { Json(json!({"results": [{"elevation": 657}]})) }),
        )
        .route(
            "/v1/marine",
            get(|| async { Json(json!({"current": {"sea_surface_temperature": 14.5}})) }),
        )
        .route(
            "/products/noaa-planetary-k-index.json",
            get(|| async { Json(json!([["time_tag", "Kp"], ["2024-01-01 06:00:00.000", "3.00"]])) }),
        )
        .route(
            "/api/timezone/Europe/Madrid",
            get(|| async { Json(json!({"datetime": "2024-01-01T08:00:00.5+01:00"})) }),
        )
        .route("/json", get(|| async { Json(json!({"city": "Madrid"})) }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn resolves_and_fetches_every_measurement() {
    let base = serve().await;
    let http = build_client().unwrap();

    let location = OpenMeteoGeocoder::new(http.clone(), &base)
        .resolve("Madrid")
        .await
        .unwrap();
    assert_eq!(location.timezone, "Europe/Madrid");
    assert_eq!(location.country_code, "es");

    let payload = WeatherbitClient::new(http.clone(), &base, "secret".into())
        .current_weather(&location.country_code, &location.name)
        .await
        .unwrap();
    assert_eq!(payload["city_name"], ObservationValue::String("Madrid".into()));
    assert_eq!(payload["rh"], ObservationValue::Integer(40));

    let elevation = OpenElevationClient::new(http.clone(), &base)
        .elevation(location.latitude, location.longitude)
        .await
        .unwrap();
    assert_eq!(elevation, 657);

    let water = OpenMeteoMarineClient::new(http.clone(), &base)
        .water_temperature(location.latitude, location.longitude)
        .await
        .unwrap();
    assert_eq!(water, 14.5);

    let kp = SwpcKpClient::new(http.clone(), &base)
        .geomagnetic_index(location.latitude, location.longitude)
        .await
        .unwrap();
    assert_eq!(kp, 3);

    let now = WorldTimeClock::new(http.clone(), &format!("{}/", base))
        .local_time(&location.timezone)
        .await
        .unwrap();
    assert_eq!(wobs_core::format_local_time(&now), "2024-01-01 08:00:00 +0100");

    let city = IpInfoLocator::new(http, &base).current_city().await.unwrap();
    assert_eq!(city, "Madrid");
}

#[tokio::test]
async fn provider_failures_surface_as_errors() {
    let base = serve().await;
    let http = build_client().unwrap();

    let unknown = OpenMeteoGeocoder::new(http.clone(), &base)
        .resolve("Atlantis")
        .await;
    assert!(unknown.is_err());

    let rejected = WeatherbitClient::new(http.clone(), &base, "wrong".into())
        .current_weather("es", "Madrid")
        .await
        .unwrap_err();
    assert!(rejected.to_string().contains("403"));

    let missing_route = OpenElevationClient::new(http, &format!("{}/nothing", base))
        .elevation(0.0, 0.0)
        .await;
    assert!(missing_route.is_err());
}
