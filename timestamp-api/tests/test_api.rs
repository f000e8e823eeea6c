use anyhow::Result;
use assert_json_diff::assert_json_eq;
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{json, Value};

use timestamp_api::config::Config;

use crate::helpers::*;

pub mod helpers;

async fn get_json(server: &ServerHandle, path: &str) -> Result<(StatusCode, Value)> {
    let response = reqwest::get(server.url(path)).await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn converts_unix_millis() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let (status, body) = get_json(&server, "/api/1451001600000").await?;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(
        body,
        json!({"unix": 1451001600000i64, "utc": "Fri, 25 Dec 2015 00:00:00 GMT"})
    );

    Ok(())
}

#[tokio::test]
async fn converts_iso_date() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let (status, body) = get_json(&server, "/api/2015-12-25").await?;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(
        body,
        json!({"unix": 1451001600000i64, "utc": "Fri, 25 Dec 2015 00:00:00 GMT"})
    );

    Ok(())
}

#[tokio::test]
async fn converts_written_date() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let (status, body) = get_json(&server, "/api/05%20October%202011,%20GMT").await?;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(
        body,
        json!({"unix": 1317772800000i64, "utc": "Wed, 05 Oct 2011 00:00:00 GMT"})
    );

    Ok(())
}

#[tokio::test]
async fn reports_invalid_date_with_200() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let (status, body) = get_json(&server, "/api/this-is-not-a-date").await?;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(body, json!({"error": "Invalid Date"}));

    Ok(())
}

#[tokio::test]
async fn empty_segment_returns_current_time() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    for path in ["/api", "/api/"] {
        let before = Utc::now().timestamp_millis();
        let (status, body) = get_json(&server, path).await?;
        let after = Utc::now().timestamp_millis();

        assert_eq!(status, StatusCode::OK);
        let unix = body["unix"].as_i64().expect("unix should be an integer");
        assert!(unix >= before && unix <= after, "{unix} not in [{before}, {after}]");

        // the utc field describes the same instant, to the second
        let (_, again) = get_json(&server, &format!("/api/{}", body["utc"].as_str().unwrap())).await?;
        assert_eq!(again["unix"].as_i64().unwrap(), unix - unix.rem_euclid(1000));
    }

    Ok(())
}

#[tokio::test]
async fn unknown_path_is_404() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let (status, body) = get_json(&server, "/nonexistent").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_eq!(body, json!({"error": "Not Found"}));

    Ok(())
}

#[tokio::test]
async fn serves_documentation_page() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let response = reqwest::get(server.url("/")).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await?.contains("Timestamp API"));

    Ok(())
}

#[tokio::test]
async fn allows_cross_origin_requests() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let response = reqwest::Client::new()
        .get(server.url("/api/0"))
        .header("Origin", "https://somewhere.else")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );

    Ok(())
}

#[tokio::test]
async fn should_return_200_for_liveness_check() -> Result<()> {
    let server = ServerHandle::for_config(Config::default_for_test()).await;

    let response = reqwest::get(server.url("/_liveness")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = reqwest::get(server.url("/_readiness")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
