use chrono::{
    DateTime,
    Local,
    TimeZone as _,
};
use httpmock::prelude::*;
use mackerel_plugin_sendgrid::{
    stats::USER_AGENT,
    FetchError,
    Runner,
    SendgridPlugin,
    StatsFetcher,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const API_KEY: &str = "SG.test-key";

fn noon_on_march_2nd() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
}

fn fetcher(server: &MockServer) -> StatsFetcher {
    StatsFetcher::new(API_KEY).with_endpoint(server.url("/v3/stats"))
}

fn respond<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
    let body = body.to_string();
    server.mock(|when, then| {
        when.method(GET).path("/v3/stats");
        then.status(status).body(body);
    })
}

#[test]
fn request_targets_yesterday_with_credentials() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v3/stats")
            .query_param("start_date", "2024-03-01")
            .query_param("end_date", "2024-03-01")
            .header("authorization", format!("Bearer {API_KEY}"))
            .header("user-agent", USER_AGENT)
            .header("content-type", "application/json");
        then.status(200).body("[]");
    });

    fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap();
    mock.assert();
}

#[test]
fn first_metrics_object_is_converted_to_floats() {
    let server = MockServer::start();
    let mock = respond(
        &server,
        200,
        r#"[{"date": "2024-03-01", "stats": [{"metrics": {"opens": 42, "clicks": 7}}]}]"#,
    );

    let metrics = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap();

    mock.assert();
    assert_eq!(
        metrics,
        HashMap::from([("opens".to_string(), 42.0), ("clicks".to_string(), 7.0)])
    );
}

#[test]
fn no_days_is_an_empty_success() {
    let server = MockServer::start();
    respond(&server, 200, "[]");

    let metrics = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap();
    assert!(metrics.is_empty());
}

#[test]
fn no_stats_in_first_day_is_an_empty_success() {
    let server = MockServer::start();
    respond(&server, 200, r#"[{"date": "2024-03-01", "stats": []}]"#);

    let metrics = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap();
    assert!(metrics.is_empty());
}

#[test]
fn null_counters_are_reported_as_zero() {
    let server = MockServer::start();
    respond(&server, 200, r#"[{"stats": [{"metrics": {"opens": null, "clicks": 7}}]}]"#);

    let metrics = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap();
    assert_eq!(
        metrics,
        HashMap::from([("opens".to_string(), 0.0), ("clicks".to_string(), 7.0)])
    );
}

#[test]
fn unexpected_status_carries_code_and_body() {
    let server = MockServer::start();
    respond(&server, 429, "rate limited");

    let err = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("429"), "{message}");
    assert!(message.contains("rate limited"), "{message}");
    assert!(matches!(err, FetchError::Status { status: 429, .. }));
}

#[test]
fn malformed_body_is_a_decode_error() {
    let server = MockServer::start();
    respond(&server, 200, "{not json");

    let err = fetcher(&server).fetch_at(noon_on_march_2nd()).unwrap_err();

    match err {
        FetchError::Decode { body, .. } => assert_eq!(body, "{not json"),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn invalid_endpoint_fails_before_any_request() {
    let err = StatsFetcher::new(API_KEY)
        .with_endpoint("not a url")
        .fetch_at(noon_on_march_2nd())
        .unwrap_err();
    assert!(matches!(err, FetchError::Endpoint { .. }));
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let err = StatsFetcher::new(API_KEY)
        .with_endpoint("http://127.0.0.1:1/v3/stats")
        .fetch_at(noon_on_march_2nd())
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[test]
fn runner_prints_fetched_values_under_the_prefix() {
    let server = MockServer::start();
    respond(&server, 200, r#"[{"stats": [{"metrics": {"delivered": 10, "bounces": 2}}]}]"#);

    let plugin = SendgridPlugin::new("sendgrid", API_KEY).with_fetcher(fetcher(&server));
    let now = chrono::Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
    let mut out = Vec::new();
    Runner::new(plugin).output_values(&mut out, now).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "sendgrid.global.bounces\t2.000000\t1709337600\nsendgrid.global.delivered\t10.000000\t1709337600\n"
    );
}

#[test]
fn runner_propagates_fetch_errors() {
    let server = MockServer::start();
    respond(&server, 401, r#"{"errors":[{"message":"authorization required"}]}"#);

    let plugin = SendgridPlugin::new("sendgrid", "").with_fetcher(fetcher(&server));
    let mut out = Vec::new();
    let err = Runner::new(plugin)
        .output_values(&mut out, chrono::Utc::now())
        .unwrap_err();

    assert!(err.to_string().contains("401"));
    assert!(out.is_empty());
}
