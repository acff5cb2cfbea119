// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use trends_client_rs::{client::UpstreamClient, container::Container, model::Query};
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    matchers::{method, path},
};

/// Anti-XSSI guard the upstream prefixes onto every response body.
const GUARD: &[u8] = b")]}',";

pub fn guarded(json: &str) -> Vec<u8> {
    let mut body = GUARD.to_vec();
    body.extend_from_slice(json.as_bytes());
    body
}

fn query_param(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Starts a mock upstream that serves the handshake GET, an `explore` call
/// returning a fixed token, and a `multiline` timeseries call returning
/// `timeline_json` verbatim for every request. Good for the shortcut path,
/// where exactly one `explore`+`timeseries` pair is issued.
pub async fn single_request_server(timeline_json: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            guarded(r#"{"widgets":[{"id":"TIMESERIES","request":{"probe":true},"token":"tok"}]}"#),
            "text/javascript",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/api/widgetdata/multiline"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(guarded(timeline_json), "text/javascript"),
        )
        .expect(1)
        .mount(&server)
        .await;

    server
}

/// Explore responder that echoes the incoming `comparisonItem` list back as
/// the widget's `request`, so the paired timeseries responder can recover
/// the per-fragment time windows.
struct EchoExplore;

impl Respond for EchoExplore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let req_raw = query_param(request, "req").unwrap_or_default();
        let parsed: Value = serde_json::from_str(&req_raw).unwrap_or(json!({}));
        let items = parsed.get("comparisonItem").cloned().unwrap_or(json!([]));
        let body = json!({
            "widgets": [{"id": "TIMESERIES", "request": {"items": items}, "token": "tok"}],
        });
        ResponseTemplate::new(200)
            .set_body_raw(guarded(&body.to_string()), "text/javascript")
    }
}

/// `multirange` responder that, for an `n`-item comparison, always places
/// the maximum (100) on the first item and 50 on every other, at a distinct
/// timestamp per item (derived from each fragment's own window so repeated
/// calls over different windows stitch into a non-degenerate series).
struct EchoTimeseries;

impl Respond for EchoTimeseries {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let req_raw = query_param(request, "req").unwrap_or_default();
        let parsed: Value = serde_json::from_str(&req_raw).unwrap_or(json!({}));
        let items = parsed
            .get("items")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let column_data: Vec<Value> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let time = item.get("time").and_then(|t| t.as_str()).unwrap_or("");
                let ts = first_date_to_unix_seconds(time);
                let value = if i == 0 { 100.0 } else { 50.0 };
                json!({"time": ts.to_string(), "value": value})
            })
            .collect();

        let body = json!({"default": {"timelineData": [{"columnData": column_data}]}});
        ResponseTemplate::new(200)
            .set_body_raw(guarded(&body.to_string()), "text/javascript")
    }
}

/// Parses the first `YYYY-MM-DD` token out of an upstream-formatted window
/// string (`"YYYY-MM-DD YYYY-MM-DD"` or the hour variant) into unix seconds.
fn first_date_to_unix_seconds(window: &str) -> i64 {
    let first = window.split(' ').next().unwrap_or(window);
    let date_part = &first[..10.min(first.len())];
    chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Starts a mock upstream suitable for a tournament: `explore` echoes the
/// comparison items, `multirange` reports the first item of every group as
/// the maximum. Used for ranges too long to fit in a single comparison.
pub async fn tournament_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/api/explore"))
        .respond_with(EchoExplore)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/api/widgetdata/multirange"))
        .respond_with(EchoTimeseries)
        .mount(&server)
        .await;

    server
}

pub fn client_for(server: &MockServer) -> Arc<UpstreamClient> {
    Arc::new(
        UpstreamClient::with_base_url("en-US", 0, Duration::from_secs(5), server.uri())
            .expect("client builds"),
    )
}

pub fn container_for(
    server: &MockServer,
    queries: Vec<Query>,
    bounds: trends_client_rs::model::Window,
    granularity: trends_client_rs::model::Granularity,
) -> Container {
    Container::new(client_for(server), queries, bounds, granularity, 0).expect("valid container")
}
