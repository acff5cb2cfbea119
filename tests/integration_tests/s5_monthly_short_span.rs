// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use chrono::{TimeZone, Utc};
use trends_client_rs::{
    container::DataOutput,
    model::{Granularity, Query, Window},
};

use crate::integration_tests::common::{container_for, single_request_server};

#[tokio::test]
async fn monthly_request_extends_the_window_and_warns_on_truncation() {
    // A single point far in the past (well before the requested lower bound)
    // carries the maximum, and one point at the requested upper bound.
    let timeline = r#"{"default":{"timelineData":[
        {"time":"0","value":[100]},
        {"time":"1493683200","value":[10]}
    ]}}"#;
    let server = single_request_server(timeline).await;

    let bounds = Window::new(
        Utc.with_ymd_and_hms(2017, 5, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2017, 5, 2, 0, 0, 0).unwrap(),
    );
    let mut container = container_for(
        &server,
        vec![Query::with_geo("apple", "")],
        bounds,
        Granularity::Month,
    );

    let (data, warning) = container
        .get_data(Duration::from_millis(10), false)
        .await
        .expect("get_data succeeds");

    assert!(warning.is_some(), "the global maximum falls outside the requested bounds");
    let DataOutput::Series(series) = data else {
        panic!("single query must yield a Series");
    };
    assert_eq!(series.argmax().map(|(_, v)| v), Some(100.0));
}
