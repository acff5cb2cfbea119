// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use chrono::{TimeZone, Utc};
use trends_client_rs::model::{Granularity, Query, Window};

use crate::integration_tests::common::{container_for, single_request_server};

#[tokio::test]
async fn repeated_get_data_is_idempotent_and_network_free() {
    let timeline = r#"{"default":{"timelineData":[
        {"time":"1567296000","value":[10]},
        {"time":"1567382400","value":[100]}
    ]}}"#;
    // `.expect(1)` on both the explore and timeseries mocks in
    // `single_request_server` means wiremock panics at drop time if either
    // is hit more than once across both `get_data` calls below.
    let server = single_request_server(timeline).await;

    let bounds = Window::new(
        Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2019, 9, 2, 0, 0, 0).unwrap(),
    );
    let mut container = container_for(
        &server,
        vec![Query::with_geo("apple", "")],
        bounds,
        Granularity::Day,
    );

    let (first, warning_one) = container
        .get_data(Duration::from_millis(10), false)
        .await
        .expect("first call succeeds");
    let (second, warning_two) = container
        .get_data(Duration::from_millis(10), false)
        .await
        .expect("second call succeeds");

    assert!(warning_one.is_none());
    assert!(warning_two.is_none());
    assert_eq!(first, second);
}
