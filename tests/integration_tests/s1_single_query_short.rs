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
async fn single_query_fitting_one_request_is_not_tournamented() {
    let timeline = r#"{"default":{"timelineData":[
        {"time":"1567296000","value":[10]},
        {"time":"1567382400","value":[100]}
    ]}}"#;
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

    let (data, warning) = container
        .get_data(Duration::from_millis(10), false)
        .await
        .expect("get_data succeeds");

    assert!(warning.is_none());
    let DataOutput::Series(series) = data else {
        panic!("single query must yield a Series");
    };
    assert_eq!(series.len(), 2);
    assert_eq!(series.argmax().map(|(_, v)| v), Some(100.0));
    assert_eq!(container.request_structure().depth(), 1);
}
