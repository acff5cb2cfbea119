// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use chrono::{TimeZone, Utc};
use trends_client_rs::{
    container::DataOutput,
    model::{Granularity, Query, Window},
};

use crate::integration_tests::common::{container_for, tournament_server};

#[tokio::test]
async fn ten_year_daily_range_runs_the_tournament() {
    let server = tournament_server().await;

    let bounds = Window::new(
        Utc.with_ymd_and_hms(2009, 3, 17, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2019, 10, 18, 0, 0, 0).unwrap(),
    );
    let mut container = container_for(
        &server,
        vec![Query::with_geo("apple", "US")],
        bounds,
        Granularity::Day,
    );

    let (data, warning) = container
        .get_data(Duration::from_millis(1), false)
        .await
        .expect("get_data succeeds");

    assert!(warning.is_none());
    let DataOutput::Series(series) = data else {
        panic!("single query must yield a Series");
    };
    assert!(!series.is_empty());
    assert_eq!(series.argmax().map(|(_, v)| v), Some(100.0));
    assert!(container.request_structure().depth() >= 2);
    assert_eq!(container.request_structure().final_layer().len(), 1);
}
