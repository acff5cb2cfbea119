// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use trends_client_rs::{
    container::DataOutput,
    model::{Granularity, Query, Window},
};

use crate::integration_tests::common::{container_for, single_request_server};

fn timeline_31_days_5_keywords() -> String {
    let start = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();
    let rows: Vec<String> = (0..31)
        .map(|i| {
            let ts = (start + ChronoDuration::days(i)).timestamp();
            // keyword index 2 ("banana") hits the global maximum at day 15.
            let values: Vec<String> = (0..5)
                .map(|k| if k == 2 && i == 15 { "100".to_string() } else { "20".to_string() })
                .collect();
            format!(r#"{{"time":"{ts}","value":[{}]}}"#, values.join(","))
        })
        .collect();
    format!(r#"{{"default":{{"timelineData":[{}]}}}}"#, rows.join(","))
}

#[tokio::test]
async fn five_keywords_over_one_month_share_a_single_request() {
    let timeline = timeline_31_days_5_keywords();
    let server = single_request_server(&timeline).await;

    let bounds = Window::new(
        Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2019, 10, 1, 0, 0, 0).unwrap(),
    );
    let queries = ["apple", "orange", "banana", "kiwi", "strawberry"]
        .into_iter()
        .map(|k| Query::with_geo(k, "US"))
        .collect();
    let mut container = container_for(&server, queries, bounds, Granularity::Day);

    let (data, warning) = container
        .get_data(Duration::from_millis(10), false)
        .await
        .expect("get_data succeeds");

    assert!(warning.is_none());
    let DataOutput::Table(table) = data else {
        panic!("multi-keyword query must yield a Table");
    };
    assert_eq!(table.len(), 5);
    for keyword in table.keywords() {
        let series = table.get(keyword).expect("keyword present");
        assert_eq!(series.len(), 31);
    }
    assert_eq!(table.argmax().map(|(_, v)| v), Some(100.0));
    assert_eq!(container.request_structure().depth(), 1);
}
