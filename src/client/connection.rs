// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use chrono::{TimeZone, Utc};
use tracing::debug;

use super::payload::{
    ComparisonMode, ExploreRequest, WidgetPayload, parse_explore_response,
    parse_timeseries_response,
};
use crate::{
    error::{Result, TrendsError},
    model::{Fragment, Granularity, Series},
};

/// The minimal client needed for hierarchical re-normalization: a session
/// (cookie jar lives inside `http`) plus the two-stage `explore` then
/// `timeseries` protocol. Shared by reference across containers; the
/// underlying `reqwest::Client` is cheap to clone and already serializes
/// connection reuse internally.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    language: String,
    timezone: i32,
    base_url: String,
    explore_url: String,
    ts_single_url: String,
    ts_multi_url: String,
}

impl UpstreamClient {
    pub fn new(language: impl Into<String>, timezone: i32, timeout: Duration) -> Result<Self> {
        Self::with_base_url(language, timezone, timeout, "https://trends.google.com")
    }

    /// Same as [`UpstreamClient::new`] but pointed at an arbitrary base URL
    /// in place of the real upstream. Used by tests to target a mock
    /// server.
    pub fn with_base_url(
        language: impl Into<String>,
        timezone: i32,
        timeout: Duration,
        base: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        let base = base.into();
        Ok(Self {
            http,
            language: language.into(),
            timezone,
            explore_url: format!("{base}/trends/api/explore"),
            ts_single_url: format!("{base}/trends/api/widgetdata/multiline"),
            ts_multi_url: format!("{base}/trends/api/widgetdata/multirange"),
            base_url: base,
        })
    }

    /// Performs the initial handshake GET so the cookie jar is populated
    /// before any `explore` call.
    pub async fn open(&self) -> Result<()> {
        self.http.get(&self.base_url).send().await?.error_for_status()?;
        Ok(())
    }

    fn endpoint_for(&self, mode: ComparisonMode) -> &str {
        match mode {
            ComparisonMode::Single => &self.ts_single_url,
            ComparisonMode::Multi => &self.ts_multi_url,
        }
    }

    async fn explore(
        &self,
        fragments: &[Fragment],
        category: u32,
        granularity: Granularity,
    ) -> Result<WidgetPayload> {
        let comparison_item = fragments
            .iter()
            .map(|f| super::payload::ComparisonItem {
                keyword: f.query.keyword.clone(),
                time: f.window.to_upstream_string(granularity),
                geo: f.query.geo.to_uppercase(),
            })
            .collect();
        let req = ExploreRequest {
            comparison_item,
            category,
            property: String::new(),
        };
        let req_json = serde_json::to_string(&req)?;

        debug!(fragments = fragments.len(), "explore request");
        let response = self
            .http
            .get(&self.explore_url)
            .query(&[
                ("hl", self.language.as_str()),
                ("tz", self.timezone.to_string().as_str()),
                ("req", req_json.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        parse_explore_response(&body)
    }

    async fn timeseries(
        &self,
        payload: &WidgetPayload,
        fragment_count: usize,
        mode: ComparisonMode,
    ) -> Result<Vec<Series>> {
        let req = payload
            .req
            .as_ref()
            .ok_or_else(|| TrendsError::protocol("explore response carried no request payload"))?;
        let token = payload
            .token
            .as_deref()
            .ok_or_else(|| TrendsError::protocol("explore response carried no token"))?;
        let req_json = serde_json::to_string(req)?;

        debug!(mode = ?mode, "timeseries request");
        let response = self
            .http
            .get(self.endpoint_for(mode))
            .query(&[
                ("hl", self.language.as_str()),
                ("tz", self.timezone.to_string().as_str()),
                ("req", req_json.as_str()),
                ("token", token),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let raw = parse_timeseries_response(&body, fragment_count, mode)?;

        raw.into_iter()
            .map(|rows| {
                let mut series = Series::new();
                for (ts, value) in rows {
                    let at = Utc
                        .timestamp_opt(ts, 0)
                        .single()
                        .ok_or_else(|| TrendsError::protocol(format!("out-of-range timestamp {ts}")))?;
                    series.insert(at, value);
                }
                Ok(series)
            })
            .collect()
    }

    /// Issues one `explore`+`timeseries` pair over at most five fragments,
    /// returning one normalized series per fragment in the order given.
    /// This is the only upstream-facing primitive the tournament and
    /// normalizer call; it owns the SINGLE vs MULTI decision.
    pub async fn compare_fragments(
        &self,
        fragments: &[Fragment],
        category: u32,
        granularity: Granularity,
    ) -> Result<Vec<Series>> {
        if fragments.is_empty() || fragments.len() > 5 {
            return Err(TrendsError::validation(format!(
                "comparison must carry 1-5 fragments, got {}",
                fragments.len()
            )));
        }

        let first_window = fragments[0].window;
        let mode = if fragments.iter().all(|f| f.window == first_window) {
            ComparisonMode::Single
        } else {
            ComparisonMode::Multi
        };

        let widget = self.explore(fragments, category, granularity).await?;
        self.timeseries(&widget, fragments.len(), mode).await
    }
}
