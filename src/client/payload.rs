// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Wire shapes for the upstream's "explore then widget" protocol, and the
//! anti-XSSI guard every response body carries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrendsError};

/// Every `explore`/`timeseries` response begins with 5 garbage bytes meant
/// to defeat naive `<script src=...>` JSON hijacking. They must be skipped
/// before the remainder is valid JSON.
pub const GUARD_LEN: usize = 5;

pub fn strip_guard(body: &[u8]) -> Result<&[u8]> {
    if body.len() < GUARD_LEN {
        return Err(TrendsError::protocol(format!(
            "response body shorter than the {GUARD_LEN}-byte anti-XSSI guard ({} bytes)",
            body.len()
        )));
    }
    Ok(&body[GUARD_LEN..])
}

#[derive(Debug, Serialize)]
pub struct ComparisonItem {
    pub keyword: String,
    pub time: String,
    pub geo: String,
}

#[derive(Debug, Serialize)]
pub struct ExploreRequest {
    #[serde(rename = "comparisonItem")]
    pub comparison_item: Vec<ComparisonItem>,
    pub category: u32,
    pub property: String,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    request: Option<Value>,
    #[serde(default)]
    token: Option<String>,
}

/// The `{req, token}` pair returned for a widget by `explore`, ready to be
/// re-submitted to the matching timeseries endpoint.
#[derive(Debug, Clone)]
pub struct WidgetPayload {
    pub req: Option<Value>,
    pub token: Option<String>,
}

/// Parses an `explore` response body (guard bytes included) and returns the
/// payload for the widget whose id starts with `TIMESERIES`.
pub fn parse_explore_response(body: &[u8]) -> Result<WidgetPayload> {
    let json = strip_guard(body)?;
    let parsed: ExploreResponse = serde_json::from_slice(json)
        .map_err(|e| TrendsError::protocol(format!("malformed explore response: {e}")))?;
    parsed
        .widgets
        .into_iter()
        .find(|w| w.id.starts_with("TIMESERIES"))
        .map(|w| WidgetPayload {
            req: w.request,
            token: w.token,
        })
        .ok_or_else(|| TrendsError::protocol("no TIMESERIES widget in explore response"))
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    default: TimeseriesDefault,
}

#[derive(Debug, Deserialize)]
struct TimeseriesDefault {
    #[serde(rename = "timelineData")]
    timeline_data: Vec<TimelineRow>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimelineRow {
    Single {
        time: String,
        value: Vec<f64>,
    },
    Multi {
        #[serde(rename = "columnData")]
        column_data: Vec<ColumnDatum>,
    },
}

#[derive(Debug, Deserialize)]
struct ColumnDatum {
    time: String,
    value: f64,
}

/// Which timeseries widget endpoint + response row shape applies: `Single`
/// when every fragment in the comparison shares one window (including the
/// degenerate 1-fragment case), `Multi` when windows differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    Single,
    Multi,
}

impl ComparisonMode {
    pub fn endpoint_name(self) -> &'static str {
        match self {
            ComparisonMode::Single => "multiline",
            ComparisonMode::Multi => "multirange",
        }
    }
}

/// Raw `(unix_seconds, value)` rows for one emitted series, in the order the
/// upstream returned them.
pub type RawSeries = Vec<(i64, Option<f64>)>;

/// Parses a `timeseries` response body into `fragment_count` raw series.
pub fn parse_timeseries_response(
    body: &[u8],
    fragment_count: usize,
    mode: ComparisonMode,
) -> Result<Vec<RawSeries>> {
    let json = strip_guard(body)?;
    let parsed: TimeseriesResponse = serde_json::from_slice(json)
        .map_err(|e| TrendsError::protocol(format!("malformed timeseries response: {e}")))?;

    let mut series: Vec<RawSeries> = (0..fragment_count).map(|_| Vec::new()).collect();
    for row in parsed.default.timeline_data {
        match (row, mode) {
            (TimelineRow::Single { time, value }, ComparisonMode::Single) => {
                let ts = parse_unix_seconds(&time)?;
                for (i, slot) in series.iter_mut().enumerate() {
                    let v = value.get(i).copied();
                    slot.push((ts, v));
                }
            },
            (TimelineRow::Multi { column_data }, ComparisonMode::Multi) => {
                for (i, slot) in series.iter_mut().enumerate() {
                    if let Some(col) = column_data.get(i) {
                        let ts = parse_unix_seconds(&col.time)?;
                        slot.push((ts, Some(col.value)));
                    }
                }
            },
            _ => {
                return Err(TrendsError::protocol(
                    "timeline row shape does not match the requested comparison mode",
                ));
            },
        }
    }
    Ok(series)
}

fn parse_unix_seconds(s: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| TrendsError::protocol(format!("non-numeric timestamp: {s:?}")))
}
