// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The caller-facing handle: holds queries, bounds, granularity, and
//! category, drives `get_data`, and caches the result until an input
//! mutates.

use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    client::UpstreamClient,
    error::{Result, TrendsError, TruncationWarning},
    model::{Fragment, Granularity, Query, RequestStructure, Series, Table, Window},
    normalizer,
    pacer::Pacer,
    planner, tournament,
};

const MAX_FRAGMENTS: usize = 5;
const EARLIEST_BOUND_YEAR: i32 = 2004;

/// Either shape `get_data` can return: a single series for a univariate
/// container, or a table for a multivariate one.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOutput {
    Series(Series),
    Table(Table),
}

impl DataOutput {
    pub fn argmax(&self) -> Option<(crate::model::window::Instant, f64)> {
        match self {
            DataOutput::Series(s) => s.argmax(),
            DataOutput::Table(t) => t.argmax(),
        }
    }

    pub fn truncate_before(&mut self, cutoff: crate::model::window::Instant) {
        match self {
            DataOutput::Series(s) => s.truncate_before(cutoff),
            DataOutput::Table(t) => t.truncate_before(cutoff),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Consistent,
    Stale,
}

/// Caller-facing search-volume series/table builder. A single constructor
/// takes a list of queries; `univariate`/`multivariate` call-site sugar is
/// unnecessary in Rust (see the design notes on constructor variants).
pub struct Container {
    client: Arc<UpstreamClient>,
    queries: Vec<Query>,
    bounds: Window,
    granularity: Granularity,
    category: u32,
    state: State,
    data: Option<DataOutput>,
    request_structure: RequestStructure,
}

impl Container {
    pub fn new(
        client: Arc<UpstreamClient>,
        queries: Vec<Query>,
        bounds: Window,
        granularity: Granularity,
        category: u32,
    ) -> Result<Self> {
        validate_queries(&queries)?;
        validate_bounds(bounds)?;
        Ok(Self {
            client,
            queries,
            bounds,
            granularity,
            category,
            state: State::Fresh,
            data: None,
            request_structure: RequestStructure::new(),
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.state == State::Consistent
    }

    pub fn request_structure(&self) -> &RequestStructure {
        &self.request_structure
    }

    pub fn set_queries(&mut self, queries: Vec<Query>) -> Result<()> {
        validate_queries(&queries)?;
        self.queries = queries;
        self.state = State::Stale;
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: Window) -> Result<()> {
        validate_bounds(bounds)?;
        self.bounds = bounds;
        self.state = State::Stale;
        Ok(())
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.state = State::Stale;
    }

    pub fn set_category(&mut self, category: u32) {
        self.category = category;
        self.state = State::Stale;
    }

    /// Builds (or returns the cached) normalized series/table. Idempotent
    /// while the container is `Consistent`: a second call makes zero
    /// upstream requests and returns a value-equal result.
    ///
    /// `delay` paces tournament probe requests; `force_truncation` trims the
    /// emitted series to `bounds` even when doing so would drop the global
    /// maximum (see the truncation policy). Never cancellable; use
    /// [`Container::get_data_cancellable`] to supply a cancellation token.
    pub async fn get_data(
        &mut self,
        delay: Duration,
        force_truncation: bool,
    ) -> Result<(DataOutput, Option<TruncationWarning>)> {
        self.get_data_cancellable(delay, force_truncation, &CancellationToken::new())
            .await
    }

    /// As [`Container::get_data`], but checks `cancel` before and after
    /// every upstream call. On cancellation the container is left `Stale`
    /// and no partial result is cached.
    pub async fn get_data_cancellable(
        &mut self,
        delay: Duration,
        force_truncation: bool,
        cancel: &CancellationToken,
    ) -> Result<(DataOutput, Option<TruncationWarning>)> {
        if self.state == State::Consistent {
            let data = self.data.clone().expect("consistent implies cached data");
            return Ok((data, None));
        }

        if cancel.is_cancelled() {
            return Err(TrendsError::Cancelled);
        }
        self.client.open().await?;
        if cancel.is_cancelled() {
            return Err(TrendsError::Cancelled);
        }

        let windows = planner::build_intervals(self.bounds, self.granularity);
        let mut base = Vec::with_capacity(self.queries.len() * windows.len());
        for query in &self.queries {
            for window in &windows {
                base.push(Fragment::new(query.clone(), *window));
            }
        }

        let mut structure = RequestStructure::new();
        let pacer = Pacer::new(delay);

        let stacked = if base.len() <= MAX_FRAGMENTS {
            info!(fragments = base.len(), "fits a single comparison; skipping tournament");
            let flat = self
                .client
                .compare_fragments(&base, self.category, self.granularity)
                .await?;
            if cancel.is_cancelled() {
                return Err(TrendsError::Cancelled);
            }
            structure.push_layer(base.clone());
            normalizer::stitch(&base, &flat, windows.len())
        } else {
            let winner = tournament::run(
                &self.client,
                base.clone(),
                self.category,
                self.granularity,
                &pacer,
                &mut structure,
                cancel,
            )
            .await?;
            normalizer::normalize_and_stitch(
                &self.client,
                &base,
                &winner,
                self.category,
                self.granularity,
                windows.len(),
                cancel,
            )
            .await?
        };

        let mut data = if stacked.len() == 1 {
            let (_, series) = stacked.into_iter().next().expect("checked len == 1");
            DataOutput::Series(series)
        } else {
            let mut table = Table::new();
            for (keyword, series) in stacked {
                table.insert(keyword, series);
            }
            DataOutput::Table(table)
        };

        let warning = apply_truncation_policy(&mut data, self.bounds.lower, force_truncation);

        self.request_structure = structure;
        self.data = Some(data.clone());
        self.state = State::Consistent;
        Ok((data, warning))
    }
}

fn apply_truncation_policy(
    data: &mut DataOutput,
    lower_bound: crate::model::window::Instant,
    force_truncation: bool,
) -> Option<TruncationWarning> {
    let max_ts = data.argmax().map(|(at, _)| at);
    match max_ts {
        Some(at) if at >= lower_bound => {
            data.truncate_before(lower_bound);
            None
        },
        _ if force_truncation => {
            data.truncate_before(lower_bound);
            None
        },
        _ => Some(TruncationWarning),
    }
}

fn validate_queries(queries: &[Query]) -> Result<()> {
    if queries.is_empty() {
        return Err(TrendsError::validation("at least one query is required"));
    }
    Ok(())
}

fn validate_bounds(bounds: Window) -> Result<()> {
    let earliest = Utc
        .with_ymd_and_hms(EARLIEST_BOUND_YEAR, 1, 1, 0, 0, 0)
        .single()
        .expect("2004-01-01 is a valid date");
    if bounds.lower < earliest {
        return Err(TrendsError::validation("earliest supported date is 2004-01-01"));
    }
    let now = Utc::now();
    if bounds.lower >= now || bounds.upper >= now {
        return Err(TrendsError::validation("bounds must lie strictly in the past"));
    }
    if bounds.lower >= bounds.upper {
        return Err(TrendsError::validation("lower bound must precede upper bound"));
    }
    Ok(())
}
