// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The instant type used consistently across the crate. Upstream timestamps
/// carry no timezone information of their own; we treat every instant as
/// UTC and never perform an implicit conversion.
pub type Instant = DateTime<Utc>;

/// Temporal resolution requested from the upstream. Each granularity has its
/// own "sweet spot" window-length range (see [`Granularity::bounds`]) beyond
/// which the upstream silently changes the resolution it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Day,
    Hour,
    Month,
}

impl Granularity {
    /// `(min, max)` window length for this granularity's sweet spot.
    /// MONTH has no effective upper bound: a single window always covers
    /// the whole (possibly extended) range.
    pub fn bounds(self) -> (Duration, Option<Duration>) {
        match self {
            Granularity::Day => (Duration::days(1), Some(Duration::days(269))),
            Granularity::Hour => (Duration::days(3), Some(Duration::days(7))),
            Granularity::Month => (Duration::days(1890), None),
        }
    }

    /// Gap left between adjacent windows so that concatenation never
    /// produces duplicate or colliding instants.
    pub fn offset(self) -> Duration {
        match self {
            Granularity::Hour => Duration::hours(1),
            Granularity::Day | Granularity::Month => Duration::days(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "DAY",
            Granularity::Hour => "HOUR",
            Granularity::Month => "MONTH",
        }
    }
}

/// A closed interval `[lower, upper]` of instants. Invariant: `lower <=
/// upper`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub lower: Instant,
    pub upper: Instant,
}

impl Window {
    pub fn new(lower: Instant, upper: Instant) -> Self {
        assert!(lower <= upper, "window lower bound must not exceed upper bound");
        Self { lower, upper }
    }

    pub fn length(&self) -> Duration {
        self.upper - self.lower
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.lower <= instant && instant <= self.upper
    }

    /// Formats the window the way the upstream's `explore` payload expects:
    /// `"YYYY-MM-DD YYYY-MM-DD"` for DAY/MONTH, `"YYYY-MM-DDTHH
    /// YYYY-MM-DDTHH"` for HOUR.
    pub fn to_upstream_string(&self, granularity: Granularity) -> String {
        let fmt = match granularity {
            Granularity::Hour => "%Y-%m-%dT%H",
            Granularity::Day | Granularity::Month => "%Y-%m-%d",
        };
        format!(
            "{} {}",
            self.lower.format(fmt),
            self.upper.format(fmt)
        )
    }
}
