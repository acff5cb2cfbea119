// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

/// A single comparison item the caller wants a normalized series for.
///
/// Immutable once built. The category (see [`crate::model::CategoryCode`])
/// is not part of a `Query`: the upstream protocol scopes it to the whole
/// comparison request, not to an individual keyword, so it lives on
/// [`crate::container::Container`] alongside the other request-wide knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The search term. An empty string requests the "worldwide, all terms"
    /// series; the upstream defines that behavior, this crate passes it
    /// through unchanged.
    pub keyword: String,
    /// Two-letter region code, or empty for global.
    pub geo: String,
}

impl Query {
    pub fn new(keyword: impl Into<String>, geo: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            geo: geo.into(),
        }
    }

    /// Builds a query for a given geo. Kept alongside [`Query::new`] as the
    /// call-site name most callers reach for.
    pub fn with_geo(keyword: impl Into<String>, geo: impl Into<String>) -> Self {
        Self::new(keyword, geo)
    }
}
