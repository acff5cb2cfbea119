// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error taxonomy for the trends client.
//!
//! Every public operation returns [`Result<T>`] = `std::result::Result<T,
//! TrendsError>`. Transport and protocol failures are never retried inside
//! this crate; the caller decides whether and how to retry.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrendsError>;

/// The failure taxonomy described by the specification: preconditions
/// violated before any I/O, transport failures, upstream payload shape
/// drift, and algorithmic anomalies in the tournament.
#[derive(Debug, Error)]
pub enum TrendsError {
    /// A precondition on bounds, granularity, or query count was violated
    /// at call time. No network I/O is performed when this is raised.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Network failure, timeout, or non-2xx HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed JSON, a missing anti-XSSI guard, or a missing expected
    /// field in an upstream response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A tournament group returned no series whose maximum equals 100.
    /// The upstream's own normalization guarantees this cannot happen
    /// unless the upstream or our encoding of the request is broken.
    #[error("algorithm error: {0}")]
    Algorithm(String),

    /// The caller's cancellation token fired while `get_data` was in
    /// flight. Partial progress is discarded; the container stays `Stale`.
    #[error("operation cancelled")]
    Cancelled,
}

impl TrendsError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        TrendsError::Protocol(msg.into())
    }

    pub fn algorithm(msg: impl Into<String>) -> Self {
        TrendsError::Algorithm(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        TrendsError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for TrendsError {
    fn from(e: serde_json::Error) -> Self {
        TrendsError::Protocol(e.to_string())
    }
}

/// Non-fatal companion to a successful [`crate::container::Container::get_data`]
/// call: the global maximum fell in the region the planner added to reach
/// the granularity's sweet spot, so the un-truncated series is returned
/// instead of silently dropping the value 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationWarning;

impl std::fmt::Display for TruncationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(
            "maximal volume is not in the specified range; series is longer than requested",
        )
    }
}
