// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::model::Granularity;

/// Everything needed to open an [`crate::client::UpstreamClient`] and drive a
/// default `get_data` call, loaded from a YAML file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientConfig {
    /// Language tag sent as the `hl` query parameter (e.g. `en-US`).
    #[serde(default = "default_language")]
    pub language: String,

    /// Timezone offset in minutes from UTC, sent as the `tz` query
    /// parameter.
    #[serde(default)]
    pub timezone_offset_minutes: i32,

    /// Per-request HTTP timeout.
    #[serde(rename = "RequestTimeout", with = "serde_secs")]
    pub request_timeout: Duration,

    /// Base inter-request delay the pacer jitters around.
    #[serde(rename = "TournamentDelay", with = "serde_secs")]
    pub tournament_delay: Duration,

    /// Default comparison granularity when the caller does not override it.
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,

    /// Default category filter (0 = all categories).
    #[serde(default)]
    pub category: u32,

    /// Whether `get_data` should trim to the requested bounds even when the
    /// global maximum falls outside them.
    #[serde(default)]
    pub force_truncation: bool,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_granularity() -> Granularity {
    Granularity::Day
}

impl ClientConfig {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: ClientConfig =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(!self.language.is_empty(), "language must not be empty");
        ensure!(
            (-720..=840).contains(&self.timezone_offset_minutes),
            "timezone_offset_minutes must be a plausible UTC offset"
        );
        ensure!(
            self.request_timeout > Duration::from_secs(0),
            "RequestTimeout must be positive"
        );
        if self.tournament_delay < Duration::from_millis(100) {
            self.tournament_delay = Duration::from_millis(100);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            timezone_offset_minutes: 0,
            request_timeout: Duration::from_secs(10),
            tournament_delay: Duration::from_millis(500),
            granularity: default_granularity(),
            category: 0,
            force_truncation: false,
        }
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
