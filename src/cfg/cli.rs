// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::model::Granularity;

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// Fetches a hierarchically re-normalized search-volume series or table for
/// one or more keywords over a date range.
#[derive(Debug, Parser)]
#[command(name = "trends-client", version, about)]
pub struct Cli {
    /// Keywords to compare, one per flag (e.g. `-k apple -k orange`).
    #[arg(short = 'k', long = "keyword", required = true)]
    pub keywords: Vec<String>,

    /// Two-letter geo code, empty string for worldwide.
    #[arg(long, default_value = "")]
    pub geo: String,

    /// Range start, RFC3339 (e.g. `2019-01-01T00:00:00Z`).
    #[arg(long)]
    pub from: String,

    /// Range end, RFC3339.
    #[arg(long)]
    pub to: String,

    /// Comparison granularity.
    #[arg(long, value_enum, default_value = "day")]
    pub granularity: GranularityArg,

    /// Upstream category filter, 0 for all categories.
    #[arg(long, default_value_t = 0)]
    pub category: u32,

    /// Path to a YAML config file; CLI flags override its defaults.
    #[arg(long)]
    pub config: Option<String>,

    /// Dump the request structure (the fragment pyramid the tournament
    /// built) to this path as pretty JSON.
    #[arg(long)]
    pub explain: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum GranularityArg {
    Day,
    Hour,
    Month,
}

impl From<GranularityArg> for Granularity {
    fn from(g: GranularityArg) -> Self {
        match g {
            GranularityArg::Day => Granularity::Day,
            GranularityArg::Hour => Granularity::Hour,
            GranularityArg::Month => Granularity::Month,
        }
    }
}
