// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use trends_client_rs::{
    cfg::{
        cli::{Cli, resolve_config_path},
        config::ClientConfig,
        logger::{init_logger, save_to_file},
    },
    client::UpstreamClient,
    container::{Container, DataOutput},
    model::{Query, Window},
};

#[tokio::main]
async fn main() -> Result<()> {
    let _logger_guard = init_logger("tests/config_logger.yaml").ok();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => resolve_config_path(path)
            .and_then(ClientConfig::load_from_file)
            .context("failed to resolve or load config")?,
        None => ClientConfig::default(),
    };

    let from: DateTime<Utc> = cli.from.parse().context("--from must be RFC3339")?;
    let to: DateTime<Utc> = cli.to.parse().context("--to must be RFC3339")?;
    let bounds = Window::new(from, to);
    let granularity = cli.granularity.into();
    let category = if cli.category != 0 { cli.category } else { cfg.category };

    let queries = cli
        .keywords
        .iter()
        .map(|k| Query::with_geo(k.clone(), cli.geo.clone()))
        .collect();

    let client = Arc::new(UpstreamClient::new(
        &cfg.language,
        cfg.timezone_offset_minutes,
        cfg.request_timeout,
    )?);

    let mut container = Container::new(client, queries, bounds, granularity, category)?;
    let (data, warning) = container.get_data(cfg.tournament_delay, cfg.force_truncation).await?;

    if let Some(w) = warning {
        eprintln!("warning: {w}");
    }

    match data {
        DataOutput::Series(series) => {
            for (at, value) in series.iter() {
                println!("{}\t{}", at.to_rfc3339(), value.map(|v| v.to_string()).unwrap_or_default());
            }
        },
        DataOutput::Table(table) => {
            for keyword in table.keywords() {
                println!("== {keyword} ==");
                if let Some(series) = table.get(keyword) {
                    for (at, value) in series.iter() {
                        println!(
                            "{}\t{}",
                            at.to_rfc3339(),
                            value.map(|v| v.to_string()).unwrap_or_default()
                        );
                    }
                }
            }
        },
    }

    if let Some(path) = &cli.explain {
        save_to_file(path, container.request_structure().to_string()).await?;
    }

    Ok(())
}
