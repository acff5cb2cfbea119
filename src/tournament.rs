// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The global-maximum tournament: a pyramid of upstream probe requests that
//! reduces a set of fragments to the single fragment whose series reaches
//! the value 100 across the whole requested set.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    client::UpstreamClient,
    error::{Result, TrendsError},
    model::{Fragment, Granularity, RequestStructure},
    pacer::Pacer,
};

const MAX_FRAGMENTS: usize = 5;

/// Runs the tournament over `base`, appending every layer (base included) to
/// `structure`, and returns the global winner fragment.
///
/// Shortcut: if `base.len() <= MAX_FRAGMENTS` the caller should not invoke
/// the tournament at all — a single comparison already produces globally
/// normalized values (see `Container::get_data`). This function assumes
/// `base.len() > MAX_FRAGMENTS`.
pub async fn run(
    client: &UpstreamClient,
    base: Vec<Fragment>,
    category: u32,
    granularity: Granularity,
    pacer: &Pacer,
    structure: &mut RequestStructure,
    cancel: &CancellationToken,
) -> Result<Fragment> {
    let depth = tournament_depth(base.len());
    info!(depth, fragments = base.len(), "starting global-maximum tournament");

    let mut layer = base;
    for k in 0..depth {
        let mut winners = Vec::new();
        for group in layer.chunks(MAX_FRAGMENTS) {
            if cancel.is_cancelled() {
                return Err(TrendsError::Cancelled);
            }
            let winner = pick_group_winner(client, group, category, granularity).await?;
            if cancel.is_cancelled() {
                return Err(TrendsError::Cancelled);
            }
            winners.push(winner);
            pacer.delay().await;
        }
        structure.push_layer(layer);
        layer = winners;
        info!(layer = k + 1, remaining = layer.len(), "tournament layer complete");
    }

    if layer.len() != 1 {
        return Err(TrendsError::algorithm(format!(
            "tournament did not converge to a single winner after {depth} layers, {} remain",
            layer.len()
        )));
    }
    structure.push_layer(layer.clone());
    Ok(layer.into_iter().next().expect("checked len == 1 above"))
}

/// `depth = ceil(log_5(ceil(n/5))) + 1`. The `+1` (rather than the
/// mathematically minimal depth) guarantees convergence when the last layer
/// has fewer than `MAX_FRAGMENTS` entries.
fn tournament_depth(n: usize) -> usize {
    let groups = n.div_ceil(MAX_FRAGMENTS);
    let mut depth = 0usize;
    let mut remaining = groups;
    while remaining > 1 {
        remaining = remaining.div_ceil(MAX_FRAGMENTS);
        depth += 1;
    }
    depth + 1
}

/// Issues one comparison over `group` and returns the first fragment whose
/// returned series attains the value 100 — the upstream's guarantee is that
/// within a single request the maximum observed value is rescaled to 100.
async fn pick_group_winner(
    client: &UpstreamClient,
    group: &[Fragment],
    category: u32,
    granularity: Granularity,
) -> Result<Fragment> {
    let series = client.compare_fragments(group, category, granularity).await?;
    for (fragment, s) in group.iter().zip(series.iter()) {
        if matches!(s.argmax(), Some((_, v)) if v == 100.0) {
            return Ok(fragment.clone());
        }
    }
    Err(TrendsError::algorithm(
        "comparison group returned no series whose maximum equals 100",
    ))
}
