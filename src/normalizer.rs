// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Re-issues comparison requests pairing each base-layer fragment with the
//! tournament winner, then stitches the per-window pieces back into
//! continuous per-keyword series.

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    client::UpstreamClient,
    error::{Result, TrendsError},
    model::{Fragment, Granularity, Series},
};

const MAX_FRAGMENTS: usize = 5;

/// Re-normalizes every fragment in `base` against `winner` and stitches the
/// per-keyword pieces into one [`Series`] per keyword, in first-seen order.
/// `windows_per_query` is the number of consecutive `base` entries that
/// belong to the same keyword (the planner's window count).
pub async fn normalize_and_stitch(
    client: &UpstreamClient,
    base: &[Fragment],
    winner: &Fragment,
    category: u32,
    granularity: Granularity,
    windows_per_query: usize,
    cancel: &CancellationToken,
) -> Result<BTreeMap<String, Series>> {
    let slice_size = MAX_FRAGMENTS - 1;
    let mut flat: Vec<Series> = Vec::with_capacity(base.len());

    for slice in base.chunks(slice_size) {
        if cancel.is_cancelled() {
            return Err(TrendsError::Cancelled);
        }
        let mut group: Vec<Fragment> = slice.to_vec();
        group.push(winner.clone());
        debug!(group_len = group.len(), "normalization pass request");
        let mut series = client.compare_fragments(&group, category, granularity).await?;
        if cancel.is_cancelled() {
            return Err(TrendsError::Cancelled);
        }
        // the winner's own series occupies the last slot; drop it.
        series.truncate(slice.len());
        flat.extend(series);
    }

    Ok(stitch(base, &flat, windows_per_query))
}

/// Concatenates each keyword's consecutive `windows_per_query` series (in
/// query-major/window-minor order, matching `base`) into one continuous
/// per-keyword series. The planner's offset guarantees the windows never
/// overlap, so concatenation is exact.
pub fn stitch(base: &[Fragment], flat: &[Series], windows_per_query: usize) -> BTreeMap<String, Series> {
    let mut stacked: BTreeMap<String, Series> = BTreeMap::new();
    for (chunk_idx, chunk) in flat.chunks(windows_per_query).enumerate() {
        let keyword = base[chunk_idx * windows_per_query + windows_per_query - 1]
            .query
            .keyword
            .clone();
        let mut merged = Series::new();
        for piece in chunk {
            merged.extend_from(piece);
        }
        stacked.insert(keyword, merged);
    }
    stacked
}
