// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::window::Instant;

/// An ordered, chronologically-keyed mapping from instant to value. Values
/// lie in `[0, 100]` once normalized, or are `None` for upstream-reported
/// gaps. Backed by a `BTreeMap` so iteration order is always chronological
/// and keys are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series(BTreeMap<Instant, Option<f64>>);

impl Series {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, at: Instant, value: Option<f64>) {
        self.0.insert(at, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, at: &Instant) -> Option<Option<f64>> {
        self.0.get(at).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Instant, &Option<f64>)> {
        self.0.iter()
    }

    pub fn instants(&self) -> impl Iterator<Item = &Instant> {
        self.0.keys()
    }

    /// The maximum present value and the instant it occurs at. `None` if the
    /// series is empty or every value is missing.
    pub fn argmax(&self) -> Option<(Instant, f64)> {
        self.0
            .iter()
            .filter_map(|(at, v)| v.map(|v| (*at, v)))
            .fold(None, |best, (at, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((at, v)),
            })
    }

    /// Appends another series' entries. Used by the stitcher to concatenate
    /// consecutive per-window fragments of the same keyword; the planner's
    /// offset guarantees the key ranges never overlap.
    pub fn extend_from(&mut self, other: &Series) {
        for (at, v) in other.iter() {
            self.0.insert(*at, *v);
        }
    }

    /// Drops every entry strictly before `cutoff`.
    pub fn truncate_before(&mut self, cutoff: Instant) {
        self.0 = self.0.split_off(&cutoff);
    }

    pub fn is_monotonically_increasing(&self) -> bool {
        self.0.keys().zip(self.0.keys().skip(1)).all(|(a, b)| a < b)
    }
}

/// Output of a multi-keyword `get_data` call: one [`Series`] per keyword, all
/// sharing an identical, chronologically-increasing instant index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table(BTreeMap<String, Series>);

impl Table {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, keyword: impl Into<String>, series: Series) {
        self.0.insert(keyword.into(), series);
    }

    pub fn get(&self, keyword: &str) -> Option<&Series> {
        self.0.get(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The global maximum across every series in the table, and the instant
    /// it occurs at.
    pub fn argmax(&self) -> Option<(Instant, f64)> {
        self.0
            .values()
            .filter_map(|s| s.argmax())
            .fold(None, |best, (at, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((at, v)),
            })
    }

    pub fn truncate_before(&mut self, cutoff: Instant) {
        for s in self.0.values_mut() {
            s.truncate_before(cutoff);
        }
    }
}
