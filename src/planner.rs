// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Splits a user-requested `(bounds, granularity)` range into the
//! upstream-sized windows the tournament and normalizer operate on.

use crate::model::{Granularity, Window};

/// Builds the list of windows covering `bounds`, possibly extending below
/// `bounds.lower` to respect the granularity's minimum sweet-spot length.
/// MONTH always produces exactly one window (see Open Question (b)).
pub fn build_intervals(bounds: Window, granularity: Granularity) -> Vec<Window> {
    let (min_len, max_len) = granularity.bounds();
    let offset = granularity.offset();
    let requested = bounds.length();

    let length = match max_len {
        Some(max_len) => requested.clamp(min_len, max_len),
        None => requested.max(min_len),
    };

    if granularity == Granularity::Month {
        let upper = bounds.upper;
        let lower = upper - length;
        return vec![Window::new(lower, upper)];
    }

    let mut intervals = Vec::new();
    let mut pointer = bounds.upper;
    while pointer > bounds.lower {
        let upper = pointer;
        let lower = upper - length;
        intervals.push(Window::new(lower, upper));
        pointer = lower - offset;
    }
    intervals
}
