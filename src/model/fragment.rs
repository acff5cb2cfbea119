// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::Serialize;

use super::{query::Query, window::Window};

/// A `Query` paired with the `Window` it is being scored over — the smallest
/// unit the upstream can normalize. Freely copied/cloned; cheap to hold many
/// of at once in a tournament layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub query: Query,
    pub window: Window,
}

impl Fragment {
    pub fn new(query: Query, window: Window) -> Self {
        Self { query, window }
    }
}
