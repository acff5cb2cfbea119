// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::Serialize;

use super::fragment::Fragment;

/// The ordered pyramid of fragment layers produced by one `get_data` call:
/// layer 0 is the base (query-major/window-minor), layer `k > 0` is the
/// tournament's layer-`k` winners. Retained purely for auditability — it is
/// not required to reproduce the returned series.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestStructure {
    layers: Vec<Vec<Fragment>>,
}

impl RequestStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_layer(&mut self, layer: Vec<Fragment>) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Vec<Fragment>] {
        &self.layers
    }

    pub fn base_layer(&self) -> &[Fragment] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The final layer, which after a successful tournament holds exactly
    /// one fragment — the global winner.
    pub fn final_layer(&self) -> &[Fragment] {
        self.layers.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl std::fmt::Display for RequestStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[derive(Serialize)]
        struct Dump<'a> {
            layers: &'a [Vec<Fragment>],
        }
        let dump = Dump { layers: &self.layers };
        match serde_json::to_string_pretty(&dump) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "RequestStructure {{ depth: {} }}", self.depth()),
        }
    }
}
