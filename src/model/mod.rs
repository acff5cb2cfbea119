//! This module holds the data model shared by the planner, tournament,
//! normalizer, and container: queries, windows, fragments, and the series
//! types returned to callers.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod catcodes;
pub mod fragment;
pub mod query;
pub mod request_structure;
pub mod series;
pub mod window;

pub use catcodes::CategoryCode;
pub use fragment::Fragment;
pub use query::Query;
pub use request_structure::RequestStructure;
pub use series::{Series, Table};
pub use window::{Granularity, Window};
