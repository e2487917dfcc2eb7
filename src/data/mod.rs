// SPDX-License-Identifier: MPL-2.0
//! Table input and row filtering.

pub mod filter;
pub mod loader;

pub use filter::{distinct_values, filter_menu, FilterMenuEntry, FilterStore};
pub use loader::{load_table, sheet_names, SourceFormat, TABLE_EXTENSIONS};
