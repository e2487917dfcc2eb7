// SPDX-License-Identifier: MPL-2.0
//! Row filtering by per-column value exclusion.
//!
//! The store keeps, for every column, a set of excluded values. A row is
//! active when none of its cells holds an excluded value of its column.
//!
//! Each column is indexed once (value → row positions) and every row keeps a
//! counter of how many exclusions currently hit it, so toggling a value only
//! touches the rows holding that value. Active rows are always reported in
//! table order: re-including a value puts its rows back where they were.

use crate::config::{FILTER_LABEL_MAX_CHARS, FILTER_MENU_LIMIT};
use crate::domain::{CellKey, CellValue, Table};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Exclusion state for one loaded table.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    columns: Vec<String>,
    index: Vec<HashMap<CellKey, Vec<usize>>>,
    excluded: Vec<HashSet<CellKey>>,
    hits: Vec<u32>,
}

impl FilterStore {
    /// Builds an empty filter (every row active) for `table`.
    #[must_use]
    pub fn new(table: &Table) -> Self {
        let columns = table.columns().to_vec();
        let mut index: Vec<HashMap<CellKey, Vec<usize>>> = vec![HashMap::new(); columns.len()];
        for (row_idx, row) in table.rows().iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                index[col_idx].entry(cell.key()).or_default().push(row_idx);
            }
        }
        Self {
            excluded: vec![HashSet::new(); columns.len()],
            hits: vec![0; table.row_count()],
            columns,
            index,
        }
    }

    fn column_position(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::InvalidColumn(column.to_string()))
    }

    /// Excludes `value` in `column`, or re-includes it if already excluded.
    ///
    /// Returns `true` when the value is excluded after the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if `column` is not in the table.
    pub fn toggle(&mut self, column: &str, value: &CellValue) -> Result<bool> {
        let col = self.column_position(column)?;
        let key = value.key();
        let rows = self.index[col].get(&key).map(Vec::as_slice).unwrap_or(&[]);

        if self.excluded[col].remove(&key) {
            for &row in rows {
                self.hits[row] -= 1;
            }
            Ok(false)
        } else {
            for &row in rows {
                self.hits[row] += 1;
            }
            self.excluded[col].insert(key);
            Ok(true)
        }
    }

    /// Clears every exclusion of `column`. Other columns are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if `column` is not in the table.
    pub fn reset(&mut self, column: &str) -> Result<()> {
        let col = self.column_position(column)?;
        for key in self.excluded[col].drain() {
            if let Some(rows) = self.index[col].get(&key) {
                for &row in rows {
                    self.hits[row] -= 1;
                }
            }
        }
        Ok(())
    }

    /// Clears every exclusion of every column.
    pub fn reset_all(&mut self) {
        for excluded in &mut self.excluded {
            excluded.clear();
        }
        self.hits.iter_mut().for_each(|h| *h = 0);
    }

    /// Returns whether `value` is currently excluded in `column`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if `column` is not in the table.
    pub fn is_excluded(&self, column: &str, value: &CellValue) -> Result<bool> {
        let col = self.column_position(column)?;
        Ok(self.excluded[col].contains(&value.key()))
    }

    /// Returns the number of excluded values in `column`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] if `column` is not in the table.
    pub fn excluded_count(&self, column: &str) -> Result<usize> {
        let col = self.column_position(column)?;
        Ok(self.excluded[col].len())
    }

    /// Returns `true` if any column has an exclusion.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.excluded.iter().any(|set| !set.is_empty())
    }

    /// Returns whether the row at `row` passes every column filter.
    #[must_use]
    pub fn is_row_active(&self, row: usize) -> bool {
        self.hits.get(row).is_some_and(|&h| h == 0)
    }

    /// Returns the positions of active rows in table order.
    #[must_use]
    pub fn active_rows(&self) -> Vec<usize> {
        self.hits
            .iter()
            .enumerate()
            .filter_map(|(row, &h)| (h == 0).then_some(row))
            .collect()
    }

    /// Returns the number of active rows.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h == 0).count()
    }
}

// =============================================================================
// Filter Menu
// =============================================================================

/// One entry of a column filter menu.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMenuEntry {
    /// The cell value this entry toggles.
    pub value: CellValue,
    /// Shortened display text.
    pub label: String,
    /// Whether the value is currently included (checkbox state).
    pub included: bool,
}

/// Returns the distinct non-empty values of `column`, sorted by their text
/// form, at most `limit` of them.
///
/// # Errors
///
/// Returns [`Error::InvalidColumn`] if `column` is not in the table.
pub fn distinct_values(table: &Table, column: &str, limit: usize) -> Result<Vec<CellValue>> {
    let col = table
        .column_index(column)
        .ok_or_else(|| Error::InvalidColumn(column.to_string()))?;

    let mut seen: HashSet<CellKey> = HashSet::new();
    let mut values: Vec<CellValue> = table
        .column_values(col)
        .filter(|cell| !cell.is_empty())
        .filter(|cell| seen.insert(cell.key()))
        .cloned()
        .collect();
    values.sort_by_cached_key(ToString::to_string);
    values.truncate(limit);
    Ok(values)
}

/// Builds the filter menu for `column`: up to [`FILTER_MENU_LIMIT`] values
/// with their current inclusion state.
///
/// # Errors
///
/// Returns [`Error::InvalidColumn`] if `column` is not in the table.
pub fn filter_menu(table: &Table, store: &FilterStore, column: &str) -> Result<Vec<FilterMenuEntry>> {
    distinct_values(table, column, FILTER_MENU_LIMIT)?
        .into_iter()
        .map(|value| {
            let included = !store.is_excluded(column, &value)?;
            Ok(FilterMenuEntry {
                label: value.to_string().chars().take(FILTER_LABEL_MAX_CHARS).collect(),
                value,
                included,
            })
        })
        .collect()
}
