// SPDX-License-Identifier: MPL-2.0
//! Tabular data types for the domain layer.
//!
//! A [`Table`] is an ordered list of rows sharing one header. Each cell is a
//! tagged [`CellValue`] so consumers dispatch on the cell kind explicitly
//! instead of converting everything to strings up front.

use std::fmt;

// =============================================================================
// Cell Value
// =============================================================================

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text content, kept exactly as loaded.
    Text(String),
    /// Numeric content. Integers are stored as whole floats.
    Number(f64),
    /// Missing or blank cell.
    Empty,
}

impl CellValue {
    /// Returns `true` for [`CellValue::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the text form used for tokenizing and display.
    ///
    /// Whole numbers print without a fractional part (`3.0` → `"3"`).
    /// Empty cells return `None`.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(value) => Some(format_number(*value)),
            Self::Empty => None,
        }
    }

    /// Returns a hashable key identifying this value for filtering.
    #[must_use]
    pub fn key(&self) -> CellKey {
        match self {
            Self::Text(text) => CellKey::Text(text.clone()),
            // Fold -0.0 into 0.0 so both compare equal as keys
            Self::Number(value) if *value == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Self::Number(value) => CellKey::Number(value.to_bits()),
            Self::Empty => CellKey::Empty,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{}", text),
            Self::Number(value) => write!(f, "{}", format_number(*value)),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Empty
        } else {
            Self::Number(value)
        }
    }
}

/// Hashable identity of a [`CellValue`].
///
/// Numbers are keyed by their bit pattern, so `1.0` and `1.5` are distinct
/// and `NaN` never reaches this type (it loads as [`CellValue::Empty`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Text(String),
    Number(u64),
    Empty,
}

// i64 covers every whole number a spreadsheet cell realistically holds
#[allow(clippy::cast_possible_truncation)]
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Table
// =============================================================================

/// An immutable, row-ordered table with a header row.
///
/// Every row has exactly `columns().len()` cells; short rows are padded with
/// [`CellValue::Empty`] at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates a table, padding or truncating rows to the header width.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Returns the column names in sheet order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of `column`, if present.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns all rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Returns the cell at (`row`, `column_index`).
    #[must_use]
    pub fn cell(&self, row: usize, column_index: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column_index))
    }

    /// Iterates over the cells of one column, top to bottom.
    pub fn column_values(&self, column_index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(CellValue::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(CellValue::Number(-12.0).to_string(), "-12");
    }

    #[test]
    fn fractional_numbers_keep_fraction() {
        assert_eq!(CellValue::Number(2.5).as_text().as_deref(), Some("2.5"));
    }

    #[test]
    fn empty_cell_has_no_text() {
        assert_eq!(CellValue::Empty.as_text(), None);
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from(f64::NAN), CellValue::Empty);
    }

    #[test]
    fn negative_zero_shares_key_with_zero() {
        assert_eq!(CellValue::Number(-0.0).key(), CellValue::Number(0.0).key());
    }

    #[test]
    fn text_and_number_keys_differ() {
        assert_ne!(
            CellValue::Text("1".into()).key(),
            CellValue::Number(1.0).key()
        );
    }

    #[test]
    fn new_pads_short_rows() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::from("x")]],
        );
        assert_eq!(table.cell(0, 1), Some(&CellValue::Empty));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn column_index_and_values() {
        let table = Table::new(
            vec!["name".into(), "score".into()],
            vec![
                vec![CellValue::from("a"), CellValue::from(1.0)],
                vec![CellValue::from("b"), CellValue::from(2.0)],
            ],
        );
        let idx = table.column_index("score").expect("score column");
        let values: Vec<_> = table.column_values(idx).cloned().collect();
        assert_eq!(values, vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        assert_eq!(table.column_index("missing"), None);
    }
}
