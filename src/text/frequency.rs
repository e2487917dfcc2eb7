// SPDX-License-Identifier: MPL-2.0
//! Word frequency aggregation over the active rows of one column.

use crate::domain::{FrequencyMap, Table};
use crate::error::{Error, Result};
use crate::text::Tokenizer;

/// Counts the tokens of `column` across `rows`.
///
/// `rows` are row positions into `table`; positions past the end are skipped.
/// The result does not depend on the order of `rows`.
///
/// # Errors
///
/// Returns [`Error::InvalidColumn`] if `column` is not in the table. No
/// partial map is produced in that case.
pub fn aggregate(
    table: &Table,
    rows: &[usize],
    column: &str,
    tokenizer: &Tokenizer,
) -> Result<FrequencyMap> {
    let col = table
        .column_index(column)
        .ok_or_else(|| Error::InvalidColumn(column.to_string()))?;

    let mut frequencies = FrequencyMap::new();
    for &row in rows {
        if let Some(cell) = table.cell(row, col) {
            for token in tokenizer.tokenize(cell) {
                frequencies.increment(&token);
            }
        }
    }
    Ok(frequencies)
}
