// SPDX-License-Identifier: MPL-2.0
//! Table loading from spreadsheet workbooks and CSV files.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! `calamine` and keep each cell's own type. CSV files expose a single sheet
//! named after the file stem, and each column is typed as a whole: numeric
//! when every non-empty cell parses as a number, text otherwise.
//!
//! The first row of a sheet is the header. Blank headers become
//! `Unnamed: <index>` and repeated headers get `.1`, `.2`, ... suffixes so
//! every column name is unique.

use crate::domain::{CellValue, Table};
use crate::error::{LoadError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashSet;
use std::path::Path;

/// Spreadsheet formats accepted by [`load_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Detects the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// File extensions accepted by the loader, for open dialogs.
pub const TABLE_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

fn detect_format(path: &Path) -> Result<SourceFormat> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()).into());
    }
    SourceFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        LoadError::UnsupportedFormat(ext).into()
    })
}

fn unreadable(path: &Path, cause: impl ToString) -> LoadError {
    LoadError::Unreadable {
        path: path.to_path_buf(),
        cause: cause.to_string(),
    }
}

/// Lists the sheet names of a file, in workbook order.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, unsupported or unreadable.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    match detect_format(path)? {
        SourceFormat::Workbook => {
            let workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;
            Ok(workbook.sheet_names())
        }
        SourceFormat::Csv => Ok(vec![csv_sheet_name(path)]),
    }
}

/// Loads one sheet as a [`Table`].
///
/// # Errors
///
/// Returns [`LoadError::SheetNotFound`] if `sheet` is not in the file, and
/// other [`LoadError`] variants if the file cannot be read.
pub fn load_table(path: &Path, sheet: &str) -> Result<Table> {
    match detect_format(path)? {
        SourceFormat::Workbook => load_workbook_sheet(path, sheet),
        SourceFormat::Csv => {
            if sheet != csv_sheet_name(path) {
                return Err(LoadError::SheetNotFound(sheet.to_string()).into());
            }
            load_csv(path, sheet)
        }
    }
}

// =============================================================================
// Workbooks
// =============================================================================

fn load_workbook_sheet(path: &Path, sheet: &str) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(LoadError::SheetNotFound(sheet.to_string()).into());
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| unreadable(path, e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::Empty(sheet.to_string()))?;
    let columns = unique_headers(header.iter().map(cell_from_data));
    let body = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(Table::new(columns, body))
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        // Spreadsheet integers fit f64 exactly up to 2^53
        #[allow(clippy::cast_precision_loss)]
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::from(*value),
        Data::String(text) => CellValue::from(text.as_str()),
        Data::Bool(value) => CellValue::Text(value.to_string()),
        other => CellValue::from(other.to_string().as_str()),
    }
}

// =============================================================================
// CSV
// =============================================================================

fn csv_sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

fn load_csv(path: &Path, sheet: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| unreadable(path, e))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| unreadable(path, e))?
        .iter()
        .map(String::from)
        .collect();
    if header.is_empty() {
        return Err(LoadError::Empty(sheet.to_string()).into());
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| unreadable(path, e))?;
        raw_rows.push(record.iter().map(String::from).collect());
    }

    let numeric_columns: Vec<bool> = (0..header.len())
        .map(|col| {
            raw_rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|field| !field.trim().is_empty())
                .all(|field| field.trim().parse::<f64>().is_ok())
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, field)| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else if numeric_columns.get(col).copied().unwrap_or(false) {
                        field
                            .trim()
                            .parse::<f64>()
                            .map_or(CellValue::Text(field.clone()), CellValue::from)
                    } else {
                        CellValue::Text(field)
                    }
                })
                .collect()
        })
        .collect();

    let columns = unique_headers(header.iter().map(|h| CellValue::from(h.as_str())));
    Ok(Table::new(columns, rows))
}

// =============================================================================
// Headers
// =============================================================================

fn unique_headers<I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = CellValue>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();
    for (index, cell) in cells.into_iter().enumerate() {
        let base = cell
            .as_text()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format!("Unnamed: {}", index));
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }
    columns
}
