// SPDX-License-Identifier: MPL-2.0
//! Session state and the commands a front end drives.
//!
//! A [`Session`] owns the loaded table, its filter state, the tokenizer and
//! the glyph source. Every user action maps to one method here, and each
//! method either fully succeeds or leaves the session as it was.

use crate::cloud::{CloudArtifact, ColorScheme, GlyphSource, LayoutOptions, RenderOptions};
use crate::config::{Config, DEFAULT_HEIGHT, DEFAULT_RADIUS, DEFAULT_WIDTH};
use crate::data::{filter_menu, load_table, sheet_names, FilterMenuEntry, FilterStore};
use crate::domain::{CellValue, FrequencyMap, ShapeSpec, Table};
use crate::error::{Error, LoadError, Result, Warning};
use crate::text::{aggregate, Tokenizer};
use std::path::{Path, PathBuf};

/// Everything needed to generate one cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Text column to count.
    pub column: String,
    pub shape: ShapeSpec,
    pub color_scheme: ColorScheme,
    /// Fixed seed, or `None` for a fresh one.
    pub seed: Option<u64>,
    pub layout: LayoutOptions,
}

impl GenerateRequest {
    /// Builds a request for `column` from the `[cloud]` settings.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownColorScheme`](crate::error::RenderError::UnknownColorScheme)
    /// if the configured scheme name is not recognized.
    pub fn from_config(column: &str, config: &Config) -> Result<Self> {
        let cloud = &config.cloud;
        let color_scheme = match &cloud.color_scheme {
            Some(name) => name.parse::<ColorScheme>()?,
            None => ColorScheme::default(),
        };
        let shape = ShapeSpec::from_settings(
            cloud.shape,
            cloud.width.unwrap_or(DEFAULT_WIDTH),
            cloud.height.unwrap_or(DEFAULT_HEIGHT),
            cloud.radius.unwrap_or(DEFAULT_RADIUS),
        );
        let mut layout = LayoutOptions::default();
        if let Some(max_words) = cloud.max_words {
            layout.max_words = max_words;
        }
        Ok(Self {
            column: column.to_string(),
            shape,
            color_scheme,
            seed: cloud.seed,
            layout,
        })
    }
}

/// Where the current table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Source {
    path: PathBuf,
    sheets: Vec<String>,
    sheet: String,
}

/// The loaded table and everything derived from it.
#[derive(Debug)]
pub struct Session {
    source: Option<Source>,
    table: Table,
    filters: FilterStore,
    tokenizer: Tokenizer,
    glyphs: GlyphSource,
    warning: Option<Warning>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new(tokenizer: Tokenizer, glyphs: GlyphSource) -> Self {
        let table = Table::default();
        let filters = FilterStore::new(&table);
        Self {
            source: None,
            table,
            filters,
            tokenizer,
            glyphs,
            warning: None,
        }
    }

    /// Creates an empty session using the `[text]` and `[font]` settings.
    ///
    /// Font discovery never fails; a missing CJK font is reported through
    /// [`Session::warning`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let tokenizer = Tokenizer::new()
            .with_stopwords(config.text.stopwords.iter())
            .with_user_words(config.text.user_words.iter());
        let (glyphs, warning) = GlyphSource::discover(config.font.path.as_deref());
        let mut session = Self::new(tokenizer, glyphs);
        session.warning = warning;
        session
    }

    /// Non-fatal condition raised while setting up the session.
    #[must_use]
    pub fn warning(&self) -> Option<&Warning> {
        self.warning.as_ref()
    }

    /// Glyph source used for rendering and export.
    #[must_use]
    pub fn glyphs(&self) -> &GlyphSource {
        &self.glyphs
    }

    /// Opens `path` and loads its first sheet.
    ///
    /// Returns the sheet names. On failure the previous table, filters and
    /// file stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file is missing, unreadable or has no sheets.
    pub fn load(&mut self, path: &Path) -> Result<&[String]> {
        let sheets = sheet_names(path)?;
        let first = sheets
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Empty(path.display().to_string()))?;
        let table = load_table(path, &first)?;

        tracing::info!(
            path = %path.display(),
            sheet = %first,
            rows = table.row_count(),
            columns = table.columns().len(),
            "table loaded"
        );
        self.replace_table(table);
        let source = self.source.insert(Source {
            path: path.to_path_buf(),
            sheets,
            sheet: first,
        });
        Ok(&source.sheets)
    }

    /// Switches to another sheet of the current file, resetting filters.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SheetNotFound`] if no file is open or the sheet
    /// does not exist. The current sheet stays loaded in that case.
    pub fn select_sheet(&mut self, sheet: &str) -> Result<()> {
        let Some(source) = &self.source else {
            return Err(LoadError::SheetNotFound(sheet.to_string()).into());
        };
        if !source.sheets.iter().any(|s| s == sheet) {
            return Err(LoadError::SheetNotFound(sheet.to_string()).into());
        }
        let table = load_table(&source.path, sheet)?;

        tracing::info!(sheet, rows = table.row_count(), "sheet selected");
        self.replace_table(table);
        if let Some(source) = &mut self.source {
            source.sheet = sheet.to_string();
        }
        Ok(())
    }

    fn replace_table(&mut self, table: Table) {
        self.filters = FilterStore::new(&table);
        self.table = table;
    }

    /// Path of the open file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(|s| s.path.as_path())
    }

    /// Sheet names of the open file.
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        self.source.as_ref().map(|s| s.sheets.as_slice()).unwrap_or(&[])
    }

    /// Name of the loaded sheet.
    #[must_use]
    pub fn current_sheet(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.sheet.as_str())
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    /// Excludes `value` in `column`, or re-includes it if already excluded.
    /// Returns `true` when the value is excluded afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] for unknown columns.
    pub fn toggle_filter(&mut self, column: &str, value: &CellValue) -> Result<bool> {
        let excluded = self.filters.toggle(column, value)?;
        tracing::debug!(
            column,
            value = %value,
            excluded,
            active = self.filters.active_count(),
            "filter toggled"
        );
        Ok(excluded)
    }

    /// Clears the exclusions of one column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] for unknown columns.
    pub fn reset_filter(&mut self, column: &str) -> Result<()> {
        self.filters.reset(column)?;
        tracing::debug!(column, active = self.filters.active_count(), "filter reset");
        Ok(())
    }

    /// Filter menu entries for `column`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] for unknown columns.
    pub fn filter_menu(&self, column: &str) -> Result<Vec<FilterMenuEntry>> {
        filter_menu(&self.table, &self.filters, column)
    }

    /// Rows passing every filter, in table order.
    #[must_use]
    pub fn active_rows(&self) -> Vec<usize> {
        self.filters.active_rows()
    }

    /// Counts the tokens of `column` over the active rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] for unknown columns.
    pub fn frequencies(&self, column: &str) -> Result<FrequencyMap> {
        aggregate(&self.table, &self.active_rows(), column, &self.tokenizer)
    }

    /// Generates a cloud from the active rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumn`] before any work if the column is
    /// unknown, then any geometry or rendering error.
    pub fn generate(&self, request: &GenerateRequest) -> Result<CloudArtifact> {
        if self.table.column_index(&request.column).is_none() {
            return Err(Error::InvalidColumn(request.column.clone()));
        }
        let frequencies = self.frequencies(&request.column)?;
        let seed = request.seed.unwrap_or_else(rand::random);

        tracing::info!(
            column = %request.column,
            rows = self.filters.active_count(),
            tokens = frequencies.len(),
            shape = %request.shape,
            scheme = %request.color_scheme,
            seed,
            "generating word cloud"
        );

        let options = RenderOptions {
            color_scheme: request.color_scheme,
            seed,
            layout: request.layout,
            ..RenderOptions::default()
        };
        CloudArtifact::generate(frequencies, request.shape, &options, &self.glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn session() -> Session {
        Session::new(Tokenizer::new(), GlyphSource::bitmap())
    }

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).expect("failed to write csv");
        path
    }

    fn request(column: &str) -> GenerateRequest {
        GenerateRequest {
            column: column.to_string(),
            shape: ShapeSpec::Square { side: 200 },
            color_scheme: ColorScheme::Viridis,
            seed: Some(1),
            layout: LayoutOptions::default(),
        }
    }

    #[test]
    fn load_selects_first_sheet_and_resets_filters() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = write_csv(dir.path(), "reviews.csv", "comment,region\ngood,north\nbad,south\n");

        let mut session = session();
        let sheets = session.load(&path).unwrap().to_vec();
        assert_eq!(sheets, vec!["reviews".to_string()]);
        assert_eq!(session.current_sheet(), Some("reviews"));
        assert_eq!(session.columns(), ["comment", "region"]);

        session
            .toggle_filter("region", &CellValue::from("north"))
            .unwrap();
        assert_eq!(session.active_rows(), vec![1]);

        session.load(&path).unwrap();
        assert_eq!(session.active_rows(), vec![0, 1]);
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = write_csv(dir.path(), "a.csv", "comment\nhello\n");

        let mut session = session();
        session.load(&path).unwrap();
        let result = session.load(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(Error::Load(LoadError::NotFound(_)))));
        assert_eq!(session.path(), Some(path.as_path()));
        assert_eq!(session.table().row_count(), 1);
    }

    #[test]
    fn select_unknown_sheet_is_rejected() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = write_csv(dir.path(), "a.csv", "comment\nhello\n");

        let mut session = session();
        assert_eq!(
            session.select_sheet("a"),
            Err(Error::Load(LoadError::SheetNotFound("a".into())))
        );
        session.load(&path).unwrap();
        assert_eq!(
            session.select_sheet("Sheet2"),
            Err(Error::Load(LoadError::SheetNotFound("Sheet2".into())))
        );
        assert!(session.select_sheet("a").is_ok());
    }

    #[test]
    fn generate_checks_column_first() {
        let session = session();
        assert_eq!(
            session.generate(&request("comment")).map(|a| a.dimensions()),
            Err(Error::InvalidColumn("comment".into()))
        );
    }

    #[test]
    fn generate_counts_only_active_rows() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = write_csv(
            dir.path(),
            "a.csv",
            "comment,region\nbad bad,north\ngood,south\n",
        );
        let mut session = session();
        session.load(&path).unwrap();
        session
            .toggle_filter("region", &CellValue::from("north"))
            .unwrap();

        let artifact = session.generate(&request("comment")).unwrap();
        assert_eq!(artifact.frequencies.get("bad"), None);
        assert_eq!(artifact.frequencies.get("good"), Some(1));
        assert_eq!(artifact.dimensions(), (200, 200));
    }

    #[test]
    fn request_from_config_uses_cloud_section() {
        let mut config = Config::default();
        config.cloud.color_scheme = Some("Plasma".into());
        config.cloud.seed = Some(5);
        config.cloud.max_words = Some(10);

        let request = GenerateRequest::from_config("comment", &config).unwrap();
        assert_eq!(request.color_scheme, ColorScheme::Plasma);
        assert_eq!(request.seed, Some(5));
        assert_eq!(request.layout.max_words, 10);
        assert_eq!(
            request.shape,
            ShapeSpec::Rectangle {
                width: 1920,
                height: 1080
            }
        );

        config.cloud.color_scheme = Some("rainbow".into());
        assert!(GenerateRequest::from_config("comment", &config).is_err());
    }
}
