// SPDX-License-Identifier: MPL-2.0
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Load(LoadError),
    InvalidColumn(String),
    Render(RenderError),
    Export(ExportError),
    Io(String),
    Config(String),
}

/// Failures while reading a table from disk.
///
/// A failed load never replaces the table currently held by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The file does not exist.
    NotFound(PathBuf),

    /// The file exists but could not be opened or parsed.
    Unreadable { path: PathBuf, cause: String },

    /// The workbook has no sheet with the requested name.
    SheetNotFound(String),

    /// The extension is not a supported spreadsheet format.
    UnsupportedFormat(String),

    /// The sheet has no header row.
    Empty(String),
}

/// Failures while preparing the canvas or laying out words.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Width, height or radius is zero or does not fit the canvas.
    InvalidGeometry(String),

    /// The mask dimensions differ from the canvas dimensions.
    MaskMismatch {
        canvas: (u32, u32),
        mask: (u32, u32),
    },

    /// The color scheme name is not one of the known schemes.
    UnknownColorScheme(String),
}

/// Failures while writing the composite image.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// No cloud has been generated yet (or the last generation failed).
    NoArtifact,

    /// The destination directory is missing or read-only.
    Unwritable(PathBuf),

    /// The destination extension has no matching encoder.
    UnsupportedFormat(String),

    /// Encoding or the final rename failed.
    Encode(String),
}

/// Non-fatal conditions surfaced to the caller alongside a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// No CJK-capable font was found; Han glyphs render as placeholders.
    FontMissing { searched: Vec<PathBuf> },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "file not found: {}", path.display()),
            LoadError::Unreadable { path, cause } => {
                write!(f, "cannot read {}: {}", path.display(), cause)
            }
            LoadError::SheetNotFound(sheet) => write!(f, "sheet not found: {}", sheet),
            LoadError::UnsupportedFormat(ext) => write!(f, "unsupported file format: {}", ext),
            LoadError::Empty(sheet) => write!(f, "sheet {} has no header row", sheet),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidGeometry(msg) => write!(f, "invalid geometry: {}", msg),
            RenderError::MaskMismatch { canvas, mask } => write!(
                f,
                "mask is {}x{} but canvas is {}x{}",
                mask.0, mask.1, canvas.0, canvas.1
            ),
            RenderError::UnknownColorScheme(name) => write!(f, "unknown color scheme: {}", name),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoArtifact => write!(f, "no word cloud has been generated"),
            ExportError::Unwritable(path) => {
                write!(f, "destination is not writable: {}", path.display())
            }
            ExportError::UnsupportedFormat(ext) => write!(f, "unsupported image format: {}", ext),
            ExportError::Encode(msg) => write!(f, "failed to write image: {}", msg),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FontMissing { searched } => write!(
                f,
                "no CJK font found ({} locations searched); Han text will render as placeholders",
                searched.len()
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load(e) => write!(f, "Load Error: {}", e),
            Error::InvalidColumn(column) => write!(f, "Invalid Column: {}", column),
            Error::Render(e) => write!(f, "Render Error: {}", e),
            Error::Export(e) => write!(f, "Export Error: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err)
    }
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        Error::Export(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn invalid_column_names_the_column() {
        let err = Error::InvalidColumn("comment".into());
        assert_eq!(format!("{}", err), "Invalid Column: comment");
    }

    #[test]
    fn load_error_converts_and_keeps_cause() {
        let err: Error = LoadError::Unreadable {
            path: PathBuf::from("data.xlsx"),
            cause: "zip header".into(),
        }
        .into();
        let text = format!("{}", err);
        assert!(text.starts_with("Load Error"));
        assert!(text.contains("data.xlsx"));
        assert!(text.contains("zip header"));
    }

    #[test]
    fn mask_mismatch_reports_both_sizes() {
        let err = RenderError::MaskMismatch {
            canvas: (300, 300),
            mask: (200, 200),
        };
        assert_eq!(format!("{}", err), "mask is 200x200 but canvas is 300x300");
    }

    #[test]
    fn export_error_no_artifact_display() {
        let err: Error = ExportError::NoArtifact.into();
        assert!(matches!(err, Error::Export(ExportError::NoArtifact)));
        assert!(format!("{}", err).contains("no word cloud"));
    }

    #[test]
    fn font_missing_warning_mentions_placeholders() {
        let warning = Warning::FontMissing {
            searched: vec![PathBuf::from("/usr/share/fonts")],
        };
        assert!(format!("{}", warning).contains("placeholders"));
    }
}
