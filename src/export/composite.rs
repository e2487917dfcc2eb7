// SPDX-License-Identifier: MPL-2.0
//! Composite export: cloud and legend side by side, written atomically.

use crate::cloud::{CloudArtifact, GlyphSource};
use crate::config::{DEFAULT_JPEG_QUALITY, LEGEND_TOP_WORDS};
use crate::error::{Error, ExportError, Result};
use crate::export::legend::render_legend;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::imageops::{self, FilterType};
use image_rs::{ImageFormat, RgbImage};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Lossless.
    #[default]
    Png,
    /// Lossy, quality from [`ExportOptions::jpeg_quality`].
    Jpeg,
}

impl ExportFormat {
    /// Canonical file extension.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Detects format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }

    /// Detects format from a file path extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<ExportFormat> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ExportError::UnsupportedFormat(ext.to_string()).into())
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub jpeg_quality: u8,
    pub legend_top_words: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            legend_top_words: LEGEND_TOP_WORDS,
        }
    }
}

/// Places `cloud` and `legend` side by side.
///
/// The shorter image is stretched vertically to the taller one's height;
/// widths are kept.
#[must_use]
pub fn composite(cloud: &RgbImage, legend: &RgbImage) -> RgbImage {
    let height = cloud.height().max(legend.height());
    let fit = |image: &RgbImage| {
        if image.height() == height {
            image.clone()
        } else {
            imageops::resize(image, image.width(), height, FilterType::Lanczos3)
        }
    };
    let left = fit(cloud);
    let right = fit(legend);

    let mut out = RgbImage::new(left.width() + right.width(), height);
    imageops::replace(&mut out, &left, 0, 0);
    imageops::replace(&mut out, &right, i64::from(left.width()), 0);
    out
}

/// Directory that will hold `path`.
fn destination_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Checks that the directory holding `path` exists.
fn check_writable(path: &Path) -> Result<()> {
    let dir = destination_dir(path);
    let is_dir = fs::metadata(dir).map(|meta| meta.is_dir()).unwrap_or(false);
    if is_dir {
        Ok(())
    } else {
        Err(ExportError::Unwritable(dir.to_path_buf()).into())
    }
}

/// Maps a failure to create a file in `dir` to an export error.
fn creation_error(err: &io::Error, dir: &Path) -> Error {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem | io::ErrorKind::NotFound => {
            ExportError::Unwritable(dir.to_path_buf()).into()
        }
        _ => ExportError::Encode(err.to_string()).into(),
    }
}

/// Creates a uniquely named hidden sibling of `path` to encode into.
///
/// The file is removed when dropped unless it is persisted.
fn create_temp(path: &Path) -> Result<NamedTempFile> {
    let dir = destination_dir(path);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| creation_error(&e, dir))
}

fn encode(image: &RgbImage, format: ExportFormat, quality: u8, file: &mut File) -> std::result::Result<(), String> {
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Png => image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| e.to_string())?,
        ExportFormat::Jpeg => JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100))
            .encode_image(image)
            .map_err(|e| e.to_string())?,
    }
    writer.flush().map_err(|e| e.to_string())
}

/// Writes the cloud of `artifact` with its legend to `path`.
///
/// The format comes from the extension. The image is encoded into a
/// uniquely named temporary sibling and renamed into place, so `path` is
/// either fully written or left untouched. Other files in the directory are
/// never touched.
///
/// # Errors
///
/// Checked in this order, before anything is encoded:
/// - [`ExportError::NoArtifact`] when `artifact` is `None`
/// - [`ExportError::UnsupportedFormat`] for extensions other than png/jpg/jpeg
/// - [`ExportError::Unwritable`] when the destination directory is missing or
///   the current user cannot create files in it
///
/// Then [`ExportError::Encode`] if encoding or the rename fails.
pub fn save_composite(
    artifact: Option<&CloudArtifact>,
    path: &Path,
    options: &ExportOptions,
    source: &GlyphSource,
) -> Result<()> {
    let artifact = artifact.ok_or(ExportError::NoArtifact)?;
    let format = ExportFormat::from_path(path)?;
    check_writable(path)?;
    let mut temp = create_temp(path)?;

    let legend = render_legend(artifact, options.legend_top_words, source);
    let image = composite(&artifact.image, &legend);

    encode(&image, format, options.jpeg_quality, temp.as_file_mut()).map_err(ExportError::Encode)?;
    temp.persist(path).map_err(|e| ExportError::Encode(e.error.to_string()))?;

    tracing::info!(
        path = %path.display(),
        format = format.extension(),
        width = image.width(),
        height = image.height(),
        "composite exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgb;

    fn sample_artifact() -> CloudArtifact {
        let mut frequencies = crate::domain::FrequencyMap::new();
        frequencies.add("word", 3);
        CloudArtifact {
            image: RgbImage::from_pixel(40, 40, Rgb([255, 255, 255])),
            frequencies,
            shape: crate::domain::ShapeSpec::Square { side: 40 },
            created_at: chrono::Local::now(),
            placed: Vec::new(),
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("failed to read dir")
            .map(|entry| entry.expect("bad entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_extension("jpeg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("Jpg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("webp"), None);
    }

    #[test]
    fn format_from_path_rejects_unknown() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.bmp")),
            Err(Error::Export(ExportError::UnsupportedFormat("bmp".into())))
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out")),
            Err(Error::Export(ExportError::UnsupportedFormat(String::new())))
        );
    }

    #[test]
    fn composite_stretches_shorter_side() {
        let cloud = RgbImage::from_pixel(30, 40, Rgb([255, 0, 0]));
        let legend = RgbImage::from_pixel(10, 20, Rgb([0, 0, 255]));
        let out = composite(&cloud, &legend);
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(35, 39), Rgb([0, 0, 255]));
    }

    #[test]
    fn composite_of_equal_heights_is_concatenation() {
        let cloud = RgbImage::from_pixel(5, 8, Rgb([1, 2, 3]));
        let legend = RgbImage::from_pixel(7, 8, Rgb([4, 5, 6]));
        let out = composite(&cloud, &legend);
        assert_eq!(out.dimensions(), (12, 8));
        assert_eq!(*out.get_pixel(4, 7), Rgb([1, 2, 3]));
        assert_eq!(*out.get_pixel(5, 0), Rgb([4, 5, 6]));
    }

    #[test]
    fn temp_file_is_a_hidden_sibling() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("out.png");
        let temp = create_temp(&path).expect("failed to create temp file");
        assert_eq!(temp.path().parent(), Some(dir.path()));
        let name = temp.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".out.png."));
        assert!(name.ends_with(".tmp"));
        drop(temp);
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn existing_tmp_named_file_is_left_alone() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let unrelated = dir.path().join("out.png.tmp");
        fs::write(&unrelated, b"keep me").expect("failed to write file");

        let path = dir.path().join("out.png");
        save_composite(
            Some(&sample_artifact()),
            &path,
            &ExportOptions::default(),
            &GlyphSource::bitmap(),
        )
        .expect("export failed");

        assert_eq!(fs::read(&unrelated).expect("file vanished"), b"keep me");
        assert_eq!(entries(dir.path()), vec!["out.png", "out.png.tmp"]);
        assert!(image_rs::open(&path).is_ok());
    }

    #[test]
    fn permission_errors_mean_unwritable() {
        let dir = Path::new("/srv/locked");
        for kind in [io::ErrorKind::PermissionDenied, io::ErrorKind::ReadOnlyFilesystem] {
            assert_eq!(
                creation_error(&io::Error::from(kind), dir),
                Error::Export(ExportError::Unwritable(dir.to_path_buf()))
            );
        }
        assert!(matches!(
            creation_error(&io::Error::other("disk on fire"), dir),
            Error::Export(ExportError::Encode(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn directory_without_write_permission_is_unwritable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).expect("failed to create dir");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).expect("failed to chmod");

        // Privileged users bypass directory permissions
        let bypass = locked.join("check");
        if File::create(&bypass).is_ok() {
            let _ = fs::remove_file(&bypass);
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("failed to chmod");
            return;
        }

        let result = save_composite(
            Some(&sample_artifact()),
            &locked.join("out.png"),
            &ExportOptions::default(),
            &GlyphSource::bitmap(),
        );
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("failed to chmod");

        assert_eq!(result, Err(Error::Export(ExportError::Unwritable(locked.clone()))));
        assert!(entries(&locked).is_empty());
    }

    #[test]
    fn missing_directory_is_unwritable() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("missing").join("out.png");
        assert_eq!(
            check_writable(&path),
            Err(Error::Export(ExportError::Unwritable(dir.path().join("missing"))))
        );
    }

    #[test]
    fn no_artifact_is_reported_first() {
        let result = save_composite(
            None,
            Path::new("/no/such/dir/out.bmp"),
            &ExportOptions::default(),
            &GlyphSource::bitmap(),
        );
        assert_eq!(result, Err(Error::Export(ExportError::NoArtifact)));
    }
}
