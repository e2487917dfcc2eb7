// SPDX-License-Identifier: MPL-2.0
//! Glyph source used to draw words and legend text.
//!
//! The preferred source is an outline font able to draw Han characters,
//! either configured explicitly or found in the usual system font
//! directories. When none is available the built-in 8×8 bitmap font is used
//! instead: ASCII renders normally, anything else renders as a placeholder
//! box, and a [`Warning::FontMissing`] is reported once.

use crate::error::{LoadError, Result, Warning};
use crate::paths;
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image_rs::{GrayImage, Luma};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Font file names known to cover Han ideographs, in order of preference.
const CJK_FONT_FILES: &[&str] = &[
    "SimHei.ttf",
    "msyh.ttc",
    "STHeiti Medium.ttc",
    "FangSong.ttf",
    "STSong.ttf",
    "SimSun.ttc",
    "PingFang.ttc",
    "Hiragino Sans GB.ttc",
    "NotoSansCJK-Regular.ttc",
    "NotoSansCJKsc-Regular.otf",
    "NotoSansSC-Regular.otf",
    "wqy-microhei.ttc",
    "wqy-zenhei.ttc",
];

/// How deep below each font directory files are looked up.
const MAX_SEARCH_DEPTH: usize = 3;

/// Bitmap glyph cell size in pixels.
const BITMAP_CELL: u32 = 8;

static FONT_WARNING_LOGGED: AtomicBool = AtomicBool::new(false);

/// Source of glyph coverage bitmaps.
pub enum GlyphSource {
    /// A TrueType/OpenType font loaded from disk.
    Outline { font: FontVec, path: PathBuf },
    /// The built-in 8×8 bitmap font (degraded mode).
    Bitmap,
}

impl fmt::Debug for GlyphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outline { path, .. } => f.debug_struct("Outline").field("path", path).finish(),
            Self::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl GlyphSource {
    /// Loads an outline font from `path`. Collections (`.ttc`) use their first face.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file is missing or is not a valid font.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()).into());
        }
        let data = fs::read(path)?;
        let font = FontVec::try_from_vec_and_index(data, 0).map_err(|e| LoadError::Unreadable {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Ok(Self::Outline {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Returns the built-in bitmap font.
    #[must_use]
    pub fn bitmap() -> Self {
        Self::Bitmap
    }

    /// Picks the best available glyph source.
    ///
    /// `configured` is tried first, then the user and system font
    /// directories from [`paths::font_search_dirs`]. When
    /// nothing usable is found the bitmap font is returned together with a
    /// [`Warning::FontMissing`]; the warning is logged only once per process.
    pub fn discover(configured: Option<&Path>) -> (Self, Option<Warning>) {
        let mut searched = Vec::new();

        if let Some(path) = configured {
            searched.push(path.to_path_buf());
            match Self::from_path(path) {
                Ok(source) => {
                    tracing::debug!(path = %path.display(), "using configured font");
                    return (source, None);
                }
                Err(err) => tracing::warn!(path = %path.display(), %err, "configured font unusable"),
            }
        }

        for dir in paths::font_search_dirs() {
            searched.push(dir.clone());
            for name in CJK_FONT_FILES {
                if let Some(path) = find_file(&dir, name, MAX_SEARCH_DEPTH) {
                    if let Ok(source) = Self::from_path(&path) {
                        tracing::debug!(path = %path.display(), "using system font");
                        return (source, None);
                    }
                }
            }
        }

        let warning = Warning::FontMissing { searched };
        if !FONT_WARNING_LOGGED.swap(true, Ordering::Relaxed) {
            tracing::warn!("{}", warning);
        }
        (Self::Bitmap, Some(warning))
    }

    /// Returns `true` when running on the bitmap fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Bitmap)
    }

    /// Returns the font file in use, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Outline { path, .. } => Some(path),
            Self::Bitmap => None,
        }
    }

    /// Renders `text` on one line at `size` pixels and returns its coverage
    /// bitmap (0 = empty, 255 = fully covered), cropped to the line box.
    #[must_use]
    pub fn rasterize(&self, text: &str, size: f32) -> GrayImage {
        let size = size.max(1.0);
        match self {
            Self::Outline { font, .. } => rasterize_outline(font, text, size),
            Self::Bitmap => rasterize_bitmap(text, size),
        }
    }
}

fn find_file(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if candidate.is_file() {
        return Some(candidate);
    }
    if depth == 0 {
        return None;
    }
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .find_map(|sub| find_file(&sub, name, depth - 1))
}

/// First font under the search directories that has a glyph for `H`.
#[cfg(test)]
pub(crate) fn any_outline_font() -> Option<GlyphSource> {
    paths::font_search_dirs()
        .iter()
        .find_map(|dir| first_outline_font_in(dir, MAX_SEARCH_DEPTH))
}

#[cfg(test)]
fn first_outline_font_in(dir: &Path, depth: usize) -> Option<GlyphSource> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let is_font = |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "ttf" | "otf" | "ttc"))
    };
    let found = entries
        .iter()
        .filter(|path| path.is_file() && is_font(path))
        .filter_map(|path| GlyphSource::from_path(path).ok())
        .find(|source| match source {
            GlyphSource::Outline { font, .. } => font.glyph_id('H').0 != 0,
            GlyphSource::Bitmap => false,
        });
    if found.is_some() || depth == 0 {
        return found;
    }
    entries
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|sub| first_outline_font_in(sub, depth - 1))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn rasterize_outline(font: &FontVec, text: &str, size: f32) -> GrayImage {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();

    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, ascent)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let width = caret.ceil().max(1.0) as u32;
    let height = (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32;
    let mut image = GrayImage::new(width, height);

    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            let px = bounds.min.x as i32 + x as i32;
            let py = bounds.min.y as i32 + y as i32;
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            pixel.0[0] = pixel.0[0].max(value);
        });
    }
    image
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize_bitmap(text: &str, size: f32) -> GrayImage {
    let factor = ((size / BITMAP_CELL as f32).round() as u32).max(1);
    let cell = BITMAP_CELL * factor;
    let chars = text.chars().count().max(1) as u32;
    let mut image = GrayImage::new(cell * chars, cell);

    for (index, ch) in text.chars().enumerate() {
        let origin_x = index as u32 * cell;
        let glyph = BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch));
        match glyph {
            Some(rows) => {
                for (row_idx, bits) in rows.iter().enumerate() {
                    for col_idx in 0..BITMAP_CELL {
                        if (bits >> col_idx) & 1 == 0 {
                            continue;
                        }
                        for sy in 0..factor {
                            for sx in 0..factor {
                                image.put_pixel(
                                    origin_x + col_idx * factor + sx,
                                    row_idx as u32 * factor + sy,
                                    Luma([255]),
                                );
                            }
                        }
                    }
                }
            }
            None => draw_placeholder(&mut image, origin_x, cell, factor),
        }
    }
    image
}

/// Draws a hollow box filling one glyph cell, inset by one bitmap pixel.
fn draw_placeholder(image: &mut GrayImage, origin_x: u32, cell: u32, factor: u32) {
    let start = factor;
    let end = cell - factor;
    for y in start..end {
        for x in start..end {
            let on_edge = x < start + factor || x >= end - factor || y < start + factor || y >= end - factor;
            if on_edge {
                image.put_pixel(origin_x + x, y, Luma([255]));
            }
        }
    }
}
