// SPDX-License-Identifier: MPL-2.0
//! Rasterizes a laid-out word cloud and packages the result.

use crate::cloud::font::GlyphSource;
use crate::cloud::layout::{layout, LayoutOptions, PlacedWord};
use crate::cloud::mask::{self, Canvas, Mask};
use crate::cloud::palette::ColorScheme;
use crate::domain::{FrequencyMap, ShapeSpec};
use crate::error::{RenderError, Result};
use chrono::{DateTime, Local};
use image_rs::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// White.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Options controlling how a cloud is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub color_scheme: ColorScheme,
    /// Seed for placement, orientation and colors.
    pub seed: u64,
    pub layout: LayoutOptions,
    pub background: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::default(),
            seed: 0,
            layout: LayoutOptions::default(),
            background: BACKGROUND,
        }
    }
}

/// Output of [`render`].
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbImage,
    pub placed: Vec<PlacedWord>,
}

/// Draws `frequencies` into a `width × height` image.
///
/// With a mask, words only cover paintable pixels. An empty map yields a
/// background-only image.
///
/// # Errors
///
/// - [`RenderError::InvalidGeometry`] if either dimension is zero.
/// - [`RenderError::MaskMismatch`] if the mask size differs from the canvas.
pub fn render(
    frequencies: &FrequencyMap,
    width: u32,
    height: u32,
    mask: Option<&Mask>,
    options: &RenderOptions,
    source: &GlyphSource,
) -> Result<Rendered> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidGeometry(format!(
            "canvas {}x{} has no area",
            width, height
        ))
        .into());
    }
    if let Some(mask) = mask {
        if (mask.width(), mask.height()) != (width, height) {
            return Err(RenderError::MaskMismatch {
                canvas: (width, height),
                mask: (mask.width(), mask.height()),
            }
            .into());
        }
    }

    let canvas = Canvas {
        width,
        height,
        mask: mask.cloned(),
    };
    let mut image = RgbImage::from_pixel(width, height, options.background);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let placements = layout(
        frequencies,
        &canvas,
        &options.layout,
        options.color_scheme,
        source,
        &mut rng,
    );

    let mut placed = Vec::with_capacity(placements.len());
    for placement in placements {
        let word = placement.word;
        for (gx, gy, coverage) in placement.coverage.enumerate_pixels() {
            let alpha = coverage.0[0];
            if alpha == 0 {
                continue;
            }
            let (x, y) = (word.x + gx, word.y + gy);
            if x >= width || y >= height {
                continue;
            }
            let pixel = image.get_pixel_mut(x, y);
            *pixel = blend(*pixel, word.color, alpha);
        }
        placed.push(word);
    }

    tracing::debug!(
        words = frequencies.len(),
        placed = placed.len(),
        width,
        height,
        "cloud rendered"
    );
    Ok(Rendered { image, placed })
}

#[allow(clippy::cast_possible_truncation)]
fn blend(under: Rgb<u8>, over: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = u16::from(alpha);
    let mix = |u: u8, o: u8| ((u16::from(o) * a + u16::from(u) * (255 - a) + 127) / 255) as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}

/// A generated word cloud, ready for export.
#[derive(Debug, Clone)]
pub struct CloudArtifact {
    pub image: RgbImage,
    pub frequencies: FrequencyMap,
    pub shape: ShapeSpec,
    pub created_at: DateTime<Local>,
    /// Layout record, in placement order.
    pub placed: Vec<PlacedWord>,
}

impl CloudArtifact {
    /// Builds the canvas for `shape`, renders `frequencies` onto it and
    /// stamps the result with the current local time.
    ///
    /// # Errors
    ///
    /// Propagates geometry and rendering errors.
    pub fn generate(
        frequencies: FrequencyMap,
        shape: ShapeSpec,
        options: &RenderOptions,
        source: &GlyphSource,
    ) -> Result<Self> {
        let canvas = mask::generate(&shape)?;
        let rendered = render(
            &frequencies,
            canvas.width,
            canvas.height,
            canvas.mask.as_ref(),
            options,
            source,
        )?;
        Ok(Self {
            image: rendered.image,
            frequencies,
            shape,
            created_at: Local::now(),
            placed: rendered.placed,
        })
    }

    /// Image size in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
