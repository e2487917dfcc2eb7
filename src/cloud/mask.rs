// SPDX-License-Identifier: MPL-2.0
//! Canvas and paintable-region mask generation.
//!
//! Squares and rectangles paint the whole canvas and carry no mask. A circle
//! of radius `r` gets a `2r × 2r` canvas and a filled disk mask rasterized
//! with `tiny-skia` (no anti-aliasing, so a pixel is paintable when its
//! center lies inside the disk).

use crate::config::MAX_CANVAS_DIMENSION;
use crate::domain::ShapeSpec;
use crate::error::{RenderError, Result};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Binary per-pixel paintable map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    paintable: Vec<bool>,
}

impl Mask {
    /// Builds a mask from row-major paintable flags.
    ///
    /// Returns `None` when `paintable.len() != width * height`.
    #[must_use]
    pub fn from_flags(width: u32, height: u32, paintable: Vec<bool>) -> Option<Self> {
        (paintable.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            paintable,
        })
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether words may cover (`x`, `y`). Out-of-bounds is not paintable.
    #[must_use]
    pub fn is_paintable(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.paintable[(y * self.width + x) as usize]
    }

    /// Returns the number of paintable pixels.
    #[must_use]
    pub fn paintable_count(&self) -> usize {
        self.paintable.iter().filter(|&&p| p).count()
    }

    /// Row-major paintable flags.
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.paintable
    }
}

/// Canvas geometry produced from a [`ShapeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub mask: Option<Mask>,
}

fn check_dimension(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(RenderError::InvalidGeometry(format!("{} must be positive", name)).into());
    }
    if value > MAX_CANVAS_DIMENSION {
        return Err(RenderError::InvalidGeometry(format!(
            "{} {} exceeds the {} pixel limit",
            name, value, MAX_CANVAS_DIMENSION
        ))
        .into());
    }
    Ok(())
}

/// Returns the canvas size and optional mask for `spec`.
///
/// # Errors
///
/// Returns [`RenderError::InvalidGeometry`] if any dimension is zero or
/// exceeds [`MAX_CANVAS_DIMENSION`].
pub fn generate(spec: &ShapeSpec) -> Result<Canvas> {
    match *spec {
        ShapeSpec::Square { side } => {
            check_dimension("side", side)?;
            Ok(Canvas {
                width: side,
                height: side,
                mask: None,
            })
        }
        ShapeSpec::Rectangle { width, height } => {
            check_dimension("width", width)?;
            check_dimension("height", height)?;
            Ok(Canvas {
                width,
                height,
                mask: None,
            })
        }
        ShapeSpec::Circle { radius } => {
            check_dimension("radius", radius)?;
            let (size, _) = spec.canvas_size();
            check_dimension("diameter", size)?;
            let mask = circle_mask(radius)?;
            Ok(Canvas {
                width: size,
                height: size,
                mask: Some(mask),
            })
        }
    }
}

/// Rasterizes a filled disk of `radius` centered in a `2r × 2r` mask.
fn circle_mask(radius: u32) -> Result<Mask> {
    let size = radius * 2;
    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| RenderError::InvalidGeometry(format!("cannot allocate {0}x{0} mask", size)))?;

    #[allow(clippy::cast_precision_loss)]
    let r = radius as f32;
    let path = PathBuilder::from_circle(r, r, r)
        .ok_or_else(|| RenderError::InvalidGeometry(format!("invalid radius {}", radius)))?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = false;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    let paintable = pixmap.pixels().iter().map(|p| p.alpha() > 0).collect();
    Ok(Mask {
        width: size,
        height: size,
        paintable,
    })
}
