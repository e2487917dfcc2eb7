// SPDX-License-Identifier: MPL-2.0
//! Word placement.
//!
//! Words are laid out from most to least frequent. Each word gets a font size
//! derived from its frequency relative to the previous word, then a random
//! free position on an occupancy grid. Free-space queries use a summed-area
//! table so that "is this box empty" is four lookups. Pixels outside the mask
//! start out occupied, which keeps every word inside the shape.

use crate::cloud::font::GlyphSource;
use crate::cloud::mask::Canvas;
use crate::cloud::palette::ColorScheme;
use crate::config::{
    DEFAULT_MAX_WORDS, DEFAULT_PREFER_HORIZONTAL, DEFAULT_RELATIVE_SCALING, DEFAULT_WORD_MARGIN,
    FONT_STEP, MIN_FONT_SIZE,
};
use crate::domain::FrequencyMap;
use image_rs::{imageops, GrayImage, Rgb};
use rand::Rng;

/// Size used to measure the first word before scaling it to the canvas.
const MEASURE_FONT_SIZE: f32 = 64.0;

/// Shrinking never moves by less than this fraction of the current size.
const SHRINK_DIVISOR: u32 = 20;

/// Tuning for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Maximum number of words to place.
    pub max_words: usize,
    /// Words that would need a smaller font are dropped, and layout stops.
    pub min_font_size: u32,
    /// Minimum shrink applied when a word does not fit.
    pub font_step: u32,
    /// How strongly frequency ratios drive font size (0 = rank only).
    pub relative_scaling: f32,
    /// Probability of a word being horizontal.
    pub prefer_horizontal: f32,
    /// Empty pixels kept around each word.
    pub margin: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            min_font_size: MIN_FONT_SIZE,
            font_step: FONT_STEP,
            relative_scaling: DEFAULT_RELATIVE_SCALING,
            prefer_horizontal: DEFAULT_PREFER_HORIZONTAL,
            margin: DEFAULT_WORD_MARGIN,
        }
    }
}

/// A word as placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub count: u32,
    pub font_size: u32,
    /// Top-left corner of the glyph box.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Rotated 90° counter-clockwise.
    pub rotated: bool,
    pub color: Rgb<u8>,
}

/// A placed word together with its coverage bitmap.
#[derive(Debug, Clone)]
pub struct Placement {
    pub word: PlacedWord,
    pub coverage: GrayImage,
}

/// Occupancy grid with a summed-area table over it.
struct Occupancy {
    width: u32,
    height: u32,
    occupied: Vec<bool>,
    /// `(width + 1) * (height + 1)` prefix sums, first row and column zero.
    integral: Vec<u32>,
    free: u64,
}

impl Occupancy {
    fn new(canvas: &Canvas) -> Self {
        let occupied = match &canvas.mask {
            Some(mask) => mask.flags().iter().map(|&p| !p).collect(),
            None => vec![false; canvas.width as usize * canvas.height as usize],
        };
        let free = occupied.iter().filter(|&&o| !o).count() as u64;
        let mut grid = Self {
            width: canvas.width,
            height: canvas.height,
            occupied,
            integral: vec![0; (canvas.width as usize + 1) * (canvas.height as usize + 1)],
            free,
        };
        grid.recompute_from(0, 0);
        grid
    }

    fn stride(&self) -> usize {
        self.width as usize + 1
    }

    fn at(&self, x: u32, y: u32) -> u32 {
        self.integral[y as usize * self.stride() + x as usize]
    }

    /// Rebuilds prefix sums for every cell right of `x0` and below `y0`.
    fn recompute_from(&mut self, x0: u32, y0: u32) {
        let stride = self.stride();
        for y in y0..self.height {
            for x in x0..self.width {
                let cell = u32::from(self.occupied[y as usize * self.width as usize + x as usize]);
                let above = self.integral[y as usize * stride + x as usize + 1];
                let left = self.integral[(y as usize + 1) * stride + x as usize];
                let diag = self.integral[y as usize * stride + x as usize];
                self.integral[(y as usize + 1) * stride + x as usize + 1] = cell + above + left - diag;
            }
        }
    }

    fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let total = self.at(x + w, y + h) + self.at(x, y) - self.at(x + w, y) - self.at(x, y + h);
        total == 0
    }

    /// Picks a uniformly random top-left corner where a `w × h` box is free.
    fn sample_position<R: Rng + ?Sized>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }
        if u64::from(w) * u64::from(h) > self.free {
            return None;
        }

        let xs = self.width - w + 1;
        let ys = self.height - h + 1;
        let mut hits = 0u64;
        for y in 0..ys {
            for x in 0..xs {
                if self.is_free(x, y, w, h) {
                    hits += 1;
                }
            }
        }
        if hits == 0 {
            return None;
        }

        let mut target = rng.gen_range(0..hits);
        for y in 0..ys {
            for x in 0..xs {
                if self.is_free(x, y, w, h) {
                    if target == 0 {
                        return Some((x, y));
                    }
                    target -= 1;
                }
            }
        }
        None
    }

    /// Marks covered glyph pixels at (`x`, `y`) as occupied.
    fn occupy(&mut self, coverage: &GrayImage, x: u32, y: u32) {
        for (gx, gy, pixel) in coverage.enumerate_pixels() {
            if pixel.0[0] == 0 {
                continue;
            }
            let (px, py) = (x + gx, y + gy);
            if px >= self.width || py >= self.height {
                continue;
            }
            let idx = py as usize * self.width as usize + px as usize;
            if !self.occupied[idx] {
                self.occupied[idx] = true;
                self.free -= 1;
            }
        }
        self.recompute_from(x.min(self.width), y.min(self.height));
    }
}

fn glyphs(source: &GlyphSource, word: &str, size: u32, rotated: bool) -> GrayImage {
    #[allow(clippy::cast_precision_loss)]
    let bitmap = source.rasterize(word, size as f32);
    if rotated {
        imageops::rotate270(&bitmap)
    } else {
        bitmap
    }
}

/// Largest font size at which `word` fits the canvas bounds horizontally.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn initial_font_size(source: &GlyphSource, word: &str, canvas: &Canvas) -> u32 {
    let measured = source.rasterize(word, MEASURE_FONT_SIZE);
    let (w, h) = measured.dimensions();
    let scale = (canvas.width as f32 / w.max(1) as f32).min(canvas.height as f32 / h.max(1) as f32);
    ((MEASURE_FONT_SIZE * scale).floor() as u32).clamp(1, canvas.height)
}

/// Lays out `frequencies` on `canvas`.
///
/// The result holds one [`Placement`] per placed word in placement order,
/// which is also descending frequency. Words that do not fit at
/// `min_font_size` end the layout. The outcome depends only on the inputs,
/// the glyph source and the state of `rng`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn layout<R: Rng + ?Sized>(
    frequencies: &FrequencyMap,
    canvas: &Canvas,
    options: &LayoutOptions,
    scheme: ColorScheme,
    source: &GlyphSource,
    rng: &mut R,
) -> Vec<Placement> {
    let words = frequencies.top(options.max_words);
    let Some(&(_, max_count)) = words.first() else {
        return Vec::new();
    };
    if max_count == 0 {
        return Vec::new();
    }

    let mut grid = Occupancy::new(canvas);
    let mut placements = Vec::with_capacity(words.len());
    let mut font_size = 0u32;
    let mut last_freq = 1.0f32;
    let rs = options.relative_scaling.clamp(0.0, 1.0);
    let min_size = options.min_font_size.max(1);

    for (index, (word, count)) in words.into_iter().enumerate() {
        let freq = count as f32 / max_count as f32;
        if index == 0 {
            font_size = initial_font_size(source, word, canvas);
        } else if rs > 0.0 {
            let scaled = (rs * (freq / last_freq) + (1.0 - rs)) * font_size as f32;
            font_size = scaled.round() as u32;
        }

        let mut rotated = rng.gen::<f32>() >= options.prefer_horizontal;
        let mut tried_other_orientation = false;
        let mut found = None;

        while font_size >= min_size {
            let coverage = glyphs(source, word, font_size, rotated);
            let (w, h) = coverage.dimensions();
            if let Some(pos) = grid.sample_position(w + options.margin, h + options.margin, rng) {
                found = Some((pos, coverage));
                break;
            }
            if !tried_other_orientation && options.prefer_horizontal < 1.0 {
                rotated = !rotated;
                tried_other_orientation = true;
            } else {
                font_size = font_size.saturating_sub(options.font_step.max(font_size / SHRINK_DIVISOR));
                rotated = false;
            }
        }

        let Some(((bx, by), coverage)) = found else {
            tracing::debug!(word = %word, placed = placements.len(), "no room left, stopping layout");
            break;
        };

        let x = bx + options.margin / 2;
        let y = by + options.margin / 2;
        grid.occupy(&coverage, x, y);

        let color = scheme.pick(rng);
        let (width, height) = coverage.dimensions();
        placements.push(Placement {
            word: PlacedWord {
                word: word.to_string(),
                count,
                font_size,
                x,
                y,
                width,
                height,
                rotated,
                color,
            },
            coverage,
        });
        last_freq = freq;
    }

    placements
}
