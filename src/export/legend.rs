// SPDX-License-Identifier: MPL-2.0
//! Text legend rendered next to the cloud on export.

use crate::cloud::{CloudArtifact, GlyphSource};
use crate::config::{
    LEGEND_EXTRA_HEIGHT, LEGEND_EXTRA_WIDTH, LEGEND_FONT_SIZE, LEGEND_LINE_SPACING, LEGEND_MARGIN_LEFT,
    LEGEND_MARGIN_TOP, TIMESTAMP_FORMAT,
};
use image_rs::{Rgb, RgbImage};

const PANEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Returns the legend text, one entry per line.
///
/// Header lines describe the cloud, then the `top_words` most frequent
/// tokens follow as `token: count`.
#[must_use]
pub fn legend_lines(artifact: &CloudArtifact, top_words: usize) -> Vec<String> {
    let (width, height) = artifact.dimensions();
    let mut lines = vec![
        "=== Word Cloud ===".to_string(),
        format!("Shape: {}", artifact.shape.kind()),
        format!("Size: {}x{}", width, height),
        format!("Created: {}", artifact.created_at.format(TIMESTAMP_FORMAT)),
        String::new(),
        "=== Top Words ===".to_string(),
    ];
    lines.extend(
        artifact
            .frequencies
            .top(top_words)
            .into_iter()
            .map(|(token, count)| format!("{}: {}", token, count)),
    );
    lines
}

/// Renders the legend panel.
///
/// The panel is as wide as the widest line plus a fixed allowance, and as
/// tall as the line count times the line spacing plus a bottom allowance.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn render_legend(artifact: &CloudArtifact, top_words: usize, source: &GlyphSource) -> RgbImage {
    let lines = legend_lines(artifact, top_words);
    let rendered: Vec<_> = lines
        .iter()
        .map(|line| (!line.is_empty()).then(|| source.rasterize(line, LEGEND_FONT_SIZE as f32)))
        .collect();

    let widest = rendered
        .iter()
        .flatten()
        .map(image_rs::GrayImage::width)
        .max()
        .unwrap_or(0);
    let width = widest + LEGEND_EXTRA_WIDTH;
    let height = lines.len() as u32 * LEGEND_LINE_SPACING + LEGEND_EXTRA_HEIGHT;

    let mut panel = RgbImage::from_pixel(width, height, PANEL_COLOR);
    for (index, glyphs) in rendered.iter().enumerate() {
        let Some(glyphs) = glyphs else {
            continue;
        };
        let top = LEGEND_MARGIN_TOP + index as u32 * LEGEND_LINE_SPACING;
        for (gx, gy, coverage) in glyphs.enumerate_pixels() {
            let (x, y) = (LEGEND_MARGIN_LEFT + gx, top + gy);
            if coverage.0[0] == 0 || x >= width || y >= height {
                continue;
            }
            // Black text, so coverage maps straight to darkness
            let shade = 255 - coverage.0[0];
            panel.put_pixel(x, y, Rgb([shade, shade, shade]));
        }
    }
    panel
}
