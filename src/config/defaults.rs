// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Canvas**: Default shape geometry and bounds
//! - **Layout**: Word placement tuning
//! - **Filtering**: Filter menu limits
//! - **Export**: Legend panel and encoder settings

// ==========================================================================
// Canvas Defaults
// ==========================================================================

/// Default canvas width for squares and rectangles (pixels).
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default canvas height for squares and rectangles (pixels).
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Default circle radius (pixels).
pub const DEFAULT_RADIUS: u32 = 400;

/// Largest accepted canvas side (pixels).
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

/// Default color scheme name.
pub const DEFAULT_COLOR_SCHEME: &str = "viridis";

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Maximum number of words placed on the canvas.
pub const DEFAULT_MAX_WORDS: usize = 200;

/// Smallest font size tried before a word is dropped (pixels).
pub const MIN_FONT_SIZE: u32 = 4;

/// Font size decrement applied when a word does not fit (pixels).
pub const FONT_STEP: u32 = 1;

/// Weight of relative frequency when sizing consecutive words (0.0 to 1.0).
pub const DEFAULT_RELATIVE_SCALING: f32 = 0.5;

/// Probability that a word is laid out horizontally (0.0 to 1.0).
pub const DEFAULT_PREFER_HORIZONTAL: f32 = 0.9;

/// Free pixels kept around each placed word.
pub const DEFAULT_WORD_MARGIN: u32 = 2;

// ==========================================================================
// Filtering Defaults
// ==========================================================================

/// Number of distinct values offered per column in a filter menu.
pub const FILTER_MENU_LIMIT: usize = 50;

/// Characters of a value shown in a filter menu entry.
pub const FILTER_LABEL_MAX_CHARS: usize = 20;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// JPEG quality used for `.jpg`/`.jpeg` exports (1 to 100).
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Number of top words listed in the legend panel.
pub const LEGEND_TOP_WORDS: usize = 50;

/// Legend text size (pixels).
pub const LEGEND_FONT_SIZE: u32 = 16;

/// Distance between legend baselines (pixels).
pub const LEGEND_LINE_SPACING: u32 = 20;

/// Left margin of legend text (pixels).
pub const LEGEND_MARGIN_LEFT: u32 = 20;

/// Top margin of legend text (pixels).
pub const LEGEND_MARGIN_TOP: u32 = 10;

/// Extra width added to the widest legend line (pixels).
pub const LEGEND_EXTRA_WIDTH: u32 = 50;

/// Space added below the last legend line, in pixels.
pub const LEGEND_EXTRA_HEIGHT: u32 = 20;

/// Timestamp format shown in the legend.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_WIDTH > 0 && DEFAULT_WIDTH <= MAX_CANVAS_DIMENSION);
    assert!(DEFAULT_HEIGHT > 0 && DEFAULT_HEIGHT <= MAX_CANVAS_DIMENSION);
    assert!(DEFAULT_RADIUS > 0 && DEFAULT_RADIUS * 2 <= MAX_CANVAS_DIMENSION);

    assert!(MIN_FONT_SIZE > 0);
    assert!(FONT_STEP > 0);
    assert!(DEFAULT_MAX_WORDS > 0);
    assert!(DEFAULT_RELATIVE_SCALING >= 0.0 && DEFAULT_RELATIVE_SCALING <= 1.0);
    assert!(DEFAULT_PREFER_HORIZONTAL >= 0.0 && DEFAULT_PREFER_HORIZONTAL <= 1.0);

    assert!(FILTER_MENU_LIMIT >= 50);

    assert!(DEFAULT_JPEG_QUALITY > 0 && DEFAULT_JPEG_QUALITY <= 100);
    assert!(LEGEND_LINE_SPACING >= LEGEND_FONT_SIZE);
};
