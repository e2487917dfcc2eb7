// SPDX-License-Identifier: MPL-2.0
//! Word cloud rendering: canvas masks, glyphs, colors, layout and raster.

pub mod font;
pub mod layout;
pub mod mask;
pub mod palette;
pub mod render;

pub use font::GlyphSource;
pub use layout::{LayoutOptions, PlacedWord};
pub use mask::{Canvas, Mask};
pub use palette::{ColorScheme, SchemeKind};
pub use render::{render, CloudArtifact, RenderOptions, Rendered};
