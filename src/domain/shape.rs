// SPDX-License-Identifier: MPL-2.0
//! Cloud shape types.
//!
//! A [`ShapeSpec`] fixes the canvas geometry of a word cloud. Only the circle
//! carries a paintable-region mask; squares and rectangles fill the canvas.

use std::fmt;
use std::str::FromStr;

/// The shape family selected by the user, without geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    Square,
    #[default]
    Rectangle,
    Circle,
}

impl ShapeKind {
    /// Returns the lowercase name used in settings and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
        }
    }

    /// Returns all shape kinds.
    #[must_use]
    pub fn all() -> &'static [ShapeKind] {
        &[Self::Square, Self::Rectangle, Self::Circle]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "rectangle" | "rect" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            other => Err(format!("invalid shape: {}", other)),
        }
    }
}

/// A shape together with its geometry, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSpec {
    Square { side: u32 },
    Rectangle { width: u32, height: u32 },
    Circle { radius: u32 },
}

impl ShapeSpec {
    /// Resolves the user's shape fields into a spec.
    ///
    /// - circle uses `radius` only, whatever width and height say
    /// - rectangle uses `width` × `height`
    /// - square uses the smaller of `width` and `height` as its side
    #[must_use]
    pub fn from_settings(kind: ShapeKind, width: u32, height: u32, radius: u32) -> Self {
        match kind {
            ShapeKind::Square => Self::Square {
                side: width.min(height),
            },
            ShapeKind::Rectangle => Self::Rectangle { width, height },
            ShapeKind::Circle => Self::Circle { radius },
        }
    }

    /// Returns the shape family.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Square { .. } => ShapeKind::Square,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Returns the canvas size as (width, height).
    ///
    /// Saturates instead of overflowing for absurd radii.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        match *self {
            Self::Square { side } => (side, side),
            Self::Rectangle { width, height } => (width, height),
            Self::Circle { radius } => {
                let diameter = radius.saturating_mul(2);
                (diameter, diameter)
            }
        }
    }

    /// Returns `true` if the shape restricts painting to part of the canvas.
    #[must_use]
    pub fn has_mask(&self) -> bool {
        matches!(self, Self::Circle { .. })
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square { side } => write!(f, "square {}x{}", side, side),
            Self::Rectangle { width, height } => write!(f, "rectangle {}x{}", width, height),
            Self::Circle { radius } => write!(f, "circle r={}", radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_ignores_width_and_height() {
        let spec = ShapeSpec::from_settings(ShapeKind::Circle, 1920, 1080, 400);
        assert_eq!(spec.canvas_size(), (800, 800));
        assert!(spec.has_mask());
    }

    #[test]
    fn square_uses_smaller_side() {
        let spec = ShapeSpec::from_settings(ShapeKind::Square, 1920, 1080, 400);
        assert_eq!(spec, ShapeSpec::Square { side: 1080 });
        assert!(!spec.has_mask());
    }

    #[test]
    fn rectangle_keeps_both_dimensions() {
        let spec = ShapeSpec::from_settings(ShapeKind::Rectangle, 640, 480, 10);
        assert_eq!(spec.canvas_size(), (640, 480));
        assert_eq!(spec.kind(), ShapeKind::Rectangle);
    }

    #[test]
    fn shape_kind_parses_case_insensitively() {
        assert_eq!("Circle".parse::<ShapeKind>(), Ok(ShapeKind::Circle));
        assert_eq!(" square ".parse::<ShapeKind>(), Ok(ShapeKind::Square));
        assert!("triangle".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn shape_kind_names_round_trip() {
        for kind in ShapeKind::all() {
            assert_eq!(kind.as_str().parse::<ShapeKind>(), Ok(*kind));
        }
    }

    #[test]
    fn huge_radius_saturates() {
        let spec = ShapeSpec::Circle { radius: u32::MAX };
        assert_eq!(spec.canvas_size(), (u32::MAX, u32::MAX));
    }
}
