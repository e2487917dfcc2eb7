// SPDX-License-Identifier: MPL-2.0
//! Named color schemes for word coloring.
//!
//! Continuous schemes are sampled by linear interpolation between evenly
//! spaced anchor colors; qualitative schemes pick one of their discrete
//! colors.

use crate::error::RenderError;
use image_rs::Rgb;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How a scheme maps a random draw to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    /// Perceptually uniform, ordered dark to light.
    Perceptual,
    /// Simple two-color ramp.
    Sequential,
    /// Unordered set of distinct colors.
    Qualitative,
}

/// The available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Autumn,
    Winter,
    Tab10,
    Set1,
    Set2,
    Pastel1,
}

const VIRIDIS: &[u32] = &[
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];
const PLASMA: &[u32] = &[
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
    0xf0f921,
];
const INFERNO: &[u32] = &[
    0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d,
    0xfcffa4,
];
const MAGMA: &[u32] = &[
    0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d,
    0xfcfdbf,
];
const CIVIDIS: &[u32] = &[
    0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8678, 0xa59c74, 0xc3b369, 0xe1cc55,
    0xfee838,
];
const AUTUMN: &[u32] = &[0xff0000, 0xffff00];
const WINTER: &[u32] = &[0x0000ff, 0x00ff80];
const TAB10: &[u32] = &[
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];
const SET1: &[u32] = &[
    0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00, 0xffff33, 0xa65628, 0xf781bf, 0x999999,
];
const SET2: &[u32] = &[
    0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3,
];
const PASTEL1: &[u32] = &[
    0xfbb4ae, 0xb3cde3, 0xccebc5, 0xdecbe4, 0xfed9a6, 0xffffcc, 0xe5d8bd, 0xfddaec, 0xf2f2f2,
];

#[allow(clippy::cast_possible_truncation)]
fn rgb(hex: u32) -> Rgb<u8> {
    Rgb([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
}

impl ColorScheme {
    /// Returns all schemes in menu order.
    #[must_use]
    pub fn all() -> &'static [ColorScheme] {
        &[
            Self::Viridis,
            Self::Plasma,
            Self::Inferno,
            Self::Magma,
            Self::Cividis,
            Self::Autumn,
            Self::Winter,
            Self::Tab10,
            Self::Set1,
            Self::Set2,
            Self::Pastel1,
        ]
    }

    /// Returns the lowercase scheme name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Plasma => "plasma",
            Self::Inferno => "inferno",
            Self::Magma => "magma",
            Self::Cividis => "cividis",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
            Self::Tab10 => "tab10",
            Self::Set1 => "set1",
            Self::Set2 => "set2",
            Self::Pastel1 => "pastel1",
        }
    }

    /// Returns how the scheme is sampled.
    #[must_use]
    pub fn kind(self) -> SchemeKind {
        match self {
            Self::Viridis | Self::Plasma | Self::Inferno | Self::Magma | Self::Cividis => {
                SchemeKind::Perceptual
            }
            Self::Autumn | Self::Winter => SchemeKind::Sequential,
            Self::Tab10 | Self::Set1 | Self::Set2 | Self::Pastel1 => SchemeKind::Qualitative,
        }
    }

    fn anchors(self) -> &'static [u32] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Plasma => PLASMA,
            Self::Inferno => INFERNO,
            Self::Magma => MAGMA,
            Self::Cividis => CIVIDIS,
            Self::Autumn => AUTUMN,
            Self::Winter => WINTER,
            Self::Tab10 => TAB10,
            Self::Set1 => SET1,
            Self::Set2 => SET2,
            Self::Pastel1 => PASTEL1,
        }
    }

    /// Returns the color at position `t` (clamped to 0.0..=1.0).
    ///
    /// Qualitative schemes return the color whose slot contains `t`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(self, t: f32) -> Rgb<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let anchors = self.anchors();
        let last = anchors.len() - 1;

        if self.kind() == SchemeKind::Qualitative {
            let slot = ((t * anchors.len() as f32) as usize).min(last);
            return rgb(anchors[slot]);
        }

        let scaled = t * last as f32;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = scaled - lower as f32;
        let a = rgb(anchors[lower]);
        let b = rgb(anchors[upper]);
        let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * frac).round() as u8;
        Rgb([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
    }

    /// Draws a random color from the scheme.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Rgb<u8> {
        match self.kind() {
            SchemeKind::Qualitative => {
                let anchors = self.anchors();
                rgb(anchors[rng.gen_range(0..anchors.len())])
            }
            SchemeKind::Perceptual | SchemeKind::Sequential => self.sample(rng.gen::<f32>()),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|scheme| scheme.name() == wanted)
            .ok_or_else(|| RenderError::UnknownColorScheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn names_parse_back() {
        for scheme in ColorScheme::all() {
            assert_eq!(scheme.name().parse::<ColorScheme>(), Ok(*scheme));
        }
        assert_eq!("  VIRIDIS ".parse::<ColorScheme>(), Ok(ColorScheme::Viridis));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "rainbow".parse::<ColorScheme>(),
            Err(RenderError::UnknownColorScheme("rainbow".into()))
        );
    }

    #[test]
    fn viridis_endpoints_match_anchors() {
        assert_eq!(ColorScheme::Viridis.sample(0.0), Rgb([0x44, 0x01, 0x54]));
        assert_eq!(ColorScheme::Viridis.sample(1.0), Rgb([0xfd, 0xe7, 0x25]));
    }

    #[test]
    fn sequential_midpoint_interpolates() {
        assert_eq!(ColorScheme::Autumn.sample(0.5), Rgb([255, 128, 0]));
    }

    #[test]
    fn sample_clamps_out_of_range() {
        assert_eq!(
            ColorScheme::Plasma.sample(-3.0),
            ColorScheme::Plasma.sample(0.0)
        );
        assert_eq!(
            ColorScheme::Plasma.sample(7.0),
            ColorScheme::Plasma.sample(1.0)
        );
    }

    #[test]
    fn qualitative_picks_listed_colors() {
        let mut rng = StdRng::seed_from_u64(3);
        let listed: Vec<Rgb<u8>> = TAB10.iter().map(|&h| rgb(h)).collect();
        for _ in 0..50 {
            assert!(listed.contains(&ColorScheme::Tab10.pick(&mut rng)));
        }
    }

    #[test]
    fn pick_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            assert_eq!(ColorScheme::Magma.pick(&mut a), ColorScheme::Magma.pick(&mut b));
        }
    }

    #[test]
    fn every_kind_is_represented() {
        let kinds: Vec<SchemeKind> = ColorScheme::all().iter().map(|s| s.kind()).collect();
        assert!(kinds.contains(&SchemeKind::Perceptual));
        assert!(kinds.contains(&SchemeKind::Sequential));
        assert!(kinds.contains(&SchemeKind::Qualitative));
    }
}
