//! RGB colors and RGB system descriptions

use bytemuck::{Pod, Zeroable};

use crate::color::white_point::{Chromaticity, D50, D65};
use crate::math::gamma::{gamma_decode, gamma_encode, srgb_gamma_decode, srgb_gamma_encode};

/// RGBA color with `f32` channels in `[0, 1]`.
///
/// `#[repr(C)]` and `Pod`, so `&[Color]` casts to `&[f32]` with
/// [`bytemuck::cast_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Color channels widened to f64, alpha dropped
    pub fn channels(&self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Color from f64 channels with the given alpha
    pub fn from_channels(c: [f64; 3], a: f32) -> Self {
        Self::new(c[0] as f32, c[1] as f32, c[2] as f32, a)
    }

    /// Convert 8-bit channels
    pub fn from_u8(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba.map(|v| v as f32 / 255.0);
        Self::new(r, g, b, a)
    }

    pub fn to_u8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }
}

/// Transfer function between encoded and linear RGB
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Companding {
    /// Pure power law, `linear = encoded^gamma`
    Gamma(f64),
    /// IEC 61966-2-1 piecewise curve
    Srgb,
}

impl Companding {
    pub fn linearize(self, encoded: f64) -> f64 {
        match self {
            Self::Gamma(g) => gamma_decode(encoded, g),
            Self::Srgb => srgb_gamma_decode(encoded),
        }
    }

    pub fn encode(self, linear: f64) -> f64 {
        match self {
            Self::Gamma(g) => gamma_encode(linear, g),
            Self::Srgb => srgb_gamma_encode(linear),
        }
    }
}

/// An RGB color space: primaries, reference white and companding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbSystem {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
    pub white: Chromaticity,
    pub companding: Companding,
}

impl RgbSystem {
    /// sRGB: ITU-R BT.709 primaries, D65, sRGB curve
    pub const SRGB: Self = Self {
        red: Chromaticity::new(0.64, 0.33),
        green: Chromaticity::new(0.30, 0.60),
        blue: Chromaticity::new(0.15, 0.06),
        white: D65.chromaticity,
        companding: Companding::Srgb,
    };

    /// Adobe RGB (1998), gamma 563/256
    pub const ADOBE_RGB: Self = Self {
        red: Chromaticity::new(0.64, 0.33),
        green: Chromaticity::new(0.21, 0.71),
        blue: Chromaticity::new(0.15, 0.06),
        white: D65.chromaticity,
        companding: Companding::Gamma(563.0 / 256.0),
    };

    /// Display P3: DCI-P3 primaries with D65 and the sRGB curve
    pub const DISPLAY_P3: Self = Self {
        red: Chromaticity::new(0.680, 0.320),
        green: Chromaticity::new(0.265, 0.690),
        blue: Chromaticity::new(0.150, 0.060),
        white: D65.chromaticity,
        companding: Companding::Srgb,
    };

    /// ProPhoto RGB (ROMM), D50, gamma 1.8
    pub const PROPHOTO_RGB: Self = Self {
        red: Chromaticity::new(0.7347, 0.2653),
        green: Chromaticity::new(0.1596, 0.8404),
        blue: Chromaticity::new(0.0366, 0.0001),
        white: D50.chromaticity,
        companding: Companding::Gamma(1.8),
    };

    /// Same primaries and white with a different transfer function
    pub const fn with_companding(mut self, companding: Companding) -> Self {
        self.companding = companding;
        self
    }
}
