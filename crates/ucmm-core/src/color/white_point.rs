//! White points and chromaticity coordinates

use crate::color::Xyz;

/// CIE 1931 xy chromaticity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

impl Chromaticity {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// XYZ with Y = 1. A zero `y` yields non-finite components.
    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x / self.y, 1.0, (1.0 - self.x - self.y) / self.y)
    }

    /// Chromaticity of an XYZ value, or `None` for black
    pub fn from_xyz(xyz: Xyz) -> Option<Self> {
        let sum = xyz.x + xyz.y + xyz.z;
        (sum != 0.0).then(|| Self::new(xyz.x / sum, xyz.y / sum))
    }
}

/// A named reference white
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    pub name: &'static str,
    pub chromaticity: Chromaticity,
}

impl WhitePoint {
    pub const fn new(name: &'static str, x: f64, y: f64) -> Self {
        Self {
            name,
            chromaticity: Chromaticity::new(x, y),
        }
    }

    pub fn xyz(&self) -> Xyz {
        self.chromaticity.to_xyz()
    }
}

/// CIE D50, the ICC Profile Connection Space white
pub const D50: WhitePoint = WhitePoint::new("D50", 0.3457, 0.3585);

/// CIE D65, white of sRGB, Adobe RGB and Display P3
pub const D65: WhitePoint = WhitePoint::new("D65", 0.3127, 0.3290);

/// PCS illuminant as written in ICC headers (S15Fixed16-rounded D50)
pub const ICC_D50: Xyz = Xyz::new(0.9642, 1.0, 0.8249);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d65_xyz() {
        let xyz = D65.xyz();
        assert!((xyz.x - 0.95046).abs() < 1e-4);
        assert_eq!(xyz.y, 1.0);
        assert!((xyz.z - 1.08906).abs() < 1e-4);
    }

    #[test]
    fn test_d50_close_to_icc_illuminant() {
        assert!(D50.xyz().approx_eq(&ICC_D50, 2e-3));
    }

    #[test]
    fn test_chromaticity_roundtrip() {
        let c = Chromaticity::from_xyz(D65.xyz()).unwrap();
        assert!((c.x - 0.3127).abs() < 1e-12);
        assert!((c.y - 0.3290).abs() < 1e-12);
        assert!(Chromaticity::from_xyz(Xyz::default()).is_none());
    }
}
