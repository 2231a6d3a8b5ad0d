//! CIE XYZ Color Space
//!
//! XYZ is the Profile Connection Space for every matrix/TRC profile and the
//! space the pipeline works in between linearization and the device stage.

use std::ops::Mul;

/// CIE 1931 XYZ tristimulus values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    /// Luminance
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Scale so that Y = 1, or `None` for a zero-luminance value
    pub fn normalized(&self) -> Option<Self> {
        (self.y != 0.0 && self.y.is_finite()).then(|| *self * (1.0 / self.y))
    }

    /// Component-wise product
    pub fn scale_by(&self, factors: Xyz) -> Self {
        Self::new(self.x * factors.x, self.y * factors.y, self.z * factors.z)
    }

    /// Component-wise quotient, or `None` if any divisor is zero
    pub fn ratio(&self, divisor: Xyz) -> Option<Self> {
        let ok = [divisor.x, divisor.y, divisor.z].iter().all(|&d| d != 0.0);
        ok.then(|| Self::new(self.x / divisor.x, self.y / divisor.y, self.z / divisor.z))
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl Mul<f64> for Xyz {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for Xyz {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}
