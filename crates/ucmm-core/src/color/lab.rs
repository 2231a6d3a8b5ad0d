//! CIELAB (L*a*b*), the second ICC Profile Connection Space.

use crate::color::Xyz;

const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, 0 to 100
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl Lab {
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Convert from XYZ relative to `white`
    pub fn from_xyz(xyz: Xyz, white: Xyz) -> Self {
        let fx = lab_f(xyz.x / white.x);
        let fy = lab_f(xyz.y / white.y);
        let fz = lab_f(xyz.z / white.z);
        Self::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
    }
}
