//! Chromatic adaptation transforms
//!
//! A von Kries-style transform maps both whites into a cone response space,
//! scales by their ratio and maps back: `M = A⁻¹ · diag(dst / src) · A`.
//! The inverse of `A` is computed, not tabulated, so a singular cone matrix
//! surfaces as `None` instead of a silently wrong result.
//!
//! References:
//! - ICC.1:2010 Annex E
//! - Lindbloom: http://www.brucelindbloom.com/index.html?Eqn_ChromAdapt.html

use crate::color::Xyz;
use crate::math::Matrix3x3;

/// Cone response model used for adaptation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdaptationMethod {
    /// Bradford (ICC default)
    #[default]
    Bradford,
    VonKries,
    /// Scale XYZ directly
    XyzScaling,
}

/// Bradford XYZ → cone response
pub const BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Von Kries (Hunt-Pointer-Estevez) XYZ → cone response
pub const VON_KRIES: Matrix3x3 = Matrix3x3::new([
    [0.40024, 0.7076, -0.08081],
    [-0.2263, 1.16532, 0.0457],
    [0.0, 0.0, 0.91822],
]);

impl AdaptationMethod {
    pub fn cone_matrix(self) -> Matrix3x3 {
        match self {
            Self::Bradford => BRADFORD,
            Self::VonKries => VON_KRIES,
            Self::XyzScaling => Matrix3x3::IDENTITY,
        }
    }
}

/// Matrix adapting XYZ relative to `src_white` into XYZ relative to
/// `dst_white`. `None` if the cone matrix is singular or a source white
/// component is zero in cone space.
pub fn adaptation_matrix(src_white: Xyz, dst_white: Xyz, method: AdaptationMethod) -> Option<Matrix3x3> {
    let cone = method.cone_matrix();
    let cone_inv = cone.inverse()?;
    let src = cone.apply(src_white.to_array());
    let dst = cone.apply(dst_white.to_array());
    if src.iter().any(|&v| v == 0.0 || !v.is_finite()) {
        return None;
    }
    let scale = Matrix3x3::diagonal(std::array::from_fn(|i| dst[i] / src[i]));
    Some(cone_inv * scale * cone)
}

/// Adapt one XYZ value, see [`adaptation_matrix`]
pub fn adapt_xyz(xyz: Xyz, src_white: Xyz, dst_white: Xyz, method: AdaptationMethod) -> Option<Xyz> {
    adaptation_matrix(src_white, dst_white, method).map(|m| Xyz::from_array(m.apply(xyz.to_array())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{D50, D65};

    const METHODS: [AdaptationMethod; 3] = [
        AdaptationMethod::Bradford,
        AdaptationMethod::VonKries,
        AdaptationMethod::XyzScaling,
    ];

    #[test]
    fn test_same_white_is_identity() {
        for method in METHODS {
            let m = adaptation_matrix(D65.xyz(), D65.xyz(), method).unwrap();
            assert!(m.approx_eq(&Matrix3x3::IDENTITY, 1e-12), "{method:?}: {m:?}");
        }
    }

    #[test]
    fn test_white_maps_to_white() {
        for method in METHODS {
            let adapted = adapt_xyz(D65.xyz(), D65.xyz(), D50.xyz(), method).unwrap();
            assert!(adapted.approx_eq(&D50.xyz(), 1e-9), "{method:?}: {adapted:?}");
        }
    }

    #[test]
    fn test_bradford_d65_to_d50() {
        // Published Bradford D65 → D50 matrix (Lindbloom)
        let expected = Matrix3x3::new([
            [1.0478112, 0.0228866, -0.0501270],
            [0.0295424, 0.9904844, -0.0170491],
            [-0.0092345, 0.0150436, 0.7521316],
        ]);
        let d65 = Xyz::new(0.95047, 1.0, 1.08883);
        let d50 = Xyz::new(0.96422, 1.0, 0.82521);
        let m = adaptation_matrix(d65, d50, AdaptationMethod::Bradford).unwrap();
        assert!(m.approx_eq(&expected, 1e-5), "{m:?}");
    }

    #[test]
    fn test_roundtrip() {
        let xyz = Xyz::new(0.3, 0.5, 0.2);
        let there = adapt_xyz(xyz, D65.xyz(), D50.xyz(), AdaptationMethod::Bradford).unwrap();
        let back = adapt_xyz(there, D50.xyz(), D65.xyz(), AdaptationMethod::Bradford).unwrap();
        assert!(xyz.approx_eq(&back, 1e-12));
    }

    #[test]
    fn test_zero_white_rejected() {
        let black = Xyz::default();
        assert!(adaptation_matrix(black, D50.xyz(), AdaptationMethod::XyzScaling).is_none());
    }
}
