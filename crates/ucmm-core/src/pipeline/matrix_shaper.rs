//! PCS → device through colorant matrix and inverse TRCs
//!
//! The colorant tags hold the device primaries in the D50 connection space.
//! The PCS value is adapted from D50 to the header illuminant, multiplied by
//! the inverse colorant matrix, clamped, and pushed through each channel's
//! inverse tone curve.

use log::trace;

use crate::color::{ICC_D50, Xyz};
use crate::error::{Error, Result};
use crate::icc::{IccProfile, ProfileSource, TagSignature};
use crate::math::Matrix3x3;

use super::context::TransformOptions;
use super::stages::{adapt, read_xyz_tag, white_points_differ};

const COLORANTS: [TagSignature; 3] = [
    TagSignature::RED_COLORANT,
    TagSignature::GREEN_COLORANT,
    TagSignature::BLUE_COLORANT,
];

const TRCS: [TagSignature; 3] = [
    TagSignature::RED_TRC,
    TagSignature::GREEN_TRC,
    TagSignature::BLUE_TRC,
];

/// Device RGB → PCS XYZ matrix from the colorant tags
pub fn colorant_matrix<S: ProfileSource>(profile: &mut IccProfile<S>) -> Result<Matrix3x3> {
    let [r, g, b] = [
        read_xyz_tag(profile, COLORANTS[0])?,
        read_xyz_tag(profile, COLORANTS[1])?,
        read_xyz_tag(profile, COLORANTS[2])?,
    ];
    Ok(Matrix3x3::from_columns(
        r.to_array(),
        g.to_array(),
        b.to_array(),
    ))
}

/// Encode a media-relative PCS XYZ value for a matrix/TRC profile
pub fn pcs_to_device<S: ProfileSource>(
    profile: &mut IccProfile<S>,
    pcs: Xyz,
    illuminant: Xyz,
    options: &TransformOptions,
) -> Result<[f64; 3]> {
    let matrix = colorant_matrix(profile)?;

    let pcs = if white_points_differ(ICC_D50, illuminant, options.white_point_tolerance) {
        adapt(pcs, ICC_D50, illuminant, options.adaptation)?
    } else {
        pcs
    };

    let inverse = matrix
        .inverse()
        .ok_or(Error::NotInvertible("colorant matrix"))?;
    let linear = inverse.apply(pcs.to_array()).map(|v| v.clamp(0.0, 1.0));
    trace!("linear device rgb {linear:?}");

    let mut device = [0.0; 3];
    for ((out, value), sig) in device.iter_mut().zip(linear).zip(TRCS) {
        let data = profile.obtain_tag_data(sig)?;
        let curve = data.as_curve_eval().ok_or_else(|| {
            Error::WrongType(format!(
                "tag '{sig}' holds '{}', expected a curve",
                data.type_signature()
            ))
        })?;
        *out = curve.eval_inverse(value);
    }
    Ok(device)
}
