//! Device-independent stages shared by every target profile
//!
//! Linearize → RGB to XYZ → adapt to the media white → rescale into the
//! media-relative PCS.

use log::trace;

use crate::color::{Companding, RgbSystem, Xyz};
use crate::error::{Error, Result};
use crate::icc::{IccProfile, ProfileSource, TagSignature};
use crate::math::{AdaptationMethod, Matrix3x3, adaptation_matrix};

/// Apply the source transfer function per channel
pub fn linearize(rgb: [f64; 3], companding: Companding) -> [f64; 3] {
    rgb.map(|v| companding.linearize(v))
}

/// Linear RGB → XYZ matrix of an RGB system.
///
/// Columns are the primaries' XYZ (Y = 1), each scaled so that RGB
/// (1, 1, 1) lands on the system white.
pub fn rgb_to_xyz_matrix(system: &RgbSystem) -> Result<Matrix3x3> {
    let primaries = Matrix3x3::from_columns(
        system.red.to_xyz().to_array(),
        system.green.to_xyz().to_array(),
        system.blue.to_xyz().to_array(),
    );
    let inverse = primaries
        .inverse()
        .ok_or(Error::NotInvertible("RGB primaries matrix"))?;
    let scale = inverse.apply(system.white.to_xyz().to_array());
    Ok(primaries * Matrix3x3::diagonal(scale))
}

/// Whether two whites differ in normalized X or Z by more than `tolerance`.
/// Whites without luminance always differ.
pub fn white_points_differ(a: Xyz, b: Xyz, tolerance: f64) -> bool {
    match (a.normalized(), b.normalized()) {
        (Some(a), Some(b)) => (a.x - b.x).abs() > tolerance || (a.z - b.z).abs() > tolerance,
        _ => true,
    }
}

/// Adapt `xyz` from `src_white` to `dst_white`
pub fn adapt(xyz: Xyz, src_white: Xyz, dst_white: Xyz, method: AdaptationMethod) -> Result<Xyz> {
    let m = adaptation_matrix(src_white, dst_white, method)
        .ok_or(Error::NotInvertible("chromatic adaptation matrix"))?;
    let adapted = Xyz::from_array(m.apply(xyz.to_array()));
    trace!("adapted {xyz:?} -> {adapted:?} ({method:?})");
    Ok(adapted)
}

/// Map device-absolute XYZ onto the media-relative PCS:
/// `xyz · illuminant / media_white` per component.
pub fn pcs_rescale(xyz: Xyz, illuminant: Xyz, media_white: Xyz) -> Result<Xyz> {
    let factors = illuminant
        .ratio(media_white)
        .ok_or_else(|| Error::NoData("media white point has a zero component".into()))?;
    Ok(xyz.scale_by(factors))
}

/// First value of an XYZType tag
pub fn read_xyz_tag<S: ProfileSource>(
    profile: &mut IccProfile<S>,
    sig: TagSignature,
) -> Result<Xyz> {
    let data = profile.obtain_tag_data(sig)?;
    let array = data.as_xyz_array().ok_or_else(|| {
        Error::WrongType(format!(
            "tag '{sig}' holds '{}', expected 'XYZ '",
            data.type_signature()
        ))
    })?;
    array
        .to_xyz()
        .ok_or_else(|| Error::NoData(format!("tag '{sig}' holds no XYZ values")))
}
