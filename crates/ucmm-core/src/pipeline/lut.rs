//! PCS → device through a B2A or B2D LUT tag
//!
//! Integer LUTs (lut8, lut16, lutBToA) take the PCS in its normalized ICC
//! encoding; multiProcessElements take plain floating-point PCS values.

use log::trace;

use crate::color::{Lab, Xyz};
use crate::error::{Error, Result};
use crate::icc::tags::{LutDirection, TypeVariant};
use crate::icc::{ColorSpace, IccProfile, ProfileSource, TagSignature};

/// 1.0 in the u1Fixed15 XYZ encoding, as a fraction of 0xFFFF
const XYZ_ENCODING_SCALE: f64 = 32768.0 / 65535.0;

/// Legacy lut16 Lab encoding puts L* = 100 at 0xFF00
const LAB_LEGACY_SCALE: f64 = 65280.0 / 65535.0;

/// How a LUT expects the PCS value on its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcsEncoding {
    /// Normalized `[0, 1]` per the ICC integer encodings
    Normalized,
    /// Normalized with the lut16 legacy Lab scale
    Lut16,
    /// Raw XYZ or Lab values
    Float,
}

/// Input vector for a LUT on `pcs`
pub fn encode_pcs(xyz: Xyz, pcs: ColorSpace, white: Xyz, encoding: PcsEncoding) -> Result<[f64; 3]> {
    match pcs {
        ColorSpace::Xyz => Ok(match encoding {
            PcsEncoding::Float => xyz.to_array(),
            _ => xyz.to_array().map(|v| v * XYZ_ENCODING_SCALE),
        }),
        ColorSpace::Lab => {
            let lab = Lab::from_xyz(xyz, white);
            Ok(match encoding {
                PcsEncoding::Float => lab.to_array(),
                PcsEncoding::Normalized => normalize_lab(lab),
                PcsEncoding::Lut16 => normalize_lab(lab).map(|v| v * LAB_LEGACY_SCALE),
            })
        }
        other => Err(Error::WrongType(format!("profile PCS is {other:?}"))),
    }
}

fn normalize_lab(lab: Lab) -> [f64; 3] {
    [
        lab.l / 100.0,
        (lab.a + 128.0) / 255.0,
        (lab.b + 128.0) / 255.0,
    ]
}

fn is_b2d(sig: TagSignature) -> bool {
    matches!(
        sig,
        TagSignature::B2D0 | TagSignature::B2D1 | TagSignature::B2D2 | TagSignature::B2D3
    )
}

/// Evaluate the LUT stored in `sig` on a media-relative PCS value.
///
/// B2D tags must be multiProcessElements; B2A tags must be lut8, lut16 or
/// lutBToA. Only three device channels are supported.
pub fn pcs_to_device<S: ProfileSource>(
    profile: &mut IccProfile<S>,
    sig: TagSignature,
    xyz: Xyz,
    pcs: ColorSpace,
    white: Xyz,
) -> Result<[f64; 3]> {
    let data = profile.obtain_tag_data(sig)?;
    let output = match (is_b2d(sig), data) {
        (true, TypeVariant::MultiProcessElements(mpe)) => {
            mpe.apply(&encode_pcs(xyz, pcs, white, PcsEncoding::Float)?)
        }
        (false, TypeVariant::Lut8(lut)) => {
            lut.apply(&encode_pcs(xyz, pcs, white, PcsEncoding::Normalized)?)
        }
        (false, TypeVariant::Lut16(lut)) => {
            lut.apply(&encode_pcs(xyz, pcs, white, PcsEncoding::Lut16)?)
        }
        (false, TypeVariant::LutAB(lut)) if lut.direction == LutDirection::BToA => {
            lut.apply(&encode_pcs(xyz, pcs, white, PcsEncoding::Normalized)?)
        }
        (_, other) => {
            return Err(Error::WrongType(format!(
                "tag '{sig}' holds '{}'",
                other.type_signature()
            )));
        }
    };
    trace!("'{sig}' output {output:?}");

    match output[..] {
        [r, g, b] => Ok([r, g, b]),
        _ => Err(Error::NotImplemented(format!(
            "{} device channels from '{sig}'",
            output.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ICC_D50;

    #[test]
    fn test_xyz_encoding() {
        let enc = encode_pcs(ICC_D50, ColorSpace::Xyz, ICC_D50, PcsEncoding::Normalized).unwrap();
        assert!((enc[1] - 32768.0 / 65535.0).abs() < 1e-12);
        let raw = encode_pcs(ICC_D50, ColorSpace::Xyz, ICC_D50, PcsEncoding::Float).unwrap();
        assert_eq!(raw, ICC_D50.to_array());
    }

    #[test]
    fn test_lab_encoding() {
        let white = encode_pcs(ICC_D50, ColorSpace::Lab, ICC_D50, PcsEncoding::Normalized).unwrap();
        assert!((white[0] - 1.0).abs() < 1e-9);
        assert!((white[1] - 128.0 / 255.0).abs() < 1e-9);

        let legacy = encode_pcs(ICC_D50, ColorSpace::Lab, ICC_D50, PcsEncoding::Lut16).unwrap();
        assert!((legacy[0] - 65280.0 / 65535.0).abs() < 1e-9);

        let float = encode_pcs(ICC_D50, ColorSpace::Lab, ICC_D50, PcsEncoding::Float).unwrap();
        assert!((float[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_pcs() {
        assert!(matches!(
            encode_pcs(ICC_D50, ColorSpace::Rgb, ICC_D50, PcsEncoding::Float),
            Err(Error::WrongType(_))
        ));
    }
}
