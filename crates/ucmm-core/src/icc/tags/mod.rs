//! ICC tag payload types
//!
//! Every tag payload starts with a 4-byte type signature and 4 reserved
//! bytes; the rest depends on the type. [`TypeVariant::parse`] dispatches on
//! the signature and checks how many bytes the parser consumed against the
//! declared tag size.

mod curves;
mod lut;
mod mpe;
mod text;
mod xyz;

pub use curves::{Curve, CurveEval, ParametricCurve, StageCurve};
pub use lut::{
    Clut, ClutValues, Lut8, Lut16, LutAB, LutDirection, LutMatrix, MAX_CLUT_INPUTS,
    clut_entry_count,
};
pub use mpe::{
    ClutElement, CurveSegment, CurveSetElement, FutureElement, MatrixElement,
    MultiProcessElements, ProcessElement, SegmentFormula, SegmentedCurve,
};
pub use text::{LocalizedString, MultiLocalizedUnicode, TextDescription};
pub use xyz::{S15Fixed16Array, XyzArray};

use super::error::IccError;
use super::reader::ByteCursor;
use super::signatures::TypeSignature;

/// Bytes taken by the type signature and the reserved word
pub const TYPE_HEADER_SIZE: usize = 8;

/// How the parsed extent must relate to the declared tag size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Parsed bytes must fill the tag exactly
    Exact,
    /// Trailing padding after the parsed bytes is allowed
    AtMost,
}

impl SizePolicy {
    pub fn for_type(sig: TypeSignature) -> Self {
        match sig {
            TypeSignature::LUT_A_TO_B
            | TypeSignature::LUT_B_TO_A
            | TypeSignature::MULTI_PROCESS_ELEMENTS => Self::AtMost,
            _ => Self::Exact,
        }
    }

    fn check(self, sig: TypeSignature, parsed: usize, declared: usize) -> Result<(), IccError> {
        let ok = match self {
            Self::Exact => parsed == declared,
            Self::AtMost => parsed <= declared,
        };
        if ok {
            Ok(())
        } else {
            Err(IccError::malformed(
                sig,
                format!("parsed {parsed} bytes, tag declares {declared}"),
            ))
        }
    }
}

/// Parsed tag payload
#[derive(Debug, Clone, PartialEq)]
pub enum TypeVariant {
    Curve(Curve),
    ParametricCurve(ParametricCurve),
    Lut8(Lut8),
    Lut16(Lut16),
    /// mAB or mBA, see [`LutAB::direction`]
    LutAB(LutAB),
    MultiLocalizedUnicode(MultiLocalizedUnicode),
    TextDescription(TextDescription),
    Text(String),
    Signature(u32),
    XyzArray(XyzArray),
    S15Fixed16Array(S15Fixed16Array),
    MultiProcessElements(MultiProcessElements),
}

impl TypeVariant {
    /// Parse a complete tag payload.
    ///
    /// `payload` is exactly the declared tag size, starting at the type
    /// signature.
    pub fn parse(payload: &[u8]) -> Result<Self, IccError> {
        let mut cursor = ByteCursor::new(payload);
        let sig = TypeSignature(cursor.read_u32()?);
        cursor.skip(4)?;

        let variant = match sig {
            TypeSignature::CURVE => Self::Curve(Curve::parse(&mut cursor)?),
            TypeSignature::PARAMETRIC_CURVE => {
                Self::ParametricCurve(ParametricCurve::parse(&mut cursor)?)
            }
            TypeSignature::LUT8 => Self::Lut8(Lut8::parse(&mut cursor)?),
            TypeSignature::LUT16 => Self::Lut16(Lut16::parse(&mut cursor)?),
            TypeSignature::LUT_A_TO_B => {
                Self::LutAB(LutAB::parse(&mut cursor, LutDirection::AToB)?)
            }
            TypeSignature::LUT_B_TO_A => {
                Self::LutAB(LutAB::parse(&mut cursor, LutDirection::BToA)?)
            }
            TypeSignature::MULTI_LOCALIZED_UNICODE => {
                Self::MultiLocalizedUnicode(MultiLocalizedUnicode::parse(&mut cursor)?)
            }
            TypeSignature::TEXT_DESCRIPTION => {
                Self::TextDescription(TextDescription::parse(&mut cursor)?)
            }
            TypeSignature::TEXT => Self::Text(text::parse_text(&mut cursor)?),
            TypeSignature::SIGNATURE => Self::Signature(cursor.read_u32()?),
            TypeSignature::XYZ => Self::XyzArray(XyzArray::parse(&mut cursor)?),
            TypeSignature::S15_FIXED16_ARRAY => {
                Self::S15Fixed16Array(S15Fixed16Array::parse(&mut cursor)?)
            }
            TypeSignature::MULTI_PROCESS_ELEMENTS => {
                Self::MultiProcessElements(MultiProcessElements::parse(&mut cursor)?)
            }
            other => return Err(IccError::UnsupportedType(other)),
        };

        SizePolicy::for_type(sig).check(sig, cursor.furthest(), payload.len())?;
        Ok(variant)
    }

    pub fn type_signature(&self) -> TypeSignature {
        match self {
            Self::Curve(_) => TypeSignature::CURVE,
            Self::ParametricCurve(_) => TypeSignature::PARAMETRIC_CURVE,
            Self::Lut8(_) => TypeSignature::LUT8,
            Self::Lut16(_) => TypeSignature::LUT16,
            Self::LutAB(lut) => match lut.direction {
                LutDirection::AToB => TypeSignature::LUT_A_TO_B,
                LutDirection::BToA => TypeSignature::LUT_B_TO_A,
            },
            Self::MultiLocalizedUnicode(_) => TypeSignature::MULTI_LOCALIZED_UNICODE,
            Self::TextDescription(_) => TypeSignature::TEXT_DESCRIPTION,
            Self::Text(_) => TypeSignature::TEXT,
            Self::Signature(_) => TypeSignature::SIGNATURE,
            Self::XyzArray(_) => TypeSignature::XYZ,
            Self::S15Fixed16Array(_) => TypeSignature::S15_FIXED16_ARRAY,
            Self::MultiProcessElements(_) => TypeSignature::MULTI_PROCESS_ELEMENTS,
        }
    }

    pub fn as_xyz_array(&self) -> Option<&XyzArray> {
        match self {
            Self::XyzArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Self::Curve(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_parametric_curve(&self) -> Option<&ParametricCurve> {
        match self {
            Self::ParametricCurve(v) => Some(v),
            _ => None,
        }
    }

    /// Either curve type, for use as a TRC
    pub fn as_curve_eval(&self) -> Option<&dyn CurveEval> {
        match self {
            Self::Curve(v) => Some(v),
            Self::ParametricCurve(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mpe(&self) -> Option<&MultiProcessElements> {
        match self {
            Self::MultiProcessElements(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_s15fixed16_array(&self) -> Option<&S15Fixed16Array> {
        match self {
            Self::S15Fixed16Array(v) => Some(v),
            _ => None,
        }
    }

    /// Text of a description-like payload (mluc, desc or text)
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::MultiLocalizedUnicode(v) => v.best_match("en", "US"),
            Self::TextDescription(v) => Some(v.text()),
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_lut(&self) -> bool {
        matches!(
            self,
            Self::Lut8(_) | Self::Lut16(_) | Self::LutAB(_) | Self::MultiProcessElements(_)
        )
    }
}
