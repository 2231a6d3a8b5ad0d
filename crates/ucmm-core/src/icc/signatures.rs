//! Tag, type and element signatures.
//!
//! Signatures are four ASCII characters packed as a big-endian `u32`.
//! The known-tag table maps each well-known tag signature to a fixed slot
//! so the parser can find it without hashing.

use std::fmt;

fn fmt_fourcc(value: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for byte in value.to_be_bytes() {
        let ch = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            '.'
        };
        write!(f, "{ch}")?;
    }
    Ok(())
}

/// ICC Tag Signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagSignature(pub u32);

impl TagSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    /// Slot in the known-tag table, if this is a well-known tag
    pub fn known(self) -> Option<KnownTag> {
        KnownTag::from_signature(self)
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const A2B1: Self = Self::from_bytes(*b"A2B1");
    pub const A2B2: Self = Self::from_bytes(*b"A2B2");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const B2A1: Self = Self::from_bytes(*b"B2A1");
    pub const B2A2: Self = Self::from_bytes(*b"B2A2");
    pub const B2D0: Self = Self::from_bytes(*b"B2D0");
    pub const B2D1: Self = Self::from_bytes(*b"B2D1");
    pub const B2D2: Self = Self::from_bytes(*b"B2D2");
    pub const B2D3: Self = Self::from_bytes(*b"B2D3");
    pub const D2B0: Self = Self::from_bytes(*b"D2B0");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const GRAY_TRC: Self = Self::from_bytes(*b"kTRC");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const PROFILE_DESC: Self = Self::from_bytes(*b"desc");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const MEDIA_BLACK: Self = Self::from_bytes(*b"bkpt");
    pub const LUMINANCE: Self = Self::from_bytes(*b"lumi");
    pub const TECH: Self = Self::from_bytes(*b"tech");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fourcc(self.0, f)
    }
}

/// Type signatures for ICC tag payloads and their nested elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARAMETRIC_CURVE: Self = Self::from_bytes(*b"para");
    pub const LUT8: Self = Self::from_bytes(*b"mft1");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const LUT_A_TO_B: Self = Self::from_bytes(*b"mAB ");
    pub const LUT_B_TO_A: Self = Self::from_bytes(*b"mBA ");
    pub const MULTI_LOCALIZED_UNICODE: Self = Self::from_bytes(*b"mluc");
    pub const TEXT_DESCRIPTION: Self = Self::from_bytes(*b"desc");
    pub const TEXT: Self = Self::from_bytes(*b"text");
    pub const SIGNATURE: Self = Self::from_bytes(*b"sig ");
    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const S15_FIXED16_ARRAY: Self = Self::from_bytes(*b"sf32");
    pub const MULTI_PROCESS_ELEMENTS: Self = Self::from_bytes(*b"mpet");

    // Processing elements inside 'mpet'
    pub const CURVE_SET_ELEMENT: Self = Self::from_bytes(*b"cvst");
    pub const MATRIX_ELEMENT: Self = Self::from_bytes(*b"matf");
    pub const CLUT_ELEMENT: Self = Self::from_bytes(*b"clut");
    pub const BEGIN_ACS_ELEMENT: Self = Self::from_bytes(*b"bACS");
    pub const END_ACS_ELEMENT: Self = Self::from_bytes(*b"eACS");

    // Curve records inside 'cvst'
    pub const SEGMENTED_CURVE: Self = Self::from_bytes(*b"curf");
    pub const FORMULA_SEGMENT: Self = Self::from_bytes(*b"parf");
    pub const SAMPLED_SEGMENT: Self = Self::from_bytes(*b"samf");
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fourcc(self.0, f)
    }
}

macro_rules! known_tags {
    ($($variant:ident = $fourcc:literal,)+) => {
        /// Well-known tag signatures with a fixed slot in the tag table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum KnownTag {
            $($variant,)+
        }

        impl KnownTag {
            /// Every known tag, in slot order
            pub const ALL: [KnownTag; KNOWN_TAG_COUNT] = [$(KnownTag::$variant,)+];

            pub const fn signature(self) -> TagSignature {
                match self {
                    $(KnownTag::$variant => TagSignature::from_bytes(*$fourcc),)+
                }
            }

            pub fn from_signature(sig: TagSignature) -> Option<Self> {
                match &sig.0.to_be_bytes() {
                    $($fourcc => Some(KnownTag::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

/// Number of slots in the known-tag table
pub const KNOWN_TAG_COUNT: usize = 63;

known_tags! {
    AToB0 = b"A2B0",
    AToB1 = b"A2B1",
    AToB2 = b"A2B2",
    BlueColorant = b"bXYZ",
    BlueTrc = b"bTRC",
    BToA0 = b"B2A0",
    BToA1 = b"B2A1",
    BToA2 = b"B2A2",
    BToD0 = b"B2D0",
    BToD1 = b"B2D1",
    BToD2 = b"B2D2",
    BToD3 = b"B2D3",
    CalibrationDateTime = b"calt",
    CharTarget = b"targ",
    ChromaticAdaptation = b"chad",
    Chromaticity = b"chrm",
    ColorantOrder = b"clro",
    ColorantTable = b"clrt",
    ColorantTableOut = b"clot",
    ColorimetricIntentImageState = b"ciis",
    Copyright = b"cprt",
    DeviceMfgDesc = b"dmnd",
    DeviceModelDesc = b"dmdd",
    DToB0 = b"D2B0",
    DToB1 = b"D2B1",
    DToB2 = b"D2B2",
    DToB3 = b"D2B3",
    Gamut = b"gamt",
    GrayTrc = b"kTRC",
    GreenColorant = b"gXYZ",
    GreenTrc = b"gTRC",
    Luminance = b"lumi",
    Measurement = b"meas",
    MediaWhitePoint = b"wtpt",
    NamedColor2 = b"ncl2",
    OutputResponse = b"resp",
    PerceptualRenderingIntentGamut = b"rig0",
    Preview0 = b"pre0",
    Preview1 = b"pre1",
    Preview2 = b"pre2",
    ProfileDescription = b"desc",
    ProfileSequenceDesc = b"pseq",
    ProfileSequenceIdentifier = b"psid",
    RedColorant = b"rXYZ",
    RedTrc = b"rTRC",
    SaturationRenderingIntentGamut = b"rig2",
    Technology = b"tech",
    ViewingCondDesc = b"vued",
    ViewingConditions = b"view",
    MediaBlackPoint = b"bkpt",
    CrdInfo = b"crdi",
    DeviceSettings = b"devs",
    NamedColor = b"ncol",
    Ps2Crd0 = b"psd0",
    Ps2Crd1 = b"psd1",
    Ps2Crd2 = b"psd2",
    Ps2Crd3 = b"psd3",
    Ps2Csa = b"ps2s",
    Ps2RenderingIntent = b"ps2i",
    ScreeningDesc = b"scrd",
    Screening = b"scrn",
    UcrBg = b"bfd ",
    VideoCardGamma = b"vcgt",
}

impl KnownTag {
    /// Index of this tag's slot
    pub const fn slot(self) -> usize {
        self as usize
    }
}
