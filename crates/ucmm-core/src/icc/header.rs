//! ICC Profile Header
//!
//! The header is exactly 128 bytes and precedes the tag table.
//! See ICC.1:2010 (v4.3) section 7.2.

use log::debug;

use super::error::IccError;
use super::reader::ByteCursor;
use super::types::{DateTimeNumber, XyzNumber};

/// Profile file signature - must be 'acsp' (0x61637370)
pub const PROFILE_SIGNATURE: u32 = 0x61637370;

/// Size of the fixed header record
pub const HEADER_SIZE: usize = 128;

/// ICC Profile Header (128 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileHeader {
    /// Profile size in bytes
    pub size: u32,
    /// Preferred CMM type signature
    pub cmm_type: u32,
    /// Raw version field
    pub version_raw: u32,
    pub version: ProfileVersion,
    /// Device class (display, input, output, etc.)
    pub device_class: ProfileClass,
    /// Color space of data (RGB, CMYK, etc.)
    pub color_space: ColorSpace,
    /// Profile connection space (XYZ or Lab)
    pub pcs: ColorSpace,
    pub creation_date: DateTimeNumber,
    /// Profile file signature (always 'acsp' once parsed)
    pub signature: u32,
    /// Primary platform signature
    pub platform: u32,
    pub flags: u32,
    pub manufacturer: u32,
    pub model: u32,
    pub attributes: u64,
    /// Raw rendering intent field
    pub rendering_intent: u32,
    /// PCS illuminant (nominally D50)
    pub illuminant: XyzNumber,
    pub creator: u32,
    /// Profile ID (MD5 digest, or zero)
    pub profile_id: [u8; 16],
}

impl ProfileHeader {
    /// Parse the fixed header record.
    ///
    /// Fails with [`IccError::InvalidSignature`] when bytes 36..40 are not
    /// `'acsp'`, and with [`IccError::TruncatedData`] on short input.
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        let mut cursor = ByteCursor::new(data);
        cursor.ensure(HEADER_SIZE)?;

        let size = cursor.read_u32()?;
        let cmm_type = cursor.read_u32()?;
        let version_raw = cursor.read_u32()?;
        let device_class = ProfileClass::from_u32(cursor.read_u32()?);
        let color_space = ColorSpace::from_u32(cursor.read_u32()?);
        let pcs = ColorSpace::from_u32(cursor.read_u32()?);
        let creation_date = cursor.read_datetime()?;

        let signature = cursor.read_u32()?;
        if signature != PROFILE_SIGNATURE {
            return Err(IccError::InvalidSignature(signature));
        }

        let platform = cursor.read_u32()?;
        let flags = cursor.read_u32()?;
        let manufacturer = cursor.read_u32()?;
        let model = cursor.read_u32()?;
        let attributes = cursor.read_u64()?;
        let rendering_intent = cursor.read_u32()?;
        let illuminant = cursor.read_xyz_number()?;
        let creator = cursor.read_u32()?;

        let mut profile_id = [0u8; 16];
        profile_id.copy_from_slice(cursor.take(16)?);

        let header = Self {
            size,
            cmm_type,
            version_raw,
            version: ProfileVersion::from_raw(version_raw),
            device_class,
            color_space,
            pcs,
            creation_date,
            signature,
            platform,
            flags,
            manufacturer,
            model,
            attributes,
            rendering_intent,
            illuminant,
            creator,
            profile_id,
        };
        debug!(
            "parsed ICC header: v{}.{}.{} {:?} {:?} -> {:?}",
            header.version.major,
            header.version.minor,
            header.version.patch,
            header.device_class,
            header.color_space,
            header.pcs
        );
        Ok(header)
    }

    /// Decoded rendering intent, if the raw value is one of the four intents
    pub fn intent(&self) -> Option<RenderingIntent> {
        RenderingIntent::from_u32(self.rendering_intent)
    }

    /// Check if this could be a matrix/TRC profile
    pub fn is_matrix_shaper(&self) -> bool {
        matches!(
            self.device_class,
            ProfileClass::Display | ProfileClass::Input | ProfileClass::Output
        ) && matches!(self.color_space, ColorSpace::Rgb)
    }
}

/// ICC Profile Version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProfileVersion {
    /// Decode the BCD version field (major byte, minor/bugfix nibbles)
    pub fn from_raw(raw: u32) -> Self {
        let [major, minor_patch, _, _] = raw.to_be_bytes();
        Self {
            major,
            minor: minor_patch >> 4,
            patch: minor_patch & 0x0F,
        }
    }

    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    pub fn is_v4(&self) -> bool {
        self.major == 4
    }

    pub fn is_v2(&self) -> bool {
        self.major == 2
    }
}

/// ICC Profile Class (Device Class)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileClass {
    /// Input device (scanner, camera)
    Input,
    /// Display device (monitor)
    Display,
    /// Output device (printer)
    Output,
    DeviceLink,
    /// Color space conversion
    ColorSpace,
    Abstract,
    NamedColor,
    Unknown(u32),
}

const CLASS_SIGNATURES: [(ProfileClass, &[u8; 4]); 7] = [
    (ProfileClass::Input, b"scnr"),
    (ProfileClass::Display, b"mntr"),
    (ProfileClass::Output, b"prtr"),
    (ProfileClass::DeviceLink, b"link"),
    (ProfileClass::ColorSpace, b"spac"),
    (ProfileClass::Abstract, b"abst"),
    (ProfileClass::NamedColor, b"nmcl"),
];

impl ProfileClass {
    pub fn from_u32(val: u32) -> Self {
        let bytes = val.to_be_bytes();
        CLASS_SIGNATURES
            .iter()
            .find(|(_, sig)| **sig == bytes)
            .map_or(Self::Unknown(val), |(class, _)| *class)
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Unknown(val) => *val,
            known => CLASS_SIGNATURES
                .iter()
                .find(|(class, _)| class == known)
                .map_or(0, |(_, sig)| u32::from_be_bytes(**sig)),
        }
    }
}

/// Data or connection color space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Xyz,
    Lab,
    Luv,
    YCbCr,
    Yxy,
    Rgb,
    Gray,
    Hsv,
    Hls,
    Cmyk,
    Cmy,
    /// N-colour spaces '2CLR'..'FCLR'
    Color(u8),
    Unknown(u32),
}

const SPACE_SIGNATURES: [(ColorSpace, &[u8; 4], usize); 11] = [
    (ColorSpace::Xyz, b"XYZ ", 3),
    (ColorSpace::Lab, b"Lab ", 3),
    (ColorSpace::Luv, b"Luv ", 3),
    (ColorSpace::YCbCr, b"YCbr", 3),
    (ColorSpace::Yxy, b"Yxy ", 3),
    (ColorSpace::Rgb, b"RGB ", 3),
    (ColorSpace::Gray, b"GRAY", 1),
    (ColorSpace::Hsv, b"HSV ", 3),
    (ColorSpace::Hls, b"HLS ", 3),
    (ColorSpace::Cmyk, b"CMYK", 4),
    (ColorSpace::Cmy, b"CMY ", 3),
];

impl ColorSpace {
    pub fn from_u32(val: u32) -> Self {
        let bytes = val.to_be_bytes();
        if let Some((space, _, _)) = SPACE_SIGNATURES.iter().find(|(_, sig, _)| **sig == bytes) {
            return *space;
        }
        match bytes {
            [n @ b'2'..=b'9', b'C', b'L', b'R'] => Self::Color(n - b'0'),
            [n @ b'A'..=b'F', b'C', b'L', b'R'] => Self::Color(n - b'A' + 10),
            _ => Self::Unknown(val),
        }
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Color(n) => {
                let digit = if *n < 10 { b'0' + n } else { b'A' + n - 10 };
                u32::from_be_bytes([digit, b'C', b'L', b'R'])
            }
            Self::Unknown(val) => *val,
            known => SPACE_SIGNATURES
                .iter()
                .find(|(space, _, _)| space == known)
                .map_or(0, |(_, sig, _)| u32::from_be_bytes(**sig)),
        }
    }

    /// Number of channels, or `None` for unrecognized spaces
    pub fn channel_count(&self) -> Option<usize> {
        match self {
            Self::Color(n) => Some(*n as usize),
            Self::Unknown(_) => None,
            known => SPACE_SIGNATURES
                .iter()
                .find(|(space, _, _)| space == known)
                .map(|(_, _, channels)| *channels),
        }
    }
}

/// Rendering intent, stored as 0..=3 in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum RenderingIntent {
    #[default]
    Perceptual = 0,
    /// Device white maps to media white
    RelativeColorimetric = 1,
    Saturation = 2,
    /// Media white is preserved as measured
    AbsoluteColorimetric = 3,
}

impl RenderingIntent {
    pub fn from_u32(val: u32) -> Option<Self> {
        match val {
            0 => Some(Self::Perceptual),
            1 => Some(Self::RelativeColorimetric),
            2 => Some(Self::Saturation),
            3 => Some(Self::AbsoluteColorimetric),
            _ => None,
        }
    }

    pub fn to_u32(&self) -> u32 {
        *self as u32
    }
}
