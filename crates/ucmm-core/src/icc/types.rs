//! ICC numeric encodings and fixed-size records.
//!
//! Every multi-byte number in a profile is big-endian. The fixed-point
//! encodings split the word into an integer part and a fractional part:
//! `s15Fixed16Number` (signed 16.16) and `u8Fixed8Number` (unsigned 8.8).

use crate::color::Xyz;

/// Decode an `s15Fixed16Number` from its raw 32-bit pattern.
///
/// Any bit pattern is valid.
#[inline]
pub fn decode_s15fixed16(raw: u32) -> f32 {
    S15Fixed16(raw as i32).to_f32()
}

/// Encode a value as an `s15Fixed16Number`, rounding to the nearest step
/// and saturating outside the representable range.
#[inline]
pub fn encode_s15fixed16(value: f32) -> u32 {
    S15Fixed16::from_f64(value as f64).0 as u32
}

/// Decode a `u8Fixed8Number`.
#[inline]
pub fn decode_u8fixed8(raw: u16) -> f32 {
    raw as f32 / 256.0
}

/// Encode a value as a `u8Fixed8Number`.
#[inline]
pub fn encode_u8fixed8(value: f32) -> u16 {
    U8Fixed8::from_f64(value as f64).0
}

/// s15Fixed16Number - 16.16 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    pub const ONE: Self = Self(0x0001_0000);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Nearest representable value, saturating at the range ends
    pub fn from_f64(val: f64) -> Self {
        Self((val * 65536.0).round() as i32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}

/// u8Fixed8Number - unsigned 8.8 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U8Fixed8(pub u16);

impl U8Fixed8 {
    pub fn from_f64(val: f64) -> Self {
        Self((val * 256.0).round() as u16)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }
}

/// XYZNumber - ICC XYZ value (3 × s15Fixed16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    pub fn from_xyz(xyz: Xyz) -> Self {
        Self {
            x: S15Fixed16::from_f64(xyz.x),
            y: S15Fixed16::from_f64(xyz.y),
            z: S15Fixed16::from_f64(xyz.z),
        }
    }

    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

/// dateTimeNumber - ICC date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeNumber {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}
