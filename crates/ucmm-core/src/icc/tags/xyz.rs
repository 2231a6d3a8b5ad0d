//! XYZ and s15Fixed16 array types
//!
//! Used for colorants (rXYZ, gXYZ, bXYZ), the media white point (wtpt)
//! and the chromatic adaptation matrix (chad).

use crate::color::Xyz;
use crate::icc::error::IccError;
use crate::icc::reader::ByteCursor;
use crate::icc::types::{S15Fixed16, XyzNumber};

/// XYZType: a list of XYZNumbers filling the payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XyzArray {
    pub values: Vec<XyzNumber>,
}

impl XyzArray {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let count = cursor.remaining() / 12;
        let values = (0..count)
            .map(|_| cursor.read_xyz_number())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn first(&self) -> Option<&XyzNumber> {
        self.values.first()
    }

    /// First entry as a color
    pub fn to_xyz(&self) -> Option<Xyz> {
        self.first().map(XyzNumber::to_xyz)
    }
}

/// s15Fixed16ArrayType
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct S15Fixed16Array {
    pub values: Vec<S15Fixed16>,
}

impl S15Fixed16Array {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let count = cursor.remaining() / 4;
        let values = (0..count)
            .map(|_| cursor.read_s15fixed16())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.to_f64()).collect()
    }

    /// Row-major 3x3 matrix, when the array holds exactly nine values
    pub fn as_matrix3(&self) -> Option<[[f64; 3]; 3]> {
        if self.values.len() != 9 {
            return None;
        }
        Some(std::array::from_fn(|row| {
            std::array::from_fn(|col| self.values[row * 3 + col].to_f64())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xyz_tag() {
        let data = [
            0x00, 0x00, 0xF6, 0xD6, // X = 0.9642
            0x00, 0x01, 0x00, 0x00, // Y = 1.0
            0x00, 0x00, 0xD3, 0x2D, // Z = 0.8249
        ];
        let xyz = XyzArray::parse(&mut ByteCursor::new(&data)).unwrap();
        let color = xyz.to_xyz().unwrap();
        assert!((color.x - 0.9642).abs() < 0.001);
        assert!((color.z - 0.8249).abs() < 0.001);
    }

    #[test]
    fn test_trailing_bytes_are_left_unread() {
        let data = [0u8; 26];
        let mut cursor = ByteCursor::new(&data);
        let xyz = XyzArray::parse(&mut cursor).unwrap();
        assert_eq!(xyz.values.len(), 2);
        assert_eq!(cursor.furthest(), 24);
    }

    #[test]
    fn test_empty_xyz() {
        let xyz = XyzArray::parse(&mut ByteCursor::new(&[])).unwrap();
        assert!(xyz.to_xyz().is_none());
    }

    #[test]
    fn test_sf32_matrix() {
        let mut data = Vec::new();
        for i in 0..9i32 {
            data.extend((i << 16).to_be_bytes());
        }
        let arr = S15Fixed16Array::parse(&mut ByteCursor::new(&data)).unwrap();
        let m = arr.as_matrix3().unwrap();
        assert_eq!(m[2][1], 7.0);
        assert_eq!(arr.to_f64_vec().len(), 9);
    }
}
