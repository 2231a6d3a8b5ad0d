//! Big-endian readers for profile streams and tag payloads.
//!
//! Stream access goes through [`read_block`], which checks the requested
//! range against the stream length before allocating. Payload bytes are
//! then decoded with a [`ByteCursor`] that reports overruns as
//! [`IccError::TruncatedData`] instead of panicking.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use super::error::IccError;
use super::types::{DateTimeNumber, S15Fixed16, U8Fixed8, XyzNumber};

fn map_read_error(err: io::Error, offset: u64, needed: u64, available: u64) -> IccError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        IccError::TruncatedData {
            offset,
            needed,
            available,
        }
    } else {
        IccError::Io(err)
    }
}

/// Total length of a seekable stream.
pub(crate) fn stream_len<R: Seek + ?Sized>(stream: &mut R) -> Result<u64, IccError> {
    Ok(stream.seek(SeekFrom::End(0))?)
}

/// Read `len` bytes starting at `offset`, failing without allocation when
/// the range extends past the end of the stream.
pub(crate) fn read_block<R: Read + Seek + ?Sized>(
    stream: &mut R,
    offset: u64,
    len: u64,
) -> Result<Vec<u8>, IccError> {
    let available = stream_len(stream)?;
    let in_range = offset.checked_add(len).is_some_and(|end| end <= available);
    let size = usize::try_from(len).ok().filter(|_| in_range).ok_or(IccError::TruncatedData {
        offset,
        needed: len,
        available: available.saturating_sub(offset),
    })?;

    stream.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; size];
    stream
        .read_exact(&mut buf)
        .map_err(|e| map_read_error(e, offset, len, available.saturating_sub(offset)))?;
    Ok(buf)
}

/// Read one big-endian `u32` at `offset`.
pub(crate) fn read_u32_at<R: Read + Seek + ?Sized>(
    stream: &mut R,
    offset: u64,
) -> Result<u32, IccError> {
    let available = stream_len(stream)?;
    stream.seek(SeekFrom::Start(offset))?;
    stream
        .read_u32::<BigEndian>()
        .map_err(|e| map_read_error(e, offset, 4, available.saturating_sub(offset)))
}

macro_rules! impl_read_be {
    ($($name:ident -> $ty:ty, $size:expr, $decode:path;)+) => {
        $(
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, IccError> {
                let bytes = self.take($size)?;
                Ok($decode(bytes))
            }
        )+
    };
}

/// Bounds-checked cursor over one tag payload.
///
/// Positions are relative to the start of the payload, which is where the
/// offsets embedded in ICC structures are measured from. The cursor
/// remembers the furthest byte it has consumed so callers can compare the
/// parsed extent with the declared tag size.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    furthest: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            furthest: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// One past the last byte consumed so far
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn truncated(&self, needed: usize) -> IccError {
        IccError::TruncatedData {
            offset: self.pos as u64,
            needed: needed as u64,
            available: self.remaining() as u64,
        }
    }

    /// Fail unless `needed` more bytes are available.
    pub fn ensure(&self, needed: usize) -> Result<(), IccError> {
        if needed > self.remaining() {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    /// Like [`ensure`](Self::ensure) for `count` records of `size` bytes,
    /// guarding the multiplication.
    pub fn ensure_records(&self, count: usize, size: usize) -> Result<(), IccError> {
        match count.checked_mul(size) {
            Some(needed) => self.ensure(needed),
            None => Err(self.truncated(usize::MAX)),
        }
    }

    /// Move to an absolute position within the payload.
    pub fn seek(&mut self, pos: usize) -> Result<(), IccError> {
        if pos > self.data.len() {
            return Err(IccError::TruncatedData {
                offset: pos as u64,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Round the position up to the next 4-byte boundary.
    pub fn align4(&mut self) {
        self.pos = self.pos.saturating_add(3) & !3;
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], IccError> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        self.furthest = self.furthest.max(self.pos);
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), IccError> {
        self.take(n).map(|_| ())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, IccError> {
        Ok(self.take(1)?[0])
    }

    impl_read_be! {
        read_u16 -> u16, 2, BigEndian::read_u16;
        read_u32 -> u32, 4, BigEndian::read_u32;
        read_u64 -> u64, 8, BigEndian::read_u64;
        read_i32 -> i32, 4, BigEndian::read_i32;
        read_f32 -> f32, 4, BigEndian::read_f32;
    }

    pub fn read_s15fixed16(&mut self) -> Result<S15Fixed16, IccError> {
        self.read_i32().map(S15Fixed16)
    }

    pub fn read_u8fixed8(&mut self) -> Result<U8Fixed8, IccError> {
        self.read_u16().map(U8Fixed8)
    }

    pub fn read_xyz_number(&mut self) -> Result<XyzNumber, IccError> {
        Ok(XyzNumber {
            x: self.read_s15fixed16()?,
            y: self.read_s15fixed16()?,
            z: self.read_s15fixed16()?,
        })
    }

    pub fn read_datetime(&mut self) -> Result<DateTimeNumber, IccError> {
        Ok(DateTimeNumber {
            year: self.read_u16()?,
            month: self.read_u16()?,
            day: self.read_u16()?,
            hour: self.read_u16()?,
            minute: self.read_u16()?,
            second: self.read_u16()?,
        })
    }

    /// Read `count` big-endian `u16` values.
    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>, IccError> {
        self.ensure_records(count, 2)?;
        (0..count).map(|_| self.read_u16()).collect()
    }

    /// Read `count` IEEE 754 `float32Number` values.
    pub fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, IccError> {
        self.ensure_records(count, 4)?;
        (0..count).map(|_| self.read_f32()).collect()
    }
}
