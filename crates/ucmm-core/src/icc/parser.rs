//! Header, tag table and lazily parsed tag payloads
//!
//! [`IccParser`] keeps no reference to the stream. Callers hand it the same
//! seekable stream for every call, which lets the owning profile close and
//! reopen its file between requests.

use std::cell::{Cell, OnceCell};
use std::io::{Read, Seek};

use log::{debug, trace, warn};

use super::error::IccError;
use super::header::{HEADER_SIZE, ProfileHeader};
use super::reader::{read_block, read_u32_at, stream_len};
use super::signatures::{KNOWN_TAG_COUNT, TagSignature, TypeSignature};
use super::tags::{TYPE_HEADER_SIZE, TypeVariant};

/// Bytes per tag table record: signature, offset, size
const TAG_RECORD_SIZE: u64 = 12;

/// One tag table entry plus its parsed payload, once requested
#[derive(Debug, Clone)]
pub struct TagElement {
    pub signature: TagSignature,
    /// Offset from the start of the profile
    pub offset: u32,
    /// Declared payload size in bytes
    pub size: u32,
    data: OnceCell<TypeVariant>,
    type_sig: Cell<Option<TypeSignature>>,
}

impl TagElement {
    fn new(signature: TagSignature, offset: u32, size: u32) -> Self {
        Self {
            signature,
            offset,
            size,
            data: OnceCell::new(),
            type_sig: Cell::new(None),
        }
    }

    /// Parsed payload, if it was already requested successfully
    pub fn data(&self) -> Option<&TypeVariant> {
        self.data.get()
    }

    /// Type signature of the payload, once it has been read
    pub fn type_signature(&self) -> Option<TypeSignature> {
        self.type_sig.get()
    }

    fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// Parser state for one profile.
///
/// Tag payloads are parsed on first request and cached for the parser's
/// lifetime. The cache uses interior mutability without locking, so the
/// parser is `!Sync`: share it across threads only behind a `Mutex`.
#[derive(Debug, Clone)]
pub struct IccParser {
    header: Option<ProfileHeader>,
    known: [Option<TagElement>; KNOWN_TAG_COUNT],
    overflow: Vec<TagElement>,
    tag_table_parsed: bool,
}

impl Default for IccParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IccParser {
    pub fn new() -> Self {
        Self {
            header: None,
            known: std::array::from_fn(|_| None),
            overflow: Vec::new(),
            tag_table_parsed: false,
        }
    }

    /// Read and validate the 128-byte header at the start of `stream`.
    ///
    /// Any previously parsed header and tag table are discarded first, so a
    /// failed parse leaves the parser empty.
    pub fn parse_header<R: Read + Seek + ?Sized>(&mut self, stream: &mut R) -> Result<(), IccError> {
        *self = Self::new();
        let bytes = read_block(stream, 0, HEADER_SIZE as u64)?;
        let header = ProfileHeader::parse(&bytes)?;
        self.header = Some(header);
        Ok(())
    }

    /// Read the tag table that follows the header.
    ///
    /// A signature that appears twice replaces the earlier entry. On error
    /// the table is left empty.
    pub fn parse_tag_table<R: Read + Seek + ?Sized>(
        &mut self,
        stream: &mut R,
    ) -> Result<(), IccError> {
        self.known = std::array::from_fn(|_| None);
        self.overflow.clear();
        self.tag_table_parsed = false;

        let table_start = HEADER_SIZE as u64;
        let count = read_u32_at(stream, table_start)?;
        let records_start = table_start + 4;
        let records_len = count as u64 * TAG_RECORD_SIZE;

        let available = stream_len(stream)?;
        if records_start + records_len > available {
            return Err(IccError::TruncatedData {
                offset: records_start,
                needed: records_len,
                available: available.saturating_sub(records_start),
            });
        }

        let records = read_block(stream, records_start, records_len)?;

        for record in records.chunks_exact(TAG_RECORD_SIZE as usize) {
            let field = |i: usize| {
                u32::from_be_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]])
            };
            let element = TagElement::new(TagSignature(field(0)), field(4), field(8));
            trace!(
                "tag '{}' at {} ({} bytes)",
                element.signature, element.offset, element.size
            );
            self.insert(element);
        }

        self.tag_table_parsed = true;
        debug!("tag table: {count} entries, {} distinct", self.tag_count());
        Ok(())
    }

    fn insert(&mut self, element: TagElement) {
        let sig = element.signature;
        let slot = match sig.known() {
            Some(known) => &mut self.known[known as usize],
            None => match self.overflow.iter().position(|e| e.signature == sig) {
                Some(index) => {
                    warn!("duplicate tag '{sig}', keeping the later entry");
                    self.overflow[index] = element;
                    return;
                }
                None => {
                    self.overflow.push(element);
                    return;
                }
            },
        };
        if slot.is_some() {
            warn!("duplicate tag '{sig}', keeping the later entry");
        }
        *slot = Some(element);
    }

    pub fn header(&self) -> Option<&ProfileHeader> {
        self.header.as_ref()
    }

    pub fn is_tag_table_parsed(&self) -> bool {
        self.tag_table_parsed
    }

    /// Table entry for `sig`
    pub fn tag(&self, sig: TagSignature) -> Option<&TagElement> {
        match sig.known() {
            Some(known) => self.known[known as usize].as_ref(),
            None => self.overflow.iter().find(|e| e.signature == sig),
        }
    }

    pub fn has_tag(&self, sig: TagSignature) -> bool {
        self.tag(sig).is_some()
    }

    /// All entries: known tags in slot order, then the rest in table order
    pub fn tags(&self) -> impl Iterator<Item = &TagElement> {
        self.known.iter().flatten().chain(self.overflow.iter())
    }

    pub fn tag_count(&self) -> usize {
        self.tags().count()
    }

    /// Type signature stored at the start of a tag payload, without parsing
    /// the rest of it.
    pub fn tag_type<R: Read + Seek + ?Sized>(
        &self,
        stream: &mut R,
        sig: TagSignature,
    ) -> Result<TypeSignature, IccError> {
        let element = self.tag(sig).ok_or(IccError::TagNotFound(sig))?;
        if let Some(data) = element.data.get() {
            return Ok(data.type_signature());
        }
        if let Some(type_sig) = element.type_signature() {
            return Ok(type_sig);
        }
        let type_sig = TypeSignature(read_u32_at(stream, element.offset as u64)?);
        element.type_sig.set(Some(type_sig));
        Ok(type_sig)
    }

    /// Parsed payload of `sig`, reading it from `stream` on first request.
    ///
    /// Failures are not cached; a later call retries the read.
    pub fn obtain_tag_data<R: Read + Seek + ?Sized>(
        &self,
        stream: &mut R,
        sig: TagSignature,
    ) -> Result<&TypeVariant, IccError> {
        let element = self.tag(sig).ok_or(IccError::TagNotFound(sig))?;
        if let Some(data) = element.data.get() {
            return Ok(data);
        }

        let stream_len = stream_len(stream)?;
        if element.end() > stream_len {
            return Err(IccError::TagOutOfBounds {
                tag: sig,
                offset: element.offset,
                size: element.size,
                stream_len,
            });
        }
        if (element.size as usize) < TYPE_HEADER_SIZE {
            return Err(IccError::TruncatedData {
                offset: element.offset as u64,
                needed: TYPE_HEADER_SIZE as u64,
                available: element.size as u64,
            });
        }

        let payload = read_block(stream, element.offset as u64, element.size as u64)?;
        let variant = TypeVariant::parse(&payload)?;
        debug!("parsed tag '{sig}' as '{}'", variant.type_signature());
        element.type_sig.set(Some(variant.type_signature()));
        Ok(element.data.get_or_init(|| variant))
    }
}
