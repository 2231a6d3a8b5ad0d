//! Profiles backed by a reopenable byte source
//!
//! ```ignore
//! use ucmm_core::icc::{IccProfile, TagSignature};
//!
//! let mut profile = IccProfile::load_path("display.icc")?;
//! println!("{:?}", profile.description()?);
//! let red = profile.obtain_tag_data(TagSignature::RED_COLORANT)?;
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use super::error::IccError;
use super::header::ProfileHeader;
use super::parser::{IccParser, TagElement};
use super::signatures::TagSignature;
use super::tags::TypeVariant;

/// Something a profile can (re)open as a seekable byte stream
pub trait ProfileSource {
    type Stream: Read + Seek;

    fn open_stream(&self) -> io::Result<Self::Stream>;
}

/// Profile stored in a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileSource for FileSource {
    type Stream = BufReader<File>;

    fn open_stream(&self) -> io::Result<Self::Stream> {
        File::open(&self.path).map(BufReader::new)
    }
}

/// Profile held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ProfileSource for MemorySource {
    type Stream = Cursor<Arc<[u8]>>;

    fn open_stream(&self) -> io::Result<Self::Stream> {
        Ok(Cursor::new(Arc::clone(&self.bytes)))
    }
}

/// An ICC profile whose tags are parsed on demand.
///
/// The header is read by [`load`](Self::load); the tag table is read the
/// first time a tag is requested. The stream can be released with
/// [`close`](Self::close) at any point and is reopened transparently by the
/// next tag request.
///
/// Parsed tags are cached without locking, so a profile is `!Sync`.
pub struct IccProfile<S: ProfileSource = FileSource> {
    source: S,
    stream: Option<S::Stream>,
    parser: IccParser,
}

impl<S: ProfileSource> fmt::Debug for IccProfile<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IccProfile")
            .field("source", &self.source)
            .field("open", &self.stream.is_some())
            .field("header", &self.parser.header())
            .finish()
    }
}

impl IccProfile<FileSource> {
    /// Open `path` and parse its header.
    pub fn load_path(path: impl Into<PathBuf>) -> Result<Self, IccError> {
        let mut profile = Self::new(FileSource::new(path));
        profile.load()?;
        Ok(profile)
    }
}

impl IccProfile<MemorySource> {
    /// Parse the header of an in-memory profile.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, IccError> {
        let mut profile = Self::new(MemorySource::new(bytes));
        profile.load()?;
        Ok(profile)
    }
}

impl<S: ProfileSource> IccProfile<S> {
    /// A profile that has not been read yet
    pub fn new(source: S) -> Self {
        Self {
            source,
            stream: None,
            parser: IccParser::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Open the source and parse the header. The stream is closed again if
    /// the header is invalid.
    pub fn load(&mut self) -> Result<(), IccError> {
        self.parser = IccParser::new();
        self.open()?;
        let result = match self.stream.as_mut() {
            Some(stream) => self.parser.parse_header(stream),
            None => Err(IccError::NoFile),
        };
        if let Err(e) = &result {
            warn!("failed to load profile header: {e}");
            self.close();
        }
        result
    }

    /// Acquire the stream if it is not already open.
    pub fn open(&mut self) -> Result<(), IccError> {
        if self.stream.is_none() {
            let stream = self.source.open_stream().map_err(|e| {
                warn!("cannot open profile source: {e}");
                IccError::Open(e)
            })?;
            self.stream = Some(stream);
            debug!("opened profile stream");
        }
        Ok(())
    }

    /// Release the stream. Parsed data stays available.
    pub fn close(&mut self) {
        self.stream = None;
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether the header was parsed successfully
    pub fn is_loaded(&self) -> bool {
        self.parser.header().is_some()
    }

    pub fn header(&self) -> Result<&ProfileHeader, IccError> {
        self.parser.header().ok_or(IccError::HeaderNotFound)
    }

    pub fn parser(&self) -> &IccParser {
        &self.parser
    }

    /// Open the stream and read the tag table, once.
    fn prepare(&mut self) -> Result<(), IccError> {
        if !self.is_loaded() {
            return Err(IccError::NoFile);
        }
        self.open()?;
        let stream = self.stream.as_mut().ok_or(IccError::NoFile)?;
        if !self.parser.is_tag_table_parsed() {
            self.parser.parse_tag_table(stream)?;
        }
        Ok(())
    }

    /// Parsed payload of `sig`, reading the tag table and the tag on first
    /// use.
    pub fn obtain_tag_data(&mut self, sig: TagSignature) -> Result<&TypeVariant, IccError> {
        // Cached payloads need no stream
        if self.cached(sig) {
            return self
                .parser
                .tag(sig)
                .and_then(TagElement::data)
                .ok_or(IccError::TagNotFound(sig));
        }
        self.prepare()?;
        let stream = self.stream.as_mut().ok_or(IccError::NoFile)?;
        self.parser.obtain_tag_data(stream, sig)
    }

    fn cached(&self, sig: TagSignature) -> bool {
        self.parser
            .tag(sig)
            .is_some_and(|element| element.data().is_some())
    }

    /// Whether the tag table lists `sig`
    pub fn has_tag(&mut self, sig: TagSignature) -> Result<bool, IccError> {
        self.prepare()?;
        Ok(self.parser.has_tag(sig))
    }

    /// Signatures of every tag in the table
    pub fn tag_signatures(&mut self) -> Result<Vec<TagSignature>, IccError> {
        self.prepare()?;
        Ok(self.parser.tags().map(|t| t.signature).collect())
    }

    /// Profile description text, if the profile carries a readable one
    pub fn description(&mut self) -> Result<Option<String>, IccError> {
        if !self.has_tag(TagSignature::PROFILE_DESC)? {
            return Ok(None);
        }
        let data = self.obtain_tag_data(TagSignature::PROFILE_DESC)?;
        Ok(data.text().map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::header::{ColorSpace, ProfileClass};

    fn minimal_profile() -> Vec<u8> {
        let mut desc = b"desc\0\0\0\0".to_vec();
        desc.extend(5u32.to_be_bytes());
        desc.extend(b"Test\0");
        desc.extend([0u8; 4 + 4]); // no unicode
        desc.extend([0u8; 2 + 1 + 67]); // empty script code record
        let offset = 128 + 4 + 12;
        let total = offset + desc.len();

        let mut data = vec![0u8; 128];
        data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
        data[8..12].copy_from_slice(&0x0430_0000u32.to_be_bytes());
        data[12..16].copy_from_slice(b"mntr");
        data[16..20].copy_from_slice(b"RGB ");
        data[20..24].copy_from_slice(b"XYZ ");
        data[36..40].copy_from_slice(b"acsp");
        data.extend(1u32.to_be_bytes());
        data.extend(b"desc");
        data.extend((offset as u32).to_be_bytes());
        data.extend((desc.len() as u32).to_be_bytes());
        data.extend(desc);
        data
    }

    #[test]
    fn test_load_from_memory() {
        let mut profile = IccProfile::from_bytes(minimal_profile()).unwrap();
        let header = profile.header().unwrap();
        assert_eq!(header.device_class, ProfileClass::Display);
        assert_eq!(header.color_space, ColorSpace::Rgb);
        assert_eq!(profile.description().unwrap().as_deref(), Some("Test"));
        assert!(!profile.has_tag(TagSignature::A2B0).unwrap());
    }

    #[test]
    fn test_reopen_after_close() {
        let mut profile = IccProfile::from_bytes(minimal_profile()).unwrap();
        profile.close();
        assert!(!profile.is_open());
        assert!(profile.obtain_tag_data(TagSignature::PROFILE_DESC).is_ok());
        assert!(profile.is_open());
    }

    #[test]
    fn test_cached_tag_needs_no_stream() {
        let mut profile = IccProfile::from_bytes(minimal_profile()).unwrap();
        profile.obtain_tag_data(TagSignature::PROFILE_DESC).unwrap();
        profile.close();
        assert!(profile.obtain_tag_data(TagSignature::PROFILE_DESC).is_ok());
        assert!(!profile.is_open());
    }

    #[test]
    fn test_tags_need_header() {
        let mut profile = IccProfile::new(MemorySource::new(vec![0u8; 16]));
        assert!(matches!(
            profile.obtain_tag_data(TagSignature::RED_TRC),
            Err(IccError::NoFile)
        ));
        assert!(matches!(profile.header(), Err(IccError::HeaderNotFound)));
    }

    #[test]
    fn test_failed_load_closes_stream() {
        let mut bytes = minimal_profile();
        bytes[36] = b'x';
        let mut profile = IccProfile::new(MemorySource::new(bytes));
        assert!(profile.load().is_err());
        assert!(!profile.is_open());
        assert!(!profile.is_loaded());
    }

    #[test]
    fn test_missing_file() {
        let err = IccProfile::load_path("/nonexistent/ucmm/profile.icc").unwrap_err();
        assert!(matches!(err, IccError::Open(_)));
    }
}
