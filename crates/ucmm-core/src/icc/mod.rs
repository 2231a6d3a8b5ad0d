//! ICC Profile Parsing
//!
//! Native parsing of ICC.1:2010 (v4.3) profiles.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table listing all tags
//! 3. Tag data (may overlap)
//!
//! The header is read eagerly; the tag table and individual tag payloads
//! are read the first time a tag is requested and cached afterwards.
//!
//! # Example
//!
//! ```ignore
//! use ucmm_core::icc::{IccProfile, TagSignature};
//!
//! let mut profile = IccProfile::from_bytes(bytes)?;
//! if profile.header()?.is_matrix_shaper() {
//!     let trc = profile.obtain_tag_data(TagSignature::RED_TRC)?;
//! }
//! ```

pub mod header;
pub mod tags;

mod error;
mod parser;
mod profile;
mod reader;
mod signatures;
mod types;

pub use error::IccError;
pub use header::{
    ColorSpace, HEADER_SIZE, PROFILE_SIGNATURE, ProfileClass, ProfileHeader, ProfileVersion,
    RenderingIntent,
};
pub use parser::{IccParser, TagElement};
pub use profile::{FileSource, IccProfile, MemorySource, ProfileSource};
pub use reader::ByteCursor;
pub use signatures::{KNOWN_TAG_COUNT, KnownTag, TagSignature, TypeSignature};
pub use tags::TypeVariant;
pub use types::{
    DateTimeNumber, S15Fixed16, U8Fixed8, XyzNumber, decode_s15fixed16, decode_u8fixed8,
    encode_s15fixed16, encode_u8fixed8,
};
