//! Text Tag Types
//!
//! - text: plain ASCII
//! - desc: v2 textDescriptionType (ASCII, Unicode and ScriptCode forms)
//! - mluc: v4 multiLocalizedUnicodeType

use crate::icc::error::IccError;
use crate::icc::reader::ByteCursor;
use crate::icc::signatures::TypeSignature;

/// ASCII bytes up to the first NUL
fn ascii_until_nul(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Decode UTF-16BE, stopping at a NUL terminator
fn decode_utf16be(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|&c| c != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

fn code_to_string(code: u16) -> String {
    code.to_be_bytes().iter().map(|&b| b as char).collect()
}

pub(crate) fn parse_text(cursor: &mut ByteCursor<'_>) -> Result<String, IccError> {
    let bytes = cursor.take(cursor.remaining())?;
    Ok(ascii_until_nul(bytes))
}

/// One localized record of a multiLocalizedUnicodeType
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    /// ISO 639-1 code packed in two bytes
    pub language: u16,
    /// ISO 3166-1 code packed in two bytes
    pub country: u16,
    pub text: String,
}

impl LocalizedString {
    pub fn language_code(&self) -> String {
        code_to_string(self.language)
    }

    pub fn country_code(&self) -> String {
        code_to_string(self.country)
    }
}

/// multiLocalizedUnicodeType
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiLocalizedUnicode {
    pub records: Vec<LocalizedString>,
}

impl MultiLocalizedUnicode {
    const MIN_RECORD_SIZE: usize = 12;

    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let count = cursor.read_u32()? as usize;
        let record_size = cursor.read_u32()? as usize;
        if record_size < Self::MIN_RECORD_SIZE {
            return Err(IccError::malformed(
                TypeSignature::MULTI_LOCALIZED_UNICODE,
                format!("record size {record_size}"),
            ));
        }
        cursor.ensure_records(count, record_size)?;

        let table_start = cursor.position();
        let mut records = Vec::with_capacity(count);
        for i in 0..count {
            cursor.seek(table_start + i * record_size)?;
            let language = cursor.read_u16()?;
            let country = cursor.read_u16()?;
            let length = cursor.read_u32()? as usize;
            let offset = cursor.read_u32()? as usize;
            cursor.skip(record_size - Self::MIN_RECORD_SIZE)?;

            cursor.seek(offset)?;
            let text = decode_utf16be(cursor.take(length)?);
            records.push(LocalizedString {
                language,
                country,
                text,
            });
        }
        Ok(Self { records })
    }

    pub fn first(&self) -> Option<&str> {
        self.records.first().map(|r| r.text.as_str())
    }

    /// Exact language and country match, else same language, else the first record.
    pub fn best_match(&self, language: &str, country: &str) -> Option<&str> {
        let lang = |r: &&LocalizedString| r.language_code().eq_ignore_ascii_case(language);
        self.records
            .iter()
            .filter(lang)
            .find(|r| r.country_code().eq_ignore_ascii_case(country))
            .or_else(|| self.records.iter().find(|r| lang(r)))
            .map(|r| r.text.as_str())
            .or_else(|| self.first())
    }
}

/// textDescriptionType: the same text in three encodings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDescription {
    pub ascii: String,
    pub unicode_language: u32,
    pub unicode: String,
    pub script_code: u16,
    /// Macintosh ScriptCode bytes actually used
    pub mac: Vec<u8>,
}

impl TextDescription {
    const MAC_FIELD_LEN: usize = 67;

    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let ascii_count = cursor.read_u32()? as usize;
        let ascii = ascii_until_nul(cursor.take(ascii_count)?);

        let unicode_language = cursor.read_u32()?;
        let unicode_count = cursor.read_u32()? as usize;
        cursor.ensure_records(unicode_count, 2)?;
        let unicode = decode_utf16be(cursor.take(unicode_count * 2)?);

        let script_code = cursor.read_u16()?;
        let mac_count = cursor.read_u8()? as usize;
        if mac_count > Self::MAC_FIELD_LEN {
            return Err(IccError::malformed(
                TypeSignature::TEXT_DESCRIPTION,
                format!("ScriptCode count {mac_count}"),
            ));
        }
        let mac_field = cursor.take(Self::MAC_FIELD_LEN)?;

        Ok(Self {
            ascii,
            unicode_language,
            unicode,
            script_code,
            mac: mac_field[..mac_count].to_vec(),
        })
    }

    /// The best available representation
    pub fn text(&self) -> &str {
        if self.ascii.is_empty() {
            &self.unicode
        } else {
            &self.ascii
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc_body(ascii: &[u8]) -> Vec<u8> {
        let mut data = (ascii.len() as u32).to_be_bytes().to_vec();
        data.extend_from_slice(ascii);
        data.extend([0, 0, 0, 0]);
        data.extend([0, 0, 0, 0]);
        data.extend([0, 0, 0]);
        data.extend([0u8; 67]);
        data
    }

    #[test]
    fn test_parse_text() {
        let data = b"Hello, World!\0\0\0";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(parse_text(&mut cursor).unwrap(), "Hello, World!");
        assert_eq!(cursor.furthest(), data.len());
    }

    #[test]
    fn test_parse_desc() {
        let data = desc_body(b"sRGB\0");
        let mut cursor = ByteCursor::new(&data);
        let desc = TextDescription::parse(&mut cursor).unwrap();
        assert_eq!(desc.text(), "sRGB");
        assert!(desc.mac.is_empty());
        assert_eq!(cursor.furthest(), data.len());
    }

    #[test]
    fn test_parse_desc_truncated_mac_field() {
        let mut data = desc_body(b"sRGB\0");
        data.truncate(data.len() - 10);
        assert!(TextDescription::parse(&mut ByteCursor::new(&data)).is_err());
    }

    #[test]
    fn test_parse_mluc() {
        // Offsets are measured from the type signature
        let mut data = b"mluc\0\0\0\0".to_vec();
        data.extend(2u32.to_be_bytes());
        data.extend(12u32.to_be_bytes());
        data.extend(b"enUS");
        data.extend(8u32.to_be_bytes());
        data.extend(40u32.to_be_bytes());
        data.extend(b"deDE");
        data.extend(4u32.to_be_bytes());
        data.extend(48u32.to_be_bytes());
        data.extend([0, b's', 0, b'R', 0, b'G', 0, b'B']);
        data.extend([0, b'R', 0, b'G']);

        let mut cursor = ByteCursor::new(&data);
        cursor.skip(8).unwrap();
        let mluc = MultiLocalizedUnicode::parse(&mut cursor).unwrap();
        assert_eq!(mluc.records.len(), 2);
        assert_eq!(mluc.first(), Some("sRGB"));
        assert_eq!(mluc.records[1].language_code(), "de");
        assert_eq!(mluc.best_match("de", "AT"), Some("RG"));
        assert_eq!(mluc.best_match("fr", "FR"), Some("sRGB"));
        assert_eq!(cursor.furthest(), data.len());
    }

    #[test]
    fn test_mluc_string_out_of_bounds() {
        let mut data = b"mluc\0\0\0\0".to_vec();
        data.extend(1u32.to_be_bytes());
        data.extend(12u32.to_be_bytes());
        data.extend(b"enUS");
        data.extend(8u32.to_be_bytes());
        data.extend(400u32.to_be_bytes());

        let mut cursor = ByteCursor::new(&data);
        cursor.skip(8).unwrap();
        assert!(MultiLocalizedUnicode::parse(&mut cursor).is_err());
    }
}
