//! Error types for ucmm

use thiserror::Error;

use crate::icc::IccError;

/// Result type for ucmm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing profiles or transforming colors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Profile bytes are malformed or truncated
    #[error("profile parsing failed: {0}")]
    ParsingFailed(#[source] IccError),

    /// The profile stream is unavailable
    #[error("profile file unavailable: {0}")]
    NoFile(String),

    /// The profile header was never parsed
    #[error("profile header was never parsed")]
    NoHeader,

    /// A tag or white point is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// A matrix in the transform is singular
    #[error("matrix is not invertible: {0}")]
    NotInvertible(&'static str),

    /// The device class has no transform
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A tag holds a payload type unusable for the requested step
    #[error("wrong tag type: {0}")]
    WrongType(String),

    /// A tag was located but holds no usable data
    #[error("no data: {0}")]
    NoData(String),
}

/// Integer result codes exposed at the library boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Ok = 0,
    ParsingFailed = 1,
    NoFile = 2,
    NoHeader = 3,
    NotFound = 4,
    NotInvertible = 5,
    NotImplemented = 6,
    WrongType = 7,
    NoData = 8,
}

impl ResultCode {
    /// Result code for any crate result
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.code(),
        }
    }

    /// The raw integer value
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl Error {
    /// Result code of this error
    pub fn code(&self) -> ResultCode {
        match self {
            Self::ParsingFailed(_) => ResultCode::ParsingFailed,
            Self::NoFile(_) => ResultCode::NoFile,
            Self::NoHeader => ResultCode::NoHeader,
            Self::NotFound(_) => ResultCode::NotFound,
            Self::NotInvertible(_) => ResultCode::NotInvertible,
            Self::NotImplemented(_) => ResultCode::NotImplemented,
            Self::WrongType(_) => ResultCode::WrongType,
            Self::NoData(_) => ResultCode::NoData,
        }
    }
}

impl From<IccError> for Error {
    fn from(err: IccError) -> Self {
        match err {
            IccError::TagNotFound(tag) => Self::NotFound(format!("tag '{tag}'")),
            IccError::HeaderNotFound => Self::NotFound("profile header".into()),
            IccError::UnsupportedType(sig) => Self::WrongType(format!("unsupported type '{sig}'")),
            IccError::NoFile => Self::NoFile("no stream".into()),
            IccError::Open(e) => Self::NoFile(e.to_string()),
            other => Self::ParsingFailed(other),
        }
    }
}
