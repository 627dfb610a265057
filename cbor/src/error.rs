use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Invalid UTF-8 sequence at offset {0}")]
    InvalidUtf8(usize),

    #[error("Invalid content for tag {tag}: {reason}")]
    InvalidTag { tag: u64, reason: &'static str },

    #[error("{reason} at offset {offset}")]
    Syntax { offset: usize, reason: &'static str },

    #[error("Incorrect type")]
    IncorrectType,

    #[error("Duplicate map key")]
    DuplicateKey,

    #[error("Nesting too deep")]
    NestingTooDeep,

    #[error("Additional data after item at offset {0}")]
    TrailingData(usize),

    #[error("Invalid reference: {0}")]
    InvalidReference(&'static str),

    #[error("Data item is not in CTAP2 canonical form")]
    NotCanonical,

    #[error("Unpaired surrogate in text")]
    UnpairedSurrogate,

    #[error("Circular reference in value")]
    CircularReference,

    #[error("Value out of range for {0}")]
    Overflow(&'static str),

    #[error("Value is not exactly representable as {0}")]
    NotExact(&'static str),

    #[error("Value is not a number")]
    NotANumber,

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(&'static str),

    #[error("Invalid option: {0}")]
    Config(String),

    #[error("Range {offset}+{count} exceeds buffer length {len}")]
    OutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The broad failure category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input: retrying the same input will fail again.
    Syntax,
    /// A value did not fit the requested numeric range.
    Overflow,
    /// A value was in range but not exactly representable.
    NotExact,
    /// The exact result is too large to materialize.
    Resource,
    /// Invalid options or arguments, raised before any input is read.
    Config,
    /// The value cannot be written in the requested format.
    Encoding,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NotEnoughData
            | Error::InvalidMinorValue(_)
            | Error::InvalidSimpleValue(_)
            | Error::InvalidChunk
            | Error::InvalidUtf8(_)
            | Error::InvalidTag { .. }
            | Error::Syntax { .. }
            | Error::IncorrectType
            | Error::DuplicateKey
            | Error::NestingTooDeep
            | Error::TrailingData(_)
            | Error::InvalidReference(_)
            | Error::NotCanonical => ErrorClass::Syntax,
            Error::UnpairedSurrogate | Error::CircularReference | Error::Io(_) => {
                ErrorClass::Encoding
            }
            Error::Overflow(_) | Error::NotANumber => ErrorClass::Overflow,
            Error::NotExact(_) => ErrorClass::NotExact,
            Error::ResourceExhausted(_) => ErrorClass::Resource,
            Error::Config(_) | Error::OutOfRange { .. } => ErrorClass::Config,
        }
    }

    pub(crate) fn syntax(offset: usize, reason: &'static str) -> Self {
        Error::Syntax { offset, reason }
    }
}

/// Validates an `offset`/`count` window against a buffer of `len` items.
pub(crate) fn check_range(offset: usize, count: usize, len: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfRange { offset, count, len }),
    }
}
