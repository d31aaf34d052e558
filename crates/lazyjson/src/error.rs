use alloc::string::String;

use thiserror::Error;

use crate::ValueType;

/// Errors surfaced by lazy value accessors.
///
/// A navigation miss is not an error: it is reported as `None` and the
/// path-qualified accessors turn it into a neutral default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A scalar coercion was requested from a node of another shape.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ValueType,
        actual: ValueType,
    },
    /// The decoder could not interpret the bytes of the node.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The current thread's decoder is already checked out.
    ///
    /// Raised when a decode is started from inside another decode on the same
    /// thread, for example from a `Deserialize` impl that reads a lazy value.
    #[error("decoder is already in use on this thread")]
    DecoderBusy,
}

impl Error {
    pub(crate) fn mismatch(expected: ValueType, actual: ValueType) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source} at byte {offset}")]
pub struct DecodeError {
    pub(crate) source: SyntaxError,
    pub(crate) offset: usize,
}

impl DecodeError {
    pub(crate) fn new(source: SyntaxError, offset: usize) -> Self {
        Self { source, offset }
    }

    /// The kind of failure.
    #[must_use]
    pub fn kind(&self) -> &SyntaxError {
        &self.source
    }

    /// Absolute byte offset into the underlying buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence")]
    InvalidUnicodeEscapeSequence,
    #[error("unescaped control character 0x{0:02X} in string")]
    ControlCharacterInString(u8),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("number out of range")]
    NumberOutOfRange,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    #[error("trailing characters")]
    TrailingCharacters,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("{0}")]
    Custom(String),
}

#[cfg(feature = "serde")]
impl serde::de::Error for DecodeError {
    fn custom<T: core::fmt::Display>(msg: T) -> Self {
        use alloc::string::ToString;

        // Offsets are attached by the decoder when it knows them; custom
        // messages come from visitors that do not.
        DecodeError::new(SyntaxError::Custom(msg.to_string()), 0)
    }
}
