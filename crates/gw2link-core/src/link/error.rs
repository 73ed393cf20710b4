use thiserror::Error;

/// Errors returned by link decoding.
///
/// # Examples
/// ```
/// use gw2link_core::link::DecodeError;
///
/// let err = DecodeError::TruncatedBuffer { needed: 1192, actual: 12 };
/// assert!(err.to_string().contains("buffer too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer too short: need {needed} bytes, got {actual}")]
    TruncatedBuffer { needed: usize, actual: usize },
    #[error("unexpected buffer length: expected exactly {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },
    /// `offset` is the byte offset of the offending code unit within its record.
    #[error("invalid UTF-16 in `{field}` at byte {offset}: unpaired surrogate {unit:#06x}")]
    InvalidEncoding {
        field: &'static str,
        offset: usize,
        unit: u16,
    },
}
