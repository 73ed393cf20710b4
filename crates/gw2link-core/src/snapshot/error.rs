use thiserror::Error;

/// Errors returned while assembling a snapshot from decoded records.
///
/// # Examples
/// ```
/// use gw2link_core::snapshot::AssembleError;
///
/// let err = AssembleError::MalformedIdentity("missing field `spec`".to_string());
/// assert!(err.to_string().contains("malformed identity"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssembleError {
    #[error("malformed identity: {0}")]
    MalformedIdentity(String),
    #[error("non-finite player {axis} coordinate: {value}")]
    NonFinitePosition { axis: &'static str, value: f32 },
    #[error("player {axis} coordinate {value} is outside the i64 range")]
    PositionOutOfRange { axis: &'static str, value: f32 },
}
