//! Decode error types.

use thiserror::Error;

/// Result type for frame decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors surfaced while decoding a server frame. Both are protocol
/// violations; callers are expected to handle them at the connection level
/// rather than retry the decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Input was empty, a bare line terminator, or a bare frame terminator.
    #[error("frame is empty")]
    EmptyFrame,

    /// The command line is not one of CONNECTED, MESSAGE, RECEIPT, ERROR.
    /// Carries the full raw message for diagnostics.
    #[error("unrecognized server command '{command}' in frame:\n{frame}")]
    UnrecognizedCommand { command: String, frame: String },
}
