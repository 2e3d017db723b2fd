//! Structural failures the parser can report.
//!
//! Validation diagnostics are not modeled here — those never halt the
//! validator and live in [`crate::issue`] instead.

/// A failure that aborts parsing before any command sequence is produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The header's `total_len` disagrees with the actual buffer length.
    #[error("declared stream length {declared} exceeds buffer length {actual}")]
    InvalidFormat { declared: u32, actual: usize },

    /// A command's fixed or length-prefixed payload runs past `total_len`.
    #[error("command at offset {offset} declares a payload that runs past the stream end")]
    Truncated { offset: usize },
}
