//! Error types for the rendering core.
//!
//! Every failure inside the engine is reported as an [`AsciiArtError`] value.
//! None of them are fatal: the caller decides how to present them.

use thiserror::Error;

/// Errors produced by rendering, matching and character-set editing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsciiArtError {
    /// Matching was attempted with no active characters.
    #[error("character set is empty")]
    EmptyCharacterSet,

    /// A resolution outside the allowed range was requested.
    #[error("resolution {requested} is outside the allowed range [{min}, {max}]")]
    ExceedsResolutionBounds { requested: u32, min: u32, max: u32 },

    /// A malformed add/remove token.
    #[error("invalid character spec '{0}'")]
    InvalidCharacterSpec(String),
}

/// Convenience alias for results in the rendering core.
pub type Result<T> = std::result::Result<T, AsciiArtError>;
