//! Errors for the collaborator stages around layout.
//!
//! Cascade and layout are total: bad CSS degrades to defaults and never
//! produces an error. What can fail is everything at the edges, reading a
//! config, decoding a font, writing the result out.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures outside the layout core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The layout configuration was not valid JSON or had mistyped fields.
    #[error("invalid layout config: {0}")]
    Config(#[source] serde_json::Error),

    /// The rendered box tree could not be serialized.
    #[error("failed to serialize box tree: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Font bytes could not be parsed, or no usable font was found.
    #[error("font load failed: {0}")]
    FontLoad(String),
}
