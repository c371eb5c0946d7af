//! Error types shared across the sauti engines.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for engine lifecycle, audio I/O and inference.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation attempted before a successful `init`.
    #[error("engine not initialized")]
    NotInitialized,

    /// Model or session construction failed; the engine stays uninitialized.
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Caller-supplied input was rejected before touching the model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed or unreadable audio data.
    #[error("audio error: {0}")]
    Audio(String),

    /// The underlying model runtime failed mid-operation.
    #[error("inference error: {0}")]
    Inference(String),

    /// The operation observed a cancellation request and stopped early.
    #[error("cancelled")]
    Cancelled,

    /// Synthesis or transcription completed but produced no output.
    #[error("no audio produced")]
    NoAudio,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Construct a model-load error for the given path.
    pub fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the error represents a cooperative cancellation, not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Error::Io(io),
            other => Error::Audio(other.to_string()),
        }
    }
}
