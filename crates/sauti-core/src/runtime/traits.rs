//! Capability traits for the external model runtime.
//!
//! The engines never perform neural inference themselves; they drive a
//! collaborator loaded from a model path. Each engine kind consumes one
//! session trait, and a matching loader produces sessions. A session owns
//! its model and decoding context together, so a context can never
//! outlive the model it was created from.

use std::path::Path;

use crate::config::{LlmConfig, SttConfig, TtsConfig};
use crate::error::Result;

/// Sub-word token identifier.
pub type TokenId = u32;

/// One recognized span as produced by the speech runtime.
///
/// Timestamps are in the runtime's native 10-millisecond units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub text: String,
    pub t0: i64,
    pub t1: i64,
}

/// A loaded causal-LM model plus its decode context.
pub trait TextSession: Send {
    /// Context window size in tokens.
    fn context_size(&self) -> usize;

    /// Discard residual decode state from a previous generation.
    fn reset(&mut self);

    /// Tokenize text; fails when the result would exceed the context window.
    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>>;

    /// Run the forward pass over a batch of tokens.
    fn decode(&mut self, tokens: &[TokenId]) -> Result<()>;

    /// Logits over the vocabulary for the next position.
    fn logits(&self) -> Result<Vec<f32>>;

    /// Text fragment a token decodes to.
    fn token_piece(&self, token: TokenId) -> String;

    /// Whether the token terminates generation.
    fn is_end_of_sequence(&self, token: TokenId) -> bool;
}

pub trait TextModelLoader: Send + Sync {
    fn load(&self, path: &Path, config: &LlmConfig) -> Result<Box<dyn TextSession>>;
}

/// A loaded speech-recognition model plus its inference state.
pub trait RecognizerSession: Send {
    /// Fixed sample rate the recognizer analyzes at (e.g. 16000 Hz).
    fn analysis_rate(&self) -> u32;

    /// Run inference over mono f32 samples at the analysis rate.
    fn transcribe(&mut self, samples: &[f32]) -> Result<Vec<RawSegment>>;
}

pub trait RecognizerLoader: Send + Sync {
    fn load(&self, path: &Path, config: &SttConfig) -> Result<Box<dyn RecognizerSession>>;
}

/// A loaded speech-synthesis voice.
pub trait SynthesizerSession: Send {
    /// Sample rate of produced audio.
    fn sample_rate(&self) -> u32;

    /// Synthesize the full utterance as 16-bit PCM.
    fn synthesize(&mut self, text: &str) -> Result<Vec<i16>>;
}

pub trait SynthesizerLoader: Send + Sync {
    fn load(&self, path: &Path, config: &TtsConfig) -> Result<Box<dyn SynthesizerSession>>;
}
