//! Sauti Core - On-Device Speech and Text Inference
//!
//! This crate is the synchronous engine layer behind an on-device
//! assistant: causal-LM text generation, speech recognition, and
//! speech synthesis, all driven through the same streaming,
//! cancellable operation protocol.
//!
//! Each engine owns one loaded model behind a mutex; `cancel()` and
//! `state()` are lock-free so a UI thread can interrupt or observe a
//! long-running operation from outside. Model backends plug in through
//! the loader traits in [`runtime`].
//!
//! # Example
//!
//! ```ignore
//! use sauti_core::{GenerationRequest, LlmEngine};
//!
//! let engine = LlmEngine::new(my_backend_loader());
//! engine.init(model_path, LlmConfig::default())?;
//!
//! let request = GenerationRequest::new("Hello!").with_max_tokens(64);
//! let result = engine.generate_stream(&request, |piece| {
//!     print!("{}", piece.text);
//!     true
//! })?;
//! ```

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod runtime;
pub mod sampling;

pub use config::{LlmConfig, SttConfig, TtsConfig};
pub use error::{Error, Result};
pub use runtime::{
    AudioChunk, EngineRegistry, EngineState, FinishReason, GenerationRequest, LlmEngine,
    LlmResult, RawSegment, RecognizerLoader, RecognizerSession, SttEngine, SynthesisResult,
    SynthesizerLoader, SynthesizerSession, TextModelLoader, TextSession, TokenId, TokenPiece,
    Transcription, TranscriptSegment, TtsEngine, CHUNK_SAMPLES,
};
pub use sampling::{SamplerChain, SamplingConfig, DEFAULT_SEED, PENALTY_WINDOW};
