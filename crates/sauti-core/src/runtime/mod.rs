//! Engine runtimes: lifecycle, generation, transcription, synthesis.

mod lifecycle;
mod llm;
mod registry;
mod stt;
mod traits;
mod tts;
mod types;

pub use lifecycle::EngineState;
pub use llm::LlmEngine;
pub use registry::EngineRegistry;
pub use stt::SttEngine;
pub use traits::{
    RawSegment, RecognizerLoader, RecognizerSession, SynthesizerLoader, SynthesizerSession,
    TextModelLoader, TextSession, TokenId,
};
pub use tts::{TtsEngine, CHUNK_SAMPLES};
pub use types::{
    AudioChunk, FinishReason, GenerationRequest, LlmResult, SynthesisResult, TokenPiece,
    Transcription, TranscriptSegment,
};
