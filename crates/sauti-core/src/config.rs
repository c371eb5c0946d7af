//! Per-engine configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the causal-LM text generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Maximum context window in tokens.
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Default max-token budget per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// System prompt prepended to every request (empty = none).
    #[serde(default)]
    pub system_prompt: String,

    /// CPU threads for inference.
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,

    /// Use GPU acceleration when the runtime supports it.
    #[serde(default = "default_use_gpu")]
    pub use_gpu: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            context_size: default_context_size(),
            max_tokens: default_max_tokens(),
            system_prompt: String::new(),
            max_threads: default_max_threads(),
            use_gpu: default_use_gpu(),
        }
    }
}

fn default_context_size() -> usize {
    2048
}
fn default_max_tokens() -> usize {
    512
}
fn default_max_threads() -> usize {
    4
}
fn default_use_gpu() -> bool {
    true
}

/// Configuration for the speech-to-text engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Language code (ISO 639-1), or "auto" for detection.
    #[serde(default = "default_language")]
    pub language: String,

    /// Translate non-English speech to English.
    #[serde(default)]
    pub translate_to_english: bool,

    /// CPU threads for inference.
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,

    /// Use GPU acceleration when available.
    #[serde(default = "default_use_gpu")]
    pub use_gpu: bool,

    /// Enable voice activity detection to skip silence.
    #[serde(default = "default_use_vad")]
    pub use_vad: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            translate_to_english: false,
            max_threads: default_max_threads(),
            use_gpu: default_use_gpu(),
            use_vad: default_use_vad(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}
fn default_use_vad() -> bool {
    true
}

/// Configuration for the text-to-speech engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Voice configuration file accompanying the model (e.g. `voice.json`).
    #[serde(default)]
    pub voice_config: Option<PathBuf>,

    /// Speaker id for multi-speaker voices (-1 = model default).
    #[serde(default = "default_speaker_id")]
    pub speaker_id: i32,

    /// Speech rate multiplier (1.0 = normal).
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Silence inserted between sentences, in seconds.
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            voice_config: None,
            speaker_id: default_speaker_id(),
            speech_rate: default_speech_rate(),
            sample_rate: default_sample_rate(),
            sentence_silence: default_sentence_silence(),
        }
    }
}

fn default_speaker_id() -> i32 {
    -1
}
fn default_speech_rate() -> f32 {
    1.0
}
fn default_sample_rate() -> u32 {
    22050
}
fn default_sentence_silence() -> f32 {
    0.2
}
