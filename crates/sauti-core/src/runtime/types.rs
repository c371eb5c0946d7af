//! Request and result types for the three engines.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::runtime::TokenId;
use crate::sampling::SamplingConfig;

/// A single request to the text-generation engine.
///
/// Immutable once built; consumed by exactly one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// User prompt.
    pub prompt: String,
    /// Optional system prompt; overrides the engine-level default.
    pub system_prompt: Option<String>,
    /// Max-token budget for this request.
    pub max_tokens: usize,
    /// Sampling hyperparameters.
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 512,
            sampling: SamplingConfig::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Assemble the prompt submitted to the model.
    ///
    /// A non-empty system prompt wraps the user prompt in the chat
    /// template; otherwise the prompt passes through verbatim.
    pub(crate) fn full_prompt(&self, default_system: &str) -> String {
        let system = self
            .system_prompt
            .as_deref()
            .unwrap_or(default_system);
        if system.is_empty() {
            self.prompt.clone()
        } else {
            format!(
                "<|system|>\n{}\n<|user|>\n{}\n<|assistant|>\n",
                system, self.prompt
            )
        }
    }
}

/// One generated token piece, in strict sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPiece {
    /// UTF-8 fragment the token decodes to.
    pub text: String,
    /// The token id it decoded from.
    pub token: TokenId,
}

/// Why a generation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// The model produced an end-of-sequence token.
    Stop,
    /// The max-token budget was exhausted.
    MaxTokens,
    /// The caller cancelled or the token callback requested a stop.
    Cancelled,
    /// Tokenization or decoding failed; the text is a partial result.
    Error,
}

/// Result of a completed generation run.
#[derive(Debug, Clone)]
pub struct LlmResult {
    /// Generated text (all pieces concatenated).
    pub text: String,
    /// Number of tokens generated.
    pub token_count: usize,
    /// Number of tokens in the submitted prompt.
    pub prompt_token_count: usize,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Wall-clock generation time in milliseconds.
    pub generation_time_ms: u64,
}

/// A timestamped span of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Detailed transcription result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// Concatenated text of all segments.
    pub text: String,
    /// Declared or detected language code.
    pub language: String,
    /// Total audio duration in milliseconds.
    pub duration_ms: i64,
    /// Segments ordered by non-decreasing start time.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcription {
    /// The empty sentinel the legacy surface used for failed decodes.
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            language: language.into(),
            duration_ms: 0,
            segments: Vec::new(),
        }
    }

    /// Serialize to the wire JSON schema
    /// (`{text, language, durationMs, segments: [{text, startMs, endMs}]}`).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::Error::Inference(format!("result serialization: {e}")))
    }
}

/// Result of a completed synthesis run.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Request id the audio belongs to.
    pub request_id: String,
    /// Mono 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate of `samples`.
    pub sample_rate: u32,
    /// Wall-clock synthesis time in milliseconds.
    pub generation_time_ms: u64,
}

impl SynthesisResult {
    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// One delivery chunk of synthesized audio.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Request id this chunk belongs to.
    pub request_id: String,
    /// Chunk sequence number, starting at 0.
    pub sequence: usize,
    /// Mono 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Whether this is the final chunk of the utterance.
    pub is_final: bool,
}

impl AudioChunk {
    /// Duration of this chunk in seconds at the given rate.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / sample_rate as f32
    }
}

pub(crate) fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_prompt_applies_template() {
        let request = GenerationRequest::new("What is Rust?").with_system_prompt("Be terse.");
        assert_eq!(
            request.full_prompt(""),
            "<|system|>\nBe terse.\n<|user|>\nWhat is Rust?\n<|assistant|>\n"
        );
    }

    #[test]
    fn full_prompt_verbatim_without_system() {
        let request = GenerationRequest::new("plain prompt");
        assert_eq!(request.full_prompt(""), "plain prompt");
    }

    #[test]
    fn full_prompt_falls_back_to_engine_default() {
        let request = GenerationRequest::new("hi");
        assert_eq!(
            request.full_prompt("You are helpful."),
            "<|system|>\nYou are helpful.\n<|user|>\nhi\n<|assistant|>\n"
        );
    }

    #[test]
    fn transcription_json_schema() {
        let transcription = Transcription {
            text: "hello world".into(),
            language: "en".into(),
            duration_ms: 1500,
            segments: vec![TranscriptSegment {
                text: "hello world".into(),
                start_ms: 0,
                end_ms: 1400,
            }],
        };

        let json: serde_json::Value =
            serde_json::from_str(&transcription.to_json().unwrap()).unwrap();
        assert_eq!(json["text"], "hello world");
        assert_eq!(json["language"], "en");
        assert_eq!(json["durationMs"], 1500);
        assert_eq!(json["segments"][0]["startMs"], 0);
        assert_eq!(json["segments"][0]["endMs"], 1400);
    }

    #[test]
    fn transcription_json_escapes_quotes() {
        let transcription = Transcription {
            text: "she said \"hi\"\n".into(),
            language: "en".into(),
            duration_ms: 10,
            segments: Vec::new(),
        };

        let json = transcription.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["text"], "she said \"hi\"\n");
    }
}
