//! Scripted model backends for engine tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sauti_core::{
    Error, LlmConfig, RawSegment, RecognizerLoader, RecognizerSession, Result, SttConfig,
    SynthesizerLoader, SynthesizerSession, TextModelLoader, TextSession, TokenId, TtsConfig,
};

pub const VOCAB_SIZE: usize = 16;
pub const EOS_TOKEN: TokenId = 0;

/// Counters shared between a loader and the sessions it produced.
#[derive(Clone, Default)]
pub struct BackendStats {
    pub loads: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub decode_calls: Arc<AtomicUsize>,
}

impl BackendStats {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

/// Text session that emits a fixed token script, then end-of-sequence.
///
/// `logits` peaks hard at the scripted token for the current step, so
/// greedy sampling reproduces the script exactly. The step advances on
/// each single-token decode after the prompt batch.
pub struct ScriptedTextSession {
    script: Vec<TokenId>,
    step: usize,
    prompt_seen: bool,
    context_size: usize,
    fail_decode: bool,
    stats: BackendStats,
}

impl TextSession for ScriptedTextSession {
    fn context_size(&self) -> usize {
        self.context_size
    }

    fn reset(&mut self) {
        self.step = 0;
        self.prompt_seen = false;
    }

    fn tokenize(&self, text: &str) -> Result<Vec<TokenId>> {
        // One token per whitespace-separated word.
        Ok(text.split_whitespace().map(|_| 1).collect())
    }

    fn decode(&mut self, _tokens: &[TokenId]) -> Result<()> {
        if self.fail_decode {
            return Err(Error::Inference("scripted decode failure".into()));
        }
        self.stats.decode_calls.fetch_add(1, Ordering::SeqCst);
        if self.prompt_seen {
            self.step += 1;
        } else {
            self.prompt_seen = true;
        }
        Ok(())
    }

    fn logits(&self) -> Result<Vec<f32>> {
        let token = self.script.get(self.step).copied().unwrap_or(EOS_TOKEN);
        let mut logits = vec![0.0; VOCAB_SIZE];
        logits[token as usize] = 10.0;
        Ok(logits)
    }

    fn token_piece(&self, token: TokenId) -> String {
        format!("<{token}>")
    }

    fn is_end_of_sequence(&self, token: TokenId) -> bool {
        token == EOS_TOKEN
    }
}

impl Drop for ScriptedTextSession {
    fn drop(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedTextLoader {
    pub script: Vec<TokenId>,
    pub context_size: usize,
    pub fail_decode: bool,
    pub fail_load: bool,
    pub stats: BackendStats,
}

impl ScriptedTextLoader {
    pub fn new(script: Vec<TokenId>) -> Self {
        Self {
            script,
            context_size: 2048,
            fail_decode: false,
            fail_load: false,
            stats: BackendStats::default(),
        }
    }
}

impl TextModelLoader for ScriptedTextLoader {
    fn load(&self, path: &Path, _config: &LlmConfig) -> Result<Box<dyn TextSession>> {
        if self.fail_load {
            return Err(Error::model_load(path, "scripted load failure"));
        }
        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedTextSession {
            script: self.script.clone(),
            step: 0,
            prompt_seen: false,
            context_size: self.context_size,
            fail_decode: self.fail_decode,
            stats: self.stats.clone(),
        }))
    }
}

/// Recognizer that returns fixed segments and records what it was fed.
pub struct ScriptedRecognizerSession {
    segments: Vec<RawSegment>,
    analysis_rate: u32,
    received_samples: Arc<AtomicUsize>,
}

impl RecognizerSession for ScriptedRecognizerSession {
    fn analysis_rate(&self) -> u32 {
        self.analysis_rate
    }

    fn transcribe(&mut self, samples: &[f32]) -> Result<Vec<RawSegment>> {
        self.received_samples.store(samples.len(), Ordering::SeqCst);
        Ok(self.segments.clone())
    }
}

pub struct ScriptedRecognizerLoader {
    pub segments: Vec<RawSegment>,
    pub analysis_rate: u32,
    pub received_samples: Arc<AtomicUsize>,
}

impl ScriptedRecognizerLoader {
    pub fn new(segments: Vec<RawSegment>) -> Self {
        Self {
            segments,
            analysis_rate: 16_000,
            received_samples: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RecognizerLoader for ScriptedRecognizerLoader {
    fn load(&self, _path: &Path, _config: &SttConfig) -> Result<Box<dyn RecognizerSession>> {
        Ok(Box::new(ScriptedRecognizerSession {
            segments: self.segments.clone(),
            analysis_rate: self.analysis_rate,
            received_samples: self.received_samples.clone(),
        }))
    }
}

/// Synthesizer that emits a fixed number of samples per request.
pub struct ScriptedSynthesizerSession {
    sample_count: usize,
    sample_rate: u32,
}

impl SynthesizerSession for ScriptedSynthesizerSession {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(&mut self, _text: &str) -> Result<Vec<i16>> {
        Ok((0..self.sample_count).map(|i| (i % 100) as i16).collect())
    }
}

pub struct ScriptedSynthesizerLoader {
    pub sample_count: usize,
    pub sample_rate: u32,
}

impl ScriptedSynthesizerLoader {
    pub fn new(sample_count: usize) -> Self {
        Self {
            sample_count,
            sample_rate: 22_050,
        }
    }
}

impl SynthesizerLoader for ScriptedSynthesizerLoader {
    fn load(&self, _path: &Path, _config: &TtsConfig) -> Result<Box<dyn SynthesizerSession>> {
        Ok(Box::new(ScriptedSynthesizerSession {
            sample_count: self.sample_count,
            sample_rate: self.sample_rate,
        }))
    }
}
