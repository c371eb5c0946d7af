//! Text-to-speech engine.
//!
//! Synthesizes a full utterance, then either returns it whole, writes
//! it to a WAV file, or replays it as fixed-size chunks with a
//! cancellation check before every delivery.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::audio::write_wav;
use crate::config::TtsConfig;
use crate::error::{Error, Result};
use crate::runtime::lifecycle::{EngineCell, EngineState};
use crate::runtime::traits::{SynthesizerLoader, SynthesizerSession};
use crate::runtime::types::{new_request_id, AudioChunk, SynthesisResult};

/// Samples per streamed audio chunk.
pub const CHUNK_SAMPLES: usize = 4096;

/// Speech synthesizer with cooperative cancellation on the streaming path.
pub struct TtsEngine {
    loader: Box<dyn SynthesizerLoader>,
    cell: EngineCell<dyn SynthesizerSession, TtsConfig>,
}

impl TtsEngine {
    pub fn new(loader: Box<dyn SynthesizerLoader>) -> Self {
        Self {
            loader,
            cell: EngineCell::new(),
        }
    }

    /// Load a voice model, replacing any previously loaded one.
    pub fn init(&self, model_path: &Path, config: TtsConfig) -> Result<()> {
        info!(path = %model_path.display(), "loading voice model");
        let loader = &self.loader;
        self.cell
            .install(config.clone(), || loader.load(model_path, &config))?;
        info!(path = %model_path.display(), "voice ready");
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.cell.state()
    }

    /// Request cancellation of the in-flight synthesis, if any.
    pub fn cancel(&self) {
        self.cell.request_cancel();
    }

    /// Release the loaded model. Idempotent.
    pub fn shutdown(&self) {
        self.cell.shutdown();
    }

    /// Synthesize `text` and return the complete audio.
    pub fn synthesize(&self, text: &str) -> Result<SynthesisResult> {
        self.run(text, |_result| Ok(()))
    }

    /// Synthesize `text` and write the audio to `output_path` as a
    /// canonical mono 16-bit WAV file.
    pub fn synthesize_to_file(&self, text: &str, output_path: &Path) -> Result<SynthesisResult> {
        let result = self.run(text, |_result| Ok(()))?;
        write_wav(output_path, &result.samples, result.sample_rate)?;
        info!(
            path = %output_path.display(),
            samples = result.samples.len(),
            "wrote synthesized audio"
        );
        Ok(result)
    }

    /// Synthesize `text` and deliver the audio as ordered chunks of at
    /// most [`CHUNK_SAMPLES`] samples.
    ///
    /// The cancellation flag is checked before every delivery and the
    /// callback may stop the stream by returning `false`; either way
    /// the run ends with [`Error::Cancelled`] and no result.
    pub fn synthesize_stream<F>(&self, text: &str, mut on_chunk: F) -> Result<SynthesisResult>
    where
        F: FnMut(&AudioChunk) -> bool,
    {
        self.run(text, |result| {
            let chunk_count = result.samples.len().div_ceil(CHUNK_SAMPLES);
            for (sequence, samples) in result.samples.chunks(CHUNK_SAMPLES).enumerate() {
                if self.cell.is_cancelled() {
                    debug!(request_id = %result.request_id, sequence, "synthesis stream cancelled");
                    return Err(Error::Cancelled);
                }
                let chunk = AudioChunk {
                    request_id: result.request_id.clone(),
                    sequence,
                    samples: samples.to_vec(),
                    is_final: sequence + 1 == chunk_count,
                };
                if !on_chunk(&chunk) {
                    debug!(request_id = %result.request_id, sequence, "synthesis stream stopped by caller");
                    return Err(Error::Cancelled);
                }
            }
            Ok(())
        })
    }

    fn run<F>(&self, text: &str, deliver: F) -> Result<SynthesisResult>
    where
        F: FnOnce(&SynthesisResult) -> Result<()>,
    {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("text must not be empty".into()));
        }

        let started = Instant::now();
        let mut guard = self.cell.begin_op()?;
        let request_id = new_request_id();
        debug!(request_id = %request_id, chars = text.len(), "synthesis started");

        let session = guard.session();
        let sample_rate = session.sample_rate();
        let samples = match session.synthesize(text) {
            Ok(samples) => samples,
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "synthesis failed");
                guard.fail();
                return Err(e);
            }
        };
        if samples.is_empty() {
            warn!(request_id = %request_id, "synthesis produced no audio");
            return Err(Error::NoAudio);
        }

        debug!(
            request_id = %request_id,
            samples = samples.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "synthesis finished"
        );
        let result = SynthesisResult {
            request_id,
            samples,
            sample_rate,
            generation_time_ms: started.elapsed().as_millis() as u64,
        };
        deliver(&result)?;
        Ok(result)
    }
}
