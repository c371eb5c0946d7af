//! Speech-to-text engine.
//!
//! Decodes WAV input, resamples it to the recognizer's analysis rate
//! and assembles timestamped transcripts. Streaming transcription
//! delivers the running text after each recognized segment.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::audio::{read_wav, resample_linear};
use crate::config::SttConfig;
use crate::error::{Error, Result};
use crate::runtime::lifecycle::{EngineCell, EngineState};
use crate::runtime::traits::{RawSegment, RecognizerLoader, RecognizerSession};
use crate::runtime::types::{TranscriptSegment, Transcription};

/// Speech recognizer with cooperative cancellation on the streaming path.
pub struct SttEngine {
    loader: Box<dyn RecognizerLoader>,
    cell: EngineCell<dyn RecognizerSession, SttConfig>,
}

impl SttEngine {
    pub fn new(loader: Box<dyn RecognizerLoader>) -> Self {
        Self {
            loader,
            cell: EngineCell::new(),
        }
    }

    /// Load a recognizer model, replacing any previously loaded one.
    pub fn init(&self, model_path: &Path, config: SttConfig) -> Result<()> {
        info!(path = %model_path.display(), "loading recognizer model");
        let loader = &self.loader;
        self.cell
            .install(config.clone(), || loader.load(model_path, &config))?;
        info!(path = %model_path.display(), "recognizer ready");
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.cell.state()
    }

    /// Request cancellation of the in-flight transcription, if any.
    pub fn cancel(&self) {
        self.cell.request_cancel();
    }

    /// Release the loaded model. Idempotent.
    pub fn shutdown(&self) {
        self.cell.shutdown();
    }

    /// Transcribe a WAV file and return the plain text.
    pub fn transcribe_file(&self, audio_path: &Path) -> Result<String> {
        Ok(self.transcribe_file_detailed(audio_path)?.text)
    }

    /// Transcribe a WAV file and return the full timestamped result.
    pub fn transcribe_file_detailed(&self, audio_path: &Path) -> Result<Transcription> {
        let (samples, sample_rate) = read_wav(audio_path)?;
        self.transcribe_samples(&samples, sample_rate)
    }

    /// Transcribe mono f32 samples captured at `source_rate`.
    pub fn transcribe_samples(&self, samples: &[f32], source_rate: u32) -> Result<Transcription> {
        self.run(samples, source_rate, |_segment, _running| Ok(()))
    }

    /// Transcribe with a per-segment callback.
    ///
    /// After each recognized segment the callback receives that segment
    /// and the running transcript so far. Cancellation is honored
    /// between segments and surfaces as [`Error::Cancelled`]; no
    /// result is returned for a cancelled run.
    pub fn transcribe_stream<F>(
        &self,
        samples: &[f32],
        source_rate: u32,
        mut on_segment: F,
    ) -> Result<Transcription>
    where
        F: FnMut(&TranscriptSegment, &str),
    {
        self.run(samples, source_rate, |segment, running| {
            if self.cell.is_cancelled() {
                return Err(Error::Cancelled);
            }
            on_segment(segment, running);
            Ok(())
        })
    }

    fn run<F>(&self, samples: &[f32], source_rate: u32, mut deliver: F) -> Result<Transcription>
    where
        F: FnMut(&TranscriptSegment, &str) -> Result<()>,
    {
        if samples.is_empty() {
            return Err(Error::InvalidInput("no audio samples provided".into()));
        }
        if source_rate == 0 {
            return Err(Error::InvalidInput("source sample rate must be non-zero".into()));
        }

        let mut guard = self.cell.begin_op()?;
        let language = guard.config().language.clone();

        let session = guard.session();
        let analysis_rate = session.analysis_rate();
        let analysis = resample_linear(samples, source_rate, analysis_rate);
        let duration_ms = (analysis.len() as i64 * 1000) / analysis_rate as i64;
        debug!(
            source_rate,
            analysis_rate,
            duration_ms,
            "audio prepared for recognition"
        );

        let raw_segments = match session.transcribe(&analysis) {
            Ok(segments) => segments,
            Err(e) => {
                warn!(error = %e, "recognition failed");
                guard.fail();
                return Err(e);
            }
        };

        let mut text = String::new();
        let mut segments = Vec::with_capacity(raw_segments.len());
        for raw in raw_segments {
            let segment = to_segment(raw);
            text.push_str(&segment.text);
            deliver(&segment, &text)?;
            segments.push(segment);
        }

        debug!(segments = segments.len(), "transcription finished");
        Ok(Transcription {
            text,
            language,
            duration_ms,
            segments,
        })
    }
}

/// Convert a raw segment (timestamps in 10 ms frames) to milliseconds.
fn to_segment(raw: RawSegment) -> TranscriptSegment {
    TranscriptSegment {
        text: raw.text,
        start_ms: raw.t0 * 10,
        end_ms: raw.t1 * 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_segment_times_scale_to_milliseconds() {
        let segment = to_segment(RawSegment {
            text: " hello".into(),
            t0: 12,
            t1: 150,
        });
        assert_eq!(segment.start_ms, 120);
        assert_eq!(segment.end_ms, 1500);
    }
}
