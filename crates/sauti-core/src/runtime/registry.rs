//! Process-wide registry bundling the three engines.

use tracing::info;

use crate::runtime::llm::LlmEngine;
use crate::runtime::stt::SttEngine;
use crate::runtime::traits::{RecognizerLoader, SynthesizerLoader, TextModelLoader};
use crate::runtime::tts::TtsEngine;

/// One instance of each engine, sharing nothing but a shutdown path.
///
/// Engines are independent: each holds its own lock and cancel flag,
/// so operations on different engines never serialize against each
/// other.
pub struct EngineRegistry {
    pub llm: LlmEngine,
    pub stt: SttEngine,
    pub tts: TtsEngine,
}

impl EngineRegistry {
    pub fn new(
        text_loader: Box<dyn TextModelLoader>,
        recognizer_loader: Box<dyn RecognizerLoader>,
        synthesizer_loader: Box<dyn SynthesizerLoader>,
    ) -> Self {
        Self {
            llm: LlmEngine::new(text_loader),
            stt: SttEngine::new(recognizer_loader),
            tts: TtsEngine::new(synthesizer_loader),
        }
    }

    /// Release every loaded model. Idempotent.
    pub fn shutdown_all(&self) {
        info!("shutting down all engines");
        self.llm.shutdown();
        self.stt.shutdown();
        self.tts.shutdown();
    }
}
