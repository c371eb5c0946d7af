//! Registry wiring tests.

mod common;

use std::path::Path;

use common::{ScriptedRecognizerLoader, ScriptedSynthesizerLoader, ScriptedTextLoader};
use sauti_core::{EngineRegistry, EngineState, LlmConfig, SttConfig, TtsConfig};

fn registry() -> EngineRegistry {
    EngineRegistry::new(
        Box::new(ScriptedTextLoader::new(vec![3, 4])),
        Box::new(ScriptedRecognizerLoader::new(Vec::new())),
        Box::new(ScriptedSynthesizerLoader::new(100)),
    )
}

#[test]
fn engines_start_uninitialized() {
    let registry = registry();
    assert_eq!(registry.llm.state(), EngineState::Uninitialized);
    assert_eq!(registry.stt.state(), EngineState::Uninitialized);
    assert_eq!(registry.tts.state(), EngineState::Uninitialized);
}

#[test]
fn shutdown_all_releases_every_engine() {
    let registry = registry();
    registry
        .llm
        .init(Path::new("model.gguf"), LlmConfig::default())
        .unwrap();
    registry
        .stt
        .init(Path::new("model.bin"), SttConfig::default())
        .unwrap();
    registry
        .tts
        .init(Path::new("voice.onnx"), TtsConfig::default())
        .unwrap();

    registry.shutdown_all();
    assert_eq!(registry.llm.state(), EngineState::Uninitialized);
    assert_eq!(registry.stt.state(), EngineState::Uninitialized);
    assert_eq!(registry.tts.state(), EngineState::Uninitialized);
    // Idempotent.
    registry.shutdown_all();
}
