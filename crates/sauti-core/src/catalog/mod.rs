//! Curated catalog of known text-generation models.
//!
//! Metadata only; nothing here downloads or loads weights. The entries
//! mirror the GGUF builds the stock app ships with.

use serde::Serialize;

/// Metadata for one downloadable model build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmModelInfo {
    /// Stable catalog identifier.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Hugging Face repository the build is published in.
    pub repo_id: &'static str,
    /// GGUF filename within the repository.
    pub filename: &'static str,
    /// Approximate download size in bytes.
    pub size_bytes: u64,
    /// Quantization label.
    pub quantization: &'static str,
    /// Parameter count label.
    pub parameters: &'static str,
    pub description: &'static str,
}

impl LlmModelInfo {
    /// Download size rounded to tenths of a gigabyte.
    pub fn size_gb(&self) -> f64 {
        (self.size_bytes as f64 / 1_000_000_000.0 * 10.0).round() / 10.0
    }
}

const CATALOG: &[LlmModelInfo] = &[
    LlmModelInfo {
        id: "llama-3.2-1b-instruct-q4",
        name: "Llama 3.2 1B Instruct",
        repo_id: "bartowski/Llama-3.2-1B-Instruct-GGUF",
        filename: "Llama-3.2-1B-Instruct-Q4_K_M.gguf",
        size_bytes: 808_000_000,
        quantization: "Q4_K_M",
        parameters: "1B",
        description: "Small general-purpose chat model, fast on phones.",
    },
    LlmModelInfo {
        id: "llama-3.2-3b-instruct-q4",
        name: "Llama 3.2 3B Instruct",
        repo_id: "bartowski/Llama-3.2-3B-Instruct-GGUF",
        filename: "Llama-3.2-3B-Instruct-Q4_K_M.gguf",
        size_bytes: 2_020_000_000,
        quantization: "Q4_K_M",
        parameters: "3B",
        description: "Balanced quality and speed for mid-range devices.",
    },
    LlmModelInfo {
        id: "gemma-2-2b-instruct-q4",
        name: "Gemma 2 2B Instruct",
        repo_id: "bartowski/gemma-2-2b-it-GGUF",
        filename: "gemma-2-2b-it-Q4_K_M.gguf",
        size_bytes: 1_710_000_000,
        quantization: "Q4_K_M",
        parameters: "2B",
        description: "Gemma 2 instruction-tuned build.",
    },
    LlmModelInfo {
        id: "phi-3.5-mini-instruct-q4",
        name: "Phi-3.5 Mini Instruct",
        repo_id: "bartowski/Phi-3.5-mini-instruct-GGUF",
        filename: "Phi-3.5-mini-instruct-Q4_K_M.gguf",
        size_bytes: 2_390_000_000,
        quantization: "Q4_K_M",
        parameters: "3.8B",
        description: "Strong reasoning for its size.",
    },
];

/// All catalog entries, in display order.
pub fn all() -> &'static [LlmModelInfo] {
    CATALOG
}

/// Look an entry up by its catalog id.
pub fn find(id: &str) -> Option<&'static LlmModelInfo> {
    CATALOG.iter().find(|model| model.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn find_matches_by_id() {
        let model = find("llama-3.2-1b-instruct-q4").unwrap();
        assert_eq!(model.parameters, "1B");
        assert!(find("no-such-model").is_none());
    }

    #[test]
    fn size_rounds_to_tenths() {
        let model = find("llama-3.2-1b-instruct-q4").unwrap();
        assert!((model.size_gb() - 0.8).abs() < f64::EPSILON);
    }
}
