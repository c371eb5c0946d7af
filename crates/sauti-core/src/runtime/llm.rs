//! Text-generation engine.
//!
//! Owns a loaded model session behind the shared lifecycle cell and
//! drives the sample/decode loop. Streaming and blocking generation
//! share one code path; the blocking form collects pieces into a
//! single result.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::runtime::lifecycle::{EngineCell, EngineState};
use crate::runtime::traits::{TextModelLoader, TextSession, TokenId};
use crate::runtime::types::{FinishReason, GenerationRequest, LlmResult, TokenPiece};
use crate::sampling::SamplerChain;

/// Causal-LM engine with cooperative cancellation.
pub struct LlmEngine {
    loader: Box<dyn TextModelLoader>,
    cell: EngineCell<dyn TextSession, LlmConfig>,
}

impl LlmEngine {
    pub fn new(loader: Box<dyn TextModelLoader>) -> Self {
        Self {
            loader,
            cell: EngineCell::new(),
        }
    }

    /// Load a model, replacing any previously loaded one.
    ///
    /// The prior session is released before the new load starts. On
    /// failure the engine is left uninitialized.
    pub fn init(&self, model_path: &Path, config: LlmConfig) -> Result<()> {
        info!(path = %model_path.display(), "loading text model");
        let loader = &self.loader;
        self.cell
            .install(config.clone(), || loader.load(model_path, &config))?;
        info!(path = %model_path.display(), "text model ready");
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.cell.state()
    }

    /// Request cancellation of the in-flight generation, if any.
    pub fn cancel(&self) {
        self.cell.request_cancel();
    }

    /// Release the loaded model. Idempotent.
    pub fn shutdown(&self) {
        self.cell.shutdown();
    }

    /// Generate to completion and return the collected result.
    pub fn generate(&self, request: &GenerationRequest) -> Result<LlmResult> {
        self.run(request, |_piece| true)
    }

    /// Generate with a per-piece callback.
    ///
    /// The callback sees each piece in order; returning `false` stops
    /// generation with [`FinishReason::Cancelled`]. Text already
    /// delivered is still returned in the result.
    pub fn generate_stream<F>(&self, request: &GenerationRequest, mut on_token: F) -> Result<LlmResult>
    where
        F: FnMut(&TokenPiece) -> bool,
    {
        self.run(request, |piece| on_token(piece))
    }

    fn run<F>(&self, request: &GenerationRequest, mut sink: F) -> Result<LlmResult>
    where
        F: FnMut(&TokenPiece) -> bool,
    {
        let started = Instant::now();
        let mut guard = self.cell.begin_op()?;

        let system_prompt = guard.config().system_prompt.clone();
        let prompt = request.full_prompt(&system_prompt);

        let mut text = String::new();
        let mut token_count = 0usize;
        let mut prompt_token_count = 0usize;
        let mut hard_failure = false;

        let reason = 'run: {
            let session = guard.session();
            session.reset();

            let prompt_tokens = match session.tokenize(&prompt) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(error = %e, "prompt tokenization failed");
                    break 'run FinishReason::Error;
                }
            };
            if prompt_tokens.is_empty() {
                return Err(Error::InvalidInput("prompt produced no tokens".into()));
            }
            prompt_token_count = prompt_tokens.len();
            if prompt_tokens.len() > session.context_size() {
                warn!(
                    prompt_tokens = prompt_tokens.len(),
                    context_size = session.context_size(),
                    "prompt exceeds context window"
                );
                break 'run FinishReason::Error;
            }

            debug!(prompt_tokens = prompt_tokens.len(), "prompt tokenized");
            if let Err(e) = session.decode(&prompt_tokens) {
                warn!(error = %e, "prompt decode failed");
                hard_failure = true;
                break 'run FinishReason::Error;
            }

            let sampler = SamplerChain::new(&request.sampling)?;
            let mut stream = TokenStream::new(session, sampler, request.max_tokens);
            loop {
                if self.cell.is_cancelled() {
                    break 'run FinishReason::Cancelled;
                }
                match stream.next_piece() {
                    StreamStep::Piece(piece) => {
                        text.push_str(&piece.text);
                        token_count += 1;
                        if !sink(&piece) {
                            break 'run FinishReason::Cancelled;
                        }
                    }
                    StreamStep::Stop => break 'run FinishReason::Stop,
                    StreamStep::BudgetExhausted => break 'run FinishReason::MaxTokens,
                    StreamStep::Failed(e) => {
                        warn!(error = %e, "generation step failed");
                        hard_failure = true;
                        break 'run FinishReason::Error;
                    }
                }
            }
        };

        if hard_failure {
            guard.fail();
        }
        debug!(tokens = token_count, reason = ?reason, "generation finished");
        Ok(finish(text, token_count, prompt_token_count, reason, started))
    }
}

fn finish(
    text: String,
    token_count: usize,
    prompt_token_count: usize,
    finish_reason: FinishReason,
    started: Instant,
) -> LlmResult {
    LlmResult {
        text,
        token_count,
        prompt_token_count,
        finish_reason,
        generation_time_ms: started.elapsed().as_millis() as u64,
    }
}

enum StreamStep {
    Piece(TokenPiece),
    Stop,
    BudgetExhausted,
    Failed(Error),
}

/// Lazy decode/sample loop over a model session.
///
/// The context-extending decode for a sampled token is deferred until
/// the next step, so stopping after the Nth piece never pays for an
/// (N+1)th decode.
struct TokenStream<'a> {
    session: &'a mut dyn TextSession,
    sampler: SamplerChain,
    pending_decode: Option<TokenId>,
    remaining: usize,
}

impl<'a> TokenStream<'a> {
    fn new(session: &'a mut dyn TextSession, sampler: SamplerChain, budget: usize) -> Self {
        Self {
            session,
            sampler,
            pending_decode: None,
            remaining: budget,
        }
    }

    fn next_piece(&mut self) -> StreamStep {
        if let Some(token) = self.pending_decode.take() {
            if let Err(e) = self.session.decode(&[token]) {
                return StreamStep::Failed(e);
            }
        }
        if self.remaining == 0 {
            return StreamStep::BudgetExhausted;
        }

        let logits = match self.session.logits() {
            Ok(logits) => logits,
            Err(e) => return StreamStep::Failed(e),
        };
        let token = match self.sampler.sample(&logits) {
            Ok(token) => token,
            Err(e) => return StreamStep::Failed(e),
        };
        self.sampler.accept(token);

        if self.session.is_end_of_sequence(token) {
            return StreamStep::Stop;
        }

        let text = self.session.token_piece(token);
        self.pending_decode = Some(token);
        self.remaining -= 1;
        StreamStep::Piece(TokenPiece { text, token })
    }
}
