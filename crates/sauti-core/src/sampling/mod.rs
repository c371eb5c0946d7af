//! Token sampling pipeline for text generation.
//!
//! A [`SamplerChain`] applies an ordered series of distribution
//! transformations before drawing the next token: top-k, then top-p
//! (nucleus), then temperature scaling, then repetition penalty over the
//! recently accepted tokens, then a seeded categorical draw. Each stage
//! operates on the candidate set the previous stage left alive.
//!
//! A chain is built fresh for every generation request so that the
//! repetition-penalty history cannot leak between unrelated prompts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::runtime::TokenId;

/// Number of recently accepted tokens the repetition penalty looks at.
pub const PENALTY_WINDOW: usize = 64;

/// Seed used for the categorical draw unless a request overrides it.
pub const DEFAULT_SEED: u64 = 0xFFFF_FFFF;

/// Sampling hyperparameters consumed by one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Temperature for logit scaling; 0 collapses to the argmax token.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus threshold in (0, 1].
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Candidate-count cap, >= 1 (capped at the vocabulary size).
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Repeat penalty; 1.0 disables the stage.
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,

    /// RNG seed override for the categorical draw.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            repeat_penalty: default_repeat_penalty(),
            seed: None,
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.9
}
fn default_top_k() -> usize {
    40
}
fn default_repeat_penalty() -> f32 {
    1.1
}

impl SamplingConfig {
    /// Deterministic argmax sampling.
    pub fn greedy() -> Self {
        Self {
            temperature: 0.0,
            top_p: 1.0,
            top_k: 1,
            repeat_penalty: 1.0,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.temperature < 0.0 {
            return Err(Error::InvalidInput("temperature must be >= 0".into()));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(Error::InvalidInput("top_p must be in (0, 1]".into()));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidInput("top_k must be >= 1".into()));
        }
        if self.repeat_penalty < 0.0 {
            return Err(Error::InvalidInput("repeat_penalty must be >= 0".into()));
        }
        Ok(())
    }
}

/// Stateful sampler for a single generation request.
#[derive(Debug, Clone)]
pub struct SamplerChain {
    config: SamplingConfig,
    history: VecDeque<TokenId>,
    rng: ChaCha8Rng,
}

impl SamplerChain {
    /// Validate the config and build a fresh chain with empty history.
    pub fn new(config: &SamplingConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Ok(Self {
            config: config.clone(),
            history: VecDeque::with_capacity(PENALTY_WINDOW),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Record an accepted token so the repetition penalty can see it.
    pub fn accept(&mut self, token: TokenId) {
        if self.history.len() == PENALTY_WINDOW {
            self.history.pop_front();
        }
        self.history.push_back(token);
    }

    /// Draw the next token id from raw logits.
    pub fn sample(&mut self, logits: &[f32]) -> Result<TokenId> {
        if logits.is_empty() {
            return Err(Error::Inference("empty logits".into()));
        }

        // Candidates sorted by logit descending; index order breaks ties so
        // the pipeline is deterministic.
        let mut candidates: Vec<(TokenId, f32)> = logits
            .iter()
            .enumerate()
            .map(|(i, &l)| (i as TokenId, l))
            .collect();
        candidates.sort_by(|(ia, la), (ib, lb)| {
            lb.partial_cmp(la)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| ia.cmp(ib))
        });

        // Top-k.
        let k = self.config.top_k.min(candidates.len());
        candidates.truncate(k);

        // Top-p: smallest prefix whose cumulative probability reaches the
        // threshold, keeping at least one candidate.
        if self.config.top_p < 1.0 {
            let probs = softmax(&candidates);
            let mut cumulative = 0.0f32;
            let mut keep = candidates.len();
            for (i, p) in probs.iter().enumerate() {
                cumulative += p;
                if cumulative >= self.config.top_p {
                    keep = i + 1;
                    break;
                }
            }
            candidates.truncate(keep.max(1));
        }

        // Temperature scaling. Zero skips the scaling and turns the final
        // draw into an argmax over the penalized candidates.
        if self.config.temperature > 0.0 && (self.config.temperature - 1.0).abs() > f32::EPSILON {
            for (_, logit) in &mut candidates {
                *logit /= self.config.temperature;
            }
        }

        // Repetition penalty over the trailing window: positive logits are
        // divided, negative multiplied, so repeats always lose weight.
        if (self.config.repeat_penalty - 1.0).abs() > f32::EPSILON {
            for (token, logit) in &mut candidates {
                if self.history.contains(token) {
                    if *logit > 0.0 {
                        *logit /= self.config.repeat_penalty;
                    } else {
                        *logit *= self.config.repeat_penalty;
                    }
                }
            }
        }

        // Temperature zero concentrates all mass on the best survivor.
        if self.config.temperature <= 0.0 {
            let best = candidates
                .iter()
                .max_by(|(ia, la), (ib, lb)| {
                    la.partial_cmp(lb)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| ib.cmp(ia))
                })
                .map(|&(token, _)| token);
            if let Some(token) = best {
                return Ok(token);
            }
        }

        // Categorical draw over the survivors.
        let probs = softmax(&candidates);
        let mut r: f32 = self.rng.gen();
        if r >= 1.0 {
            r = 0.999_999_94;
        }
        let mut cumulative = 0.0f32;
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p.max(0.0);
            if r < cumulative {
                return Ok(candidates[i].0);
            }
        }
        Ok(candidates[candidates.len() - 1].0)
    }
}

/// Numerically stable softmax over candidate logits.
fn softmax(candidates: &[(TokenId, f32)]) -> Vec<f32> {
    let mut max = f32::NEG_INFINITY;
    for &(_, l) in candidates {
        if l.is_finite() && l > max {
            max = l;
        }
    }
    if !max.is_finite() {
        return vec![1.0 / candidates.len() as f32; candidates.len()];
    }

    let mut exps = Vec::with_capacity(candidates.len());
    let mut sum = 0.0f32;
    for &(_, l) in candidates {
        let e = if l.is_finite() { (l - max).exp() } else { 0.0 };
        exps.push(e);
        sum += e;
    }
    if sum == 0.0 {
        return vec![1.0 / candidates.len() as f32; candidates.len()];
    }
    for e in &mut exps {
        *e /= sum;
    }
    exps
}
