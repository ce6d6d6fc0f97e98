use candle_core::Tensor;

use crate::{
    error::Result,
    model_manager::{self, ModelManager},
};

/// Tokens must be longer than this to count in the keyword-overlap score.
const MIN_KEYWORD_CHARS: usize = 3;

/// Scores how related a block of text is to the task description.
///
/// Scores are nominally in `[0, 1]`; an embedding strategy may report
/// negative cosines, which callers treat as low relevance.
pub trait SimilarityScorer {
    fn score(&mut self, text: &str, task: &str) -> f32;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Fraction of the task's words (longer than three characters) that appear
/// anywhere in `text`, case-insensitively.
///
/// Deterministic and infallible; returns 0 when the task has no such words.
pub fn keyword_overlap(text: &str, task: &str) -> f32 {
    let task_lower = task.to_lowercase();
    let text_lower = text.to_lowercase();

    let tokens: Vec<&str> = task_lower
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }

    let hits = tokens
        .iter()
        .filter(|token| text_lower.contains(*token))
        .count();
    hits as f32 / tokens.len() as f32
}

/// The keyword-overlap strategy, used when no model is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordOverlap;

impl SimilarityScorer for KeywordOverlap {
    fn score(&mut self, text: &str, task: &str) -> f32 {
        keyword_overlap(text, task)
    }

    fn name(&self) -> &'static str {
        "keyword-overlap"
    }
}

/// Turns text into one pooled embedding vector.
///
/// [`ModelManager`] is the production encoder.
pub trait TextEncoder {
    fn encode(&mut self, text: &str, is_query: bool) -> Result<Tensor>;

    fn model_id(&self) -> &str;
}

impl TextEncoder for ModelManager {
    fn encode(&mut self, text: &str, is_query: bool) -> Result<Tensor> {
        self.encode_pooled(text, is_query)
    }

    fn model_id(&self) -> &str {
        ModelManager::model_id(self)
    }
}

/// Cosine similarity between pooled model embeddings of the task and text.
///
/// The task embedding is computed once per distinct task string. Any
/// inference failure degrades that single call to [`keyword_overlap`].
pub struct EmbeddingSimilarity<E = ModelManager> {
    encoder: E,
    task_embedding: Option<(String, Tensor)>,
}

impl<E: TextEncoder> EmbeddingSimilarity<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            task_embedding: None,
        }
    }

    fn try_score(&mut self, text: &str, task: &str) -> Result<f32> {
        let cached = matches!(&self.task_embedding, Some((t, _)) if t == task);
        if !cached {
            let embedding = self.encoder.encode(task, true)?;
            self.task_embedding = Some((task.to_string(), embedding));
        }

        let text_embedding = self.encoder.encode(text, false)?;
        match &self.task_embedding {
            Some((_, task_embedding)) => {
                model_manager::cosine(task_embedding, &text_embedding)
            }
            None => Ok(0.0),
        }
    }
}

impl<E: TextEncoder> SimilarityScorer for EmbeddingSimilarity<E> {
    fn score(&mut self, text: &str, task: &str) -> f32 {
        match self.try_score(text, task) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(error = %e, "embedding failed, using keyword overlap");
                keyword_overlap(text, task)
            }
        }
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

/// Pick the scoring strategy for this run.
///
/// Probes whether the model can be loaded; on success the embedding strategy
/// is used for every call, otherwise (or when `use_model` is false) the
/// keyword-overlap strategy is.
pub fn select_scorer(
    model_id: String,
    use_model: bool,
) -> Box<dyn SimilarityScorer> {
    if use_model {
        tracing::info!(model = %model_id, "loading semantic model");
    }
    select_scorer_with(use_model, || ModelManager::load(model_id))
}

/// Like [`select_scorer`], with the model loader supplied by the caller.
pub fn select_scorer_with<E, F>(use_model: bool, load: F) -> Box<dyn SimilarityScorer>
where
    E: TextEncoder + 'static,
    F: FnOnce() -> Result<E>,
{
    if !use_model {
        tracing::info!("semantic model disabled, using keyword overlap");
        return Box::new(KeywordOverlap);
    }

    match load() {
        Ok(encoder) => {
            tracing::info!(model = encoder.model_id(), "using embedding similarity");
            Box::new(EmbeddingSimilarity::new(encoder))
        }
        Err(e) => {
            tracing::warn!(error = %e, "semantic model unavailable, using keyword overlap");
            Box::new(KeywordOverlap)
        }
    }
}
