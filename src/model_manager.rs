use candle_core::{Device, Tensor};
use pylate_rs::ColBERT;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL_ID: &str = "lightonai/GTE-ModernColBERT-v1";
pub const MODEL_ENV_VAR: &str = "PERSONA_RANK_MODEL";

/// Select the best available compute device.
///
/// Uses CUDA when compiled with the `cuda` feature, Metal when compiled with
/// the `metal` feature, and falls back to CPU otherwise.
fn default_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            return device;
        }
    }

    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            return device;
        }
    }

    Device::Cpu
}

/// Resolve the model ID from, in order of priority:
/// 1. An explicit ID (from --model)
/// 2. The `PERSONA_RANK_MODEL` environment variable
/// 3. The default model (`lightonai/GTE-ModernColBERT-v1`)
pub fn resolve_model_id(explicit: Option<&str>) -> String {
    if let Some(id) = explicit {
        return id.to_string();
    }
    std::env::var(MODEL_ENV_VAR).unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string())
}

/// Owns the loaded ColBERT model for the duration of a run.
///
/// Unlike a lazily loaded handle, construction fails if the model cannot be
/// loaded, which is what the similarity capability probe relies on.
pub struct ModelManager {
    model: ColBERT,
    model_id: String,
}

impl ModelManager {
    /// Load the model, downloading it from HuggingFace Hub if needed.
    pub fn load(model_id: String) -> Result<Self> {
        let colbert: ColBERT = ColBERT::from(&model_id)
            .with_device(default_device())
            .try_into()
            .map_err(|e| {
                Error::Model(format!("failed to load {model_id}: {e}"))
            })?;

        Ok(Self {
            model: colbert,
            model_id,
        })
    }

    /// Returns the model ID that has been loaded.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Encode a single text into one pooled vector of shape `[D]`.
    ///
    /// ColBERT produces per-token embeddings `[1, T, D]`; they are mean-pooled
    /// over `T` so that two texts can be compared with a plain cosine.
    pub fn encode_pooled(&mut self, text: &str, is_query: bool) -> Result<Tensor> {
        let embeddings = self
            .model
            .encode(&[text.to_string()], is_query)
            .map_err(|e| Error::Model(format!("encoding failed: {e}")))?;
        // [1, T, D] -> [T, D] -> [D]
        Ok(embeddings.squeeze(0)?.mean(0)?)
    }
}

/// Cosine similarity between two vectors of shape `[D]`.
///
/// Returns 0 when either vector has zero norm.
pub fn cosine(a: &Tensor, b: &Tensor) -> Result<f32> {
    let dot = a.mul(b)?.sum_all()?.to_scalar::<f32>()?;
    let norm_a = a.sqr()?.sum_all()?.to_scalar::<f32>()?.sqrt();
    let norm_b = b.sqr()?.sum_all()?.to_scalar::<f32>()?.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tensor(data: &[f32]) -> Tensor {
        Tensor::from_vec(data.to_vec(), data.len(), &Device::Cpu).unwrap()
    }

    #[test]
    fn explicit_model_id_wins() {
        assert_eq!(resolve_model_id(Some("custom/model")), "custom/model");
    }

    #[test]
    fn cosine_identical_vectors() {
        let a = make_tensor(&[1.0, 2.0, 3.0]);
        let score = cosine(&a, &a).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = make_tensor(&[1.0, 0.0, 0.0]);
        let b = make_tensor(&[0.0, 1.0, 0.0]);
        assert!(cosine(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_vectors_is_negative() {
        let a = make_tensor(&[1.0, 1.0]);
        let b = make_tensor(&[-1.0, -1.0]);
        assert!((cosine(&a, &b).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let a = make_tensor(&[1.0, 0.0]);
        let b = make_tensor(&[10.0, 10.0]);
        let expected = std::f32::consts::FRAC_1_SQRT_2;
        assert!((cosine(&a, &b).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        let a = make_tensor(&[0.0, 0.0]);
        let b = make_tensor(&[1.0, 0.0]);
        assert_eq!(cosine(&a, &b).unwrap(), 0.0);
    }
}
