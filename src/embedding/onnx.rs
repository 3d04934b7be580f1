//! Transformer sentence embeddings through ONNX Runtime.

use std::sync::Mutex;

use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tokenizers::{Tokenizer, TruncationDirection, TruncationParams};

use crate::config::{EmbeddingConfig, Pooling};
use crate::embedding::hub::{resolve_model, EncoderConfig};
use crate::embedding::{Embedding, EmbeddingProvider};
use crate::error::{AlignError, Result};

/// BERT-family encoder exported to ONNX.
///
/// Input is tokenized with right-side truncation, so the first
/// `max_tokens` tokens (special tokens included) are kept. The session is
/// loaded once at construction and released on drop.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    output_name: String,
    needs_token_types: bool,
    dimension: usize,
    pooling: Pooling,
}

impl OnnxEmbedder {
    /// Loads the model named in the configuration.
    pub fn load(config: &EmbeddingConfig) -> Result<Self> {
        let files = resolve_model(&config.model)?;
        let encoder = EncoderConfig::from_file(&files.config_path)?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&files.onnx_path)?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| AlignError::ModelNotFound("ONNX graph has no outputs".to_string()))?;
        let needs_token_types = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        let max_length = config.max_tokens.min(encoder.max_position_embeddings);
        let mut tokenizer = Tokenizer::from_file(&files.tokenizer_path)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                direction: TruncationDirection::Right,
                ..Default::default()
            }))?
            .with_padding(None);

        log::info!(
            "Loaded encoder {} (dim={}, max_tokens={}, pooling={:?})",
            config.model,
            encoder.hidden_size,
            max_length,
            config.pooling
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            output_name,
            needs_token_types,
            dimension: encoder.hidden_size,
            pooling: config.pooling,
        })
    }

    fn pool(&self, hidden: &[f32], seq_len: usize, mask: &[u32]) -> Embedding {
        let dim = self.dimension;
        match self.pooling {
            Pooling::Cls => hidden[..dim].to_vec(),
            Pooling::Mean => {
                let mut pooled = vec![0.0f32; dim];
                let mut count = 0usize;
                for t in (0..seq_len).filter(|&t| mask.get(t).copied().unwrap_or(0) == 1) {
                    for (acc, &x) in pooled.iter_mut().zip(&hidden[t * dim..(t + 1) * dim]) {
                        *acc += x;
                    }
                    count += 1;
                }
                if count > 0 {
                    for x in &mut pooled {
                        *x /= count as f32;
                    }
                }
                pooled
            }
        }
    }
}

impl EmbeddingProvider for OnnxEmbedder {
    fn embed(&self, sentence: &str) -> Result<Embedding> {
        let encoding = self.tokenizer.encode(sentence, true)?;
        let seq_len = encoding.get_ids().len();

        let to_row = |values: &[u32]| -> Result<Array2<i64>> {
            Array2::from_shape_vec((1, seq_len), values.iter().map(|&v| v as i64).collect())
                .map_err(|e| AlignError::Embedding(format!("failed to shape input: {}", e)))
        };
        let input_ids = Value::from_array(to_row(encoding.get_ids())?)?;
        let attention_mask = Value::from_array(to_row(encoding.get_attention_mask())?)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| AlignError::Embedding("ONNX session lock poisoned".to_string()))?;

        let outputs = if self.needs_token_types {
            let token_type_ids = Value::from_array(to_row(encoding.get_type_ids())?)?;
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask
            ])?
        };

        let (shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| AlignError::Embedding(format!("failed to extract hidden state: {}", e)))?;

        // [batch, seq_len, hidden]
        let hidden = shape.get(2).map(|&h| h as usize).unwrap_or(0);
        if hidden != self.dimension {
            return Err(AlignError::DimensionMismatch {
                expected: self.dimension,
                actual: hidden,
            });
        }

        Ok(self.pool(data, seq_len, encoding.get_attention_mask()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires downloading the encoder: cargo test --features onnx -- --ignored
    #[test]
    #[ignore]
    fn test_bert_embedding() {
        let embedder = OnnxEmbedder::load(&EmbeddingConfig::default()).expect("load encoder");
        let v = embedder.embed("Quicksort picks a pivot.").expect("embed");
        assert_eq!(v.len(), 768);

        let long = "word ".repeat(2000);
        let v = embedder.embed(&long).expect("long input truncates");
        assert_eq!(v.len(), 768);
    }
}
