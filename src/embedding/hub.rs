//! Locating encoder model files locally or on the Hugging Face Hub.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use serde::Deserialize;

use crate::error::{AlignError, Result};

/// ONNX graph locations tried in order.
const ONNX_CANDIDATES: [&str; 2] = ["onnx/model.onnx", "model.onnx"];

/// Files making up an encoder model.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// Path to the config.json file.
    pub config_path: PathBuf,
    /// Path to the ONNX graph.
    pub onnx_path: PathBuf,
    /// Path to the tokenizer.json file.
    pub tokenizer_path: PathBuf,
}

/// The part of a transformer config.json the embedder needs.
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderConfig {
    /// Hidden size of the transformer, i.e. the embedding dimension.
    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,

    /// Maximum position embeddings.
    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,
}

fn default_hidden_size() -> usize {
    768
}

fn default_max_position_embeddings() -> usize {
    512
}

impl EncoderConfig {
    /// Reads a config.json file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Resolves model files from a local directory or a Hub repository id.
pub fn resolve_model(model_id_or_path: &str) -> Result<ModelFiles> {
    let local = Path::new(model_id_or_path);
    if local.is_dir() {
        local_model_files(local)
    } else {
        download_model(model_id_or_path)
    }
}

fn local_model_files(model_dir: &Path) -> Result<ModelFiles> {
    let require = |name: &str| -> Result<PathBuf> {
        let path = model_dir.join(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(AlignError::ModelNotFound(format!(
                "{} not found in {}",
                name,
                model_dir.display()
            )))
        }
    };

    let onnx_path = ONNX_CANDIDATES
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| {
            AlignError::ModelNotFound(format!("ONNX model not found in {}", model_dir.display()))
        })?;

    Ok(ModelFiles {
        config_path: require("config.json")?,
        onnx_path,
        tokenizer_path: require("tokenizer.json")?,
    })
}

fn download_model(repo_id: &str) -> Result<ModelFiles> {
    log::info!("Downloading encoder from {}", repo_id);

    let api = Api::new().map_err(|e| AlignError::ModelNotFound(e.to_string()))?;
    let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

    let fetch = |name: &str| -> Result<PathBuf> {
        repo.get(name).map_err(|e| {
            AlignError::ModelNotFound(format!(
                "failed to download {} from {}: {}",
                name, repo_id, e
            ))
        })
    };

    let onnx_path = ONNX_CANDIDATES
        .iter()
        .find_map(|name| repo.get(name).ok())
        .ok_or_else(|| AlignError::ModelNotFound(format!("no ONNX export in {}", repo_id)))?;

    Ok(ModelFiles {
        config_path: fetch("config.json")?,
        onnx_path,
        tokenizer_path: fetch("tokenizer.json")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_config_defaults() {
        let config: EncoderConfig = serde_json::from_str(r#"{"model_type": "bert"}"#).unwrap();
        assert_eq!(config.hidden_size, 768);
        assert_eq!(config.max_position_embeddings, 512);
    }

    #[test]
    fn test_local_dir_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_model(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AlignError::ModelNotFound(_)));
    }
}
