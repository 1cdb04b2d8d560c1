// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Owns the checkpoint directory of the transformer approach.
//
//   checkpoints/
//     best_model.mpk      ← weights (CompactRecorder, MessagePack)
//     model_config.json   ← architecture the weights belong to
//     tokenizer.json      ← vocabulary (see tokenizer_store.rs)
//     metrics.csv         ← per-epoch training metrics
//
// Weights are keyed only by their path: existence is checked,
// content is not. The recorder adds the .mpk extension itself,
// so it is handed the path without one.
//
// An external source directory can be merged in before anything
// is resolved. A missing source is a warning, never an error.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::domain::traits::WeightStore;
use crate::ml::model::{SentimentTransformer, SentimentTransformerConfig};

pub const WEIGHTS_STEM: &str = "best_model";
pub const CONFIG_FILE:  &str = "model_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the weights file as written by the recorder
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(format!("{WEIGHTS_STEM}.mpk"))
    }

    pub fn has_weights(&self) -> bool {
        self.weights_path().is_file()
    }

    /// Copy everything under `source` into the checkpoint directory,
    /// overwriting files that already exist. Returns the number of
    /// files copied.
    pub fn import_from(&self, source: Option<&Path>) -> Result<usize> {
        let Some(source) = source else {
            return Ok(0);
        };
        if !source.is_dir() {
            tracing::warn!(
                "Checkpoint source '{}' is not available, continuing without it",
                source.display()
            );
            return Ok(0);
        }

        let copied = copy_dir_recursive(source, &self.dir)?;
        tracing::info!(
            "Copied {} file(s) from '{}' into '{}'",
            copied, source.display(), self.dir.display()
        );
        Ok(copied)
    }

    pub fn save_model<B: Backend>(&self, model: &SentimentTransformer<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(WEIGHTS_STEM);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::info!("Saved weights to '{}'", self.weights_path().display());
        Ok(())
    }

    /// `model` must have the architecture the weights were recorded with.
    pub fn load_model<B: Backend>(
        &self,
        model:  SentimentTransformer<B>,
        device: &B::Device,
    ) -> Result<SentimentTransformer<B>> {
        let path   = self.dir.join(WEIGHTS_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", self.weights_path().display()))?;

        tracing::info!("Loaded weights from '{}'", self.weights_path().display());
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &SentimentTransformerConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    /// The stored architecture, if one was saved alongside the weights.
    pub fn load_config(&self) -> Result<Option<SentimentTransformerConfig>> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg = serde_json::from_str(&json)
            .with_context(|| format!("Malformed model config '{}'", path.display()))?;
        Ok(Some(cfg))
    }

    /// Weight store for models living on backend `B`.
    pub fn bind<B: Backend>(&self, device: B::Device) -> ModelCheckpoint<'_, B> {
        ModelCheckpoint { manager: self, device }
    }
}

pub struct ModelCheckpoint<'a, B: Backend> {
    manager: &'a CheckpointManager,
    device:  B::Device,
}

impl<B: Backend> WeightStore<SentimentTransformer<B>> for ModelCheckpoint<'_, B> {
    fn has_weights(&self) -> bool {
        self.manager.has_weights()
    }

    fn load_weights(&self, model: SentimentTransformer<B>) -> Result<SentimentTransformer<B>> {
        self.manager.load_model(model, &self.device)
    }

    fn save_weights(&self, model: &SentimentTransformer<B>) -> Result<()> {
        self.manager.save_model(model)
    }
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).with_context(|| format!("Cannot create '{}'", to.display()))?;

    let mut copied = 0;
    for entry in fs::read_dir(from).with_context(|| format!("Cannot read '{}'", from.display()))? {
        let entry  = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Cannot copy '{}' to '{}'", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::InferBackend;

    fn tiny_config() -> SentimentTransformerConfig {
        SentimentTransformerConfig::new(120, 8, 8, 2, 1, 16, 3)
    }

    #[test]
    fn test_missing_source_is_not_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert_eq!(ckpt.import_from(None).unwrap(), 0);
        assert_eq!(ckpt.import_from(Some(&dir.path().join("nope"))).unwrap(), 0);
        assert!(!ckpt.has_weights());
    }

    #[test]
    fn test_import_copies_nested_files() {
        let src = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("best_model.mpk"), b"w").unwrap();
        fs::write(src.path().join("sub").join("note.txt"), b"n").unwrap();

        let dst  = tempfile::tempdir().unwrap();
        fs::write(dst.path().join("best_model.mpk"), b"old").unwrap();
        let ckpt = CheckpointManager::new(dst.path());

        assert_eq!(ckpt.import_from(Some(src.path())).unwrap(), 2);
        assert!(ckpt.has_weights());
        assert_eq!(fs::read(ckpt.weights_path()).unwrap(), b"w");
        assert!(dst.path().join("sub").join("note.txt").is_file());
    }

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(ckpt.load_config().unwrap().is_none());

        ckpt.save_config(&tiny_config()).unwrap();
        let loaded = ckpt.load_config().unwrap().unwrap();
        assert_eq!(loaded.vocab_size, 120);
        assert_eq!(loaded.num_classes, 3);
    }

    #[test]
    fn test_weights_save_then_load() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("ckpt"));
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let store  = ckpt.bind::<InferBackend>(device.clone());

        let model: SentimentTransformer<InferBackend> = tiny_config().init(&device);
        assert!(!store.has_weights());
        store.save_weights(&model).unwrap();
        assert!(store.has_weights());

        let fresh: SentimentTransformer<InferBackend> = tiny_config().init(&device);
        let loaded = store.load_weights(fresh).unwrap();

        // CompactRecorder stores half precision, so compare with a tolerance
        let before: Vec<f32> = model.classifier.weight.val().into_data().iter::<f32>().collect();
        let after:  Vec<f32> = loaded.classifier.weight.val().into_data().iter::<f32>().collect();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }
}
