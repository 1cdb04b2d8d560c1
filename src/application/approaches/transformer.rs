// Transformer approach:
//
//   Step 1: Merge the external checkpoint source, if any   (infra)
//   Step 2: Load or build the tokenizer                    (infra)
//   Step 3: Pick the architecture (saved config wins)      (infra)
//   Step 4: Tokenise both partitions                       (data)
//   Step 5: Load weights, or train from scratch            (ml)
//   Step 6: Predict the test partition                     (ml)

use anyhow::{bail, Result};
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ApproachOutcome;
use crate::application::corpus::SplitCorpus;
use crate::data::dataset::{encode_reviews, ReviewDataset};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::{id_space, TokenizerStore, TOKENIZER_FILE},
};
use crate::ml::evaluation::Evaluation;
use crate::ml::inferencer::Inferencer;
use crate::ml::model::{SentimentTransformer, SentimentTransformerConfig};
use crate::ml::resolver::{resolve_weights, WeightsOrigin};
use crate::ml::trainer::{TrainingSettings, TransformerTrainer};
use crate::ml::TrainBackend;

pub const NAME: &str = "Transformer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerSettings {
    pub checkpoint_dir:    PathBuf,
    pub checkpoint_source: Option<PathBuf>,
    /// Persist weights and architecture after training
    pub save_checkpoint:   bool,
    pub epochs:            usize,
    pub batch_size:        usize,
    pub lr:                f64,
    pub seed:              u64,
    pub max_seq_len:       usize,
    pub d_model:           usize,
    pub num_heads:         usize,
    pub num_layers:        usize,
    pub d_ff:              usize,
    pub dropout:           f64,
    pub vocab_size:        usize,
}

impl Default for TransformerSettings {
    fn default() -> Self {
        Self {
            checkpoint_dir:    PathBuf::from("checkpoints"),
            checkpoint_source: None,
            save_checkpoint:   false,
            epochs:            5,
            batch_size:        6,
            lr:                3e-5,
            seed:              42,
            max_seq_len:       128,
            d_model:           128,
            num_heads:         4,
            num_layers:        2,
            d_ff:              512,
            dropout:           0.1,
            vocab_size:        30522,
        }
    }
}

impl TransformerSettings {
    fn model_config(&self, vocab_rows: usize, num_classes: usize) -> SentimentTransformerConfig {
        SentimentTransformerConfig::new(
            self.vocab_size.max(vocab_rows),
            self.max_seq_len,
            self.d_model,
            self.num_heads,
            self.num_layers,
            self.d_ff,
            num_classes,
        )
        .with_dropout(self.dropout)
    }

    fn training(&self) -> TrainingSettings {
        TrainingSettings {
            epochs:     self.epochs,
            batch_size: self.batch_size,
            lr:         self.lr,
            seed:       self.seed,
        }
    }
}

/// `split` is expected to have empty texts removed already.
pub fn run(split: &SplitCorpus, settings: &TransformerSettings) -> Result<(ApproachOutcome, WeightsOrigin)> {
    if split.train.is_empty() || split.test.is_empty() {
        bail!("{NAME}: train and test partitions must both be non-empty");
    }
    if settings.d_model % settings.num_heads.max(1) != 0 {
        bail!("d_model ({}) must be divisible by num_heads ({})", settings.d_model, settings.num_heads);
    }

    // ── Step 1: External checkpoint source ───────────────────────────────────
    let ckpt = CheckpointManager::new(&settings.checkpoint_dir);
    ckpt.import_from(settings.checkpoint_source.as_deref())?;

    // ── Step 2: Tokenizer ────────────────────────────────────────────────────
    let tok_store = TokenizerStore::new(settings.checkpoint_dir.to_string_lossy());
    if ckpt.has_weights() && !tok_store.exists() {
        // a fresh vocabulary would not match the ids the weights were trained on
        bail!(
            "checkpoint '{}' has weights but no {TOKENIZER_FILE}; restore it or remove the weights",
            ckpt.weights_path().display()
        );
    }
    let tokenizer = tok_store.load_or_build(&split.train.texts, settings.vocab_size)?;

    // ── Step 3: Architecture ─────────────────────────────────────────────────
    let model_cfg = match ckpt.load_config()? {
        Some(saved) if ckpt.has_weights() => {
            if saved.num_classes != split.num_classes() {
                bail!(
                    "checkpoint in '{}' predicts {} classes but the target has {}",
                    ckpt.dir().display(), saved.num_classes, split.num_classes()
                );
            }
            tracing::info!("Using the architecture stored with the checkpoint");
            saved
        }
        _ => settings.model_config(id_space(&tokenizer), split.num_classes()),
    };

    // ── Step 4: Tokenise ─────────────────────────────────────────────────────
    let train_ds = ReviewDataset::new(encode_reviews(
        &split.train.texts, &split.train.labels, &tokenizer, model_cfg.max_seq_len,
    )?);
    let test_ds = ReviewDataset::new(encode_reviews(
        &split.test.texts, &split.test.labels, &tokenizer, model_cfg.max_seq_len,
    )?);
    tracing::info!("{NAME}: {} train, {} test sequences", train_ds.sample_count(), test_ds.sample_count());

    // ── Step 5: Load or train ────────────────────────────────────────────────
    let device = burn::backend::ndarray::NdArrayDevice::Cpu;
    let model: SentimentTransformer<TrainBackend> = model_cfg.init(&device);

    let mut trainer = TransformerTrainer::new(settings.training(), train_ds, device.clone())
        .with_validation(test_ds.clone());
    if !ckpt.has_weights() {
        trainer = trainer.with_logger(MetricsLogger::new(ckpt.dir())?);
    }

    let store = ckpt.bind::<TrainBackend>(device.clone());
    let (model, origin) = resolve_weights(model, &store, &mut trainer, settings.save_checkpoint)?;
    match origin {
        WeightsOrigin::Checkpoint => println!("Weights loaded from checkpoint."),
        WeightsOrigin::Trained    => println!("No checkpoint available, trained from scratch."),
    }
    if origin == WeightsOrigin::Trained && settings.save_checkpoint {
        ckpt.save_config(&model_cfg)?;
    }

    // ── Step 6: Predict ──────────────────────────────────────────────────────
    let inferencer = Inferencer::new(model.valid(), device, settings.batch_size);
    let y_pred     = inferencer.predict(&test_ds);

    let eval = Evaluation::new(test_ds.labels(), y_pred, split.num_classes());
    Ok((ApproachOutcome::new(NAME, eval), origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::{Review, Target};

    fn split() -> SplitCorpus {
        let reviews = (0..10)
            .map(|i| {
                let (rating, text) = if i % 2 == 0 { (1.0, "awful broken") } else { (5.0, "great love") };
                Review::new(rating, text, text)
            })
            .collect();
        SplitCorpus::new(reviews, Target::Sentiment, 0.2, 42)
    }

    fn tiny(dir: &std::path::Path, save: bool) -> TransformerSettings {
        TransformerSettings {
            checkpoint_dir:  dir.to_path_buf(),
            save_checkpoint: save,
            epochs:          1,
            batch_size:      4,
            lr:              1e-3,
            max_seq_len:     6,
            d_model:         8,
            num_heads:       2,
            num_layers:      1,
            d_ff:            16,
            vocab_size:      50,
            ..TransformerSettings::default()
        }
    }

    #[test]
    fn test_trains_without_saving_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let (outcome, origin) = run(&split(), &tiny(dir.path(), false)).unwrap();

        assert_eq!(origin, WeightsOrigin::Trained);
        assert_eq!(outcome.score.test_samples, 2);
        assert!(!CheckpointManager::new(dir.path()).has_weights());

        // nothing saved, so a rerun trains again
        let (_, origin) = run(&split(), &tiny(dir.path(), false)).unwrap();
        assert_eq!(origin, WeightsOrigin::Trained);
    }

    #[test]
    fn test_saved_checkpoint_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let (_, origin) = run(&split(), &tiny(dir.path(), true)).unwrap();
        assert_eq!(origin, WeightsOrigin::Trained);
        assert!(dir.path().join("best_model.mpk").is_file());
        assert!(dir.path().join("model_config.json").is_file());

        // a different d_model on the command line is ignored in favour of the stored one
        let mut settings = tiny(dir.path(), false);
        settings.d_model = 4;
        let (outcome, origin) = run(&split(), &settings).unwrap();
        assert_eq!(origin, WeightsOrigin::Checkpoint);
        assert_eq!(outcome.evaluation.y_pred.len(), 2);
    }

    #[test]
    fn test_checkpoint_source_is_imported() {
        let first = tempfile::tempdir().unwrap();
        run(&split(), &tiny(first.path(), true)).unwrap();

        let second = tempfile::tempdir().unwrap();
        let mut settings = tiny(&second.path().join("ckpt"), false);
        settings.checkpoint_source = Some(first.path().to_path_buf());

        let (_, origin) = run(&split(), &settings).unwrap();
        assert_eq!(origin, WeightsOrigin::Checkpoint);
    }

    #[test]
    fn test_weights_without_tokenizer_are_rejected() {
        let first = tempfile::tempdir().unwrap();
        run(&split(), &tiny(first.path(), true)).unwrap();

        let second = tempfile::tempdir().unwrap();
        std::fs::copy(first.path().join("best_model.mpk"), second.path().join("best_model.mpk")).unwrap();

        let err = run(&split(), &tiny(second.path(), false)).unwrap_err();
        assert!(err.to_string().contains(TOKENIZER_FILE), "{err}");
        assert!(!second.path().join(TOKENIZER_FILE).exists());
    }
}
