// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Trains the sentiment transformer for a fixed number of epochs
// with Adam and cross-entropy over the class logits.
//
// Burn notes:
//   - Training runs on TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on InferBackend, with dropout off
//   - The validation batcher must therefore use InferBackend too
//   - argmax(1) returns [batch, 1], flattened before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::data::{batcher::ReviewBatcher, dataset::ReviewDataset};
use crate::domain::traits::ModelTrainer;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::SentimentTransformer;
use crate::ml::{InferBackend, TrainBackend};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub epochs:     usize,
    pub batch_size: usize,
    pub lr:         f64,
    /// Shuffle seed for the training loader
    pub seed:       u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self { epochs: 5, batch_size: 6, lr: 3e-5, seed: 42 }
    }
}

pub struct TransformerTrainer {
    settings: TrainingSettings,
    train:    ReviewDataset,
    valid:    Option<ReviewDataset>,
    device:   <TrainBackend as Backend>::Device,
    logger:   Option<MetricsLogger>,
    history:  Vec<EpochMetrics>,
}

impl TransformerTrainer {
    pub fn new(
        settings: TrainingSettings,
        train:    ReviewDataset,
        device:   <TrainBackend as Backend>::Device,
    ) -> Self {
        Self { settings, train, valid: None, device, logger: None, history: Vec::new() }
    }

    /// Score every epoch against `valid`.
    pub fn with_validation(mut self, valid: ReviewDataset) -> Self {
        self.valid = Some(valid);
        self
    }

    pub fn with_logger(mut self, logger: MetricsLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Metrics of every epoch run so far
    #[cfg(test)]
    pub fn history(&self) -> &[EpochMetrics] {
        &self.history
    }

    fn validate(&self, model: &SentimentTransformer<InferBackend>) -> (f64, f64) {
        let Some(valid) = &self.valid else {
            return (f64::NAN, f64::NAN);
        };

        let val_batcher = ReviewBatcher::<InferBackend>::new(self.device.clone());
        let val_loader  = DataLoaderBuilder::new(val_batcher)
            .batch_size(self.settings.batch_size)
            .num_workers(1)
            .build(valid.clone());

        let mut loss_sum      = 0.0f64;
        let mut batches       = 0usize;
        let mut correct       = 0usize;
        let mut total_samples = 0usize;

        for batch in val_loader.iter() {
            let (loss, logits) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels.clone(),
            );
            loss_sum += loss.into_scalar().elem::<f64>();
            batches  += 1;

            total_samples += batch.labels.dims()[0];
            let predicted  = logits.argmax(1).flatten::<1>(0, 1);
            let hits: i64  = predicted
                .equal(batch.labels)
                .int().sum().into_scalar().elem::<i64>();
            correct += hits as usize;
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let accuracy = if total_samples > 0 { correct as f64 / total_samples as f64 } else { f64::NAN };
        (avg_loss, accuracy)
    }
}

impl ModelTrainer<SentimentTransformer<TrainBackend>> for TransformerTrainer {
    fn train(
        &mut self,
        mut model: SentimentTransformer<TrainBackend>,
    ) -> Result<SentimentTransformer<TrainBackend>> {
        if self.train.sample_count() == 0 {
            bail!("cannot train the transformer on an empty training set");
        }
        if self.settings.batch_size == 0 {
            bail!("batch size must be at least 1");
        }

        // m = β1*m + (1-β1)*g        (mean)
        // v = β2*v + (1-β2)*g²       (variance)
        // θ = θ - lr * m / (√v + ε)  (update)
        let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

        let train_batcher = ReviewBatcher::<TrainBackend>::new(self.device.clone());
        let train_loader  = DataLoaderBuilder::new(train_batcher)
            .batch_size(self.settings.batch_size)
            .shuffle(self.settings.seed)
            .num_workers(1)
            .build(self.train.clone());

        tracing::info!(
            "Training transformer: {} samples, {} epochs, batch size {}, lr {}",
            self.train.sample_count(), self.settings.epochs,
            self.settings.batch_size, self.settings.lr,
        );

        for epoch in 1..=self.settings.epochs {
            // ── Training phase ────────────────────────────────────────────────
            let mut train_loss_sum = 0.0f64;
            let mut train_batches  = 0usize;

            for batch in train_loader.iter() {
                let (loss, _) = model.forward_loss(
                    batch.input_ids,
                    batch.attention_mask,
                    batch.labels,
                );
                train_loss_sum += loss.clone().into_scalar().elem::<f64>();
                train_batches  += 1;

                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(self.settings.lr, model, grads);
            }

            let avg_train_loss = if train_batches > 0 {
                train_loss_sum / train_batches as f64
            } else { f64::NAN };

            // ── Validation phase ──────────────────────────────────────────────
            let (val_loss, val_accuracy) = self.validate(&model.valid());

            let metrics = EpochMetrics::new(epoch, avg_train_loss, val_loss, val_accuracy);
            tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
                epoch, self.settings.epochs, avg_train_loss, val_loss, val_accuracy * 100.0,
            );
            if let Some(logger) = &self.logger {
                logger.log(&metrics)?;
            }
            self.history.push(metrics);
        }

        tracing::info!("Training complete");
        Ok(model)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::ReviewSample;
    use crate::ml::model::SentimentTransformerConfig;

    fn sample(ids: &[u32], label: usize) -> ReviewSample {
        let mut input_ids      = ids.to_vec();
        let mut attention_mask = vec![1u32; ids.len()];
        input_ids.resize(6, 0);
        attention_mask.resize(6, 0);
        ReviewSample { input_ids, attention_mask, label }
    }

    fn dataset() -> ReviewDataset {
        ReviewDataset::new(vec![
            sample(&[101, 10, 11, 102], 0),
            sample(&[101, 12, 102], 1),
            sample(&[101, 13, 14, 15, 102], 2),
            sample(&[101, 10, 102], 0),
        ])
    }

    #[test]
    fn test_one_epoch_records_metrics() {
        let dir    = tempfile::tempdir().unwrap();
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let model: SentimentTransformer<TrainBackend> =
            SentimentTransformerConfig::new(110, 6, 8, 2, 1, 16, 3).init(&device);

        let settings = TrainingSettings { epochs: 1, batch_size: 2, lr: 1e-3, seed: 7 };
        let mut trainer = TransformerTrainer::new(settings, dataset(), device)
            .with_validation(dataset())
            .with_logger(MetricsLogger::new(dir.path()).unwrap());

        trainer.train(model).unwrap();

        assert_eq!(trainer.history().len(), 1);
        let m = &trainer.history()[0];
        assert!(m.train_loss.is_finite());
        assert!(m.val_loss.is_finite());
        assert!((0.0..=1.0).contains(&m.val_accuracy));

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let model: SentimentTransformer<TrainBackend> =
            SentimentTransformerConfig::new(110, 6, 8, 2, 1, 16, 3).init(&device);
        let mut trainer = TransformerTrainer::new(
            TrainingSettings::default(), ReviewDataset::new(Vec::new()), device,
        );
        assert!(trainer.train(model).is_err());
        assert!(trainer.history().is_empty());
    }
}
