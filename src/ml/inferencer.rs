// ============================================================
// Layer 5 — Inference
// ============================================================
// Runs a trained transformer over a whole ReviewDataset and
// returns the arg-max class for every sample, in dataset order.
//
// Reference: Burn Book §4 (DataLoader)

use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};

use crate::data::{batcher::ReviewBatcher, dataset::ReviewDataset};
use crate::ml::model::SentimentTransformer;

pub struct Inferencer<B: Backend> {
    model:      SentimentTransformer<B>,
    device:     B::Device,
    batch_size: usize,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: SentimentTransformer<B>, device: B::Device, batch_size: usize) -> Self {
        Self { model, device, batch_size: batch_size.max(1) }
    }

    pub fn predict(&self, dataset: &ReviewDataset) -> Vec<usize> {
        let batcher = ReviewBatcher::<B>::new(self.device.clone());
        // No shuffle: predictions must line up with dataset order
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(self.batch_size)
            .num_workers(1)
            .build(dataset.clone());

        let mut predictions = Vec::with_capacity(dataset.sample_count());
        for batch in loader.iter() {
            let logits = self.model.forward(batch.input_ids, batch.attention_mask);
            let classes = logits.argmax(1).flatten::<1>(0, 1).into_data();
            predictions.extend(classes.iter::<i64>().map(|c| c as usize));
        }

        tracing::debug!("Predicted {} samples", predictions.len());
        predictions
    }
}
