// ============================================================
// Layer 5 — Checkpoint-or-Train Resolution
// ============================================================
// Given a freshly initialised model:
//
//   weights present → load them, no training at all
//   weights absent  → train, then save only when `persist` is set
//
// Written against the WeightStore / ModelTrainer traits so the
// decision can be checked with counting doubles.

use anyhow::Result;

use crate::domain::traits::{ModelTrainer, WeightStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightsOrigin {
    Checkpoint,
    Trained,
}

pub fn resolve_weights<M, S, T>(
    model:   M,
    store:   &S,
    trainer: &mut T,
    persist: bool,
) -> Result<(M, WeightsOrigin)>
where
    S: WeightStore<M>,
    T: ModelTrainer<M>,
{
    if store.has_weights() {
        tracing::info!("Checkpoint found, loading weights and skipping training");
        let model = store.load_weights(model)?;
        return Ok((model, WeightsOrigin::Checkpoint));
    }

    tracing::info!("No checkpoint found, training from scratch");
    let model = trainer.train(model)?;
    if persist {
        store.save_weights(&model)?;
    }
    Ok((model, WeightsOrigin::Trained))
}
