use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

use super::ApproachOutcome;
use crate::application::corpus::SplitCorpus;
use crate::features::{embedding::WordVectors, scaler::StandardScaler};
use crate::ml::evaluation::Evaluation;
use crate::ml::svm::{fit_predict, SvcParams};

pub const NAME: &str = "SVM + Embeddings";

fn rows(x: &Array2<f64>) -> Vec<Array1<f64>> {
    x.rows().into_iter().map(|r| r.to_owned()).collect()
}

/// `split` is expected to have empty texts removed already.
pub fn run(split: &SplitCorpus, vectors: &WordVectors) -> Result<ApproachOutcome> {
    if split.train.is_empty() || split.test.is_empty() {
        bail!("{NAME}: train and test partitions must both be non-empty");
    }

    tracing::info!("{NAME}: embedding {} + {} texts (dim={})", split.train.len(), split.test.len(), vectors.dim());
    let x_train = vectors.embed_all(&split.train.texts);
    let x_test  = vectors.embed_all(&split.test.texts);

    let (scaler, x_train) = StandardScaler::fit_transform(&x_train)?;
    let x_test = scaler.transform(&x_test);

    let y_pred = fit_predict(&rows(&x_train), &split.train.labels, &rows(&x_test), &SvcParams::default())?;

    let eval = Evaluation::new(split.test.labels.clone(), y_pred, split.num_classes());
    Ok(ApproachOutcome::new(NAME, eval))
}
