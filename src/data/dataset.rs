use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

const CLS_ID: u32 = 101;
const SEP_ID: u32 = 102;
const PAD_ID: u32 = 0;

/// One tokenised and padded review.
/// Sequence format: [CLS] tokens [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          usize,
}

impl ReviewSample {
    /// Number of real (non-padding) tokens
    #[cfg(test)]
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// Tokenise `texts`, wrap each in [CLS]/[SEP], truncate and pad to `max_seq_len`.
pub fn encode_reviews(
    texts:       &[String],
    labels:      &[usize],
    tokenizer:   &Tokenizer,
    max_seq_len: usize,
) -> Result<Vec<ReviewSample>> {
    anyhow::ensure!(texts.len() == labels.len(), "texts and labels differ in length");
    anyhow::ensure!(max_seq_len >= 2, "max_seq_len must leave room for [CLS] and [SEP]");

    let cls_id = tokenizer.token_to_id("[CLS]").unwrap_or(CLS_ID);
    let sep_id = tokenizer.token_to_id("[SEP]").unwrap_or(SEP_ID);
    let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(PAD_ID);

    texts
        .iter()
        .zip(labels)
        .map(|(text, &label)| {
            let enc = tokenizer
                .encode(text.as_str(), false)
                .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

            let body = enc.get_ids();
            let keep = body.len().min(max_seq_len - 2);

            let mut input_ids = Vec::with_capacity(max_seq_len);
            input_ids.push(cls_id);
            input_ids.extend_from_slice(&body[..keep]);
            input_ids.push(sep_id);

            let mut attention_mask = vec![1u32; input_ids.len()];
            input_ids.resize(max_seq_len, pad_id);
            attention_mask.resize(max_seq_len, 0);

            Ok(ReviewSample { input_ids, attention_mask, label })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
