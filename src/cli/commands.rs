// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `explore` and `compare`, and all
// their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::approaches::transformer::TransformerSettings;
use crate::application::compare_use_case::{Approach, CompareConfig};
use crate::application::explore_use_case::ExploreConfig;
use crate::data::loader::DEFAULT_SOURCE;
use crate::domain::review::Target;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Word clouds, sentiment distribution and word-count plots
    Explore(ExploreArgs),

    /// Fit and score the classifiers, then plot the comparison
    Compare(CompareArgs),
}

/// Flags shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// CSV file or http(s) URL with `overall` and `reviewText` columns
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Directory the SVG plots (and results.csv) are written to
    #[arg(long, default_value = "plots")]
    pub plots_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Maximum number of words drawn in each word cloud
    #[arg(long, default_value_t = 150)]
    pub cloud_words: usize,
}

impl From<ExploreArgs> for ExploreConfig {
    fn from(a: ExploreArgs) -> Self {
        ExploreConfig {
            source:      a.common.source,
            plots_dir:   a.common.plots_dir,
            cloud_words: a.cloud_words,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetArg {
    /// negative / neutral / positive
    Sentiment,
    /// 1 to 5 stars
    Rating,
}

impl From<TargetArg> for Target {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::Sentiment => Target::Sentiment,
            TargetArg::Rating    => Target::Rating,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApproachArg {
    /// TF-IDF features + SVM with grid search
    Bow,
    /// Mean word vectors + SVM
    Embedding,
    /// Transformer encoder classifier
    Transformer,
}

impl From<ApproachArg> for Approach {
    fn from(a: ApproachArg) -> Self {
        match a {
            ApproachArg::Bow         => Approach::Bow,
            ApproachArg::Embedding   => Approach::Embedding,
            ApproachArg::Transformer => Approach::Transformer,
        }
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// What the classifiers predict
    #[arg(long, value_enum, default_value_t = TargetArg::Sentiment)]
    pub target: TargetArg,

    /// Fraction of reviews held out for testing
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Seed for the train/test split and training shuffles
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Approaches to run, comma separated
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [ApproachArg::Bow, ApproachArg::Embedding, ApproachArg::Transformer])]
    pub approaches: Vec<ApproachArg>,

    /// GloVe / word2vec text file for the embedding approach
    #[arg(long)]
    pub word_vectors: Option<PathBuf>,

    /// Dimension of the random-indexing vectors used without --word-vectors
    #[arg(long, default_value_t = 96)]
    pub embedding_dim: usize,

    /// Directory holding the transformer checkpoint and tokenizer
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Directory copied into --checkpoint-dir before loading, if it exists
    #[arg(long)]
    pub checkpoint_source: Option<PathBuf>,

    /// Save the weights after training
    #[arg(long)]
    pub save_checkpoint: bool,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Number of reviews processed together in one forward pass
    #[arg(long, default_value_t = 6)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 3e-5)]
    pub lr: f64,

    /// Maximum number of tokens per review, including [CLS] and [SEP]
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Hidden dimension of the transformer
    #[arg(long, default_value_t = 128)]
    pub d_model: usize,

    /// Number of attention heads; must divide d_model
    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 512)]
    pub d_ff: usize,

    /// Dropout probability during training
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Upper bound on the tokenizer vocabulary
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

/// Boundary between Layer 1 and Layer 2: the application
/// layer never sees clap types.
impl From<CompareArgs> for CompareConfig {
    fn from(a: CompareArgs) -> Self {
        CompareConfig {
            source:        a.common.source,
            plots_dir:     a.common.plots_dir,
            target:        a.target.into(),
            test_size:     a.test_size,
            seed:          a.seed,
            approaches:    a.approaches.into_iter().map(Approach::from).collect(),
            word_vectors:  a.word_vectors,
            embedding_dim: a.embedding_dim,
            transformer:   TransformerSettings {
                checkpoint_dir:    a.checkpoint_dir,
                checkpoint_source: a.checkpoint_source,
                save_checkpoint:   a.save_checkpoint,
                epochs:            a.epochs,
                batch_size:        a.batch_size,
                lr:                a.lr,
                seed:              a.seed,
                max_seq_len:       a.max_seq_len,
                d_model:           a.d_model,
                num_heads:         a.num_heads,
                num_layers:        a.num_layers,
                d_ff:              a.d_ff,
                dropout:           a.dropout,
                vocab_size:        a.vocab_size,
            },
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use super::*;
    use clap::Parser;

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::try_parse_from(["review-sentiment", "compare"]).unwrap();
        let Commands::Compare(args) = cli.command else { panic!("expected compare") };
        let cfg: CompareConfig = args.into();

        assert_eq!(cfg.target, Target::Sentiment);
        assert_eq!(cfg.test_size, 0.2);
        assert_eq!(cfg.approaches, Approach::ALL.to_vec());
        assert_eq!(cfg.transformer.epochs, 5);
        assert_eq!(cfg.transformer.batch_size, 6);
        assert_eq!(cfg.transformer.lr, 3e-5);
        assert!(!cfg.transformer.save_checkpoint);
        assert_eq!(cfg.transformer.checkpoint_dir, PathBuf::from("checkpoints"));
        assert_eq!(cfg.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_compare_flags() {
        let cli = Cli::try_parse_from([
            "review-sentiment", "compare",
            "--target", "rating",
            "--approaches", "bow,transformer",
            "--save-checkpoint",
            "--checkpoint-source", "/mnt/ckpt",
            "--source", "reviews.csv",
        ]).unwrap();
        let Commands::Compare(args) = cli.command else { panic!("expected compare") };
        let cfg: CompareConfig = args.into();

        assert_eq!(cfg.target, Target::Rating);
        assert_eq!(cfg.approaches, vec![Approach::Bow, Approach::Transformer]);
        assert!(cfg.transformer.save_checkpoint);
        assert_eq!(cfg.transformer.checkpoint_source, Some(PathBuf::from("/mnt/ckpt")));
        assert_eq!(cfg.source, "reviews.csv");
    }

    #[test]
    fn test_explore_flags() {
        let cli = Cli::try_parse_from(["review-sentiment", "explore", "--cloud-words", "40"]).unwrap();
        let Commands::Explore(args) = cli.command else { panic!("expected explore") };
        let cfg: ExploreConfig = args.into();
        assert_eq!(cfg.cloud_words, 40);
        assert_eq!(cfg.plots_dir, PathBuf::from("plots"));
    }
}
