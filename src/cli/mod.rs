// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with `clap` and prints results.
// All work is delegated to Layer 2 (application).
//
//   1. `explore` — exploratory plots and a dataset summary
//   2. `compare` — fit, score and compare the classifiers
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, CompareArgs, ExploreArgs};

use crate::application::compare_use_case::CompareUseCase;
use crate::application::explore_use_case::ExploreUseCase;
use crate::domain::score::best_by_f1;
use crate::report::table::format_table;

#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version = "0.1.0",
    about = "Explore a product-review dataset and compare sentiment classifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Explore(args) => run_explore(args),
            Commands::Compare(args) => run_compare(args),
        }
    }
}

fn run_explore(args: ExploreArgs) -> Result<()> {
    let report = ExploreUseCase::new(args.into()).execute()?;

    println!(
        "Reviews: {} ({} without text, {} empty after cleaning)",
        report.total_reviews, report.missing_text, report.empty_reviews
    );
    for s in &report.by_sentiment {
        println!(
            "  {:<9} {:>6} reviews, {:>6.1} words on average",
            s.sentiment.as_str(), s.reviews, s.mean_word_count
        );
    }
    for path in &report.plots {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let plots_dir = args.common.plots_dir.clone();
    let scores    = CompareUseCase::new(args.into()).execute()?;

    println!("\n{}", format_table(&scores));
    if let Some(best) = best_by_f1(&scores) {
        println!("Best model by weighted F1: {} ({:.4})", best.model, best.f1_weighted);
    }
    println!("Plots and results.csv saved to '{}'", plots_dir.display());
    Ok(())
}
