// ============================================================
// Layer 4 — Review Loader
// ============================================================
// Reads the reviews CSV into RawReview rows using the csv crate.
//
// The source is either:
//   - a local path              → read from disk
//   - an http:// or https:// URL → fetched with reqwest (blocking)
//
// Only two columns matter and they are matched by header name,
// so any extra columns in the file are ignored:
//   overall     → star rating (e.g. "5.0")
//   reviewText  → free text, may be empty
//
// Rows whose rating is missing, unparsable or outside 1..=5 are
// skipped with a warning rather than failing the whole load.
//
// Reference: csv crate documentation (serde deserialisation)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};

use crate::domain::traits::{RawReview, ReviewSource};

/// The reviews dataset the analysis was built around.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/pscoutosoares/nlp-amazon/refs/heads/main/amazon_reviews.csv";

/// Loads review rows from a CSV file or URL.
/// Implements the ReviewSource trait from Layer 3.
pub struct CsvReviewLoader {
    source: String,
}

impl CsvReviewLoader {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

impl ReviewSource for CsvReviewLoader {
    fn load_all(&self) -> Result<Vec<RawReview>> {
        let rows = if self.is_remote() {
            tracing::info!("Fetching reviews from '{}'", self.source);
            let body = reqwest::blocking::get(&self.source)
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes())
                .with_context(|| format!("Cannot fetch '{}'", self.source))?;
            parse_reviews(body.as_ref())?
        } else {
            let path = Path::new(&self.source);
            tracing::info!("Reading reviews from '{}'", path.display());
            let file = File::open(path)
                .with_context(|| format!("Cannot open '{}'", path.display()))?;
            parse_reviews(file)?
        };

        tracing::info!("Loaded {} reviews", rows.len());
        Ok(rows)
    }
}

/// Only the columns we need; the rest are ignored by name matching.
#[derive(Debug, Deserialize)]
struct CsvRow {
    overall: Option<String>,

    #[serde(rename = "reviewText")]
    review_text: Option<String>,
}

/// Parse CSV content with a header row into raw reviews.
pub fn parse_reviews<R: Read>(reader: R) -> Result<Vec<RawReview>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();

    for (line, record) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row = record.with_context(|| format!("Malformed CSV row {}", line + 2))?;

        let rating = row
            .overall
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|r| (1.0..=5.0).contains(r));

        match rating {
            Some(rating) => rows.push(RawReview {
                rating,
                text: row.review_text.filter(|t| !t.is_empty()),
            }),
            None => tracing::warn!(
                "Skipping row {}: rating {:?} is not a number in 1..=5",
                line + 2,
                row.overall
            ),
        }
    }

    Ok(rows)
}
