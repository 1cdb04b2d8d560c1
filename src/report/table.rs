// ============================================================
// Layer 7 — Results Table
// ============================================================
// The comparison table as printed to the terminal and as
// exported to results.csv.
//
//   Model                      Accuracy  F1 (weighted)  Test samples
//   SVM + Bag of Words           0.8123         0.7890           999

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::score::ModelScore;

pub fn format_table(scores: &[ModelScore]) -> String {
    let name_width = scores
        .iter()
        .map(|s| s.model.chars().count())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    let mut out = format!(
        "{:<name_width$}  {:>8}  {:>13}  {:>12}\n",
        "Model", "Accuracy", "F1 (weighted)", "Test samples",
    );
    for s in scores {
        out.push_str(&format!(
            "{:<name_width$}  {:>8.4}  {:>13.4}  {:>12}\n",
            s.model, s.accuracy, s.f1_weighted, s.test_samples,
        ));
    }
    out
}

/// Writes one CSV row per model with a header row.
pub fn write_csv(path: &Path, scores: &[ModelScore]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    for s in scores {
        writer.serialize(s)?;
    }
    writer.flush()?;

    tracing::info!("Results table saved to '{}'", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> Vec<ModelScore> {
        vec![
            ModelScore::new("SVM + Bag of Words", 0.8, 0.75, 20),
            ModelScore::new("BERT", 0.9, 0.875, 18),
        ]
    }

    #[test]
    fn test_table_columns_line_up() {
        let table = format_table(&scores());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Model"));
        assert!(lines[2].starts_with("BERT  "));
        assert!(lines[1].contains("0.8000"));
        assert!(lines[2].contains("0.8750"));
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_csv_export() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_csv(&path, &scores()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("model,accuracy,f1_weighted,test_samples"));
        assert_eq!(lines.next(), Some("SVM + Bag of Words,0.8,0.75,20"));
    }
}
