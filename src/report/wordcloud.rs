// ============================================================
// Layer 7 — Word Cloud
// ============================================================
// Two steps:
//
//   1. layout  — pure geometry. Words are placed largest first
//                along an Archimedean spiral out of the canvas
//                centre; a word goes at the first spiral point
//                where its box stays on the canvas and overlaps
//                no earlier box. A word that fits nowhere is
//                retried smaller, then dropped.
//   2. render  — draws the placed words into an SVG.
//
// Text boxes are estimated (width ≈ 0.6 · size per character),
// so the layout needs no font metrics.

use anyhow::Result;
use plotters::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const CHAR_WIDTH:    f64 = 0.6;
const SPIRAL_STEP:   f64 = 0.35;
const SPIRAL_GROWTH: f64 = 2.5;
const SHRINK:        f64 = 0.85;

/// Word counts over whitespace tokens, most frequent first,
/// alphabetical among equals.
pub fn word_frequencies(texts: &[String], max_words: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for text in texts {
        for word in text.split_whitespace() {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_words);
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word:      String,
    pub font_size: f64,
    /// Top-left corner in pixels
    pub x:         f64,
    pub y:         f64,
    pub width:     f64,
    pub height:    f64,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone)]
pub struct CloudLayout {
    pub width:         u32,
    pub height:        u32,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for CloudLayout {
    fn default() -> Self {
        Self { width: 800, height: 400, min_font_size: 10.0, max_font_size: 72.0 }
    }
}

impl CloudLayout {
    fn font_size_for(&self, count: usize, max_count: usize) -> f64 {
        if max_count == 0 {
            return self.min_font_size;
        }
        let ratio = count as f64 / max_count as f64;
        self.min_font_size + (self.max_font_size - self.min_font_size) * ratio
    }

    fn boxed(word: &str, font_size: f64, cx: f64, cy: f64) -> PlacedWord {
        let width  = word.chars().count() as f64 * font_size * CHAR_WIDTH;
        let height = font_size;
        PlacedWord {
            word: word.to_string(),
            font_size,
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    fn on_canvas(&self, w: &PlacedWord) -> bool {
        w.x >= 0.0
            && w.y >= 0.0
            && w.x + w.width <= self.width as f64
            && w.y + w.height <= self.height as f64
    }

    fn place_one(&self, word: &str, font_size: f64, placed: &[PlacedWord]) -> Option<PlacedWord> {
        let (cx, cy) = (self.width as f64 / 2.0, self.height as f64 / 2.0);
        let max_radius = cx.hypot(cy);

        let mut t = 0.0f64;
        loop {
            let r = SPIRAL_GROWTH * t;
            if r > max_radius {
                return None;
            }
            let candidate = Self::boxed(word, font_size, cx + r * t.cos(), cy + r * t.sin());
            if self.on_canvas(&candidate) && placed.iter().all(|p| !p.overlaps(&candidate)) {
                return Some(candidate);
            }
            t += SPIRAL_STEP;
        }
    }

    /// Place `words` (already ranked) on the canvas.
    pub fn layout(&self, words: &[(String, usize)]) -> Vec<PlacedWord> {
        let max_count = words.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());

        for (word, count) in words {
            let mut size = self.font_size_for(*count, max_count);
            while size >= self.min_font_size {
                if let Some(p) = self.place_one(word, size, &placed) {
                    placed.push(p);
                    break;
                }
                size *= SHRINK;
            }
        }

        tracing::debug!("Word cloud placed {} of {} words", placed.len(), words.len());
        placed
    }
}

/// Draw a word cloud of `texts` to an SVG file.
pub fn render_word_cloud(
    path:      &Path,
    title:     &str,
    texts:     &[String],
    max_words: usize,
    layout:    &CloudLayout,
) -> Result<()> {
    let words  = word_frequencies(texts, max_words);
    let placed = layout.layout(&words);

    let title_band = 40u32;
    let root = SVGBackend::new(path, (layout.width, layout.height + title_band)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, body) = root.split_vertically(title_band as i32);
    top.draw(&Text::new(title.to_string(), (10, 10), ("sans-serif", 24.0).into_font()))?;

    for (i, w) in placed.iter().enumerate() {
        let style = ("sans-serif", w.font_size).into_font().color(&Palette99::pick(i));
        body.draw(&Text::new(w.word.clone(), (w.x as i32, w.y as i32), style))?;
    }

    root.present()?;
    tracing::info!("Word cloud saved to '{}'", path.display());
    Ok(())
}
