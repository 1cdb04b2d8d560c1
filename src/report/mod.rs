// ============================================================
// Layer 7 — Report Layer
// ============================================================
// Everything written for a human to look at:
//
//   charts.rs    — bar chart, box plot, confusion heatmap,
//                  grouped results chart (SVG via plotters)
//   wordcloud.rs — word cloud layout and rendering
//   table.rs     — results table for the terminal and results.csv

pub mod charts;
pub mod wordcloud;
pub mod table;
