// ============================================================
// Layer 7 — Charts
// ============================================================
// SVG charts for exploration and for the comparison results.
//
//   bar_chart          — one bar per category (sentiment distribution)
//   box_plot           — quartiles of a value per category (word count)
//   confusion_heatmap  — true class (rows) × predicted class (columns)
//   results_chart      — accuracy and F1 side by side per model
//
// Categorical axes run from -0.5 to n-0.5 so category i sits on the
// integer i; the label formatter turns integer ticks back into names.
//
// Reference: plotters ChartBuilder / Rectangle / Boxplot

use anyhow::{bail, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use crate::domain::score::ModelScore;

const SIZE: (u32, u32) = (800, 500);

fn category_label(names: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}

fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n as f64 - 0.5)
}

/// One filled bar per category, with its count on top.
pub fn bar_chart(path: &Path, title: &str, y_desc: &str, bars: &[(String, usize)]) -> Result<()> {
    if bars.is_empty() {
        bail!("bar chart '{title}' has no categories");
    }
    let names: Vec<String> = bars.iter().map(|(n, _)| n.clone()).collect();
    let max = bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f64;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(bars.len()), 0f64..max * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len() + 1)
        .x_label_formatter(&|x| category_label(&names, *x))
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *v as f64)], Palette99::pick(i).filled())
    }))?;

    let label_style = ("sans-serif", 16.0).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
        Text::new(v.to_string(), (i as f64, *v as f64), label_style.clone())
    }))?;

    root.present()?;
    tracing::info!("Bar chart saved to '{}'", path.display());
    Ok(())
}

/// Quartile box per category. Empty categories are left blank.
pub fn box_plot(path: &Path, title: &str, y_desc: &str, groups: &[(String, Vec<f64>)]) -> Result<()> {
    if groups.is_empty() {
        bail!("box plot '{title}' has no categories");
    }
    let names: Vec<String> = groups.iter().map(|(n, _)| n.clone()).collect();
    let max = groups
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(1.0f64, f64::max) as f32;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(groups.len()), 0f32..max * 1.05)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len() + 1)
        .x_label_formatter(&|x| category_label(&names, *x))
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(groups.iter().enumerate().filter(|(_, (_, v))| !v.is_empty()).map(|(i, (_, v))| {
        Boxplot::new_vertical(i as f64, &Quartiles::new(v))
            .width(40)
            .whisker_width(0.5)
            .style(Palette99::pick(i).stroke_width(2))
    }))?;

    root.present()?;
    tracing::info!("Box plot saved to '{}'", path.display());
    Ok(())
}

/// Heatmap of `matrix[true][pred]`, drawn in pixel space.
pub fn confusion_heatmap(
    path:   &Path,
    title:  &str,
    labels: &[String],
    matrix: &[Vec<usize>],
) -> Result<()> {
    let n = labels.len();
    if n == 0 || matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        bail!("confusion matrix for '{title}' must be {n}×{n}");
    }

    let (width, height) = (640u32, 600u32);
    let (left, top)     = (110i32, 70i32);
    let cell = ((width as i32 - left - 30).min(height as i32 - top - 70) / n as i32).max(1);
    let peak = matrix.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    root.draw(&Text::new(title.to_string(), (10, 10), ("sans-serif", 24.0).into_font()))?;

    let centred = |size: f64| {
        ("sans-serif", size).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center))
    };

    for (i, row) in matrix.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            let x0 = left + j as i32 * cell;
            let y0 = top + i as i32 * cell;
            let shade = count as f64 / peak;
            let fill  = RGBColor(
                (255.0 - 225.0 * shade) as u8,
                (255.0 - 155.0 * shade) as u8,
                255,
            );
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], BLACK.stroke_width(1)))?;

            let text_color = if shade > 0.6 { WHITE } else { BLACK };
            root.draw(&Text::new(
                count.to_string(),
                (x0 + cell / 2, y0 + cell / 2),
                centred(18.0).color(&text_color),
            ))?;
        }
    }

    for (k, label) in labels.iter().enumerate() {
        let mid = k as i32 * cell + cell / 2;
        // predicted classes along the bottom, true classes down the left
        root.draw(&Text::new(label.clone(), (left + mid, top + n as i32 * cell + 15), centred(14.0)))?;
        root.draw(&Text::new(label.clone(), (left / 2, top + mid), centred(14.0)))?;
    }
    root.draw(&Text::new("Predicted", (left + n as i32 * cell / 2, top + n as i32 * cell + 45), centred(16.0)))?;
    root.draw(&Text::new("Actual", (left / 2, top - 20), centred(16.0)))?;

    root.present()?;
    tracing::info!("Confusion matrix saved to '{}'", path.display());
    Ok(())
}

/// Accuracy and weighted F1 bars per model, values printed on the bars.
pub fn results_chart(path: &Path, scores: &[ModelScore]) -> Result<()> {
    if scores.is_empty() {
        bail!("no model scores to plot");
    }
    let names: Vec<String> = scores.iter().map(|s| s.model.clone()).collect();

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Model comparison", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(scores.len()), 0f64..1.1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(scores.len() + 1)
        .x_label_formatter(&|x| category_label(&names, *x))
        .y_desc("Score")
        .draw()?;

    let series: [(&str, RGBColor, f64, fn(&ModelScore) -> f64); 2] = [
        ("Accuracy", BLUE, -0.2, |s| s.accuracy),
        ("F1 (weighted)", RED, 0.2, |s| s.f1_weighted),
    ];
    let value_style = ("sans-serif", 14.0).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Bottom));

    for (label, color, offset, metric) in series {
        chart
            .draw_series(scores.iter().enumerate().map(|(i, s)| {
                let x = i as f64 + offset;
                Rectangle::new([(x - 0.18, 0.0), (x + 0.18, metric(s))], color.mix(0.8).filled())
            }))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));

        chart.draw_series(scores.iter().enumerate().map(|(i, s)| {
            let value = metric(s);
            Text::new(format!("{value:.3}"), (i as f64 + offset, value), value_style.clone())
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Results chart saved to '{}'", path.display());
    Ok(())
}
