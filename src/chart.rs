//! Per-song judgment trend chart using plotters.
//!
//! One line per judgment category, one x position per play (in play-date order).

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

use crate::record::{Judgments, StoredRecord};

/// Line colors, in `Judgments::FIELD_NAMES` order.
const SERIES_COLORS: [RGBColor; 7] = [
    RGBColor(230, 120, 200), // perfect
    RGBColor(240, 170, 40),  // great
    RGBColor(60, 170, 90),   // good
    RGBColor(70, 120, 220),  // bad
    RGBColor(120, 120, 120), // miss
    RGBColor(40, 180, 200),  // fast
    RGBColor(220, 70, 60),   // late
];

/// Collects one value series per judgment category.
pub fn judgment_series(records: &[&StoredRecord]) -> Vec<(&'static str, Vec<u32>)> {
    Judgments::FIELD_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values = records
                .iter()
                .map(|stored| stored.record.judgments().values()[idx])
                .collect();
            (*name, values)
        })
        .collect()
}

/// Upper bound of the count axis: the largest value plus 10% headroom.
///
/// Computed in `u64` so counts near `u32::MAX` do not overflow.
fn y_axis_limit(series: &[(&'static str, Vec<u32>)]) -> u64 {
    let y_max = series
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .max()
        .map(u64::from)
        .unwrap_or(0)
        .max(1);
    y_max + y_max / 10 + 1
}

/// Draws the chart for one song's records (already sorted by play date).
pub fn generate_song_chart(
    song_title: &str,
    records: &[&StoredRecord],
    output_path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let series = judgment_series(records);
    let y_limit = y_axis_limit(&series);
    let x_max = records.len().saturating_sub(1).max(1);

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE)
        .context("Failed to fill chart background")?;

    let title = format!("{} (n = {})", song_title, records.len());
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font().style(FontStyle::Bold))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..x_max, 0u64..y_limit)
        .context("Failed to build chart")?;

    let date_label = |idx: &usize| {
        records
            .get(*idx)
            .map(|stored| stored.record.play_date().to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_desc("Play date")
        .y_desc("Count")
        .x_labels(records.len().clamp(2, 10))
        .x_label_formatter(&date_label)
        .draw()
        .context("Failed to draw mesh")?;

    for ((name, values), color) in series.into_iter().zip(SERIES_COLORS) {
        chart
            .draw_series(LineSeries::new(
                values.into_iter().map(u64::from).enumerate(),
                color.stroke_width(2),
            ))
            .context(format!("Failed to draw {} series", name))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .context("Failed to draw legend")?;

    root.present().context("Failed to save chart")?;
    crate::log(&format!("Chart saved: {}", output_path.display()));
    Ok(())
}

/// File name for a song's chart, with path-hostile characters replaced.
pub fn chart_file_name(song_title: &str) -> String {
    let stem: String = song_title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "song".to_string() } else { stem };
    format!("{}.png", stem)
}
