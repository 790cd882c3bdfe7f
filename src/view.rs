//! Read-side helpers for reviewing stored records per song.
//!
//! Everything here works on the output of `RecordStore::query_all`; the store
//! itself knows nothing about grouping or sorting.

use serde::Serialize;

use crate::record::{Judgments, StoredRecord};

/// Distinct song titles in the order they were first stored.
pub fn distinct_songs(records: &[StoredRecord]) -> Vec<String> {
    let mut songs: Vec<String> = Vec::new();
    for stored in records {
        let title = stored.record.song_title();
        if !songs.iter().any(|s| s == title) {
            songs.push(title.to_string());
        }
    }
    songs
}

/// Records of one song, sorted by play date ascending.
///
/// Plays on the same date keep their insertion order.
pub fn records_for_song<'a>(records: &'a [StoredRecord], song_title: &str) -> Vec<&'a StoredRecord> {
    let mut selected: Vec<&StoredRecord> = records
        .iter()
        .filter(|stored| stored.record.song_title() == song_title)
        .collect();
    selected.sort_by(|a, b| a.record.play_date().cmp(b.record.play_date()));
    selected
}

/// Aggregates over all plays of one song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongSummary {
    pub song_title: String,
    pub plays: usize,
    pub best_perfect: u32,
    pub mean_perfect: f64,
    pub fewest_miss: u32,
    pub total_fast: u64,
    pub total_late: u64,
}

impl SongSummary {
    /// Returns `None` when there are no plays.
    pub fn from_records(song_title: &str, records: &[&StoredRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let judgments: Vec<&Judgments> = records.iter().map(|s| s.record.judgments()).collect();
        let perfect_sum: u64 = judgments.iter().map(|j| u64::from(j.perfect)).sum();

        Some(Self {
            song_title: song_title.to_string(),
            plays: records.len(),
            best_perfect: judgments.iter().map(|j| j.perfect).max().unwrap_or(0),
            mean_perfect: perfect_sum as f64 / records.len() as f64,
            fewest_miss: judgments.iter().map(|j| j.miss).min().unwrap_or(0),
            total_fast: judgments.iter().map(|j| u64::from(j.fast)).sum(),
            total_late: judgments.iter().map(|j| u64::from(j.late)).sum(),
        })
    }
}

/// Renders records as a plain-text table without the id column.
pub fn format_table(records: &[&StoredRecord]) -> String {
    let mut header = vec!["play_date", "level", "song_title"];
    header.extend(Judgments::FIELD_NAMES);

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|stored| {
            let r = &stored.record;
            let mut row = vec![
                r.play_date().to_string(),
                r.level().to_string(),
                r.song_title().to_string(),
            ];
            row.extend(r.judgments().values().iter().map(|v| v.to_string()));
            row
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, name)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(header.clone())];
    for row in &rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
