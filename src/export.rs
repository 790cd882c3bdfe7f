//! JSON export of one song's records.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::record::{StoredRecord, VerifiedRecord};
use crate::view::SongSummary;

#[derive(Serialize)]
struct SongExport<'a> {
    song_title: &'a str,
    summary: Option<SongSummary>,
    records: Vec<&'a VerifiedRecord>,
}

/// Export a song's records (ids omitted) and summary to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_song_to_json(song_title: &str, records: &[&StoredRecord], output_path: &Path) -> Result<()> {
    let export = SongExport {
        song_title,
        summary: SongSummary::from_records(song_title, records),
        records: records.iter().map(|stored| &stored.record).collect(),
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize records to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
