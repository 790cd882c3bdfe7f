//! Rhythm-game result recorder.
//!
//! Reads a result screenshot with OCR, lets the user confirm or correct the
//! values, and keeps verified plays in a local SQLite database for per-song
//! review.

mod args;
mod chart;
mod config;
mod error;
mod export;
mod ocr;
mod paths;
mod pipeline;
mod prompt;
mod record;
mod store;
mod view;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use args::{Cli, Commands};
use pipeline::{FieldEdits, SubmitOutcome};
use store::RecordStore;

/// Logs a message to both stderr and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let log_path = paths::get_logs_dir().join("proseka_records.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    let cli = Cli::parse();

    paths::ensure_directories()?;
    config::init_config();

    if let Commands::Setup = cli.command {
        let tessdata = ocr::setup::ensure_tesseract(&config::get_config().ocr_languages)?;
        println!("OCR ready (language data: {})", tessdata.display());
        return Ok(());
    }

    let db_path = cli.db.clone().unwrap_or_else(paths::get_database_path);
    let mut store = RecordStore::open(&db_path)
        .context(format!("Failed to open database: {}", db_path.display()))?;

    match cli.command {
        Commands::Upload { image, yes } => run_upload(&mut store, &image, yes),
        Commands::Add {
            song,
            date,
            level,
            perfect,
            great,
            good,
            bad,
            miss,
            fast,
            late,
        } => {
            let draft = pipeline::map_fragments(song.as_deref());
            let mut edits = FieldEdits::from_draft(&draft);
            if let Some(date) = date {
                edits.play_date = date;
            }
            if let Some(level) = level {
                edits.level = level;
            }
            edits.perfect = perfect;
            edits.great = great;
            edits.good = good;
            edits.bad = bad;
            edits.miss = miss;
            edits.fast = fast;
            edits.late = late;

            let record = pipeline::correct(&draft, edits)?;
            report_outcome(pipeline::submit(&mut store, record)?);
            Ok(())
        }
        Commands::Songs => {
            let records = store.query_all()?;
            let songs = view::distinct_songs(&records);
            if songs.is_empty() {
                println!("No records stored yet.");
            }
            for song in songs {
                println!("{}", song);
            }
            Ok(())
        }
        Commands::Show { song, json } => {
            let records = store.query_all()?;
            let plays = view::records_for_song(&records, &song);
            if plays.is_empty() {
                println!("No records for {:?}.", song);
            } else {
                println!("{}", view::format_table(&plays));
                if let Some(summary) = view::SongSummary::from_records(&song, &plays) {
                    println!(
                        "\n{} plays, best perfect {}, mean perfect {:.1}, fewest miss {}, fast/late {}/{}",
                        summary.plays,
                        summary.best_perfect,
                        summary.mean_perfect,
                        summary.fewest_miss,
                        summary.total_fast,
                        summary.total_late
                    );
                }
            }
            if let Some(path) = json {
                export::export_song_to_json(&song, &plays, &path)?;
                println!("Exported to {}", path.display());
            }
            Ok(())
        }
        Commands::Chart { song, out } => {
            let records = store.query_all()?;
            let plays = view::records_for_song(&records, &song);
            if plays.is_empty() {
                println!("No records for {:?}.", song);
                return Ok(());
            }
            let out = out.unwrap_or_else(|| paths::get_charts_dir().join(chart::chart_file_name(&song)));
            let config = config::get_config();
            chart::generate_song_chart(&song, &plays, &out, (config.chart_width, config.chart_height))?;
            println!("Chart saved to {}", out.display());
            Ok(())
        }
        Commands::Setup => Ok(()),
    }
}

/// Upload flow: screenshot → draft → user confirmation → store.
fn run_upload(store: &mut RecordStore, image: &Path, yes: bool) -> Result<()> {
    let bytes = std::fs::read(image).context(format!("Failed to read {}", image.display()))?;
    let recognizer = ocr::shared_recognizer()?;
    let draft = pipeline::extract_draft(&bytes, recognizer)?;

    let record = if yes {
        pipeline::correct(&draft, FieldEdits::from_draft(&draft))?
    } else {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        prompt::confirm_draft(&draft, &mut stdin.lock(), &mut stdout)?
    };

    report_outcome(pipeline::submit(store, record)?);
    Ok(())
}

fn report_outcome(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Saved(stored) => println!(
            "Saved record #{} ({} / {}).",
            stored.id,
            stored.record.song_title(),
            stored.record.play_date()
        ),
        SubmitOutcome::DuplicateSkipped => println!(
            "A record with the same date, song title and judgment counts already exists. Not saved."
        ),
    }
}
