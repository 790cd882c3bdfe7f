use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "proseka-records")]
#[command(about = "Record rhythm-game results from screenshots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (defaults to the one next to the executable)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a result screenshot, review the values and save them
    Upload {
        /// PNG or JPEG screenshot
        image: PathBuf,

        /// Save the extracted values without prompting
        #[arg(long)]
        yes: bool,
    },

    /// Enter a result by hand
    Add {
        #[arg(long)]
        song: Option<String>,

        /// Play date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        level: Option<String>,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        perfect: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        great: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        good: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        bad: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        miss: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        fast: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        late: i64,
    },

    /// List songs with stored results
    Songs,

    /// Show one song's results by play date
    Show {
        song: String,

        /// Also write the records and summary to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Draw one song's judgment counts over time
    Chart {
        song: String,

        /// Output PNG (defaults to the charts directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check the OCR engine and fetch missing language data
    Setup,
}
