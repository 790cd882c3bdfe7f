use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the charts directory: `<exe_dir>/charts/`
pub fn get_charts_dir() -> PathBuf {
    get_exe_dir().join("charts")
}

/// Returns the default database path: `<exe_dir>/<database_file>`
pub fn get_database_path() -> PathBuf {
    get_exe_dir().join(&crate::config::get_config().database_file)
}

/// Returns the local tessdata directory used for downloaded language data.
pub fn get_tessdata_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| get_exe_dir().clone())
        .join("proseka-records")
        .join("tessdata")
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(get_charts_dir())?;
    Ok(())
}
