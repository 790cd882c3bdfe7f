//! Application configuration.
//!
//! Loads settings from config.json at startup. Every field has a default, so a
//! partial file (or none at all) is fine.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Database file name, resolved next to the executable
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// Tesseract language codes, joined with '+' on the command line
    #[serde(default = "default_ocr_languages")]
    pub ocr_languages: Vec<String>,
    /// Tesseract page segmentation mode
    #[serde(default = "default_tesseract_psm")]
    pub tesseract_psm: u8,
    /// Optional brightness threshold; when set, only pixels brighter than
    /// this on every channel are kept as text before OCR
    #[serde(default)]
    pub ocr_threshold: Option<u8>,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_database_file() -> String {
    "proseka_records.db".to_string()
}

fn default_ocr_languages() -> Vec<String> {
    vec!["kor".to_string(), "eng".to_string()]
}

fn default_tesseract_psm() -> u8 {
    11 // Sparse text: result screens are scattered labels, not paragraphs
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    700
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            ocr_languages: default_ocr_languages(),
            tesseract_psm: default_tesseract_psm(),
            ocr_threshold: None,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

/// Reads a config file, falling back to defaults on any problem.
fn load_config_from(config_path: &Path) -> AppConfig {
    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if !config_path.exists() {
        crate::log("config.json not found. Using default config.");
        return AppConfig::default();
    }

    match fs::read_to_string(config_path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                AppConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read config.json: {}. Using defaults.",
                e
            ));
            AppConfig::default()
        }
    }
}

/// Loads configuration from config.json next to the executable.
fn load_config() -> AppConfig {
    let config_path = crate::paths::get_exe_dir().join("config.json");
    load_config_from(&config_path)
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration, loading it on first use.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(load_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config.database_file, "proseka_records.db");
        assert_eq!(config.ocr_languages, vec!["kor", "eng"]);
        assert_eq!(config.ocr_threshold, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ocr_threshold": 180, "tesseract_psm": 6 }"#).unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.ocr_threshold, Some(180));
        assert_eq!(config.tesseract_psm, 6);
        assert_eq!(config.chart_width, 1200);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.tesseract_psm, 11);
    }
}
