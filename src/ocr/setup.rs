use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::RecognitionError;
use crate::log;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Common install locations for the Tesseract executable.
const COMMON_EXECUTABLES: [&str; 5] = [
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

/// Common locations of system tessdata directories.
const COMMON_TESSDATA_DIRS: [&str; 7] = [
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];

/// Finds the Tesseract executable, checking PATH first, then common install paths
pub fn find_tesseract_executable() -> Result<PathBuf, RecognitionError> {
    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    COMMON_EXECUTABLES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| {
            RecognitionError::Unavailable(
                "tesseract not found in PATH or common install locations".to_string(),
            )
        })
}

fn traineddata_file(language: &str) -> String {
    format!("{}.traineddata", language)
}

fn has_languages(dir: &Path, languages: &[String]) -> bool {
    languages
        .iter()
        .all(|lang| dir.join(traineddata_file(lang)).exists())
}

/// Directories searched for language data, most specific first.
fn tessdata_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![crate::paths::get_tessdata_dir()];

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        candidates.push(prefix.join("tessdata"));
        candidates.push(prefix);
    }

    candidates.extend(COMMON_TESSDATA_DIRS.iter().map(PathBuf::from));
    candidates
}

/// Returns the first directory holding every requested language.
fn first_dir_with_languages(candidates: &[PathBuf], languages: &[String]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| has_languages(dir, languages))
        .cloned()
}

/// Finds a tessdata directory containing all configured languages.
///
/// `None` means Tesseract should fall back to its compiled-in location.
pub fn find_tessdata_dir(languages: &[String]) -> Option<PathBuf> {
    first_dir_with_languages(&tessdata_candidates(), languages)
}

/// Ensures Tesseract and the configured language data are available.
///
/// Missing language files are copied from a system tessdata directory when
/// one has them, otherwise downloaded into the local tessdata directory.
pub fn ensure_tesseract(languages: &[String]) -> Result<PathBuf> {
    let executable = find_tesseract_executable().map_err(|e| {
        anyhow!(
            "{}. Please install Tesseract-OCR:\n\
             - Linux: install the tesseract-ocr package\n\
             - macOS: brew install tesseract\n\
             - Windows: https://github.com/UB-Mannheim/tesseract/releases",
            e
        )
    })?;
    log(&format!("Tesseract found at: {}", executable.display()));

    let candidates = tessdata_candidates();
    if let Some(dir) = first_dir_with_languages(&candidates, languages) {
        log(&format!("Language data found at: {}", dir.display()));
        return Ok(dir);
    }

    let local_dir = crate::paths::get_tessdata_dir();
    fs::create_dir_all(&local_dir)
        .context(format!("Failed to create {}", local_dir.display()))?;

    for lang in languages {
        let target = local_dir.join(traineddata_file(lang));
        if target.exists() {
            continue;
        }

        let system_copy = candidates
            .iter()
            .skip(1)
            .map(|dir| dir.join(traineddata_file(lang)))
            .find(|p| p.exists());

        match system_copy {
            Some(source) => {
                log(&format!("Copying {} from: {}", traineddata_file(lang), source.display()));
                fs::copy(&source, &target)
                    .context(format!("Failed to copy {}", source.display()))?;
            }
            None => download_traineddata(lang, &target)?,
        }
    }

    log(&format!("Language data ready at: {}", local_dir.display()));
    Ok(local_dir)
}

/// Downloads one language's trained data
fn download_traineddata(language: &str, target: &Path) -> Result<()> {
    let url = format!("{}/{}", TESSDATA_REPO, traineddata_file(language));
    log(&format!("Downloading {}...", url));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(&url)
        .header("User-Agent", "proseka-records")
        .send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}: HTTP {}",
            traineddata_file(language),
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(target)
        .context(format!("Failed to create {}", target.display()))?;
    file.write_all(&bytes)?;

    log(&format!(
        "Downloaded {} ({} bytes)",
        traineddata_file(language),
        bytes.len()
    ));

    Ok(())
}
