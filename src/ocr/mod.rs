//! OCR collaborators: image decoding and text recognition.
//!
//! The recognizer is expensive to locate and configure, so one instance is
//! built on first use and shared for the rest of the process. Callers receive
//! it as a `&dyn TextRecognizer`, which lets tests substitute a fake.

pub mod decode;
pub mod engine;
pub mod preprocess;
pub mod setup;

pub use decode::decode_image;
pub use engine::{TesseractRecognizer, TextRecognizer};

use std::sync::OnceLock;

use crate::error::RecognitionError;

static RECOGNIZER: OnceLock<TesseractRecognizer> = OnceLock::new();

/// Returns the process-wide Tesseract recognizer, creating it on first call.
pub fn shared_recognizer() -> Result<&'static TesseractRecognizer, RecognitionError> {
    if let Some(recognizer) = RECOGNIZER.get() {
        return Ok(recognizer);
    }

    let config = crate::config::get_config();
    let executable = setup::find_tesseract_executable()?;
    let tessdata = setup::find_tessdata_dir(&config.ocr_languages);

    crate::log(&format!(
        "OCR engine: {} (tessdata: {})",
        executable.display(),
        tessdata
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "engine default".to_string())
    ));

    Ok(RECOGNIZER.get_or_init(|| TesseractRecognizer::new(executable, tessdata, config)))
}
