use image::RgbImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::preprocess::prepare_for_ocr;
use crate::config::AppConfig;
use crate::error::RecognitionError;

/// Turns a decoded screenshot into text fragments in detection order.
///
/// The returned sequence is finite and owned, so it can be walked as many
/// times as needed. No semantic ordering is promised.
pub trait TextRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<Vec<String>, RecognitionError>;
}

/// Represents a line of OCR text with its mean word confidence
#[derive(Debug, Clone, PartialEq)]
struct OcrLine {
    text: String,
    confidence: f32,
}

/// Runs the Tesseract command line tool.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    languages: String,
    psm: u8,
    threshold: Option<u8>,
}

impl TesseractRecognizer {
    pub fn new(executable: PathBuf, tessdata: Option<PathBuf>, config: &AppConfig) -> Self {
        Self {
            executable,
            tessdata,
            languages: config.ocr_languages.join("+"),
            psm: config.tesseract_psm,
            threshold: config.ocr_threshold,
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<Vec<String>, RecognitionError> {
        let prepared = prepare_for_ocr(image, self.threshold);

        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        prepared
            .save(temp_input.path())
            .map_err(|e| RecognitionError::Engine(format!("failed to write OCR input: {}", e)))?;

        // Tesseract appends .tsv to the output base
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let mut command = Command::new(&self.executable);
        command.arg(temp_input.path()).arg(&output_base);
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("-l")
            .arg(&self.languages)
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("tsv")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)?;
        let _ = std::fs::remove_file(&tsv_path);

        let lines = parse_tsv_output(&tsv_content);
        crate::log(&format!(
            "OCR found {} text lines: {:?}",
            lines.len(),
            lines
                .iter()
                .map(|l| format!("{} ({:.0}%)", l.text, l.confidence))
                .collect::<Vec<_>>()
        ));

        Ok(lines.into_iter().map(|l| l.text).collect())
    }
}

/// Parses Tesseract TSV output into lines.
///
/// Words are grouped by (block, paragraph, line); with sparse-text
/// segmentation every fragment tends to get its own block.
fn parse_tsv_output(tsv: &str) -> Vec<OcrLine> {
    let mut lines: Vec<OcrLine> = Vec::new();
    let mut current_key: Option<(i32, i32, i32)> = None;
    let mut current_words: Vec<&str> = Vec::new();
    let mut current_conf_sum: f32 = 0.0;

    fn flush(lines: &mut Vec<OcrLine>, words: &mut Vec<&str>, conf_sum: &mut f32) {
        if !words.is_empty() {
            lines.push(OcrLine {
                text: words.join(" "),
                confidence: *conf_sum / words.len() as f32,
            });
        }
        words.clear();
        *conf_sum = 0.0;
    }

    for line in tsv.lines().skip(1) {
        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        // Level 5 = word
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            fields[2].parse().unwrap_or(-1),
            fields[3].parse().unwrap_or(-1),
            fields[4].parse().unwrap_or(-1),
        );
        if current_key != Some(key) {
            flush(&mut lines, &mut current_words, &mut current_conf_sum);
            current_key = Some(key);
        }

        current_words.push(text);
        current_conf_sum += conf;
    }

    flush(&mut lines, &mut current_words, &mut current_conf_sum);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, line: u32, conf: f32, text: &str) -> String {
        format!("5\t1\t{}\t1\t{}\t1\t0\t0\t10\t10\t{}\t{}", block, line, conf, text)
    }

    #[test]
    fn test_parse_tsv_groups_words_by_line() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t".to_string(),
            word(1, 1, 90.0, "Tenderly"),
            word(2, 1, 80.0, "PERFECT"),
            word(2, 1, 60.0, "1000"),
            word(3, 1, 70.0, "combo"),
        ]
        .join("\n");

        let lines = parse_tsv_output(&tsv);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Tenderly", "PERFECT 1000", "combo"]);
        assert_eq!(lines[1].confidence, 70.0);
    }

    #[test]
    fn test_parse_tsv_skips_empty_and_unscored_words() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, -1.0, "ghost"),
            word(1, 1, 95.0, " "),
            word(1, 2, 95.0, "MISS"),
        ]
        .join("\n");

        let lines = parse_tsv_output(&tsv);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "MISS");
    }

    #[test]
    fn test_parse_tsv_header_only() {
        assert!(parse_tsv_output(HEADER).is_empty());
    }
}
