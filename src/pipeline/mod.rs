//! Record ingestion pipeline.
//!
//! decode → recognize → map to draft → user correction → duplicate check → insert.
//! Each call runs to completion; any failure ends the request without
//! touching the store.

pub mod correct;
pub mod duplicate;
pub mod extract;

pub use correct::{correct, FieldEdits};
pub use duplicate::is_duplicate;
pub use extract::map_fragments;

use crate::error::{IngestError, StorageError};
use crate::ocr::{decode_image, TextRecognizer};
use crate::record::{DraftRecord, StoredRecord, VerifiedRecord};
use crate::store::RecordStore;

/// Result of handing a verified record to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(StoredRecord),
    /// An equivalent record already exists; nothing was written.
    DuplicateSkipped,
}

/// Runs decoding and recognition on an uploaded screenshot and builds a draft.
pub fn extract_draft(
    image_bytes: &[u8],
    recognizer: &dyn TextRecognizer,
) -> Result<DraftRecord, IngestError> {
    let image = decode_image(image_bytes)?;
    crate::log(&format!(
        "Decoded screenshot: {}x{}",
        image.width(),
        image.height()
    ));

    let fragments = recognizer.recognize(&image)?;
    let draft = map_fragments(&fragments);
    crate::log(&format!(
        "Draft from {} fragments: title={:?} level={:?} date={}",
        fragments.len(),
        draft.song_title,
        draft.level,
        draft.play_date
    ));

    Ok(draft)
}

/// Inserts `record` unless the store already holds an equivalent one.
pub fn submit(store: &mut RecordStore, record: VerifiedRecord) -> Result<SubmitOutcome, StorageError> {
    if is_duplicate(&record, &*store)? {
        crate::log(&format!(
            "Duplicate skipped: {} / {}",
            record.song_title(),
            record.play_date()
        ));
        return Ok(SubmitOutcome::DuplicateSkipped);
    }

    store.insert(record).map(SubmitOutcome::Saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, RecognitionError};
    use crate::record::Judgments;
    use image::{ImageFormat, RgbImage};
    use std::cell::Cell;
    use std::io::Cursor;

    /// Returns a fixed fragment list and counts calls.
    struct FakeRecognizer {
        fragments: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeRecognizer {
        fn new(fragments: &[&'static str]) -> Self {
            Self {
                fragments: fragments.to_vec(),
                calls: Cell::new(0),
            }
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &RgbImage) -> Result<Vec<String>, RecognitionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.fragments.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenRecognizer;

    impl TextRecognizer for BrokenRecognizer {
        fn recognize(&self, _image: &RgbImage) -> Result<Vec<String>, RecognitionError> {
            Err(RecognitionError::Engine("boom".to_string()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::new(8, 8);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn edits(level: &str, j: [i64; 7]) -> FieldEdits {
        let [perfect, great, good, bad, miss, fast, late] = j;
        FieldEdits {
            play_date: "2024-01-01".to_string(),
            level: level.to_string(),
            song_title: "Tenderly".to_string(),
            perfect,
            great,
            good,
            bad,
            miss,
            fast,
            late,
        }
    }

    #[test]
    fn test_scenario_a_draft_from_screenshot() {
        let recognizer = FakeRecognizer::new(&["Tenderly", "99", "combo"]);
        let draft = extract_draft(&png_bytes(), &recognizer).unwrap();

        assert_eq!(recognizer.calls.get(), 1);
        assert_eq!(draft.song_title, "Tenderly");
        assert_eq!(draft.level, "EXPERT");
        assert_eq!(draft.judgments, Judgments::default());
    }

    #[test]
    fn test_empty_recognition_uses_placeholders() {
        let recognizer = FakeRecognizer::new(&[]);
        let draft = extract_draft(&png_bytes(), &recognizer).unwrap();
        assert_eq!(draft.song_title, "Unknown Song");
    }

    #[test]
    fn test_decode_failure_skips_recognition() {
        let recognizer = FakeRecognizer::new(&["Tenderly"]);
        let err = extract_draft(b"GIF89a....", &recognizer).unwrap_err();

        assert!(matches!(err, IngestError::Decode(DecodeError::UnsupportedFormat)));
        assert_eq!(recognizer.calls.get(), 0);
    }

    #[test]
    fn test_recognition_failure_surfaces() {
        let err = extract_draft(&png_bytes(), &BrokenRecognizer).unwrap_err();
        assert!(matches!(err, IngestError::Recognition(_)));
    }

    #[test]
    fn test_scenario_b_duplicate_skip() {
        let mut store = RecordStore::open_in_memory().unwrap();
        let draft = map_fragments(["Tenderly"]);

        let first = correct(&draft, edits("EXPERT", [1000, 0, 0, 0, 0, 5, 3])).unwrap();
        let second = correct(&draft, edits("HARD", [1000, 0, 0, 0, 0, 9, 9])).unwrap();

        assert!(matches!(submit(&mut store, first).unwrap(), SubmitOutcome::Saved(_)));
        assert_eq!(submit(&mut store, second).unwrap(), SubmitOutcome::DuplicateSkipped);
        assert_eq!(store.query_all().unwrap().len(), 1);
    }

    #[test]
    fn test_scenario_c_negative_miss_leaves_store_unchanged() {
        let mut store = RecordStore::open_in_memory().unwrap();
        let draft = map_fragments(["Tenderly"]);
        submit(&mut store, correct(&draft, edits("EXPERT", [900, 0, 0, 0, 0, 0, 0])).unwrap())
            .unwrap();
        let before = store.query_all().unwrap().len();

        let err = correct(&draft, edits("EXPERT", [1000, 0, 0, 0, -1, 0, 0])).unwrap_err();
        assert_eq!(err.fields, vec!["miss"]);
        assert_eq!(store.query_all().unwrap().len(), before);
    }

    #[test]
    fn test_scenario_d_empty_store() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(store.query_all().unwrap(), Vec::new());
    }

    #[test]
    fn test_saved_record_round_trips_with_fresh_id() {
        let mut store = RecordStore::open_in_memory().unwrap();
        let draft = map_fragments(["Tenderly"]);

        let mut last_id = 0;
        for perfect in [10, 20, 30] {
            let record = correct(&draft, edits("EXPERT", [perfect, 1, 2, 3, 4, 5, 6])).unwrap();
            let SubmitOutcome::Saved(stored) = submit(&mut store, record.clone()).unwrap() else {
                panic!("expected a save");
            };
            assert_eq!(stored.record, record);
            assert!(stored.id > last_id);
            last_id = stored.id;
        }

        let all = store.query_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, last_id);
    }
}
