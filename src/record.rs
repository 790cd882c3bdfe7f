//! Record types flowing through the ingestion pipeline.
//!
//! A screenshot becomes a [`DraftRecord`] after extraction, a [`VerifiedRecord`]
//! once a human confirms (or corrects) it, and a [`StoredRecord`] once the
//! store has assigned it an id.

use serde::Serialize;

/// Song title used when extraction yields no usable text.
pub const UNKNOWN_SONG: &str = "Unknown Song";

/// Difficulty label used until a level extractor exists.
pub const DEFAULT_LEVEL: &str = "EXPERT";

/// Format of `play_date` values produced by extraction.
pub const PLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-play judgment counts.
///
/// Perfect/Great/Good/Bad/Miss are per-note categories, Fast/Late are timing-bias counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Judgments {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
    pub fast: u32,
    pub late: u32,
}

impl Judgments {
    /// Field names in display/column order.
    pub const FIELD_NAMES: [&'static str; 7] =
        ["perfect", "great", "good", "bad", "miss", "fast", "late"];

    /// Values in the same order as [`Judgments::FIELD_NAMES`].
    pub fn values(&self) -> [u32; 7] {
        [
            self.perfect,
            self.great,
            self.good,
            self.bad,
            self.miss,
            self.fast,
            self.late,
        ]
    }
}

/// Extraction output, not yet checked by a human.
///
/// Every field always holds a value; missing data is represented by the
/// placeholders above and zero counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftRecord {
    pub play_date: String,
    pub level: String,
    pub song_title: String,
    pub judgments: Judgments,
}

/// A record confirmed by the user.
///
/// Only built by the correction stage (or read back from the store), so the
/// counts have already passed the non-negative check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifiedRecord {
    play_date: String,
    level: String,
    song_title: String,
    #[serde(flatten)]
    judgments: Judgments,
}

impl VerifiedRecord {
    pub(crate) fn from_parts(
        play_date: String,
        level: String,
        song_title: String,
        judgments: Judgments,
    ) -> Self {
        Self {
            play_date,
            level,
            song_title,
            judgments,
        }
    }

    pub fn play_date(&self) -> &str {
        &self.play_date
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn song_title(&self) -> &str {
        &self.song_title
    }

    pub fn judgments(&self) -> &Judgments {
        &self.judgments
    }

    /// Fields compared when looking for an already stored copy of this play.
    pub fn duplicate_key(&self) -> DuplicateKey<'_> {
        DuplicateKey {
            play_date: &self.play_date,
            song_title: &self.song_title,
            perfect: self.judgments.perfect,
            great: self.judgments.great,
            good: self.judgments.good,
            bad: self.judgments.bad,
            miss: self.judgments.miss,
        }
    }
}

/// A verified record with its store-assigned id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub record: VerifiedRecord,
}

/// Identity of a play for duplicate detection.
///
/// `level`, `fast` and `late` are left out: re-uploads of the same screenshot
/// may disagree on them because extraction is unreliable there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DuplicateKey<'a> {
    pub play_date: &'a str,
    pub song_title: &'a str,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl DuplicateKey<'_> {
    pub fn matches(&self, record: &VerifiedRecord) -> bool {
        *self == record.duplicate_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: &str, fast: u32, late: u32) -> VerifiedRecord {
        VerifiedRecord::from_parts(
            "2024-01-01".to_string(),
            level.to_string(),
            "Tenderly".to_string(),
            Judgments {
                perfect: 1000,
                fast,
                late,
                ..Judgments::default()
            },
        )
    }

    #[test]
    fn test_duplicate_key_ignores_level_fast_late() {
        let a = record("EXPERT", 5, 3);
        let b = record("HARD", 9, 9);
        assert!(a.duplicate_key().matches(&b));
    }

    #[test]
    fn test_duplicate_key_compares_miss() {
        let a = record("EXPERT", 0, 0);
        let mut b = record("EXPERT", 0, 0);
        b.judgments.miss = 1;
        assert!(!a.duplicate_key().matches(&b));
    }

    #[test]
    fn test_judgment_values_follow_field_order() {
        let j = Judgments {
            perfect: 1,
            great: 2,
            good: 3,
            bad: 4,
            miss: 5,
            fast: 6,
            late: 7,
        };
        assert_eq!(j.values(), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Judgments::FIELD_NAMES[4], "miss");
    }
}
