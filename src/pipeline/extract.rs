//! Maps recognized text fragments to a draft record.
//!
//! Only the song title is read from the fragments. The play date is always the
//! extraction date, the level is always the placeholder and every counter
//! starts at zero; the user fills those in during correction.

use chrono::{Local, NaiveDate};

use crate::record::{DEFAULT_LEVEL, DraftRecord, Judgments, PLAY_DATE_FORMAT, UNKNOWN_SONG};

/// Builds a draft from OCR fragments, dated today.
pub fn map_fragments<I, S>(fragments: I) -> DraftRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    map_fragments_on(fragments, Local::now().date_naive())
}

/// Builds a draft from OCR fragments with an explicit play date.
pub fn map_fragments_on<I, S>(fragments: I, today: NaiveDate) -> DraftRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let song_title = fragments
        .into_iter()
        .next()
        .map(|first| first.as_ref().to_string())
        .unwrap_or_else(|| UNKNOWN_SONG.to_string());

    DraftRecord {
        play_date: today.format(PLAY_DATE_FORMAT).to_string(),
        level: DEFAULT_LEVEL.to_string(),
        song_title,
        judgments: Judgments::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_fragment_becomes_title() {
        let draft = map_fragments_on(["Tenderly", "99", "combo"], date(2024, 1, 1));
        assert_eq!(draft.song_title, "Tenderly");
        assert_eq!(draft.level, "EXPERT");
        assert_eq!(draft.judgments, Judgments::default());
        assert_eq!(draft.play_date, "2024-01-01");
    }

    #[test]
    fn test_empty_fragments_use_placeholders() {
        let draft = map_fragments_on(Vec::<String>::new(), date(2025, 12, 31));
        assert_eq!(draft.song_title, "Unknown Song");
        assert_eq!(draft.level, "EXPERT");
        assert_eq!(draft.judgments.values(), [0; 7]);
        assert_eq!(draft.play_date, "2025-12-31");
    }

    #[test]
    fn test_date_looking_fragments_do_not_set_play_date() {
        let draft = map_fragments_on(["2019-05-05", "Tenderly"], date(2024, 3, 9));
        assert_eq!(draft.play_date, "2024-03-09");
        assert_eq!(draft.song_title, "2019-05-05");
    }

    #[test]
    fn test_first_fragment_kept_verbatim() {
        for first in ["群青讃歌", "  spaced  ", "", "1000"] {
            let draft = map_fragments_on([first, "tail"], date(2024, 1, 1));
            assert_eq!(draft.song_title, first);
        }
    }

    #[test]
    fn test_map_fragments_uses_today() {
        let draft = map_fragments(["Tenderly"]);
        let today = Local::now().date_naive().format(PLAY_DATE_FORMAT).to_string();
        // Guard against the test straddling midnight
        let yesterday = (Local::now().date_naive() - chrono::Days::new(1))
            .format(PLAY_DATE_FORMAT)
            .to_string();
        assert!(draft.play_date == today || draft.play_date == yesterday);
    }
}
