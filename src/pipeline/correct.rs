//! Human correction of a draft.
//!
//! The user always submits a value for every field, pre-seeded from the draft.
//! Text fields are taken as-is (empty strings included); counts must fit the
//! non-negative range or the whole submission is rejected.

use crate::error::ValidationError;
use crate::record::{DraftRecord, Judgments, VerifiedRecord};

/// A full set of user-entered values.
///
/// Counts are signed so that a negative entry reaches validation instead of
/// being lost in parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEdits {
    pub play_date: String,
    pub level: String,
    pub song_title: String,
    pub perfect: i64,
    pub great: i64,
    pub good: i64,
    pub bad: i64,
    pub miss: i64,
    pub fast: i64,
    pub late: i64,
}

impl FieldEdits {
    /// Edits that leave every draft value unchanged.
    pub fn from_draft(draft: &DraftRecord) -> Self {
        let j = &draft.judgments;
        Self {
            play_date: draft.play_date.clone(),
            level: draft.level.clone(),
            song_title: draft.song_title.clone(),
            perfect: j.perfect.into(),
            great: j.great.into(),
            good: j.good.into(),
            bad: j.bad.into(),
            miss: j.miss.into(),
            fast: j.fast.into(),
            late: j.late.into(),
        }
    }

    /// Counts paired with their field names, in column order.
    pub fn counts(&self) -> [(&'static str, i64); 7] {
        [
            ("perfect", self.perfect),
            ("great", self.great),
            ("good", self.good),
            ("bad", self.bad),
            ("miss", self.miss),
            ("fast", self.fast),
            ("late", self.late),
        ]
    }

    /// Sets a count by field name. Returns false for an unknown name.
    pub fn set_count(&mut self, field: &str, value: i64) -> bool {
        let slot = match field {
            "perfect" => &mut self.perfect,
            "great" => &mut self.great,
            "good" => &mut self.good,
            "bad" => &mut self.bad,
            "miss" => &mut self.miss,
            "fast" => &mut self.fast,
            "late" => &mut self.late,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Applies the user's edits and validates the result.
///
/// On error nothing is consumed from the draft, so the caller can prompt again.
pub fn correct(draft: &DraftRecord, edits: FieldEdits) -> Result<VerifiedRecord, ValidationError> {
    let mut values = [0u32; 7];
    let mut invalid = Vec::new();

    for (slot, (name, raw)) in values.iter_mut().zip(edits.counts()) {
        match u32::try_from(raw) {
            Ok(v) => *slot = v,
            Err(_) => invalid.push(name),
        }
    }

    if !invalid.is_empty() {
        crate::log(&format!("Correction rejected: invalid {:?}", invalid));
        return Err(ValidationError { fields: invalid });
    }

    let [perfect, great, good, bad, miss, fast, late] = values;
    let judgments = Judgments {
        perfect,
        great,
        good,
        bad,
        miss,
        fast,
        late,
    };

    let changed = changed_fields(draft, &edits, &judgments);
    if !changed.is_empty() {
        crate::log(&format!("User corrected: {}", changed.join(", ")));
    }

    Ok(VerifiedRecord::from_parts(
        edits.play_date,
        edits.level,
        edits.song_title,
        judgments,
    ))
}

fn changed_fields(draft: &DraftRecord, edits: &FieldEdits, judgments: &Judgments) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if draft.play_date != edits.play_date {
        changed.push("play_date");
    }
    if draft.level != edits.level {
        changed.push("level");
    }
    if draft.song_title != edits.song_title {
        changed.push("song_title");
    }
    for ((name, before), after) in Judgments::FIELD_NAMES
        .iter()
        .zip(draft.judgments.values())
        .zip(judgments.values())
    {
        if before != after {
            changed.push(*name);
        }
    }
    changed
}
