//! Duplicate detection ahead of insertion.
//!
//! The store does not enforce uniqueness itself; callers run this check
//! before every insert.

use crate::error::StorageError;
use crate::record::{DuplicateKey, StoredRecord, VerifiedRecord};

/// A collection of stored records that can answer duplicate queries.
pub trait RecordSource {
    /// Whether any record matches the key.
    fn contains_match(&self, key: &DuplicateKey<'_>) -> Result<bool, StorageError>;
}

impl RecordSource for [StoredRecord] {
    fn contains_match(&self, key: &DuplicateKey<'_>) -> Result<bool, StorageError> {
        Ok(self.iter().any(|stored| key.matches(&stored.record)))
    }
}

/// Whether `candidate` already exists in `existing`.
///
/// Matches on play date, song title and the five note judgments. Level and
/// the fast/late counters do not take part.
pub fn is_duplicate<S>(candidate: &VerifiedRecord, existing: &S) -> Result<bool, StorageError>
where
    S: RecordSource + ?Sized,
{
    existing.contains_match(&candidate.duplicate_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Judgments;

    fn record(date: &str, title: &str, level: &str, j: [u32; 7]) -> VerifiedRecord {
        let [perfect, great, good, bad, miss, fast, late] = j;
        VerifiedRecord::from_parts(
            date.to_string(),
            level.to_string(),
            title.to_string(),
            Judgments {
                perfect,
                great,
                good,
                bad,
                miss,
                fast,
                late,
            },
        )
    }

    fn stored(records: Vec<VerifiedRecord>) -> Vec<StoredRecord> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| StoredRecord {
                id: i as i64 + 1,
                record,
            })
            .collect()
    }

    #[test]
    fn test_empty_collection_has_no_duplicates() {
        let existing: Vec<StoredRecord> = Vec::new();
        let candidate = record("2024-01-01", "Tenderly", "EXPERT", [1000, 0, 0, 0, 0, 5, 3]);
        assert!(!is_duplicate(&candidate, existing.as_slice()).unwrap());
    }

    #[test]
    fn test_level_fast_late_differences_still_duplicate() {
        let existing = stored(vec![record(
            "2024-01-01",
            "Tenderly",
            "EXPERT",
            [1000, 0, 0, 0, 0, 5, 3],
        )]);
        let candidate = record("2024-01-01", "Tenderly", "HARD", [1000, 0, 0, 0, 0, 9, 9]);
        assert!(is_duplicate(&candidate, existing.as_slice()).unwrap());
    }

    #[test]
    fn test_any_compared_field_difference_is_new() {
        let base = [1000, 10, 5, 2, 1, 0, 0];
        let existing = stored(vec![record("2024-01-01", "Tenderly", "EXPERT", base)]);

        let mut candidates = vec![
            record("2024-01-02", "Tenderly", "EXPERT", base),
            record("2024-01-01", "tenderly", "EXPERT", base),
        ];
        for idx in 0..5 {
            let mut j = base;
            j[idx] += 1;
            candidates.push(record("2024-01-01", "Tenderly", "EXPERT", j));
        }

        for candidate in &candidates {
            assert!(
                !is_duplicate(candidate, existing.as_slice()).unwrap(),
                "{:?} should not be a duplicate",
                candidate
            );
        }
    }

    #[test]
    fn test_match_anywhere_in_collection() {
        let existing = stored(vec![
            record("2024-01-01", "A", "EXPERT", [1, 0, 0, 0, 0, 0, 0]),
            record("2024-01-02", "B", "EXPERT", [2, 0, 0, 0, 0, 0, 0]),
            record("2024-01-03", "C", "EXPERT", [3, 0, 0, 0, 0, 0, 0]),
        ]);
        let candidate = record("2024-01-02", "B", "MASTER", [2, 0, 0, 0, 0, 1, 1]);
        assert!(is_duplicate(&candidate, existing.as_slice()).unwrap());
    }
}
