//! Scores-blob encoding.
//!
//! The last column of a student row packs every score into one field:
//! `subject:score;subject:score`, or [`NO_SCORES`] when there are none.

use std::collections::BTreeMap;
use std::fmt;

/// Marker written in place of an empty scores-blob.
pub const NO_SCORES: &str = "无成绩";

const ENTRY_SEPARATOR: char = ';';
const VALUE_SEPARATOR: char = ':';

/// A scores-blob entry that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedScore {
    /// The raw entry text.
    pub entry: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl fmt::Display for MalformedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed score entry '{}': {}", self.entry, self.reason)
    }
}

/// Encodes scores in subject order.
///
/// Uses the shortest representation that parses back to the same `f64`.
#[must_use]
pub fn encode_scores(scores: &BTreeMap<String, f64>) -> String {
    if scores.is_empty() {
        return NO_SCORES.to_string();
    }
    scores
        .iter()
        .map(|(subject, score)| format!("{subject}{VALUE_SEPARATOR}{score}"))
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string())
}

/// Decodes a scores-blob into `(subject, score)` pairs.
///
/// An empty blob or [`NO_SCORES`] yields nothing. Empty entries are ignored;
/// each other entry decodes independently, so one bad entry does not affect
/// its neighbours. Range checks are left to the caller.
#[must_use]
pub fn decode_scores(blob: &str) -> Vec<Result<(String, f64), MalformedScore>> {
    if blob.is_empty() || blob == NO_SCORES {
        return Vec::new();
    }

    blob.split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(decode_entry)
        .collect()
}

fn decode_entry(entry: &str) -> Result<(String, f64), MalformedScore> {
    let malformed = |reason| MalformedScore {
        entry: entry.to_string(),
        reason,
    };

    let (subject, value) = entry
        .split_once(VALUE_SEPARATOR)
        .ok_or_else(|| malformed("missing ':'"))?;
    let score = value
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed("score is not a number"))?;

    Ok((subject.to_string(), score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_encode_empty_uses_marker() {
        assert_eq!(encode_scores(&BTreeMap::new()), "无成绩");
    }

    #[test]
    fn test_encode_in_subject_order() {
        let scores = BTreeMap::from([
            ("英语".to_string(), 78.0),
            ("数学".to_string(), 92.5),
        ]);
        assert_eq!(encode_scores(&scores), "数学:92.5;英语:78");
    }

    #[test]
    fn test_encode_keeps_full_precision() {
        let scores = BTreeMap::from([("物理".to_string(), 85.333_333_333_333_33)]);
        let blob = encode_scores(&scores);

        let decoded = decode_scores(&blob);
        assert_eq!(
            decoded,
            vec![Ok(("物理".to_string(), 85.333_333_333_333_33))]
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("无成绩" ; "marker")]
    fn test_decode_no_scores(blob: &str) {
        assert!(decode_scores(blob).is_empty());
    }

    #[test]
    fn test_decode_skips_only_bad_entries() {
        let decoded = decode_scores("数学:90;语文;英语:abc;物理:75.5;");

        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0], Ok(("数学".to_string(), 90.0)));
        assert_eq!(decoded[1].as_ref().unwrap_err().reason, "missing ':'");
        assert_eq!(
            decoded[2].as_ref().unwrap_err().reason,
            "score is not a number"
        );
        assert_eq!(decoded[3], Ok(("物理".to_string(), 75.5)));
    }

    #[test]
    fn test_decode_splits_on_first_colon() {
        assert_eq!(
            decode_scores("a:1:2"),
            vec![Err(MalformedScore {
                entry: "a:1:2".to_string(),
                reason: "score is not a number",
            })]
        );
        assert_eq!(decode_scores("数学: 88 "), vec![Ok(("数学".to_string(), 88.0))]);
    }

    #[test]
    fn test_malformed_display() {
        let err = decode_scores("语文").remove(0).unwrap_err();
        assert_eq!(err.to_string(), "malformed score entry '语文': missing ':'");
    }
}
