use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslatorError};

/// One line of a call transcription.
///
/// A segment has no id of its own: its position in the request body identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    #[serde(rename = "time")]
    pub timestamp: String,
    pub sentence: String,
}

/// A segment flagged for translation, tagged with its position in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationCandidate {
    pub sentence: String,
    pub index: usize,
}

/// One entry of the completion answer.
///
/// The index is signed: the service may answer with any integer, and bad
/// positions are skipped during reconciliation rather than failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslatedSentence {
    pub sentence: String,
    pub index: i64,
}

impl TranslatedSentence {
    /// Position in a transcript of `len` segments, if `index` points inside it
    pub fn position(&self, len: usize) -> Option<usize> {
        usize::try_from(self.index).ok().filter(|&i| i < len)
    }
}

/// Reject segments with a blank `speaker`, `time` or `sentence`
pub fn validate_segments(segments: &[TranscriptSegment]) -> Result<()> {
    for (index, segment) in segments.iter().enumerate() {
        let blank = [
            ("speaker", &segment.speaker),
            ("time", &segment.timestamp),
            ("sentence", &segment.sentence),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());

        if let Some((field, _)) = blank {
            return Err(TranslatorError::Validation(format!(
                "segment {}: field `{}` is required",
                index, field
            )));
        }
    }
    Ok(())
}

impl TranscriptSegment {
    pub fn new(speaker: impl Into<String>, timestamp: impl Into<String>, sentence: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            timestamp: timestamp.into(),
            sentence: sentence.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_uses_time_on_the_wire() {
        let segment = TranscriptSegment::new("Seif", "20:00", "تيست");
        let json = serde_json::to_value(&segment).unwrap();

        assert_eq!(json["time"], "20:00");
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_segment_requires_all_fields() {
        let missing_time = r#"[{"speaker":"Seif","sentence":"hello"}]"#;
        let err = serde_json::from_str::<Vec<TranscriptSegment>>(missing_time).unwrap_err();
        assert!(err.to_string().contains("time"));

        let complete = r#"[{"speaker":"Seif","time":"20:00","sentence":"hello"}]"#;
        let segments: Vec<TranscriptSegment> = serde_json::from_str(complete).unwrap();
        assert_eq!(segments[0], TranscriptSegment::new("Seif", "20:00", "hello"));
    }

    #[test]
    fn test_translated_sentence_position() {
        let answer: Vec<TranslatedSentence> =
            serde_json::from_str(r#"[{"sentence":"a","index":-1},{"sentence":"b","index":1},{"sentence":"c","index":3}]"#)
                .unwrap();

        assert_eq!(answer[0].position(3), None);
        assert_eq!(answer[1].position(3), Some(1));
        assert_eq!(answer[2].position(3), None);
    }

    #[test]
    fn test_validate_segments_rejects_blank_fields() {
        assert!(validate_segments(&[TranscriptSegment::new("Seif", "20:00", "hello")]).is_ok());
        assert!(validate_segments(&[]).is_ok());

        let segments = vec![
            TranscriptSegment::new("Seif", "20:00", "hello"),
            TranscriptSegment::new("Ali", "", "hi"),
        ];
        match validate_segments(&segments).unwrap_err() {
            TranslatorError::Validation(message) => {
                assert!(message.contains("segment 1"));
                assert!(message.contains("`time`"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // whitespace counts as a value
        assert!(validate_segments(&[TranscriptSegment::new(" ", "20:00", "hi")]).is_ok());
    }
}
