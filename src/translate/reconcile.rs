use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{Result, TranslatorError};
use crate::transcript::{TranscriptSegment, TranslatedSentence, TranslationCandidate};

/// Decode the completion answer as a JSON array of `{sentence, index}` objects
pub fn parse_answer(answer_text: &str) -> Result<Vec<TranslatedSentence>> {
    serde_json::from_str(answer_text.trim())
        .map_err(|e| TranslatorError::Decode(format!("answer is not a list of sentence/index objects: {}", e)))
}

/// Write translated sentences back into `segments` by index.
///
/// Only indices that were sent as candidates and lie inside `segments` are applied;
/// anything else is logged and skipped. A repeated index keeps its last sentence.
/// Returns the number of distinct segments rewritten.
pub fn apply_answer(
    segments: &mut [TranscriptSegment],
    sent: &[TranslationCandidate],
    answer: Vec<TranslatedSentence>,
) -> usize {
    let expected: HashSet<usize> = sent.iter().map(|c| c.index).collect();
    let mut rewritten = HashSet::new();

    for translated in answer {
        let Some(index) = translated.position(segments.len()) else {
            warn!(
                "Skipping translation for index {} (transcript has {} segments)",
                translated.index,
                segments.len()
            );
            continue;
        };

        if !expected.contains(&index) {
            warn!("Skipping translation for index {} which was not sent for translation", index);
            continue;
        }

        let segment = &mut segments[index];
        debug!("Segment {}: {} -> {}", index, segment.sentence, translated.sentence);
        segment.sentence = translated.sentence;
        rewritten.insert(index);
    }

    rewritten.len()
}
