// Batched transcript translation
//
// The pipeline is split into small stages:
// - detect: flag segments that are not in English
// - prompt: build one instruction for all flagged segments
// - reconcile: decode the answer and splice it back by index

pub mod detect;
pub mod prompt;
pub mod reconcile;

use async_trait::async_trait;
use tracing::{debug, info};

pub use detect::ScriptDetector;
pub use prompt::{build_prompt, TRANSLATION_INSTRUCTION};
pub use reconcile::{apply_answer, parse_answer};

use crate::completion::CompletionClient;
use crate::error::Result;
use crate::transcript::{TranscriptSegment, TranslationCandidate};

/// Main trait for translation operations
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate foreign segments of `segments` to English in place.
    ///
    /// On error the transcript is left exactly as it was passed in.
    async fn translate(&self, segments: &mut [TranscriptSegment]) -> Result<()>;
}

/// Sends every flagged segment of a transcript in a single completion request
pub struct BatchTranslator<C> {
    client: C,
    detector: ScriptDetector,
}

impl<C: CompletionClient> BatchTranslator<C> {
    pub fn new(client: C, detector: ScriptDetector) -> Self {
        Self { client, detector }
    }

    /// Collect the segments that need translation, keyed by their position
    pub fn collect_candidates(&self, segments: &[TranscriptSegment]) -> Vec<TranslationCandidate> {
        segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| self.detector.is_foreign_script(&segment.sentence))
            .map(|(index, segment)| TranslationCandidate {
                sentence: segment.sentence.clone(),
                index,
            })
            .collect()
    }
}

#[async_trait]
impl<C: CompletionClient> Translator for BatchTranslator<C> {
    async fn translate(&self, segments: &mut [TranscriptSegment]) -> Result<()> {
        let candidates = self.collect_candidates(segments);
        if candidates.is_empty() {
            debug!("All {} segments are in English, skipping translation", segments.len());
            return Ok(());
        }

        info!(
            "Translating {}/{} segments in one request",
            candidates.len(),
            segments.len()
        );

        let prompt = build_prompt(&candidates)?;
        debug!("Prompt: {}", prompt);

        let answer_text = self.client.complete(&prompt).await?;
        debug!("Raw answer: {}", answer_text);

        let answer = parse_answer(&answer_text)?;
        let applied = apply_answer(segments, &candidates, answer);

        info!("Rewrote {}/{} flagged segments", applied, candidates.len());
        Ok(())
    }
}
