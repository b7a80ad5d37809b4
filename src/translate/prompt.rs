use crate::error::Result;
use crate::transcript::TranslationCandidate;

/// Instruction placed in front of the serialized candidates
pub const TRANSLATION_INSTRUCTION: &str =
    "Translate the sentences in these objects to English, return objects of sentence and index only";

/// Build the single batched prompt for all candidates.
///
/// The JSON array follows the instruction with no separator.
pub fn build_prompt(candidates: &[TranslationCandidate]) -> Result<String> {
    let payload = serde_json::to_string(candidates)?;
    Ok(format!("{}{}", TRANSLATION_INSTRUCTION, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_exact_format() {
        let candidates = vec![
            TranslationCandidate { sentence: "تيست".to_string(), index: 0 },
            TranslationCandidate { sentence: "كيف حالك".to_string(), index: 2 },
        ];

        let prompt = build_prompt(&candidates).unwrap();

        assert_eq!(
            prompt,
            "Translate the sentences in these objects to English, return objects of sentence and index only\
             [{\"sentence\":\"تيست\",\"index\":0},{\"sentence\":\"كيف حالك\",\"index\":2}]"
        );
    }

    #[test]
    fn test_build_prompt_escapes_quotes() {
        let candidates = vec![TranslationCandidate { sentence: "قال \"مرحبا\"".to_string(), index: 5 }];

        let prompt = build_prompt(&candidates).unwrap();
        let payload = prompt.strip_prefix(TRANSLATION_INSTRUCTION).unwrap();
        let decoded: Vec<TranslationCandidate> = serde_json::from_str(payload).unwrap();

        assert_eq!(decoded, candidates);
    }
}
