use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::config::DetectionPolicy;

static ARABIC_SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Arabic}").expect("static regex"));

/// Flags sentences that are not already in English
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector {
    policy: DetectionPolicy,
}

impl ScriptDetector {
    pub fn new(policy: DetectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DetectionPolicy {
        self.policy
    }

    /// Returns true when `sentence` needs translation under the active policy.
    ///
    /// Empty input is never foreign.
    pub fn is_foreign_script(&self, sentence: &str) -> bool {
        let foreign = match self.policy {
            DetectionPolicy::Arabic => ARABIC_SCRIPT_RE.is_match(sentence),
            DetectionPolicy::NonAscii => !sentence.is_ascii(),
        };
        trace!(policy = ?self.policy, foreign, "Classified sentence: {}", sentence);
        foreign
    }
}
