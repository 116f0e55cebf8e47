//! Language detection for headline filtering.
//!
//! Headlines that are not in the target language carry no usable sentiment
//! for the lexicon model, so they are filtered out before scoring.

use whatlang::Lang;

/// Outcome of running a detector over a text snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageResult {
    Detected(Lang),
    Undetermined,
}

/// Something that can guess the language of a short text
pub trait LanguageDetector: Send + Sync {
    fn detect_language(&self, text: &str) -> LanguageResult;
}

/// Trigram based detector backed by `whatlang`.
///
/// By default the best guess is accepted however weak it is, the same way
/// `langdetect` answers for headlines. `with_min_confidence` and
/// `reliable_only` turn weak or ambiguous guesses into `Undetermined`,
/// which the filter then rejects.
#[derive(Debug, Clone)]
pub struct WhatlangDetector {
    min_confidence: f64,
    require_reliable: bool,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self {
            min_confidence: 0.0,
            require_reliable: false,
        }
    }

    /// Treat detections below `min_confidence` as undetermined
    pub fn with_min_confidence(min_confidence: f64) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
            ..Self::new()
        }
    }

    /// Only accept detections `whatlang` marks as reliable
    pub fn reliable_only(mut self) -> Self {
        self.require_reliable = true;
        self
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect_language(&self, text: &str) -> LanguageResult {
        if text.trim().is_empty() {
            return LanguageResult::Undetermined;
        }
        match whatlang::detect(text) {
            Some(info)
                if info.confidence() >= self.min_confidence
                    && (!self.require_reliable || info.is_reliable()) =>
            {
                LanguageResult::Detected(info.lang())
            }
            _ => LanguageResult::Undetermined,
        }
    }
}

/// Accepts only text detected as the target language, failing closed
pub struct LanguageFilter<D = WhatlangDetector> {
    detector: D,
    target: Lang,
}

impl LanguageFilter<WhatlangDetector> {
    /// English filter using the default detector
    pub fn english() -> Self {
        Self::new(WhatlangDetector::new(), Lang::Eng)
    }
}

impl Default for LanguageFilter<WhatlangDetector> {
    fn default() -> Self {
        Self::english()
    }
}

impl<D: LanguageDetector> LanguageFilter<D> {
    pub fn new(detector: D, target: Lang) -> Self {
        Self { detector, target }
    }

    pub fn target(&self) -> Lang {
        self.target
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn is_target_language(&self, text: &str) -> bool {
        match self.detector.detect_language(text) {
            LanguageResult::Detected(lang) => lang == self.target,
            LanguageResult::Undetermined => false,
        }
    }
}
