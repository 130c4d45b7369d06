//! Model doubles driven by a fixture.
//!
//! Each double answers only what the fixture scripts and fails with
//! [`CapabilityError::Failed`] otherwise, so a fixture that forgets a
//! rewrite shows up as an error instead of a silent default.

use crate::fixture::DebiasFixture;
use layered_debias::{
    mask_single, BiasedSpan, CapabilityError, Classification, Classifier, MaskFiller,
    SpanExtractor,
};
use std::collections::HashMap;

/// Classifier answering from `[original]`, `[[candidates]]` and `[fallback]`.
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    verdicts: HashMap<String, Classification>,
    fallback: Option<Classification>,
}

impl ScriptedClassifier {
    pub fn from_fixture(fixture: &DebiasFixture) -> Self {
        let mut verdicts: HashMap<String, Classification> = fixture
            .candidates
            .iter()
            .map(|c| (c.sentence.clone(), c.classification()))
            .collect();
        verdicts.insert(fixture.text.clone(), fixture.original);
        Self {
            verdicts,
            fallback: fixture.fallback,
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        self.verdicts
            .get(text)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| CapabilityError::failed(format!("no verdict scripted for {text:?}")))
    }
}

/// Extractor returning the marked spans, then any unmarked ones.
#[derive(Debug, Clone)]
pub struct ScriptedExtractor {
    spans: Vec<BiasedSpan>,
}

impl ScriptedExtractor {
    pub fn from_fixture(fixture: &DebiasFixture) -> Self {
        Self {
            spans: fixture.extracted_spans(),
        }
    }
}

impl SpanExtractor for ScriptedExtractor {
    fn extract_spans(&self, _text: &str) -> Result<Vec<BiasedSpan>, CapabilityError> {
        Ok(self.spans.clone())
    }
}

/// Filler keyed on the sentence with one marked span masked.
#[derive(Debug, Clone)]
pub struct ScriptedFiller {
    prompts: HashMap<String, Vec<String>>,
}

impl ScriptedFiller {
    pub fn from_fixture(fixture: &DebiasFixture) -> Self {
        let prompts = fixture
            .spans
            .iter()
            .zip(&fixture.fill)
            .map(|(marker, words)| {
                let prompt =
                    mask_single(&fixture.text, marker.range.clone(), &fixture.config.mask_token);
                (prompt, words.clone())
            })
            .collect();
        Self { prompts }
    }

    /// The masked prompts this filler knows how to answer.
    pub fn prompts(&self) -> Vec<&str> {
        let mut prompts: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        prompts.sort_unstable();
        prompts
    }
}

impl MaskFiller for ScriptedFiller {
    fn fill_mask(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        self.prompts
            .get(text)
            .cloned()
            .ok_or_else(|| CapabilityError::failed(format!("no words scripted for {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_fixture;

    const TWO_SPANS: &str = r#"
text = "«Old» men and «bossy» women"

[original]
label = "Biased"
score = 0.9

[[fill]]
words = ["Older"]

[[fill]]
words = ["assertive"]

[[candidates]]
sentence = "Older men and assertive women"
label = "Non-biased"
score = 0.7

[config]
candidates_per_span = 1

[expect]
outcome = "Debiased"
"#;

    #[test]
    fn test_filler_prompts_mask_one_span_each() {
        let fixture = parse_fixture(TWO_SPANS).unwrap();
        let filler = ScriptedFiller::from_fixture(&fixture);
        assert_eq!(
            filler.prompts(),
            vec!["Old men and [MASK] women", "[MASK] men and bossy women"]
        );
        assert_eq!(
            filler.fill_mask("[MASK] men and bossy women").unwrap(),
            vec!["Older"]
        );
    }

    #[test]
    fn test_classifier_knows_original_and_candidates() {
        let fixture = parse_fixture(TWO_SPANS).unwrap();
        let classifier = ScriptedClassifier::from_fixture(&fixture);
        assert_eq!(
            classifier.classify("Old men and bossy women").unwrap(),
            Classification::biased(0.9)
        );
        assert!(!classifier
            .classify("Older men and assertive women")
            .unwrap()
            .is_biased());
        assert!(matches!(
            classifier.classify("Retired men and strong women"),
            Err(CapabilityError::Failed(_))
        ));
    }

    #[test]
    fn test_extractor_reports_offsets() {
        let fixture = parse_fixture(TWO_SPANS).unwrap();
        let spans = ScriptedExtractor::from_fixture(&fixture)
            .extract_spans(&fixture.text)
            .unwrap();
        assert_eq!(
            spans,
            vec![BiasedSpan::at("Old", 0..3), BiasedSpan::at("bossy", 12..17)]
        );
    }
}
