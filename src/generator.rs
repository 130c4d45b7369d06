//! Candidate generation: mask the biased spans, ask the filler for
//! substitutions, and enumerate rewrites.
//!
//! Enumeration is bounded to N×N sentences rather than the full N^k
//! Cartesian product over k spans. An outer rank `m` selects the word for
//! the first span and an inner rank `n` selects the word for every other
//! span, so the first span varies independently while the remaining spans
//! move in lockstep.

use crate::capability::MaskFiller;
use crate::config::DebiasConfig;
use crate::display::TemplateDisplay;
use crate::errors::{Capability, CapabilityError, DebiasError, DebiasResult};
use crate::fanout;
use crate::span::{resolve_spans, BiasedSpan};
use crate::template::{mask_single, ConstructedSentence, MaskedTemplate, DEFAULT_MASK_TOKEN};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, warn};

/// Ranked substitution words for one biased span, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateWordSet {
    /// The span these words replace
    pub span: String,
    pub words: Vec<String>,
}

/// Builds rewrite candidates for a biased sentence.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    mask_token: String,
    candidates_per_span: usize,
    parallel: bool,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::from_config(&DebiasConfig::default())
    }
}

impl CandidateGenerator {
    /// Generator keeping `candidates_per_span` words per filler call.
    pub fn new(candidates_per_span: usize) -> Self {
        Self {
            mask_token: DEFAULT_MASK_TOKEN.to_string(),
            candidates_per_span,
            parallel: false,
        }
    }

    pub fn from_config(config: &DebiasConfig) -> Self {
        Self {
            mask_token: config.mask_token.clone(),
            candidates_per_span: config.candidates_per_span,
            parallel: config.parallel,
        }
    }

    pub fn with_mask_token(mut self, mask_token: impl Into<String>) -> Self {
        self.mask_token = mask_token.into();
        self
    }

    /// N, the number of words kept per span.
    pub fn candidates_per_span(&self) -> usize {
        self.candidates_per_span
    }

    /// Mask every span of `sentence` in a single template.
    pub fn mask(&self, sentence: &str, spans: &[BiasedSpan]) -> DebiasResult<MaskedTemplate> {
        let ranges = resolve_spans(sentence, spans)?;
        Ok(MaskedTemplate::build(sentence, &ranges, &self.mask_token))
    }

    /// Call the filler once per span, each time with only that span masked.
    pub fn candidate_words(
        &self,
        sentence: &str,
        spans: &[BiasedSpan],
        filler: &dyn MaskFiller,
    ) -> DebiasResult<Vec<CandidateWordSet>> {
        let ranges = resolve_spans(sentence, spans)?;
        self.fill_spans(sentence, spans, &ranges, filler)
    }

    /// Enumerate up to N×N rewrites of `template`, deduplicated by text.
    ///
    /// `word_sets[i]` supplies the words for span `i`. Output keeps the
    /// order in which each distinct sentence was first produced.
    pub fn combine(
        &self,
        template: &MaskedTemplate,
        word_sets: &[CandidateWordSet],
    ) -> Vec<ConstructedSentence> {
        if template.mask_count() == 0 {
            return Vec::new();
        }
        if template
            .slots()
            .iter()
            .any(|slot| slot.span_index >= word_sets.len())
        {
            warn!(
                masks = template.mask_count(),
                word_sets = word_sets.len(),
                "template has masks without candidate words"
            );
            return Vec::new();
        }

        let n = word_sets
            .iter()
            .map(|set| set.words.len())
            .min()
            .unwrap_or(0)
            .min(self.candidates_per_span);

        let mut seen = HashSet::new();
        let mut sentences = Vec::new();
        for outer in 0..n {
            for inner in 0..n {
                let sentence = template.fill(|span_index| {
                    let rank = if span_index == 0 { outer } else { inner };
                    word_sets[span_index].words[rank].as_str()
                });
                if seen.insert(sentence.text.clone()) {
                    sentences.push(sentence);
                }
            }
        }

        debug!(
            combinations = n * n,
            distinct = sentences.len(),
            "enumerated rewrite candidates"
        );
        sentences
    }

    /// Mask, fill and enumerate. Zero spans yield zero candidates.
    pub fn generate(
        &self,
        sentence: &str,
        spans: &[BiasedSpan],
        filler: &dyn MaskFiller,
    ) -> DebiasResult<Vec<ConstructedSentence>> {
        if spans.is_empty() {
            debug!("no biased spans, nothing to generate");
            return Ok(Vec::new());
        }

        let ranges = resolve_spans(sentence, spans)?;
        let template = MaskedTemplate::build(sentence, &ranges, &self.mask_token);
        debug!(template = template.text(), "masked biased spans");

        let word_sets = self.fill_spans(sentence, spans, &ranges, filler)?;
        debug!(
            "candidate words\n{}",
            TemplateDisplay::new(sentence, &ranges).with_candidates(&word_sets)
        );

        Ok(self.combine(&template, &word_sets))
    }

    fn fill_spans(
        &self,
        sentence: &str,
        spans: &[BiasedSpan],
        ranges: &[Range<usize>],
        filler: &dyn MaskFiller,
    ) -> DebiasResult<Vec<CandidateWordSet>> {
        let jobs: Vec<(&BiasedSpan, Range<usize>)> =
            spans.iter().zip(ranges.iter().cloned()).collect();

        fanout::try_map(&jobs, self.parallel, |(span, range)| {
            let masked = mask_single(sentence, range.clone(), &self.mask_token);
            let mut words = filler
                .fill_mask(&masked)
                .map_err(DebiasError::upstream(Capability::MaskFiller))?;

            if words.len() < self.candidates_per_span {
                return Err(DebiasError::Upstream {
                    capability: Capability::MaskFiller,
                    source: CapabilityError::contract(format!(
                        "expected {} words for {:?}, got {}",
                        self.candidates_per_span,
                        masked,
                        words.len()
                    )),
                });
            }
            words.truncate(self.candidates_per_span);

            Ok(CandidateWordSet {
                span: span.text.clone(),
                words,
            })
        })
    }
}
