//! Biased spans and their resolution to byte ranges of the input sentence.
//!
//! An extractor may hand back spans with byte offsets, or only with their
//! literal text. Text-only spans are located with a single combined regex
//! pass over the sentence; each match is claimed by the first unresolved
//! span with that literal, so a repeated literal masks its first occurrence
//! only. A literal that the pass could not claim, such as one nested in a
//! longer span, falls back to its first free occurrence, or failing that
//! its first occurrence.

use crate::errors::{DebiasError, DebiasResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A span of the input sentence flagged as biased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiasedSpan {
    /// The literal text of the span
    pub text: String,
    /// Byte range in the sentence, when the extractor provides one
    #[serde(default)]
    pub range: Option<Range<usize>>,
}

impl BiasedSpan {
    /// A span identified by its literal text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range: None,
        }
    }

    /// A span with known byte offsets.
    pub fn at(text: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            text: text.into(),
            range: Some(range),
        }
    }
}

impl From<&str> for BiasedSpan {
    fn from(text: &str) -> Self {
        BiasedSpan::text(text)
    }
}

impl From<String> for BiasedSpan {
    fn from(text: String) -> Self {
        BiasedSpan::text(text)
    }
}

/// Resolve every span to a byte range of `sentence`.
///
/// The returned vector is indexed like `spans`. Ranges may overlap when the
/// extractor reports nested or duplicate spans; [`MaskedTemplate`] then
/// masks the overlapping group once.
///
/// [`MaskedTemplate`]: crate::MaskedTemplate
pub fn resolve_spans(sentence: &str, spans: &[BiasedSpan]) -> DebiasResult<Vec<Range<usize>>> {
    let mut resolved: Vec<Option<Range<usize>>> = vec![None; spans.len()];

    // Offset spans first: they are authoritative.
    for (idx, span) in spans.iter().enumerate() {
        let Some(range) = span.range.clone() else {
            continue;
        };
        validate_offsets(sentence, span, &range)?;
        resolved[idx] = Some(range);
    }

    if let Some(pattern) = combined_pattern(spans) {
        for found in pattern.find_iter(sentence) {
            let range = found.range();
            if resolved.iter().flatten().any(|r| overlaps(r, &range)) {
                continue;
            }
            let claimant = spans
                .iter()
                .zip(resolved.iter())
                .position(|(span, slot)| slot.is_none() && span.text == found.as_str());
            if let Some(idx) = claimant {
                resolved[idx] = Some(range);
            }
        }
    }

    // A literal hidden inside an unclaimed match of a longer one, or nested
    // in another span: first free occurrence, else first occurrence.
    for idx in 0..spans.len() {
        let text = spans[idx].text.as_str();
        if resolved[idx].is_some() || text.is_empty() {
            continue;
        }
        let mut occurrences = sentence
            .match_indices(text)
            .map(|(start, _)| start..start + text.len())
            .peekable();
        let first = occurrences.peek().cloned();
        let free = occurrences.find(|range| {
            !resolved.iter().flatten().any(|r| overlaps(r, range))
        });
        resolved[idx] = free.or(first);
    }

    spans
        .iter()
        .zip(resolved)
        .map(|(span, range)| {
            range.ok_or_else(|| {
                let reason = if span.text.is_empty() {
                    "span text is empty"
                } else {
                    "text does not occur in the sentence"
                };
                DebiasError::malformed(&span.text, sentence, reason)
            })
        })
        .collect()
}

/// One alternation over all text-only literals, longest first so that a
/// span nested in a longer one does not split its match.
fn combined_pattern(spans: &[BiasedSpan]) -> Option<Regex> {
    let mut literals: Vec<&str> = spans
        .iter()
        .filter(|s| s.range.is_none() && !s.text.is_empty())
        .map(|s| s.text.as_str())
        .collect();
    if literals.is_empty() {
        return None;
    }
    literals.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    literals.dedup();

    let alternation = literals
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");
    // Escaped literals always form a valid pattern.
    Regex::new(&alternation).ok()
}

fn validate_offsets(sentence: &str, span: &BiasedSpan, range: &Range<usize>) -> DebiasResult<()> {
    let reason = if range.start >= range.end {
        Some(format!("empty offsets {:?}", range))
    } else if range.end > sentence.len() {
        Some(format!(
            "offsets {:?} exceed sentence length {}",
            range,
            sentence.len()
        ))
    } else if !sentence.is_char_boundary(range.start) || !sentence.is_char_boundary(range.end) {
        Some(format!("offsets {:?} split a character", range))
    } else if sentence[range.clone()] != span.text {
        Some(format!(
            "offsets {:?} cover {:?}",
            range,
            &sentence[range.clone()]
        ))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DebiasError::malformed(&span.text, sentence, reason)),
        None => Ok(()),
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
