//! Fixture types.

use layered_debias::{BiasLabel, BiasedSpan, Classification, DebiasConfig, Outcome};
use serde::Deserialize;
use std::ops::Range;

/// A `«…»` marker found in the fixture text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMarker {
    pub text: String,
    /// Byte range in the normalized (marker-free) text
    pub range: Range<usize>,
}

impl SpanMarker {
    /// The span the scripted extractor reports for this marker.
    pub fn to_span(&self, with_offsets: bool) -> BiasedSpan {
        if with_offsets {
            BiasedSpan::at(self.text.as_str(), self.range.clone())
        } else {
            BiasedSpan::text(self.text.as_str())
        }
    }
}

/// Classifier verdict for one rewrite.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedVerdict {
    pub sentence: String,
    pub label: BiasLabel,
    pub score: f64,
}

impl ScriptedVerdict {
    pub fn classification(&self) -> Classification {
        Classification::new(self.label, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedRecommendation {
    pub sentence: String,
    pub bias: f64,
}

/// What the pipeline should produce for a fixture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectation {
    pub outcome: Outcome,
    /// Checked in order when present
    #[serde(default)]
    pub recommendations: Option<Vec<ExpectedRecommendation>>,
    /// Substring of the error message, for runs that fail
    #[serde(default)]
    pub error: Option<String>,
}

/// A parsed fixture file.
#[derive(Debug, Clone, PartialEq)]
pub struct DebiasFixture {
    pub title: Option<String>,
    /// Sentence with the markers stripped
    pub text: String,
    pub spans: Vec<SpanMarker>,
    /// Span texts the extractor reports without a marker in the text
    pub unmarked_spans: Vec<String>,
    /// Whether the extractor reports byte offsets for marked spans
    pub offsets: bool,
    pub original: Classification,
    /// Filler output for each marked span, in marker order
    pub fill: Vec<Vec<String>>,
    pub candidates: Vec<ScriptedVerdict>,
    pub fallback: Option<Classification>,
    pub config: DebiasConfig,
    pub expect: Expectation,
}

impl DebiasFixture {
    /// Everything the scripted extractor returns, in order.
    pub fn extracted_spans(&self) -> Vec<BiasedSpan> {
        self.spans
            .iter()
            .map(|marker| marker.to_span(self.offsets))
            .chain(self.unmarked_spans.iter().map(|text| BiasedSpan::text(text.as_str())))
            .collect()
    }
}
