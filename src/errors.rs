//! Error types for the de-biasing pipeline.
//!
//! Ordinary outcomes ("the sentence is non-biased", "no span could be
//! localized") are reported through [`Outcome`](crate::Outcome), never
//! through these errors.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The external model capability that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Classifier,
    SpanExtractor,
    MaskFiller,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Classifier => f.write_str("classifier"),
            Capability::SpanExtractor => f.write_str("span extractor"),
            Capability::MaskFiller => f.write_str("mask filler"),
        }
    }
}

/// Failure reported by a model capability implementation.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The call itself failed (model error, transport error, ...).
    #[error("call failed: {0}")]
    Failed(String),

    /// The call did not finish in time.
    #[error("call timed out after {0:?}")]
    TimedOut(Duration),

    /// The call returned, but its response breaks the capability contract.
    #[error("response violates contract: {0}")]
    Contract(String),
}

impl CapabilityError {
    pub fn failed(message: impl Into<String>) -> Self {
        CapabilityError::Failed(message.into())
    }

    pub fn contract(message: impl Into<String>) -> Self {
        CapabilityError::Contract(message.into())
    }
}

/// Errors that can occur while de-biasing a sentence.
#[derive(Debug, Error)]
pub enum DebiasError {
    /// An external model call failed. Never retried.
    #[error("{capability} failed: {source}")]
    Upstream {
        capability: Capability,
        #[source]
        source: CapabilityError,
    },

    /// A span from the extractor could not be located in the sentence.
    #[error("biased span {span:?} does not match {sentence:?}: {reason}")]
    MalformedSpanMatch {
        span: String,
        sentence: String,
        reason: String,
    },

    /// The re-ranker was handed no candidates.
    #[error("no candidate sentences to rank")]
    EmptyCandidateSet,

    /// Invalid pipeline configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl DebiasError {
    pub(crate) fn upstream(capability: Capability) -> impl FnOnce(CapabilityError) -> Self {
        move |source| DebiasError::Upstream { capability, source }
    }

    pub(crate) fn malformed(span: &str, sentence: &str, reason: impl Into<String>) -> Self {
        DebiasError::MalformedSpanMatch {
            span: span.to_string(),
            sentence: sentence.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for pipeline operations.
pub type DebiasResult<T> = Result<T, DebiasError>;
