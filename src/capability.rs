//! Capability seams for the external models.
//!
//! The pipeline never loads models itself. Callers construct the bias
//! classifier, the span extractor and the mask filler once, then inject
//! them into a [`Debiaser`](crate::Debiaser). All capabilities are
//! `Send + Sync` so one loaded model can serve concurrent callers.
//!
//! Closures of the right shape implement each trait:
//!
//! ```
//! use layered_debias::{CapabilityError, Classification, Classifier};
//!
//! let classifier = |text: &str| -> Result<Classification, CapabilityError> {
//!     if text.contains("lazy") {
//!         Ok(Classification::biased(0.9))
//!     } else {
//!         Ok(Classification::non_biased(0.7))
//!     }
//! };
//! assert!(classifier.classify("a lazy man").unwrap().is_biased());
//! ```

use crate::classification::Classification;
use crate::errors::CapabilityError;
use crate::span::BiasedSpan;

/// Sentence-level bias classifier.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification, CapabilityError>;
}

/// Localizes biased spans in a sentence, in sentence order.
///
/// Returning an empty list is valid: the pipeline then reports that the
/// bias could not be localized.
pub trait SpanExtractor: Send + Sync {
    fn extract_spans(&self, text: &str) -> Result<Vec<BiasedSpan>, CapabilityError>;
}

/// Masked language model filling a single mask token.
///
/// Returns substitution words ranked best first.
pub trait MaskFiller: Send + Sync {
    fn fill_mask(&self, text_with_one_mask: &str) -> Result<Vec<String>, CapabilityError>;
}

/// Receives the before/after bias scores when plotting is requested.
pub trait BiasReporter: Send + Sync {
    fn report(&self, original_score: f64, best_new_score: f64);
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Result<Classification, CapabilityError> + Send + Sync,
{
    fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        self(text)
    }
}

impl<F> SpanExtractor for F
where
    F: Fn(&str) -> Result<Vec<BiasedSpan>, CapabilityError> + Send + Sync,
{
    fn extract_spans(&self, text: &str) -> Result<Vec<BiasedSpan>, CapabilityError> {
        self(text)
    }
}

impl<F> MaskFiller for F
where
    F: Fn(&str) -> Result<Vec<String>, CapabilityError> + Send + Sync,
{
    fn fill_mask(&self, text_with_one_mask: &str) -> Result<Vec<String>, CapabilityError> {
        self(text_with_one_mask)
    }
}

impl<F> BiasReporter for F
where
    F: Fn(f64, f64) + Send + Sync,
{
    fn report(&self, original_score: f64, best_new_score: f64) {
        self(original_score, best_new_score)
    }
}
