//! Linguistic bias localization and de-biasing recommendations.
//!
//! Given a sentence, `layered-debias` asks a bias classifier whether it is
//! biased, asks a span extractor which words carry the bias, masks those
//! spans, lets a masked language model propose substitutions, and
//! re-classifies every rewrite to recommend the least biased ones.
//!
//! The models themselves are external: they are injected through the
//! [`Classifier`], [`SpanExtractor`] and [`MaskFiller`] traits, which makes
//! the pipeline trivially testable with scripted doubles.
//!
//! ## Modules
//!
//! - [`classification`] - Classifier verdicts and the derived bias metric
//! - [`capability`] - Traits for the injected models
//! - [`span`] - Biased spans and their resolution in the sentence
//! - [`template`] - Masked templates and constructed rewrites
//! - [`generator`] - Candidate generation (mask, fill, enumerate)
//! - [`rerank`] - Re-scoring and ordering of rewrites
//! - [`pipeline`] - The end-to-end [`Debiaser`]
//! - [`config`] - TOML-loadable configuration
//! - [`reporter`] - Before/after score reporting
//! - [`display`] - Underlined span rendering for logs and snapshots

pub mod capability;
pub mod classification;
pub mod config;
pub mod display;
pub mod errors;
pub mod generator;
pub mod pipeline;
pub mod reporter;
pub mod rerank;
pub mod span;
pub mod template;

mod fanout;

pub use capability::{BiasReporter, Classifier, MaskFiller, SpanExtractor};
pub use classification::{BiasLabel, Classification};
pub use config::DebiasConfig;
pub use display::TemplateDisplay;
pub use errors::{Capability, CapabilityError, DebiasError, DebiasResult};
pub use generator::{CandidateGenerator, CandidateWordSet};
pub use pipeline::{DebiasReport, Debiaser, Outcome};
pub use reporter::{BiasComparison, LogReporter};
pub use rerank::{Ranking, RankingOutcome, Recommendation, Reranker, ScoredCandidate};
pub use span::{resolve_spans, BiasedSpan};
pub use template::{mask_single, ConstructedSentence, MaskSlot, MaskedTemplate, DEFAULT_MASK_TOKEN};
