//! The classify → localize → regenerate-and-rerank pipeline.

use crate::capability::{BiasReporter, Classifier, MaskFiller, SpanExtractor};
use crate::classification::Classification;
use crate::config::DebiasConfig;
use crate::errors::{Capability, DebiasError, DebiasResult};
use crate::generator::CandidateGenerator;
use crate::reporter::BiasComparison;
use crate::rerank::{RankingOutcome, Recommendation, Reranker};
use crate::span::BiasedSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

/// Overall result of de-biasing one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The classifier found no bias; nothing to rewrite.
    NonBiased,
    /// Biased, but the extractor could not localize any span.
    ExtractionFailed,
    /// At least one rewrite is classified non-biased.
    Debiased,
    /// Every rewrite is still biased, but less so.
    BiasReduced,
    /// A model call or an internal invariant failed.
    InternalError,
}

impl Outcome {
    /// User-facing summary of the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::NonBiased => "The sentence is non-biased",
            Outcome::ExtractionFailed => {
                "The sentence is biased but the model failed to pick up the portion of bias"
            }
            Outcome::Debiased => "Successfully de-biased the sentence fragment",
            Outcome::BiasReduced => "Reduced the amount of bias",
            Outcome::InternalError => "De-biasing failed with an internal error",
        }
    }

    /// Whether this outcome carries a recommendation list.
    pub fn has_recommendations(&self) -> bool {
        matches!(self, Outcome::Debiased | Outcome::BiasReduced)
    }
}

impl From<RankingOutcome> for Outcome {
    fn from(outcome: RankingOutcome) -> Self {
        match outcome {
            RankingOutcome::Debiased => Outcome::Debiased,
            RankingOutcome::BiasReduced => Outcome::BiasReduced,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything one pipeline run found out about a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct DebiasReport {
    pub text: String,
    /// Verdict on the original sentence
    pub original: Classification,
    /// Spans localized by the extractor (empty unless the text is biased)
    pub spans: Vec<BiasedSpan>,
    pub outcome: Outcome,
    /// Present for [`Outcome::Debiased`] and [`Outcome::BiasReduced`]
    pub recommendations: Option<Vec<Recommendation>>,
}

impl DebiasReport {
    /// The top recommendation, if any.
    pub fn best(&self) -> Option<&Recommendation> {
        self.recommendations.as_ref().and_then(|r| r.first())
    }

    /// Original score next to the top recommendation's bias.
    pub fn comparison(&self) -> Option<BiasComparison> {
        self.best()
            .map(|best| BiasComparison::new(self.original.score, best.bias))
    }
}

/// De-biasing pipeline over injected model capabilities.
///
/// Models are loaded once by the caller and shared read-only; a `Debiaser`
/// holds no per-run state, so one instance can serve many sentences.
///
/// ```
/// use layered_debias::{
///     BiasedSpan, CapabilityError, Classification, Debiaser, Outcome,
/// };
///
/// let debiaser = Debiaser::new(
///     |text: &str| -> Result<Classification, CapabilityError> {
///         Ok(if text.contains("lazy") {
///             Classification::biased(0.95)
///         } else {
///             Classification::non_biased(0.9)
///         })
///     },
///     |_: &str| -> Result<Vec<BiasedSpan>, CapabilityError> {
///         Ok(vec![BiasedSpan::text("lazy")])
///     },
///     |_: &str| -> Result<Vec<String>, CapabilityError> {
///         Ok(["tired", "busy", "calm", "kind", "quiet"]
///             .iter()
///             .map(|w| w.to_string())
///             .collect())
///     },
/// );
///
/// let (outcome, recommendations) = debiaser.run("a lazy man", false);
/// assert_eq!(outcome, Outcome::Debiased);
/// assert_eq!(recommendations.unwrap().len(), 5);
/// ```
pub struct Debiaser {
    classifier: Box<dyn Classifier>,
    extractor: Box<dyn SpanExtractor>,
    filler: Box<dyn MaskFiller>,
    reporter: Option<Box<dyn BiasReporter>>,
    config: DebiasConfig,
    generator: CandidateGenerator,
    reranker: Reranker,
}

impl fmt::Debug for Debiaser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debiaser")
            .field("config", &self.config)
            .field("reporter", &self.reporter.is_some())
            .finish_non_exhaustive()
    }
}

impl Debiaser {
    /// Pipeline with the default configuration and no reporter.
    pub fn new(
        classifier: impl Classifier + 'static,
        extractor: impl SpanExtractor + 'static,
        filler: impl MaskFiller + 'static,
    ) -> Self {
        let config = DebiasConfig::default();
        Self {
            classifier: Box::new(classifier),
            extractor: Box::new(extractor),
            filler: Box::new(filler),
            reporter: None,
            generator: CandidateGenerator::from_config(&config),
            reranker: Reranker::from_config(&config),
            config,
        }
    }

    /// Install the reporter invoked when a run asks for a plot.
    pub fn with_reporter(mut self, reporter: impl BiasReporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: DebiasConfig) -> DebiasResult<Self> {
        config.validate()?;
        self.generator = CandidateGenerator::from_config(&config);
        self.reranker = Reranker::from_config(&config);
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &DebiasConfig {
        &self.config
    }

    /// De-bias `text`, reporting every failure as an error.
    #[instrument(level = "debug", skip(self))]
    pub fn try_run(&self, text: &str, show_plot: bool) -> DebiasResult<DebiasReport> {
        let original = self
            .classifier
            .classify(text)
            .map_err(DebiasError::upstream(Capability::Classifier))?;
        debug!(?original, "classified input");

        let mut report = DebiasReport {
            text: text.to_string(),
            original,
            spans: Vec::new(),
            outcome: Outcome::NonBiased,
            recommendations: None,
        };

        if !original.is_biased() {
            info!(outcome = ?report.outcome, "{}", report.outcome);
            return Ok(report);
        }

        report.spans = self
            .extractor
            .extract_spans(text)
            .map_err(DebiasError::upstream(Capability::SpanExtractor))?;
        debug!(spans = ?report.spans, "extracted biased spans");

        if report.spans.is_empty() {
            report.outcome = Outcome::ExtractionFailed;
            info!(outcome = ?report.outcome, "{}", report.outcome);
            return Ok(report);
        }

        let candidates = self
            .generator
            .generate(text, &report.spans, self.filler.as_ref())?;
        let ranking = self
            .reranker
            .rerank(candidates, self.classifier.as_ref())?;

        report.outcome = ranking.outcome.into();
        report.recommendations = Some(ranking.recommendations);
        info!(
            outcome = ?report.outcome,
            recommendations = report.recommendations.as_ref().map_or(0, Vec::len),
            "{}",
            report.outcome
        );

        if show_plot {
            self.report_scores(&report);
        }

        Ok(report)
    }

    /// De-bias `text`, folding failures into [`Outcome::InternalError`].
    ///
    /// Recommendations are present only for [`Outcome::Debiased`] and
    /// [`Outcome::BiasReduced`].
    pub fn run(&self, text: &str, show_plot: bool) -> (Outcome, Option<Vec<Recommendation>>) {
        match self.try_run(text, show_plot) {
            Ok(report) => (report.outcome, report.recommendations),
            Err(err) => {
                error!(error = %err, "de-biasing failed");
                (Outcome::InternalError, None)
            }
        }
    }

    fn report_scores(&self, report: &DebiasReport) {
        let Some(comparison) = report.comparison() else {
            return;
        };
        match &self.reporter {
            Some(reporter) => reporter.report(comparison.original, comparison.debiased),
            None => warn!("plot requested but no reporter is installed"),
        }
    }
}
