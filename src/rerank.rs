//! Re-ranking: re-classify every rewrite and recommend the least biased.
//!
//! - If any rewrite is classified non-biased, every non-biased rewrite is
//!   recommended, most confidently non-biased first.
//! - Otherwise the few least confidently biased rewrites are recommended.
//!
//! Sorting is stable, so rewrites with equal scores keep their generation
//! order.

use crate::capability::Classifier;
use crate::classification::{BiasLabel, Classification};
use crate::config::DebiasConfig;
use crate::errors::{Capability, DebiasError, DebiasResult};
use crate::fanout;
use crate::template::ConstructedSentence;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// A rewrite paired with its classifier verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub sentence: ConstructedSentence,
    pub classification: Classification,
}

/// A rewrite recommended to the caller.
#[derive(Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub sentence: String,
    /// `1 - score` for non-biased rewrites, `score` for biased ones
    pub bias: f64,
    #[serde(skip)]
    pub classification: Classification,
}

impl Recommendation {
    fn from_scored(scored: ScoredCandidate) -> Self {
        Self {
            bias: scored.classification.bias_metric(),
            sentence: scored.sentence.text,
            classification: scored.classification,
        }
    }
}

impl fmt::Debug for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Recommendation("...", bias: 0.120)
        write!(f, "Recommendation({:?}, bias: {:.3})", self.sentence, self.bias)
    }
}

/// Which branch of the ranking produced the recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankingOutcome {
    /// At least one rewrite is non-biased.
    Debiased,
    /// Every rewrite is still biased, just less so.
    BiasReduced,
}

/// Ordered recommendations with the branch that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub outcome: RankingOutcome,
    pub recommendations: Vec<Recommendation>,
}

impl Ranking {
    /// The lowest bias among the recommendations.
    pub fn best_bias(&self) -> Option<f64> {
        self.recommendations.first().map(|r| r.bias)
    }
}

/// Scores rewrites with the classifier and orders them.
#[derive(Debug, Clone)]
pub struct Reranker {
    max_reduced_recommendations: usize,
    parallel: bool,
}

impl Default for Reranker {
    fn default() -> Self {
        Self::from_config(&DebiasConfig::default())
    }
}

impl Reranker {
    pub fn new(max_reduced_recommendations: usize) -> Self {
        Self {
            max_reduced_recommendations,
            parallel: false,
        }
    }

    pub fn from_config(config: &DebiasConfig) -> Self {
        Self {
            max_reduced_recommendations: config.max_reduced_recommendations,
            parallel: config.parallel,
        }
    }

    /// Classify every candidate independently, keeping input order.
    pub fn score(
        &self,
        candidates: Vec<ConstructedSentence>,
        classifier: &dyn Classifier,
    ) -> DebiasResult<Vec<ScoredCandidate>> {
        let verdicts = fanout::try_map(&candidates, self.parallel, |candidate| {
            classifier
                .classify(&candidate.text)
                .map_err(DebiasError::upstream(Capability::Classifier))
        })?;

        Ok(candidates
            .into_iter()
            .zip(verdicts)
            .map(|(sentence, classification)| ScoredCandidate {
                sentence,
                classification,
            })
            .collect())
    }

    /// Partition and order already-scored candidates.
    pub fn rank(&self, scored: Vec<ScoredCandidate>) -> DebiasResult<Ranking> {
        let (mut non_biased, mut biased): (Vec<_>, Vec<_>) = scored
            .into_iter()
            .partition(|c| c.classification.label == BiasLabel::NonBiased);

        debug!(
            non_biased = non_biased.len(),
            biased = biased.len(),
            "partitioned rewrites"
        );

        if !non_biased.is_empty() {
            non_biased.sort_by(|a, b| b.classification.score.total_cmp(&a.classification.score));
            return Ok(Ranking {
                outcome: RankingOutcome::Debiased,
                recommendations: non_biased
                    .into_iter()
                    .map(Recommendation::from_scored)
                    .collect(),
            });
        }

        if biased.is_empty() {
            return Err(DebiasError::EmptyCandidateSet);
        }

        biased.sort_by(|a, b| a.classification.score.total_cmp(&b.classification.score));
        biased.truncate(self.max_reduced_recommendations);
        Ok(Ranking {
            outcome: RankingOutcome::BiasReduced,
            recommendations: biased
                .into_iter()
                .map(Recommendation::from_scored)
                .collect(),
        })
    }

    /// Score then rank.
    pub fn rerank(
        &self,
        candidates: Vec<ConstructedSentence>,
        classifier: &dyn Classifier,
    ) -> DebiasResult<Ranking> {
        if candidates.is_empty() {
            return Err(DebiasError::EmptyCandidateSet);
        }
        let scored = self.score(candidates, classifier)?;
        self.rank(scored)
    }
}
