//! Runs a fixture through `Debiaser` and compares the result with its
//! `[expect]` table.

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{DebiasFixture, Expectation};
use crate::scripted::{ScriptedClassifier, ScriptedExtractor, ScriptedFiller};
use layered_debias::{Debiaser, Outcome, Recommendation};

/// Allowed difference between an expected and an actual bias value.
pub const BIAS_TOLERANCE: f64 = 1e-6;

/// One failed check, e.g. `recommendations[1].bias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub check: String,
    pub expected: String,
    pub actual: String,
}

/// What the pipeline did with a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureReport {
    pub outcome: Outcome,
    pub recommendations: Option<Vec<Recommendation>>,
    /// Error message when the run failed
    pub error: Option<String>,
    /// Number of checks performed
    pub checks: usize,
    pub mismatches: Vec<Mismatch>,
}

impl FixtureReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn check(&mut self, check: String, ok: bool, expected: String, actual: String) {
        self.checks += 1;
        if !ok {
            self.mismatches.push(Mismatch {
                check,
                expected,
                actual,
            });
        }
    }

    fn compare(&mut self, expect: &Expectation) {
        self.check(
            "outcome".to_string(),
            self.outcome == expect.outcome,
            format!("{:?}", expect.outcome),
            format!("{:?}", self.outcome),
        );

        if let Some(expected) = &expect.recommendations {
            let actual = self.recommendations.clone().unwrap_or_default();
            self.check(
                "recommendations.len".to_string(),
                expected.len() == actual.len(),
                expected.len().to_string(),
                actual.len().to_string(),
            );
            for (i, (want, got)) in expected.iter().zip(&actual).enumerate() {
                self.check(
                    format!("recommendations[{i}].sentence"),
                    want.sentence == got.sentence,
                    want.sentence.clone(),
                    got.sentence.clone(),
                );
                self.check(
                    format!("recommendations[{i}].bias"),
                    (want.bias - got.bias).abs() <= BIAS_TOLERANCE,
                    format!("{:.3}", want.bias),
                    format!("{:.3}", got.bias),
                );
            }
        }

        if let Some(needle) = &expect.error {
            let actual = self.error.clone();
            self.check(
                "error".to_string(),
                actual.as_deref().map_or(false, |e| e.contains(needle.as_str())),
                needle.clone(),
                actual.unwrap_or_else(|| "<no error>".to_string()),
            );
        }
    }
}

/// Run `fixture` with scripted models and check every expectation.
pub fn run_fixture(fixture: &DebiasFixture) -> SpecResult<FixtureReport> {
    let debiaser = Debiaser::new(
        ScriptedClassifier::from_fixture(fixture),
        ScriptedExtractor::from_fixture(fixture),
        ScriptedFiller::from_fixture(fixture),
    )
    .with_config(fixture.config.clone())
    .map_err(|e| SpecError::Invalid {
        message: e.to_string(),
    })?;

    let mut report = match debiaser.try_run(&fixture.text, false) {
        Ok(run) => FixtureReport {
            outcome: run.outcome,
            recommendations: run.recommendations,
            error: None,
            checks: 0,
            mismatches: Vec::new(),
        },
        Err(err) => FixtureReport {
            outcome: Outcome::InternalError,
            recommendations: None,
            error: Some(err.to_string()),
            checks: 0,
            mismatches: Vec::new(),
        },
    };
    report.compare(&fixture.expect);
    Ok(report)
}
