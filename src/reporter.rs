//! Before/after bias reporting.

use crate::capability::BiasReporter;
use serde::Serialize;
use tracing::info;

/// Bias of the original sentence next to the best recommendation's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiasComparison {
    pub original: f64,
    pub debiased: f64,
}

impl BiasComparison {
    pub fn new(original: f64, debiased: f64) -> Self {
        Self { original, debiased }
    }

    /// How much bias the recommendation removed. Negative if it added some.
    pub fn reduction(&self) -> f64 {
        self.original - self.debiased
    }

    /// Both scores rounded to 3 decimals, as shown on a chart.
    pub fn rounded(&self) -> Self {
        Self {
            original: round3(self.original),
            debiased: round3(self.debiased),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Reporter that emits the comparison as a structured `tracing` event.
///
/// Stands in for a chart when running headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl BiasReporter for LogReporter {
    fn report(&self, original_score: f64, best_new_score: f64) {
        let comparison = BiasComparison::new(original_score, best_new_score).rounded();
        info!(
            original = comparison.original,
            debiased = comparison.debiased,
            reduction = round3(comparison.reduction()),
            "bias probability for new recommendations"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded() {
        let comparison = BiasComparison::new(0.98765, 0.12345).rounded();
        assert_eq!(comparison.original, 0.988);
        assert_eq!(comparison.debiased, 0.123);
    }

    #[test]
    fn test_reduction() {
        let comparison = BiasComparison::new(0.9, 0.25);
        assert!((comparison.reduction() - 0.65).abs() < 1e-12);
        assert!(BiasComparison::new(0.2, 0.4).reduction() < 0.0);
    }

    #[test]
    fn test_log_reporter_is_a_bias_reporter() {
        let reporter: Box<dyn BiasReporter> = Box::new(LogReporter);
        reporter.report(0.9, 0.1);
    }
}
