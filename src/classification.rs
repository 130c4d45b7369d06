//! Bias classifier verdicts.
//!
//! A [`Classification`] pairs a [`BiasLabel`] with the classifier's
//! confidence in that label:
//! - `label = Biased, score = 0.97` means "very likely biased"
//! - `label = NonBiased, score = 0.97` means "very likely neutral"
//!
//! [`Classification::bias_metric`] folds both into a single number where
//! higher always means more biased.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label emitted by the bias classifier.
///
/// Deserialized through [`FromStr`], so any spelling it accepts works in
/// TOML as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BiasLabel {
    #[serde(rename = "Biased")]
    Biased,
    #[serde(rename = "Non-biased")]
    NonBiased,
}

impl BiasLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLabel::Biased => "Biased",
            BiasLabel::NonBiased => "Non-biased",
        }
    }

    pub fn is_biased(&self) -> bool {
        matches!(self, BiasLabel::Biased)
    }
}

impl fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BiasLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biased" => Ok(BiasLabel::Biased),
            "non-biased" | "nonbiased" | "non_biased" => Ok(BiasLabel::NonBiased),
            other => Err(format!("unknown bias label: {:?}", other)),
        }
    }
}

impl TryFrom<String> for BiasLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A classifier verdict for one piece of text.
///
/// # Example
/// ```
/// use layered_debias::{BiasLabel, Classification};
///
/// let verdict = Classification::new(BiasLabel::NonBiased, 0.8);
/// assert!((verdict.bias_metric() - 0.2).abs() < 1e-9);
///
/// let clamped = Classification::biased(1.4);
/// assert_eq!(clamped.score, 1.0);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawClassification")]
pub struct Classification {
    pub label: BiasLabel,
    /// Confidence in `label`, from 0.0 to 1.0
    pub score: f64,
}

/// Wire shape of a [`Classification`], before clamping.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassification {
    label: BiasLabel,
    score: f64,
}

impl From<RawClassification> for Classification {
    fn from(raw: RawClassification) -> Self {
        Classification::new(raw.label, raw.score)
    }
}

impl Classification {
    /// Create a verdict, clamping `score` into `[0, 1]`.
    pub fn new(label: BiasLabel, score: f64) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
        }
    }

    pub fn biased(score: f64) -> Self {
        Self::new(BiasLabel::Biased, score)
    }

    pub fn non_biased(score: f64) -> Self {
        Self::new(BiasLabel::NonBiased, score)
    }

    pub fn is_biased(&self) -> bool {
        self.label.is_biased()
    }

    /// Amount of bias implied by this verdict: `score` when biased,
    /// `1 - score` when non-biased.
    pub fn bias_metric(&self) -> f64 {
        match self.label {
            BiasLabel::Biased => self.score,
            BiasLabel::NonBiased => 1.0 - self.score,
        }
    }
}

impl fmt::Debug for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Biased(0.97)
        write!(f, "{}({:.3})", self.label, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_metric() {
        assert_eq!(Classification::biased(0.75).bias_metric(), 0.75);
        assert!((Classification::non_biased(0.75).bias_metric() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_score_clamping() {
        assert_eq!(Classification::biased(1.5).score, 1.0);
        assert_eq!(Classification::non_biased(-0.5).score, 0.0);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Biased".parse::<BiasLabel>(), Ok(BiasLabel::Biased));
        assert_eq!("Non-biased".parse::<BiasLabel>(), Ok(BiasLabel::NonBiased));
        assert_eq!(" nonbiased ".parse::<BiasLabel>(), Ok(BiasLabel::NonBiased));
        assert!("neutral".parse::<BiasLabel>().is_err());
    }

    #[test]
    fn test_deserialize_clamps_and_accepts_any_label_spelling() {
        let verdict: Classification =
            toml::from_str("label = \"non-biased\"\nscore = 1.5\n").unwrap();
        assert_eq!(verdict, Classification::non_biased(1.0));

        let verdict: Classification = toml::from_str("label = \"BIASED\"\nscore = -0.2\n").unwrap();
        assert_eq!(verdict, Classification::biased(0.0));

        assert!(toml::from_str::<Classification>("label = \"neutral\"\nscore = 0.5\n").is_err());
    }

    #[test]
    fn test_serialize_keeps_model_label_names() {
        let toml = toml::to_string(&Classification::non_biased(0.5)).unwrap();
        assert_eq!(toml, "label = \"Non-biased\"\nscore = 0.5\n");
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", Classification::non_biased(0.8126));
        assert_eq!(debug, "Non-biased(0.813)");
    }
}
