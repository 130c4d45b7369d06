//! Fixture-driven scenario tests for `layered-debias`.
//!
//! A fixture is a TOML file describing one sentence, the verdicts and
//! substitutions the three models should produce for it, and the outcome
//! the pipeline is expected to reach. Biased spans are marked inline with
//! `«…»` so the expected extraction is visible in the text itself:
//!
//! ```toml
//! title = "Single span is de-biased"
//! text = "He is a typical «lazy immigrant»"
//!
//! [original]
//! label = "Biased"
//! score = 0.93
//!
//! [[fill]]
//! words = ["hardworking", "local"]
//!
//! [[candidates]]
//! sentence = "He is a typical hardworking"
//! label = "Non-biased"
//! score = 0.8
//!
//! [expect]
//! outcome = "Debiased"
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - Span markers and fixture parsing
//! - [`fixture`] - Fixture types
//! - [`loader`] - Loading fixture files from disk
//! - [`scripted`] - Model doubles driven by a fixture
//! - [`runner`] - Running a fixture and collecting mismatches
//! - [`formatter`] - Failure and summary rendering
//! - [`failures`] - Expected failures tracking via TOML
//! - [`errors`] - Error types for the harness

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod parser;
pub mod runner;
pub mod scripted;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{DebiasFixture, Expectation, ExpectedRecommendation, ScriptedVerdict, SpanMarker};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use parser::{parse_fixture, parse_spans};
pub use runner::{run_fixture, FixtureReport, Mismatch, BIAS_TOLERANCE};
pub use scripted::{ScriptedClassifier, ScriptedExtractor, ScriptedFiller};
