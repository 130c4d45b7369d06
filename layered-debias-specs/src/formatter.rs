//! Failure and summary rendering.

use crate::failures::HarnessResult;
use crate::fixture::DebiasFixture;
use crate::runner::Mismatch;
use std::fmt::Write;

/// Format a failed check with the fixture sentence and its marked spans.
pub fn format_failure(
    fixture_name: &str,
    fixture: &DebiasFixture,
    mismatch: &Mismatch,
    error: Option<&str>,
) -> String {
    let mut output = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(output, "\nFAIL: {} [{}]", fixture_name, mismatch.check);
    let _ = writeln!(output);

    let _ = writeln!(output, "  {}", fixture.text);
    let underline = underline(fixture);
    if !underline.is_empty() {
        let _ = writeln!(output, "  {}", underline);
    }
    let _ = writeln!(output);

    let _ = writeln!(
        output,
        "  {}: expected `{}`, found `{}`",
        mismatch.check, mismatch.expected, mismatch.actual
    );
    if let Some(error) = error {
        let _ = writeln!(output, "  error: {}", error);
    }

    if let Some(hint) = generate_hint(mismatch, error) {
        let _ = writeln!(output);
        let _ = writeln!(output, "  hint: {}", hint);
    }

    output
}

/// Format the tally of a harness run.
pub fn format_summary(label: &str, result: &HarnessResult) -> String {
    let mut output = String::new();

    let status = if result.success() { "PASS" } else { "FAIL" };
    let _ = writeln!(output, "\n{}: {}", status, label);
    let _ = writeln!(
        output,
        "  {} checks: {} passed, {} failed ({} expected, {} regressions)",
        result.total,
        result.passed,
        result.failed(),
        result.expected_failures,
        result.regressions
    );

    output
}

/// Carets under every marked span, one column per char.
fn underline(fixture: &DebiasFixture) -> String {
    let line: String = fixture
        .text
        .char_indices()
        .map(|(pos, _)| {
            if fixture.spans.iter().any(|s| s.range.contains(&pos)) {
                '^'
            } else {
                ' '
            }
        })
        .collect();
    line.trim_end().to_string()
}

fn generate_hint(mismatch: &Mismatch, error: Option<&str>) -> Option<&'static str> {
    if let Some(error) = error {
        if error.contains("no verdict scripted") {
            return Some("add a [[candidates]] entry or a [fallback] verdict for this rewrite");
        }
        if error.contains("no words scripted") {
            return Some(
                "the pipeline masked another occurrence; check the markers or set offsets = true",
            );
        }
        if error.contains("violates contract") {
            return Some("each [[fill]] list needs at least candidates_per_span words");
        }
    }
    if mismatch.check.ends_with(".bias") {
        return Some("bias is 1 - score for non-biased rewrites and score for biased ones");
    }
    None
}
