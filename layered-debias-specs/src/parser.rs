//! Parser for TOML fixture files with inline `«…»` span markers.

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{DebiasFixture, Expectation, ScriptedVerdict, SpanMarker};
use layered_debias::{Classification, DebiasConfig};
use serde::Deserialize;

/// Parse span markers from text, returning the normalized text and the
/// markers with byte ranges into it.
///
/// Markers cannot nest, and every `«` must be closed by a `»`.
pub fn parse_spans(input: &str) -> SpecResult<(String, Vec<SpanMarker>)> {
    let mut spans = Vec::new();
    let mut normalized = String::with_capacity(input.len());
    let mut open: Option<(usize, usize)> = None;

    for (pos, ch) in input.char_indices() {
        match ch {
            '«' => {
                if open.is_some() {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Nested span marker".to_string(),
                    });
                }
                open = Some((pos, normalized.len()));
            }
            '»' => {
                let Some((_, start)) = open.take() else {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Unexpected '»' without an opening '«'".to_string(),
                    });
                };
                if start == normalized.len() {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Empty span marker".to_string(),
                    });
                }
                spans.push(SpanMarker {
                    text: normalized[start..].to_string(),
                    range: start..normalized.len(),
                });
            }
            _ => normalized.push(ch),
        }
    }

    if let Some((pos, _)) = open {
        return Err(SpecError::Parse {
            line: count_lines(input, pos),
            message: "Unclosed span marker: expected '»'".to_string(),
        });
    }

    Ok((normalized, spans))
}

/// Count lines up to a byte position (for error messages).
fn count_lines(input: &str, byte_pos: usize) -> usize {
    input[..byte_pos.min(input.len())]
        .chars()
        .filter(|&c| c == '\n')
        .count()
        + 1
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixture {
    title: Option<String>,
    text: String,
    #[serde(default)]
    unmarked_spans: Vec<String>,
    #[serde(default = "default_offsets")]
    offsets: bool,
    original: Classification,
    #[serde(default)]
    fill: Vec<RawFill>,
    #[serde(default)]
    candidates: Vec<ScriptedVerdict>,
    fallback: Option<Classification>,
    #[serde(default)]
    config: DebiasConfig,
    expect: Expectation,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFill {
    words: Vec<String>,
}

fn default_offsets() -> bool {
    true
}

/// Parse a full fixture file.
pub fn parse_fixture(input: &str) -> SpecResult<DebiasFixture> {
    let raw: RawFixture = toml::from_str(input).map_err(|e| SpecError::Parse {
        line: e.span().map_or(1, |span| count_lines(input, span.start)),
        message: e.message().to_string(),
    })?;

    // Marker positions are reported relative to the `text` value itself.
    let (text, spans) = parse_spans(&raw.text)?;

    if !raw.fill.is_empty() && raw.fill.len() != spans.len() {
        return Err(SpecError::Invalid {
            message: format!(
                "{} [[fill]] entries for {} marked spans",
                raw.fill.len(),
                spans.len()
            ),
        });
    }
    raw.config.validate().map_err(|e| SpecError::Invalid {
        message: e.to_string(),
    })?;

    Ok(DebiasFixture {
        title: raw.title,
        text,
        spans,
        unmarked_spans: raw.unmarked_spans,
        offsets: raw.offsets,
        original: raw.original,
        fill: raw.fill.into_iter().map(|f| f.words).collect(),
        candidates: raw.candidates,
        fallback: raw.fallback,
        config: raw.config,
        expect: raw.expect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_debias::Outcome;

    #[test]
    fn test_parse_spans_simple() {
        let (text, spans) = parse_spans("He is a «lazy» man").unwrap();
        assert_eq!(text, "He is a lazy man");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "lazy");
        assert_eq!(spans[0].range, 8..12);
    }

    #[test]
    fn test_parse_spans_multiple() {
        let (text, spans) = parse_spans("«Old» men and «bossy» women").unwrap();
        assert_eq!(text, "Old men and bossy women");
        assert_eq!(spans[0].range, 0..3);
        assert_eq!(spans[1].range, 12..17);
        assert_eq!(&text[spans[1].range.clone()], "bossy");
    }

    #[test]
    fn test_parse_spans_multibyte_offsets() {
        let (text, spans) = parse_spans("café «naïve» crowd").unwrap();
        assert_eq!(&text[spans[0].range.clone()], "naïve");
    }

    #[test]
    fn test_parse_spans_errors() {
        assert!(matches!(
            parse_spans("a «lazy man"),
            Err(SpecError::Parse { line: 1, .. })
        ));
        assert!(parse_spans("a lazy» man").is_err());
        assert!(parse_spans("a «la«zy»» man").is_err());
        assert!(parse_spans("a «» man").is_err());
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines("a\nb\nc", 0), 1);
        assert_eq!(count_lines("a\nb\nc", 2), 2);
        assert_eq!(count_lines("a\nb\nc", 4), 3);
    }

    #[test]
    fn test_parse_fixture() {
        let fixture = parse_fixture(
            r#"
title = "Single span"
text = "He is a typical «lazy immigrant»"

[original]
label = "Biased"
score = 0.93

[[fill]]
words = ["hardworking", "local"]

[[candidates]]
sentence = "He is a typical hardworking"
label = "Non-biased"
score = 0.8

[config]
candidates_per_span = 2

[expect]
outcome = "Debiased"

[[expect.recommendations]]
sentence = "He is a typical hardworking"
bias = 0.2
"#,
        )
        .unwrap();

        assert_eq!(fixture.title.as_deref(), Some("Single span"));
        assert_eq!(fixture.text, "He is a typical lazy immigrant");
        assert!(fixture.offsets);
        assert_eq!(fixture.fill, vec![vec!["hardworking", "local"]]);
        assert_eq!(fixture.config.candidates_per_span, 2);
        assert_eq!(fixture.expect.outcome, Outcome::Debiased);
        assert_eq!(fixture.expect.recommendations.as_ref().map(Vec::len), Some(1));
        assert_eq!(fixture.original, Classification::biased(0.93));
    }

    #[test]
    fn test_parse_fixture_fill_count_mismatch() {
        let err = parse_fixture(
            r#"
text = "«Old» men and «bossy» women"

[original]
label = "Biased"
score = 0.9

[[fill]]
words = ["Older"]

[expect]
outcome = "Debiased"
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid fixture: 1 [[fill]] entries for 2 marked spans"
        );
    }

    #[test]
    fn test_parse_fixture_clamps_scores() {
        let fixture = parse_fixture(
            r#"
text = "a «bossy» woman"

[original]
label = "biased"
score = 1.5

[[candidates]]
sentence = "a firm woman"
label = "non-biased"
score = 1.2

[fallback]
label = "Non-biased"
score = -0.3

[expect]
outcome = "Debiased"
"#,
        )
        .unwrap();

        assert_eq!(fixture.original, Classification::biased(1.0));
        assert_eq!(fixture.fallback, Some(Classification::non_biased(0.0)));
        assert_eq!(
            fixture.candidates[0].classification(),
            Classification::non_biased(1.0)
        );
    }

    #[test]
    fn test_parse_fixture_unknown_label() {
        let err = parse_fixture("text = \"a\"\n\n[original]\nlabel = \"Neutral\"\nscore = 0.5\n")
            .unwrap_err();
        match err {
            SpecError::Parse { line, message } => {
                assert!(line >= 1);
                assert!(message.contains("unknown bias label"), "{message}");
            }
            other => panic!("expected a parse error, got {other}"),
        }
    }
}
