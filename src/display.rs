use crate::generator::CandidateWordSet;
use std::fmt;
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

struct IncludedSpan {
    index: usize,
    range: Range<usize>,
    words: Vec<String>,
}

/// Renders a sentence with its biased spans underlined.
///
/// ```text
/// He is a typical lazy immigrant
///                 ╰────────────╯[0] hardworking | local
/// ```
///
/// Columns are measured in display width, so wide and combining characters
/// line up in a terminal.
pub struct TemplateDisplay<'a> {
    sentence: &'a str,
    spans: Vec<IncludedSpan>,
}

impl<'a> TemplateDisplay<'a> {
    /// Display `sentence` with span `i` covering `ranges[i]`.
    pub fn new(sentence: &'a str, ranges: &[Range<usize>]) -> Self {
        Self {
            sentence,
            spans: ranges
                .iter()
                .enumerate()
                .map(|(index, range)| IncludedSpan {
                    index,
                    range: range.clone(),
                    words: Vec::new(),
                })
                .collect(),
        }
    }

    /// Label each span with the filler's candidate words.
    pub fn with_candidates(mut self, word_sets: &[CandidateWordSet]) -> Self {
        for (span, set) in self.spans.iter_mut().zip(word_sets) {
            span.words = set.words.clone();
        }
        self
    }
}

fn underline(width: usize) -> String {
    match width {
        0 => String::new(),
        1 => "╰".to_string(),
        _ => format!("╰{}╯", "─".repeat(width - 2)),
    }
}

impl<'a> fmt::Display for TemplateDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentence)?;

        for span in &self.spans {
            let indent = UnicodeWidthStr::width(&self.sentence[..span.range.start]);
            let width = UnicodeWidthStr::width(&self.sentence[span.range.clone()]);
            write!(
                f,
                "\n{}{}[{}]",
                " ".repeat(indent),
                underline(width),
                span.index
            )?;
            if !span.words.is_empty() {
                write!(f, " {}", span.words.join(" | "))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_span() {
        let display = TemplateDisplay::new("He is a typical lazy immigrant", &[16..30]);

        insta::assert_snapshot!(display, @r###"
        He is a typical lazy immigrant
                        ╰────────────╯[0]
        "###);
    }

    #[test]
    fn test_spans_with_candidates() {
        let sets = vec![
            CandidateWordSet {
                span: "bossy".to_string(),
                words: vec!["assertive".to_string(), "strong".to_string()],
            },
            CandidateWordSet {
                span: "Old".to_string(),
                words: vec!["Older".to_string(), "Retired".to_string()],
            },
        ];
        let display =
            TemplateDisplay::new("Old men and bossy women", &[12..17, 0..3]).with_candidates(&sets);

        insta::assert_snapshot!(display, @r###"
        Old men and bossy women
                    ╰───╯[0] assertive | strong
        ╰─╯[1] Older | Retired
        "###);
    }

    #[test]
    fn test_wide_characters_align() {
        let display = TemplateDisplay::new("日本 lazy", &[7..11]);

        insta::assert_snapshot!(display, @r###"
        日本 lazy
             ╰──╯[0]
        "###);
    }
}
