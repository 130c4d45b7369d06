//! Masked templates and the sentences constructed from them.

use std::cmp::Reverse;
use std::fmt;
use std::ops::Range;

/// Default mask placeholder, as understood by BERT-style fill-mask models.
pub const DEFAULT_MASK_TOKEN: &str = "[MASK]";

/// A mask occurrence inside a [`MaskedTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSlot {
    /// Index of the biased span this slot replaces
    pub span_index: usize,
    /// Byte range of the mask token inside the template text
    pub range: Range<usize>,
    /// Spans overlapping `span_index` that are masked by this slot too
    pub shared_with: Vec<usize>,
}

/// The input sentence with every biased span replaced by a mask token.
///
/// Slots are kept in left-to-right order. Filling walks the slots and
/// splices by byte range, so a substituted word never gets re-matched as
/// a mask.
///
/// Overlapping spans are masked once: the leftmost span (longest on a tie)
/// owns the slot and the spans overlapping it share it. Text of a shared
/// span outside the owner's range stays in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedTemplate {
    text: String,
    mask_token: String,
    span_count: usize,
    slots: Vec<MaskSlot>,
}

impl MaskedTemplate {
    /// Build a template from resolved span ranges.
    ///
    /// `ranges[i]` is the byte range of span `i` in `sentence`.
    ///
    /// # Panics
    ///
    /// Panics if a range is out of bounds or does not fall on char
    /// boundaries of `sentence`. Ranges from [`resolve_spans`] never do.
    ///
    /// [`resolve_spans`]: crate::resolve_spans
    pub fn build(sentence: &str, ranges: &[Range<usize>], mask_token: &str) -> Self {
        let mut order: Vec<usize> = (0..ranges.len()).collect();
        order.sort_by_key(|&idx| (ranges[idx].start, Reverse(ranges[idx].end), idx));

        let mut text = String::with_capacity(sentence.len());
        let mut slots: Vec<MaskSlot> = Vec::with_capacity(ranges.len());
        let mut cursor = 0;
        for span_index in order {
            let range = &ranges[span_index];
            if range.start < cursor {
                if let Some(owner) = slots.last_mut() {
                    owner.shared_with.push(span_index);
                    continue;
                }
            }
            text.push_str(&sentence[cursor..range.start]);
            let start = text.len();
            text.push_str(mask_token);
            slots.push(MaskSlot {
                span_index,
                range: start..text.len(),
                shared_with: Vec::new(),
            });
            cursor = range.end;
        }
        text.push_str(&sentence[cursor..]);

        Self {
            text,
            mask_token: mask_token.to_string(),
            span_count: ranges.len(),
            slots,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mask_token(&self) -> &str {
        &self.mask_token
    }

    /// Mask occurrences in left-to-right order.
    pub fn slots(&self) -> &[MaskSlot] {
        &self.slots
    }

    pub fn mask_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of spans the template was built from, shared ones included.
    pub fn span_count(&self) -> usize {
        self.span_count
    }

    /// Fill every slot with `choose(span_index)` of its owning span.
    ///
    /// Spans sharing a slot record the owner's word.
    pub fn fill<'w, F>(&self, mut choose: F) -> ConstructedSentence
    where
        F: FnMut(usize) -> &'w str,
    {
        let mut words = vec![String::new(); self.span_count];
        let mut text = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for slot in &self.slots {
            let word = choose(slot.span_index);
            text.push_str(&self.text[cursor..slot.range.start]);
            text.push_str(word);
            words[slot.span_index] = word.to_string();
            for &shared in &slot.shared_with {
                words[shared] = word.to_string();
            }
            cursor = slot.range.end;
        }
        text.push_str(&self.text[cursor..]);

        ConstructedSentence { text, words }
    }
}

impl fmt::Display for MaskedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Mask a single range of `sentence`, leaving the rest untouched.
///
/// This is the variant handed to the mask filler, which expects exactly one
/// mask per call.
///
/// # Panics
///
/// Panics if `range` is out of bounds or does not fall on char boundaries
/// of `sentence`.
pub fn mask_single(sentence: &str, range: Range<usize>, mask_token: &str) -> String {
    let mut masked = String::with_capacity(sentence.len() + mask_token.len());
    masked.push_str(&sentence[..range.start]);
    masked.push_str(mask_token);
    masked.push_str(&sentence[range.end..]);
    masked
}

/// A masked template with one substitution word per span.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConstructedSentence {
    /// The rewritten sentence
    pub text: String,
    /// Word substituted for span `i`, indexed by span
    pub words: Vec<String>,
}

impl fmt::Debug for ConstructedSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <- {:?}", self.text, self.words)
    }
}
