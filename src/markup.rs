//! Rich inline text for checklist items.
//!
//! Content is held as a tree of [`tdoc::Span`]s. A span's content is its own
//! `text` followed by its `children`. Markup strings only exist at the edges:
//! [`RichText::from_markup`] parses them and [`RichText::to_markup`] writes the
//! canonical form back out.

use std::fmt;

use tdoc::Span;

mod parse;
mod split;
mod write;

pub use parse::parse_markup;
pub use write::write_markup;

use split::{
    insert_into_spans, normalize_spans, remove_char_from_spans, span_char_len, span_is_empty,
    split_spans_at,
};

#[derive(Clone, Default)]
pub struct RichText {
    spans: Vec<Span>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markup(markup: &str) -> Self {
        Self::from_spans(parse_markup(markup))
    }

    /// Text without markup; `<`, `&` and friends are kept as characters.
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_spans(vec![Span::new_text(text)])
    }

    pub fn from_spans(mut spans: Vec<Span>) -> Self {
        normalize_spans(&mut spans);
        Self { spans }
    }

    pub fn to_markup(&self) -> String {
        write_markup(&self.spans)
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length in characters; a line break counts as one.
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(span_char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(span_is_empty)
    }

    /// True when the visible text is empty once surrounding whitespace is trimmed.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            collect_plain_text(span, &mut out);
        }
        out
    }

    pub fn clamp_offset(&self, offset: usize) -> usize {
        offset.min(self.char_len())
    }

    /// Removes everything after `offset` and returns it as its own fragment.
    ///
    /// Styled runs that straddle the offset are cut in two; each half keeps
    /// the style (and link target) of the original run.
    pub fn split_off(&mut self, offset: usize) -> RichText {
        let offset = self.clamp_offset(offset);
        let trailing = split_spans_at(&mut self.spans, offset);
        normalize_spans(&mut self.spans);
        RichText::from_spans(trailing)
    }

    /// Appends `other` and returns the character offset where it begins.
    pub fn append(&mut self, other: RichText) -> usize {
        let boundary = self.char_len();
        self.spans.extend(other.spans);
        normalize_spans(&mut self.spans);
        boundary
    }

    /// Inserts plain text at `offset`, continuing the style of the run it lands in.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> usize {
        if text.is_empty() {
            return self.clamp_offset(offset);
        }
        let offset = self.clamp_offset(offset);
        if !insert_into_spans(&mut self.spans, offset, text) {
            self.spans.push(Span::new_text(text));
        }
        normalize_spans(&mut self.spans);
        offset + text.chars().count()
    }

    /// Deletes the character before `offset`.
    pub fn remove_char_before(&mut self, offset: usize) -> bool {
        let offset = self.clamp_offset(offset);
        if offset == 0 {
            return false;
        }
        if remove_char_from_spans(&mut self.spans, offset - 1) {
            normalize_spans(&mut self.spans);
            true
        } else {
            false
        }
    }
}

fn collect_plain_text(span: &Span, out: &mut String) {
    out.push_str(&span.text);
    for child in &span.children {
        collect_plain_text(child, out);
    }
}

impl PartialEq for RichText {
    fn eq(&self, other: &Self) -> bool {
        self.to_markup() == other.to_markup()
    }
}

impl Eq for RichText {}

impl fmt::Debug for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RichText").field(&self.to_markup()).finish()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

impl From<&str> for RichText {
    fn from(markup: &str) -> Self {
        Self::from_markup(markup)
    }
}
