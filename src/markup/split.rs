use tdoc::Span;

pub(crate) fn span_char_len(span: &Span) -> usize {
    span.text.chars().count() + span.children.iter().map(span_char_len).sum::<usize>()
}

pub(crate) fn span_is_empty(span: &Span) -> bool {
    span.text.is_empty() && span.children.iter().all(span_is_empty)
}

pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

fn split_text(text: &str, offset: usize) -> (String, String) {
    let byte_idx = char_to_byte_idx(text, offset);
    let left = text[..byte_idx].to_string();
    let right = text[byte_idx..].to_string();
    (left, right)
}

/// Splits `spans` at the character `offset`. The leading content stays in
/// `spans`; everything after the offset is returned.
pub(crate) fn split_spans_at(spans: &mut Vec<Span>, offset: usize) -> Vec<Span> {
    let mut remaining = offset;
    let mut idx = 0;
    while idx < spans.len() {
        let len = span_char_len(&spans[idx]);
        if remaining < len {
            break;
        }
        remaining -= len;
        idx += 1;
    }
    if idx >= spans.len() {
        return Vec::new();
    }

    let mut trailing = spans.split_off(idx + 1);
    if remaining == 0 {
        if let Some(span) = spans.pop() {
            trailing.insert(0, span);
        }
        return trailing;
    }

    if let Some(tail) = split_span(&mut spans[idx], remaining) {
        trailing.insert(0, tail);
    }
    trailing
}

/// Cuts a single span at `offset` (strictly inside it). The tail is a copy
/// of the span's style and link target holding the content after the cut.
fn split_span(span: &mut Span, offset: usize) -> Option<Span> {
    let text_len = span.text.chars().count();
    let mut tail = span.clone();
    if offset <= text_len {
        let (left_text, right_text) = split_text(&span.text, offset);
        span.text = left_text;
        tail.text = right_text;
        tail.children = std::mem::take(&mut span.children);
    } else {
        tail.text.clear();
        tail.children = split_spans_at(&mut span.children, offset - text_len);
    }
    if span_is_empty(&tail) { None } else { Some(tail) }
}

/// Removes empty spans, lifts a leading plain run into its parent's text and
/// merges neighbours that share style and link target.
pub(crate) fn normalize_spans(spans: &mut Vec<Span>) {
    let mut idx = 0;
    while idx < spans.len() {
        normalize_spans(&mut spans[idx].children);
        hoist_leading_text(&mut spans[idx]);
        if span_is_empty(&spans[idx]) {
            spans.remove(idx);
        } else {
            idx += 1;
        }
    }

    let mut i = 0;
    while i + 1 < spans.len() {
        if can_merge_spans(&spans[i], &spans[i + 1]) {
            let right = spans.remove(i + 1);
            merge_span_into(&mut spans[i], right);
        } else {
            i += 1;
        }
    }
}

fn hoist_leading_text(span: &mut Span) {
    if !span.text.is_empty() {
        return;
    }
    let Some(first) = span.children.first() else {
        return;
    };
    if first.style == tdoc::InlineStyle::None && first.children.is_empty() {
        let first = span.children.remove(0);
        span.text = first.text;
    }
}

fn can_merge_spans(left: &Span, right: &Span) -> bool {
    left.style == right.style && left.link_target == right.link_target
}

fn merge_span_into(left: &mut Span, right: Span) {
    if left.children.is_empty() {
        left.text.push_str(&right.text);
        left.children = right.children;
        return;
    }
    if !right.text.is_empty() {
        left.children.push(Span::new_text(&right.text));
    }
    left.children.extend(right.children);
    normalize_spans(&mut left.children);
}

/// Inserts `text` at `offset`, inside the innermost span that ends at or
/// after the offset. Returns false when no span covers it.
pub(crate) fn insert_into_spans(spans: &mut [Span], offset: usize, text: &str) -> bool {
    let mut remaining = offset;
    for span in spans.iter_mut() {
        let len = span_char_len(span);
        if remaining <= len {
            return insert_into_span(span, remaining, text);
        }
        remaining -= len;
    }
    false
}

fn insert_into_span(span: &mut Span, offset: usize, text: &str) -> bool {
    let text_len = span.text.chars().count();
    if offset <= text_len {
        let byte_idx = char_to_byte_idx(&span.text, offset);
        span.text.insert_str(byte_idx, text);
        return true;
    }
    insert_into_spans(&mut span.children, offset - text_len, text)
}

/// Removes the character at `offset`.
pub(crate) fn remove_char_from_spans(spans: &mut [Span], offset: usize) -> bool {
    let mut remaining = offset;
    for span in spans.iter_mut() {
        let len = span_char_len(span);
        if remaining < len {
            let text_len = span.text.chars().count();
            if remaining < text_len {
                return remove_char_from_text(&mut span.text, remaining);
            }
            return remove_char_from_spans(&mut span.children, remaining - text_len);
        }
        remaining -= len;
    }
    false
}

fn remove_char_from_text(text: &mut String, offset: usize) -> bool {
    let char_len = text.chars().count();
    if offset >= char_len {
        return false;
    }
    let start = char_to_byte_idx(text, offset);
    let end = char_to_byte_idx(text, offset + 1);
    if start >= end || end > text.len() {
        return false;
    }
    text.drain(start..end);
    true
}
