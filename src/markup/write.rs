use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};
use tdoc::{InlineStyle, Span};

/// Writes spans back out as inline markup.
///
/// The output is canonical: one tag name per style, `<br>` for line breaks
/// and a fixed set of escapes, so parsing and writing it again is a no-op.
pub fn write_markup(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        write_span(span, &mut out);
    }
    out
}

fn write_span(span: &Span, out: &mut String) {
    let tag = tag_for_style(span.style);
    if let Some(tag) = tag {
        out.push('<');
        out.push_str(tag);
        if span.style == InlineStyle::Link {
            if let Some(target) = span.link_target.as_deref() {
                out.push_str(" href=\"");
                encode_double_quoted_attribute_to_string(target, out);
                out.push('"');
            }
        }
        out.push('>');
    }
    write_text(&span.text, out);
    for child in &span.children {
        write_span(child, out);
    }
    if let Some(tag) = tag {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn tag_for_style(style: InlineStyle) -> Option<&'static str> {
    match style {
        InlineStyle::None => None,
        InlineStyle::Bold => Some("b"),
        InlineStyle::Italic => Some("i"),
        InlineStyle::Underline => Some("u"),
        InlineStyle::Strike => Some("s"),
        InlineStyle::Highlight => Some("mark"),
        InlineStyle::Code => Some("code"),
        InlineStyle::Link => Some("a"),
    }
}

/// Escapes a text run; line breaks become `<br>`.
fn write_text(text: &str, out: &mut String) {
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push_str("<br>");
        }
        encode_text_to_string(line, out);
    }
}
