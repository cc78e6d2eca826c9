use html_escape::decode_html_entities;
use tdoc::html::gockl::{Token, Tokenizer};
use tdoc::{InlineStyle, Span};

struct OpenElement {
    tag: String,
    style: Option<InlineStyle>,
    link_target: Option<String>,
    spans: Vec<Span>,
}

impl OpenElement {
    fn root() -> Self {
        Self {
            tag: String::new(),
            style: None,
            link_target: None,
            spans: Vec::new(),
        }
    }

    /// Closes the element into `parent`. Unknown tags are unwrapped.
    fn close_into(self, parent: &mut Vec<Span>) {
        match self.style {
            Some(style) => {
                let mut span = Span::new_text("");
                span.style = style;
                span.link_target = self.link_target;
                span.children = self.spans;
                parent.push(span);
            }
            None => parent.extend(self.spans),
        }
    }
}

/// Parses inline markup into spans. Never fails: stray closing tags are
/// ignored, unclosed tags are closed at the end of input and anything that
/// does not look like a tag is kept as text.
pub fn parse_markup(source: &str) -> Vec<Span> {
    let mut tokenizer = Tokenizer::new(source);
    let mut stack = vec![OpenElement::root()];

    while let Ok(token) = tokenizer.next_token() {
        match token {
            Token::Text(raw) => push_text(&mut stack, &decode_html_entities(&raw)),
            Token::StartElement(start) => {
                let Some(name) = element_name(start.name(), start.raw()) else {
                    push_text(&mut stack, &decode_html_entities(start.raw()));
                    continue;
                };
                if name == "br" {
                    push_text(&mut stack, "\n");
                    continue;
                }
                if is_void_element(&name) {
                    continue;
                }
                let style = style_for_tag(&name);
                let link_target = if style == Some(InlineStyle::Link) {
                    start
                        .attribute("href")
                        .map(|href| decode_html_entities(&href).into_owned())
                } else {
                    None
                };
                stack.push(OpenElement {
                    tag: name,
                    style,
                    link_target,
                    spans: Vec::new(),
                });
            }
            Token::EmptyElement(empty) => match element_name(empty.name(), empty.raw()) {
                Some(name) if name == "br" => push_text(&mut stack, "\n"),
                Some(_) => {}
                None => push_text(&mut stack, &decode_html_entities(empty.raw())),
            },
            Token::EndElement(end) => match element_name(end.name(), end.raw()) {
                Some(name) => close_element(&mut stack, &name),
                None => push_text(&mut stack, &decode_html_entities(end.raw())),
            },
            Token::Comment(_) | Token::CData(_) | Token::Directive(_) | Token::ProcInst(_) => {}
        }
    }

    while stack.len() > 1 {
        let Some(element) = stack.pop() else {
            break;
        };
        if let Some(parent) = stack.last_mut() {
            element.close_into(&mut parent.spans);
        }
    }
    stack.pop().map(|root| root.spans).unwrap_or_default()
}

/// Lowercased tag name, or `None` when the token is not a complete tag.
fn element_name(name: &str, raw: &str) -> Option<String> {
    if !raw.ends_with('>') {
        return None;
    }
    let name = name.split_whitespace().next()?;
    if !name.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Appends text to the innermost open element, extending a trailing plain run.
fn push_text(stack: &mut [OpenElement], text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(top) = stack.last_mut() else {
        return;
    };
    match top.spans.last_mut() {
        Some(last)
            if last.style == InlineStyle::None
                && last.link_target.is_none()
                && last.children.is_empty() =>
        {
            last.text.push_str(text);
        }
        _ => top.spans.push(Span::new_text(text)),
    }
}

fn close_element(stack: &mut Vec<OpenElement>, name: &str) {
    let Some(position) = stack.iter().rposition(|open| open.tag == name) else {
        return;
    };
    if position == 0 {
        return;
    }
    while stack.len() > position {
        let Some(element) = stack.pop() else {
            return;
        };
        if let Some(parent) = stack.last_mut() {
            element.close_into(&mut parent.spans);
        }
    }
}

fn style_for_tag(name: &str) -> Option<InlineStyle> {
    match name {
        "b" | "strong" => Some(InlineStyle::Bold),
        "i" | "em" => Some(InlineStyle::Italic),
        "u" | "ins" => Some(InlineStyle::Underline),
        "s" | "strike" | "del" => Some(InlineStyle::Strike),
        "mark" => Some(InlineStyle::Highlight),
        "code" => Some(InlineStyle::Code),
        "a" => Some(InlineStyle::Link),
        _ => None,
    }
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta" | "source" | "wbr"
    )
}
