use std::ops::Range;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use tdoc::{InlineStyle, Span as DocSpan};

use crate::caret::CaretPosition;
use crate::engine::EditingEngine;
use crate::host::BlockHost;
use crate::model::{ChecklistItem, ItemId};
use crate::theme::Theme;

/// Columns taken by the checkbox glyph and the gap after it.
pub const CHECKBOX_WIDTH: u16 = 4;
const CHECKBOX_GLYPH_WIDTH: u16 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

/// Screen area of one checkbox, for pointer hit-testing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckboxHit {
    pub line: usize,
    pub columns: Range<u16>,
    pub item: ItemId,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub checkboxes: Vec<CheckboxHit>,
}

impl RenderResult {
    pub fn checkbox_at(&self, line: usize, column: u16) -> Option<ItemId> {
        self.checkboxes
            .iter()
            .find(|hit| hit.line == line && hit.columns.contains(&column))
            .map(|hit| hit.item)
    }

    /// Item whose region covers `line`.
    pub fn item_at_line(&self, line: usize) -> Option<ItemId> {
        if line >= self.lines.len() {
            return None;
        }
        self.checkboxes
            .iter()
            .take_while(|hit| hit.line <= line)
            .last()
            .map(|hit| hit.item)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderOptions<'a> {
    pub caret: Option<CaretPosition>,
    pub hovered: Option<ItemId>,
    pub placeholder: Option<&'a str>,
}

pub fn render_checklist<H: BlockHost>(
    engine: &EditingEngine<H>,
    theme: &Theme,
    options: &RenderOptions<'_>,
) -> RenderResult {
    let mut renderer = Renderer::new(theme, options);
    for item in engine.model().items() {
        let hovered = options.hovered == Some(item.id()) && !engine.hover_suppressed(item.id());
        renderer.render_item(item, hovered);
    }
    renderer.finish()
}

struct Renderer<'a> {
    theme: &'a Theme,
    options: &'a RenderOptions<'a>,
    lines: Vec<Line<'static>>,
    cursor: Option<CursorVisualPosition>,
    checkboxes: Vec<CheckboxHit>,
}

impl<'a> Renderer<'a> {
    fn new(theme: &'a Theme, options: &'a RenderOptions<'a>) -> Self {
        Self {
            theme,
            options,
            lines: Vec::new(),
            cursor: None,
            checkboxes: Vec::new(),
        }
    }

    fn render_item(&mut self, item: &ChecklistItem, hovered: bool) {
        let inset = u16::try_from(item.inset_em()).unwrap_or(u16::MAX / 2);
        let text_start = inset.saturating_add(CHECKBOX_WIDTH);
        let first_line = self.lines.len();
        self.checkboxes.push(CheckboxHit {
            line: first_line,
            columns: inset..inset.saturating_add(CHECKBOX_GLYPH_WIDTH),
            item: item.id(),
        });

        let glyph = if item.checked { "[x]" } else { "[ ]" };
        let mut current = vec![
            Span::raw(" ".repeat(usize::from(inset))),
            Span::styled(glyph, self.theme.checkbox_style(item.checked, hovered)),
            Span::raw(" "),
        ];

        let caret_offset = self
            .options
            .caret
            .filter(|caret| caret.item == item.id())
            .map(|caret| item.content.clamp_offset(caret.offset));
        if caret_offset == Some(0) {
            self.cursor = Some(CursorVisualPosition {
                line: first_line,
                column: text_start,
            });
        }

        if item.content.is_empty() {
            if let Some(placeholder) = self.options.placeholder {
                current.push(Span::styled(
                    placeholder.to_string(),
                    self.theme.placeholder_style(),
                ));
            }
            self.lines.push(Line::from(current));
            return;
        }

        let base = if item.checked {
            self.theme.checked_text_style()
        } else {
            Style::default()
        };
        let mut runs = Vec::new();
        for span in item.content.spans() {
            collect_runs(span, base, self.theme, &mut runs);
        }

        let mut column = text_start;
        let mut offset = 0;
        for (text, style) in runs {
            let mut buffer = String::new();
            for ch in text.chars() {
                if ch == '\n' {
                    flush_run(&mut current, &mut buffer, style);
                    self.lines.push(Line::from(std::mem::take(&mut current)));
                    current.push(Span::raw(" ".repeat(usize::from(text_start))));
                    column = text_start;
                } else {
                    buffer.push(ch);
                    column = column.saturating_add(char_width(ch));
                }
                offset += 1;
                if caret_offset == Some(offset) {
                    self.cursor = Some(CursorVisualPosition {
                        line: self.lines.len(),
                        column,
                    });
                }
            }
            flush_run(&mut current, &mut buffer, style);
        }
        self.lines.push(Line::from(current));
    }

    fn finish(self) -> RenderResult {
        RenderResult {
            lines: self.lines,
            cursor: self.cursor,
            checkboxes: self.checkboxes,
        }
    }
}

fn flush_run(line: &mut Vec<Span<'static>>, buffer: &mut String, style: Style) {
    if buffer.is_empty() {
        return;
    }
    line.push(Span::styled(std::mem::take(buffer), style));
}

fn char_width(ch: char) -> u16 {
    ch.width().and_then(|width| u16::try_from(width).ok()).unwrap_or(0)
}

fn collect_runs(span: &DocSpan, base: Style, theme: &Theme, runs: &mut Vec<(String, Style)>) {
    let style = merge_style(base, span.style, theme);
    if !span.text.is_empty() {
        runs.push((span.text.clone(), style));
    }
    for child in &span.children {
        collect_runs(child, style, theme, runs);
    }
}

fn merge_style(base: Style, inline: InlineStyle, theme: &Theme) -> Style {
    match inline {
        InlineStyle::None => base,
        InlineStyle::Bold => base.add_modifier(Modifier::BOLD),
        InlineStyle::Italic => base.add_modifier(Modifier::ITALIC),
        InlineStyle::Highlight => base.patch(theme.highlight_style()),
        InlineStyle::Underline => base.add_modifier(Modifier::UNDERLINED),
        InlineStyle::Strike => base.add_modifier(Modifier::CROSSED_OUT),
        InlineStyle::Link => base.patch(theme.link_style()),
        InlineStyle::Code => base.add_modifier(Modifier::DIM),
    }
}
