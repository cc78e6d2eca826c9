use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the checklist view
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the editor
    pub background: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Color of an unchecked checkbox
    pub checkbox_color: Color,

    /// Color of a checked checkbox
    pub checkbox_checked_color: Color,

    /// Background of a checkbox under the mouse pointer
    pub checkbox_hover_bg: Color,

    /// Foreground color for the text of checked items
    pub checked_text_fg: Color,

    /// Foreground color for the placeholder of an empty item
    pub placeholder_fg: Color,

    /// Foreground color for highlighted text (InlineStyle::Highlight)
    pub highlight_fg: Color,

    /// Background color for highlighted text (InlineStyle::Highlight)
    pub highlight_bg: Color,

    /// Color for links
    pub link_color: Color,

    /// Foreground color for blocks following the checklist
    pub trailing_block_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            checkbox_color: Color::Gray,
            checkbox_checked_color: Color::Green,
            checkbox_hover_bg: Color::DarkGray,
            checked_text_fg: Color::DarkGray,
            placeholder_fg: Color::DarkGray,
            highlight_fg: Color::Black,
            highlight_bg: Color::LightYellow,
            link_color: Color::Blue,
            trailing_block_fg: Color::Reset,
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn filename_style(&self) -> Style {
        Style::default().fg(self.filename_color)
    }

    /// Style of a checkbox glyph. Hover is dropped right after a toggle.
    pub fn checkbox_style(&self, checked: bool, hovered: bool) -> Style {
        let color = if checked {
            self.checkbox_checked_color
        } else {
            self.checkbox_color
        };
        let style = Style::default().fg(color);
        if hovered {
            style.bg(self.checkbox_hover_bg)
        } else {
            style
        }
    }

    pub fn checked_text_style(&self) -> Style {
        Style::default()
            .fg(self.checked_text_fg)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().fg(self.highlight_fg).bg(self.highlight_bg)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_color)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn trailing_block_style(&self) -> Style {
        Style::default().fg(self.trailing_block_fg)
    }
}
