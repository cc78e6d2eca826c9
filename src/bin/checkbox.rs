use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use tracing::Level;

use checkbox_block::{
    BlockHost, CaretPlacement, CaretPosition, ChecklistModel, ClickTarget, Command, EditingEngine,
    ItemId, ToolConfig, ToolMetadata,
    caret,
    render::{RenderOptions, RenderResult, render_checklist},
    serial,
    theme::Theme,
};

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

fn main() -> Result<()> {
    run()
}

struct Options {
    path: PathBuf,
    config: ToolConfig,
}

fn parse_args() -> Result<Option<Options>> {
    let mut path = None;
    let mut config = ToolConfig::default();
    let mut read_only = false;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--read-only" => read_only = true,
            "--config" => {
                let Some(config_path) = args.next() else {
                    bail!("--config needs a file argument");
                };
                let source = fs::read_to_string(&config_path)
                    .with_context(|| format!("failed to read {config_path}"))?;
                config = ToolConfig::from_json(&source)
                    .with_context(|| format!("invalid config {config_path}"))?;
            }
            other => path = Some(PathBuf::from(other)),
        }
    }
    if read_only {
        config.read_only = true;
    }
    Ok(path.map(|path| Options { path, config }))
}

fn init_logging() -> Result<()> {
    let Ok(log_path) = env::var("CHECKBOX_LOG") else {
        return Ok(());
    };
    let file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {log_path}"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let Some(options) = parse_args()? else {
        eprintln!("Usage: cargo run -- <checklist.json> [--read-only] [--config <config.json>]");
        return Ok(());
    };
    init_logging()?;

    let (model, initial_status) = load_checklist(&options.path)?;
    let mut app = App::new(model, options, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to initialize terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

fn load_checklist(path: &Path) -> Result<(ChecklistModel, Option<String>)> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match serial::from_json(&content) {
            Ok(model) => Ok((model, None)),
            Err(err) => {
                let message = format!("{err}. Starting with empty checklist.");
                Ok((ChecklistModel::new(), Some(message)))
            }
        }
    } else {
        Ok((ChecklistModel::new(), Some("New checklist".to_string())))
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit() {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
            needs_redraw = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.has_status_message();
            app.on_tick();
            last_tick = Instant::now();
            if had_message_before && !app.has_status_message() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

/// The document around the checklist: the checklist is block 0 and any
/// paragraphs created by leaving it follow as plain text blocks.
struct TerminalHost {
    paragraphs: Vec<String>,
    focused_block: usize,
}

impl TerminalHost {
    const CHECKLIST_BLOCK: usize = 0;

    fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            focused_block: Self::CHECKLIST_BLOCK,
        }
    }

    fn focused_paragraph_mut(&mut self) -> Option<&mut String> {
        let index = self.focused_block.checked_sub(Self::CHECKLIST_BLOCK + 1)?;
        self.paragraphs.get_mut(index)
    }
}

impl BlockHost for TerminalHost {
    fn current_block_index(&self) -> usize {
        Self::CHECKLIST_BLOCK
    }

    fn insert_block_after(&mut self, index: usize) {
        // Paragraph `i` is block `CHECKLIST_BLOCK + 1 + i`.
        let position = index
            .saturating_sub(Self::CHECKLIST_BLOCK)
            .min(self.paragraphs.len());
        self.paragraphs.insert(position, String::new());
    }

    fn set_focus_to_block(&mut self, index: usize) {
        self.focused_block = index;
    }

    fn block_style_class_name(&self) -> &str {
        "checklist"
    }
}

struct App {
    engine: EditingEngine<TerminalHost>,
    metadata: ToolMetadata,
    caret: Option<CaretPosition>,
    file_path: PathBuf,
    theme: Theme,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
    dirty: bool,
    hovered: Option<ItemId>,
    text_area: Rect,
    last_render: Option<RenderResult>,
}

impl App {
    fn new(model: ChecklistModel, options: Options, initial_status: Option<String>) -> Self {
        let caret = model
            .first_id()
            .map(|item| CaretPosition::new(item, 0));
        Self {
            engine: EditingEngine::new(model, TerminalHost::new(), options.config),
            metadata: ToolMetadata::default(),
            caret,
            file_path: options.path,
            theme: Theme::new(),
            status_message: initial_status.map(|msg| (msg, Instant::now())),
            should_quit: false,
            dirty: false,
            hovered: None,
            text_area: Rect::default(),
            last_render: None,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn has_status_message(&self) -> bool {
        self.status_message.is_some()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn in_checklist(&self) -> bool {
        self.engine.host().focused_block == TerminalHost::CHECKLIST_BLOCK
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let text_area = vertical[0];
        let status_area = vertical[1];
        self.text_area = text_area;

        let options = RenderOptions {
            caret: if self.in_checklist() { self.caret } else { None },
            hovered: self.hovered,
            placeholder: self.engine.config().placeholder.as_deref(),
        };
        let render = render_checklist(&self.engine, &self.theme, &options);

        let mut lines = render.lines.clone();
        let checklist_lines = lines.len();
        for paragraph in &self.engine.host().paragraphs {
            lines.push(Line::from(Span::styled(
                paragraph.clone(),
                self.theme.trailing_block_style(),
            )));
        }

        let paragraph = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::NONE));
        frame.render_widget(paragraph, text_area);

        let cursor = if self.in_checklist() {
            render.cursor.map(|cursor| (cursor.line, cursor.column))
        } else {
            let index = self.engine.host().focused_block - TerminalHost::CHECKLIST_BLOCK - 1;
            self.engine.host().paragraphs.get(index).map(|paragraph| {
                let column = unicode_width::UnicodeWidthStr::width(paragraph.as_str());
                (
                    checklist_lines + index,
                    u16::try_from(column).unwrap_or(u16::MAX),
                )
            })
        };
        if let Some((line, column)) = cursor
            && line < usize::from(text_area.height)
        {
            let cursor_y = text_area.y + line as u16;
            let cursor_x = text_area.x + column.min(text_area.width - 1);
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }

        let status_widget = Paragraph::new(self.status_line())
            .block(Block::default().borders(Borders::NONE))
            .style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);

        self.last_render = Some(render);
    }

    fn status_line(&mut self) -> Line<'static> {
        self.prune_status_message();
        if let Some((message, _)) = &self.status_message {
            return Line::from(Span::raw(message.clone()));
        }

        let marker = if self.dirty { "*" } else { "" };
        let mode = if self.engine.is_read_only() {
            " [read-only]"
        } else {
            ""
        };
        let counts = self
            .engine
            .model()
            .items()
            .iter()
            .fold((0, 0), |(done, total), item| {
                (done + usize::from(item.checked), total + 1)
            });
        Line::from(vec![
            Span::styled(
                format!("{}{}", self.file_path.display(), marker),
                self.theme.filename_style(),
            ),
            Span::raw(format!(
                " {}{mode} {}/{} done  ^S:Save ^E:Export ^Q:Quit",
                self.metadata.title, counts.0, counts.1
            )),
        ])
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse) => {
                self.handle_mouse_event(mouse);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return Ok(());
            }
            (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
                return self.save();
            }
            (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                let exported = (self.metadata.conversion.export)(self.engine.model());
                self.set_status(format!("Plain text: {exported}"));
                return Ok(());
            }
            _ => {}
        }

        if self.in_checklist() {
            self.handle_checklist_key(code, modifiers);
        } else {
            self.handle_paragraph_key(code);
        }
        Ok(())
    }

    fn handle_checklist_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => {
                self.run_command(Command::Enter);
            }
            KeyCode::Backspace => {
                let handled = self.run_command(Command::Backspace);
                if !handled
                    && let Some(caret) = self.caret
                    && let Some(next) = self.engine.delete_backward(caret)
                {
                    self.caret = Some(next);
                    self.dirty = true;
                }
            }
            KeyCode::Tab => {
                self.run_command(Command::Indent);
            }
            KeyCode::BackTab => {
                self.run_command(Command::Outdent);
            }
            KeyCode::Char(' ') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(caret) = self.caret {
                    self.run_command(Command::ToggleCheckbox {
                        item: caret.item,
                        target: ClickTarget::Checkbox,
                    });
                }
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(caret) = self.caret
                    && let Some(next) = self.engine.insert_text(caret, &ch.to_string())
                {
                    self.caret = Some(next);
                    self.dirty = true;
                }
            }
            KeyCode::Left => self.move_caret_horizontal(false),
            KeyCode::Right => self.move_caret_horizontal(true),
            KeyCode::Home => {
                if let Some(caret) = self.caret {
                    self.place_caret(CaretPlacement::Start(caret.item));
                }
            }
            KeyCode::End => {
                if let Some(caret) = self.caret {
                    self.place_caret(CaretPlacement::End(caret.item));
                }
            }
            KeyCode::Up => self.move_caret_vertical(false),
            KeyCode::Down => self.move_caret_vertical(true),
            _ => {}
        }
    }

    fn handle_paragraph_key(&mut self, code: KeyCode) {
        let host = self.engine.host_mut();
        match code {
            KeyCode::Char(ch) => {
                if let Some(paragraph) = host.focused_paragraph_mut() {
                    paragraph.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(paragraph) = host.focused_paragraph_mut() {
                    paragraph.pop();
                }
            }
            KeyCode::Enter => {
                let index = host.focused_block;
                host.insert_block_after(index);
                host.set_focus_to_block(index + 1);
            }
            KeyCode::Up => {
                let previous = host.focused_block.saturating_sub(1);
                host.set_focus_to_block(previous);
                if previous == TerminalHost::CHECKLIST_BLOCK {
                    if let Some(last) = self.engine.model().last_id() {
                        self.place_caret(CaretPlacement::End(last));
                    }
                }
            }
            KeyCode::Down => {
                if host.focused_block < host.paragraphs.len() {
                    let next = host.focused_block + 1;
                    host.set_focus_to_block(next);
                }
            }
            _ => {}
        }
    }

    /// Runs a command against the current caret; returns whether the engine consumed it.
    fn run_command(&mut self, command: Command) -> bool {
        let outcome = self.engine.dispatch(command, self.caret);
        if outcome.changed {
            self.dirty = true;
        }
        self.place_caret(outcome.caret);
        outcome.handled
    }

    fn place_caret(&mut self, placement: CaretPlacement) {
        self.caret = placement.resolve(self.engine.model(), self.caret);
        if self.caret.is_none() && self.in_checklist() {
            self.caret = self
                .engine
                .model()
                .first_id()
                .map(|item| CaretPosition::new(item, 0));
        }
    }

    fn move_caret_horizontal(&mut self, forward: bool) {
        let Some(caret) = self.caret else {
            return;
        };
        let model = self.engine.model();
        let Some(item) = model.get(caret.item) else {
            return;
        };
        let placement = if forward {
            if caret.offset < item.content.char_len() {
                CaretPlacement::At(CaretPosition::new(caret.item, caret.offset + 1))
            } else {
                match model.next(caret.item) {
                    Some(next) => CaretPlacement::Start(next),
                    None => CaretPlacement::Keep,
                }
            }
        } else if caret.offset > 0 {
            CaretPlacement::At(CaretPosition::new(caret.item, caret.offset - 1))
        } else {
            match model.previous(caret.item) {
                Some(previous) => CaretPlacement::End(previous),
                None => CaretPlacement::Keep,
            }
        };
        self.place_caret(placement);
    }

    fn move_caret_vertical(&mut self, down: bool) {
        let Some(caret) = self.caret else {
            return;
        };
        let model = self.engine.model();
        let target = if down {
            model.next(caret.item)
        } else {
            model.previous(caret.item)
        };
        match target {
            Some(item) => self.place_caret(CaretPlacement::At(CaretPosition::new(item, caret.offset))),
            None if down && !self.engine.host().paragraphs.is_empty() => {
                self.engine
                    .host_mut()
                    .set_focus_to_block(TerminalHost::CHECKLIST_BLOCK + 1);
            }
            None => {}
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        let Some(line) = usize::from(event.row).checked_sub(usize::from(self.text_area.y)) else {
            return;
        };
        let column = event.column.saturating_sub(self.text_area.x);
        let (checkbox, item_on_line) = match &self.last_render {
            Some(render) => (render.checkbox_at(line, column), render.item_at_line(line)),
            None => (None, None),
        };

        match event.kind {
            MouseEventKind::Moved => {
                if self.hovered != checkbox {
                    if let Some(previous) = self.hovered {
                        self.engine.dispatch(Command::PointerLeave { item: previous }, None);
                    }
                    self.hovered = checkbox;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(item) = item_on_line else {
                    return;
                };
                self.engine.host_mut().set_focus_to_block(TerminalHost::CHECKLIST_BLOCK);
                let target = if checkbox == Some(item) {
                    ClickTarget::Checkbox
                } else {
                    ClickTarget::Text
                };
                let outcome = self
                    .engine
                    .dispatch(Command::ToggleCheckbox { item, target }, None);
                if outcome.changed {
                    self.dirty = true;
                }
                if target == ClickTarget::Text {
                    self.place_caret(caret::move_caret_to_end(item));
                }
            }
            _ => {}
        }
    }

    fn save(&mut self) -> Result<()> {
        let data = self.engine.save();
        if !serial::validate(&data) {
            self.set_status("Checklist is empty, nothing saved");
            return Ok(());
        }
        let contents = serial::to_json(&data).context("failed to serialize checklist")?;
        fs::write(&self.file_path, contents)
            .with_context(|| format!("failed to write {}", self.file_path.display()))?;

        self.dirty = false;
        self.set_status(format!("Saved {} items", data.items.len()));
        Ok(())
    }
}
