mod card_text;

use anyhow::Result;
use crossterm::{
    clipboard::CopyToClipboard,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_cards_config::{CardConfig, Config};
use markdown_cards_engine::{
    CardSettings, Clipboard, ClipboardError, Cmd, EditorSession, FilePrintSurface, FileStorage,
    MarkupKind, Motion, Notification, NotificationLevel, SizeTemplate, StylePreset, io,
    models::card_settings::{DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    ops::Range,
    path::{Path, PathBuf},
    process,
};

/// Rough size of a terminal cell in card pixels
const PX_PER_COL: u32 = 8;
const PX_PER_ROW: u32 = 16;

const LOG_FILE_NAME: &str = "markdown-cards.log";

/// Clipboard reached through the terminal's OSC 52 escape
struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        execute!(stdout(), CopyToClipboard::to_clipboard_from(text))?;
        Ok(())
    }
}

struct App {
    session: EditorSession<FileStorage>,
    export_dir: PathBuf,
    notification: Option<Notification>,
    template: Option<SizeTemplate>,
    scroll: u16,
}

enum Action {
    Continue,
    Quit,
}

impl App {
    fn new(storage_dir: PathBuf, export_dir: PathBuf, settings: CardSettings) -> Self {
        let mut session = EditorSession::open(FileStorage::new(storage_dir), settings);
        let notification = session.take_notification();
        Self {
            session,
            export_dir,
            notification,
            template: None,
            scroll: 0,
        }
    }

    fn edit(&mut self, cmd: Cmd) {
        self.notification = None;
        self.session.apply(cmd);
        self.session.follow_caret();
    }

    fn markup(&mut self, kind: MarkupKind) {
        self.edit(Cmd::InsertMarkup {
            kind,
            placeholder: None,
        });
    }

    fn motion(&mut self, motion: Motion, extend: bool) {
        self.session.move_caret(motion, extend);
        self.session.follow_caret();
    }

    fn vertical(&mut self, lines: isize, extend: bool) {
        let document = self.session.document();
        let target = vertical_target(&document.text(), document.head(), lines);
        let anchor = if extend {
            let selection = document.selection();
            if document.head() == selection.start {
                selection.end
            } else {
                selection.start
            }
        } else {
            target
        };

        // Range start becomes the anchor, so the head lands on `target`
        self.session.document_mut().set_selection(anchor..target);
        self.session.follow_caret();
    }

    fn cycle_template(&mut self) {
        let next = match self.template {
            None => Some(SizeTemplate::ALL[0]),
            Some(current) => SizeTemplate::ALL
                .iter()
                .position(|&t| t == current)
                .and_then(|i| SizeTemplate::ALL.get(i + 1).copied()),
        };
        self.template = next;
        self.session.update_settings(|settings| match next {
            Some(template) => settings.apply_template(template),
            None => settings.set_size(DEFAULT_CARD_WIDTH, DEFAULT_CARD_HEIGHT),
        });
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('q') if ctrl => return Action::Quit,

            KeyCode::Char('y') if ctrl => {
                self.notification = Some(self.session.copy_to_clipboard(&mut TerminalClipboard));
            }
            KeyCode::Char('e') if ctrl => {
                self.notification = Some(self.session.export_html(&self.export_dir));
            }
            KeyCode::Char('p') if ctrl => {
                let mut surface = FilePrintSurface::new(&self.export_dir);
                self.notification = Some(self.session.export_pdf(&mut surface));
            }
            KeyCode::Char('t') if ctrl => {
                self.session
                    .update_settings(|settings| settings.style = settings.style.cycle());
            }
            KeyCode::Char('a') if ctrl => {
                self.session
                    .update_settings(|settings| settings.auto_split = !settings.auto_split);
                self.session.follow_caret();
            }
            KeyCode::F(2) => self.cycle_template(),

            KeyCode::Char(c) if alt && !ctrl => {
                let kind = match c {
                    '1' => MarkupKind::Heading1,
                    '2' => MarkupKind::Heading2,
                    '3' => MarkupKind::Heading3,
                    'b' => MarkupKind::Bold,
                    'i' => MarkupKind::Italic,
                    'u' => MarkupKind::Underline,
                    's' => MarkupKind::Strikethrough,
                    'l' => MarkupKind::BulletItem,
                    'o' => MarkupKind::NumberedItem,
                    'q' => MarkupKind::Blockquote,
                    'k' => MarkupKind::Link,
                    'g' => MarkupKind::Image,
                    'c' => MarkupKind::InlineCode,
                    'C' => MarkupKind::CodeBlock,
                    'h' => MarkupKind::HorizontalRule,
                    '=' | '+' => {
                        self.session.update_settings(CardSettings::zoom_in);
                        return Action::Continue;
                    }
                    '-' => {
                        self.session.update_settings(CardSettings::zoom_out);
                        return Action::Continue;
                    }
                    _ => return Action::Continue,
                };
                self.markup(kind);
            }
            // Ctrl+Alt is AltGr on some layouts
            KeyCode::Char(c) if !ctrl || alt => self.edit(Cmd::ReplaceSelection {
                text: c.to_string(),
            }),
            KeyCode::Enter => self.edit(Cmd::ReplaceSelection {
                text: "\n".to_string(),
            }),
            KeyCode::Tab => self.edit(Cmd::InsertTab),
            KeyCode::Backspace => self.edit(Cmd::Backspace),
            KeyCode::Delete => self.edit(Cmd::DeleteForward),

            KeyCode::Left => self.motion(Motion::Left, shift),
            KeyCode::Right => self.motion(Motion::Right, shift),
            KeyCode::Home if ctrl => self.motion(Motion::DocumentStart, shift),
            KeyCode::End if ctrl => self.motion(Motion::DocumentEnd, shift),
            KeyCode::Home => self.motion(Motion::LineStart, shift),
            KeyCode::End => self.motion(Motion::LineEnd, shift),
            KeyCode::Up => self.vertical(-1, shift),
            KeyCode::Down => self.vertical(1, shift),

            KeyCode::PageUp => self.session.prev_slide(),
            KeyCode::PageDown => self.session.next_slide(),
            _ => {}
        }
        Action::Continue
    }

    /// Keep the caret line inside a viewport of `height` rows
    fn scroll_to_caret(&mut self, height: u16) {
        let document = self.session.document_mut();
        let head = document.take_pending_caret().unwrap_or_else(|| document.head());
        let (line, _) = document.point_of(head);
        let line = u16::try_from(line).unwrap_or(u16::MAX);
        let height = height.max(1);

        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll.saturating_add(height) {
            self.scroll = line - height + 1;
        }
    }
}

/// Offset `lines` lines above or below `head`, keeping the column where the
/// target line is long enough
fn vertical_target(text: &str, head: usize, lines: isize) -> usize {
    let starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let current = starts.partition_point(|&start| start <= head) - 1;
    let column = text[starts[current]..head].chars().count();

    let Some(target) = current
        .checked_add_signed(lines)
        .filter(|&line| line < starts.len())
    else {
        return if lines < 0 { 0 } else { text.len() };
    };

    let start = starts[target];
    let end = starts
        .get(target + 1)
        .map_or(text.len(), |&next| next - 1);
    text[start..end]
        .char_indices()
        .nth(column)
        .map_or(end, |(i, _)| start + i)
}

/// Split one line into plain and selected spans
fn line_spans(line: &str, line_start: usize, selection: &Range<usize>) -> Line<'static> {
    let line_end = line_start + line.len();
    let from = selection.start.clamp(line_start, line_end) - line_start;
    let to = selection.end.clamp(line_start, line_end) - line_start;
    if from == to {
        return Line::from(line.to_string());
    }

    let selected = Style::default().bg(Color::Blue).fg(Color::White);
    Line::from(vec![
        Span::raw(line[..from].to_string()),
        Span::styled(line[from..to].to_string(), selected),
        Span::raw(line[to..].to_string()),
    ])
}

fn style_colors(style: StylePreset) -> (Color, Color) {
    match style {
        StylePreset::AppleNotes => (Color::Black, Color::Rgb(255, 249, 219)),
        StylePreset::PopArt => (Color::Black, Color::Rgb(255, 214, 0)),
        StylePreset::ArtDeco => (Color::Rgb(212, 175, 55), Color::Rgb(26, 26, 26)),
        StylePreset::GlassMorphism => (Color::White, Color::Rgb(90, 110, 150)),
        StylePreset::WarmAndSoft => (Color::Rgb(92, 64, 51), Color::Rgb(255, 228, 214)),
        StylePreset::MinimalGray => (Color::Rgb(40, 40, 40), Color::Rgb(236, 236, 236)),
        StylePreset::DreamyGradient => (Color::White, Color::Rgb(150, 120, 200)),
        StylePreset::FreshNature => (Color::Rgb(30, 70, 40), Color::Rgb(220, 240, 220)),
    }
}

fn card_settings(card: &CardConfig) -> CardSettings {
    let mut settings = CardSettings::default();
    settings.set_size(card.width, card.height);
    settings.set_zoom(card.zoom);
    settings.auto_split = card.auto_split;
    match card.style.parse() {
        Ok(style) => settings.style = style,
        Err(e) => log::warn!("{e}, using {}", settings.style),
    }
    settings
}

/// First run with an explicit storage dir: write a config pointing at it, so
/// later runs need no argument. An existing config file is never replaced.
fn remember_storage_dir(config_path: &Path, storage_dir: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }
    let storage_dir = std::fs::canonicalize(storage_dir)?;
    Config::new(storage_dir).save_to_path(config_path)?;
    Ok(true)
}

/// Log to a file next to the document; the terminal belongs to the editor
fn init_logging(storage_dir: &Path) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(file) = File::create(storage_dir.join(LOG_FILE_NAME)) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> Result<()> {
    // Determine storage dir from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) if args.len() == 2 => {
            eprintln!("Warning: Ignoring config file: {e}");
            None
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} <storage-dir>", args[0]);
            process::exit(1);
        }
    };

    let storage_dir;
    let from_config;

    if args.len() == 2 {
        storage_dir = PathBuf::from(&args[1]);
        from_config = false;
    } else if args.len() == 1 {
        match &config {
            Some(config) => {
                storage_dir = config.storage_dir.clone();
                from_config = true;
            }
            None => {
                eprintln!("Error: No storage dir provided and no config file found");
                eprintln!("Usage: {} <storage-dir>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [storage-dir]", args[0]);
        process::exit(1);
    };

    if let Err(e) = io::validate_storage_dir(&storage_dir) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Storage dir '{}'{} is invalid: {e}",
            storage_dir.display(),
            source
        );
        process::exit(1);
    }

    std::fs::create_dir_all(&storage_dir)?;
    init_logging(&storage_dir);

    if config.is_none() {
        match remember_storage_dir(&config_path, &storage_dir) {
            Ok(true) => log::info!("Wrote config file {}", config_path.display()),
            Ok(false) => {}
            Err(e) => log::warn!("Could not write config file: {e}"),
        }
    }

    let (export_dir, settings) = match &config {
        Some(config) if config.storage_dir == storage_dir => {
            (config.export_dir().to_path_buf(), card_settings(&config.card))
        }
        Some(config) => (
            config
                .export_dir
                .clone()
                .unwrap_or_else(|| storage_dir.clone()),
            card_settings(&config.card),
        ),
        None => (storage_dir.clone(), CardSettings::default()),
    };
    log::info!(
        "Starting editor on {} (exports to {})",
        storage_dir.display(),
        export_dir.display()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(storage_dir, export_dir, settings);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Action::Quit = app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    draw_editor(f, app, panes[0]);
    draw_preview(f, app, panes[1]);

    let status = match &app.notification {
        Some(notification) => {
            let color = match notification.level {
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Info => Color::Cyan,
                NotificationLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                notification.message.clone(),
                Style::default().fg(color),
            ))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(status), rows[1]);

    let help = Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw("PgUp/PgDn: Card | "),
        Span::raw("Alt+1-3/b/i/u/s/l/o/q/k/g/c/C/h: Format | "),
        Span::raw("^Y: Copy | ^E: HTML | ^P: PDF | "),
        Span::raw("^T: Style | Alt+=/-: Zoom | F2: Size | ^A: Auto split"),
    ]);
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.session.is_saving() {
        "Markdown"
    } else {
        "Markdown (not saving)"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    app.scroll_to_caret(inner.height);

    let document = app.session.document();
    let text = document.text();
    let selection = document.selection();

    let mut lines = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        lines.push(line_spans(line, line_start, &selection));
        line_start += line.len() + 1;
    }

    let editor = Paragraph::new(lines).block(block).scroll((app.scroll, 0));
    f.render_widget(editor, area);

    let head = document.head();
    let (line, column) = document.point_of(head);
    let line_text = text.split('\n').nth(line).unwrap_or("");
    let column = line_text[..column.min(line_text.len())].chars().count();
    let x = inner
        .x
        .saturating_add(u16::try_from(column).unwrap_or(u16::MAX));
    let y = inner
        .y
        .saturating_add(u16::try_from(line).unwrap_or(u16::MAX))
        .saturating_sub(app.scroll);
    if x < inner.right() && y < inner.bottom() {
        f.set_cursor_position((x, y));
    }
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let settings = app.session.settings();
    let navigator = app.session.navigator();
    let (current, total) = navigator.position();

    let title = format!(
        "Card {current} / {total} | {} | {}x{} @ {}%",
        settings.style,
        settings.width(),
        settings.height(),
        settings.zoom()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.session.preview().is_loading() {
        f.render_widget(Paragraph::new("Rendering..."), inner);
        return;
    }

    let slide = app.session.current_slide();
    let body = slide
        .map(|slide| card_text::html_to_lines(&slide.html))
        .unwrap_or_default();

    let card = card_rect(settings, inner);
    let (fg, bg) = style_colors(settings.style);
    let mut card_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(fg).bg(bg));
    if let Some(heading) = slide.and_then(|slide| slide.title.as_deref()) {
        card_block = card_block.title(Span::styled(
            heading.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Clear, card);
    f.render_widget(
        Paragraph::new(body)
            .block(card_block)
            .wrap(Wrap { trim: false }),
        card,
    );
}

/// The card's on-screen box, scaled by zoom and centred in `area`
fn card_rect(settings: &CardSettings, area: Rect) -> Rect {
    let scaled = |px: u32, per_cell: u32| {
        let cells = (px as f32 * settings.scale() / per_cell as f32).round() as u32;
        u16::try_from(cells.max(3)).unwrap_or(u16::MAX)
    };
    let width = scaled(settings.width(), PX_PER_COL).min(area.width);
    let height = scaled(settings.height(), PX_PER_ROW).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
