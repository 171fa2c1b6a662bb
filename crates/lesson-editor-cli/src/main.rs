use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lesson_editor_config::Config;
use lesson_editor_engine::{
    BlockVariant, CommitOutcome, ContentInput, Key, KeyInput, KeyOutcome, LessonSession,
    PendingEdit,
    clock::{SharedClock, system_clock},
    commands::categorize,
    host::{self, JsonLinesChannel, NullChannel},
    io,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    sync::Mutex,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct App {
    session: LessonSession,
    clock: SharedClock,
    sections: Vec<String>,
    section_state: ListState,
    input: ContentInput,
    lesson_path: PathBuf,
    export_path: PathBuf,
    status: String,
}

impl App {
    fn new(
        session: LessonSession,
        clock: SharedClock,
        lesson_path: PathBuf,
        export_path: PathBuf,
    ) -> Self {
        let sections = session.sections();
        let mut app = Self {
            session,
            input: ContentInput::new("", clock.clone()),
            clock,
            sections,
            section_state: ListState::default(),
            lesson_path,
            export_path,
            status: String::new(),
        };

        // Select first section if available
        if !app.sections.is_empty() {
            app.section_state.select(Some(0));
        }
        app.load_input();
        app
    }

    fn selected_section(&self) -> Option<&str> {
        self.section_state
            .selected()
            .and_then(|i| self.sections.get(i))
            .map(String::as_str)
    }

    /// Sections with nested blocks are shown but not bound to the region.
    fn selected_is_editable(&self) -> bool {
        self.selected_section()
            .is_some_and(|id| self.session.is_inline_section(id))
    }

    /// Rebinds the input region to the selected section's current content.
    fn load_input(&mut self) {
        let id = self.selected_section().unwrap_or_default().to_string();
        let text = if self.selected_is_editable() {
            self.session.section_text(&id).unwrap_or_default()
        } else {
            String::new()
        };
        self.input = ContentInput::new(id, self.clock.clone());
        self.input.set_text(&text);
        if self.input.is_menu_open() {
            self.input.handle_key(KeyInput::plain(Key::Escape));
        }
    }

    fn refresh_sections(&mut self, select: Option<&str>) {
        self.sections = self.session.sections();
        let index = select
            .and_then(|id| self.sections.iter().position(|s| s == id))
            .or_else(|| self.section_state.selected())
            .map(|i| i.min(self.sections.len().saturating_sub(1)));
        self.section_state
            .select(index.filter(|_| !self.sections.is_empty()));
        self.load_input();
    }

    fn next_section(&mut self) {
        if self.sections.is_empty() {
            return;
        }
        let i = match self.section_state.selected() {
            Some(i) => (i + 1) % self.sections.len(),
            None => 0,
        };
        self.section_state.select(Some(i));
        self.load_input();
    }

    fn previous_section(&mut self) {
        if self.sections.is_empty() {
            return;
        }
        let i = match self.section_state.selected() {
            Some(0) | None => self.sections.len() - 1,
            Some(i) => i - 1,
        };
        self.section_state.select(Some(i));
        self.load_input();
    }

    fn region_key(&mut self, input: KeyInput) -> KeyOutcome {
        let outcome = self.input.handle_key(input);
        if let KeyOutcome::Committed(event) = &outcome {
            let outcome = self.session.apply_commit(event);
            self.status = match outcome {
                CommitOutcome::Recorded => format!("Saved {}", event.region_id),
                CommitOutcome::Unchanged => "No changes".to_string(),
                CommitOutcome::EditingDisabled => "Editing is off (Ctrl-E)".to_string(),
                CommitOutcome::UnknownRegion => format!("Unknown section {}", event.region_id),
            };
            let current = self.selected_section().map(str::to_string);
            self.refresh_sections(current.as_deref());
        }
        outcome
    }

    fn add_block(&mut self) {
        let after = self.selected_section().map(str::to_string);
        match self
            .session
            .add_block(after.as_deref(), BlockVariant::Paragraph)
        {
            Some(id) => {
                self.status = format!("Added {id}");
                self.refresh_sections(Some(&id));
            }
            None => self.status = "Editing is off (Ctrl-E)".to_string(),
        }
    }

    fn delete_block(&mut self) {
        let Some(id) = self.selected_section().map(str::to_string) else {
            return;
        };
        if self.session.delete_block(&id) {
            self.status = format!("Deleted {id}");
            self.refresh_sections(None);
        }
    }

    fn move_block(&mut self, offset: isize) {
        let Some(id) = self.selected_section().map(str::to_string) else {
            return;
        };
        if self.session.move_block(&id, offset) {
            self.refresh_sections(Some(&id));
        }
    }

    fn toggle_editing(&mut self) {
        let enabled = !self.session.editing_enabled();
        self.session.set_editing_enabled(enabled);
        self.status = format!("Editing {}", if enabled { "on" } else { "off" });
    }

    fn save_lesson(&mut self) {
        self.status = match io::write_lesson(&self.lesson_path, self.session.document()) {
            Ok(()) => format!("Saved lesson to {}", self.lesson_path.display()),
            Err(e) => {
                warn!(error = %e, "lesson save failed");
                format!("Save failed: {e}")
            }
        };
    }

    fn export(&mut self) {
        self.status = match io::write_edits(&self.export_path, &self.session.ledger().snapshot()) {
            Ok(()) => format!("Exported to {}", self.export_path.display()),
            Err(e) => {
                warn!(error = %e, "export failed");
                format!("Export failed: {e}")
            }
        };
    }

    /// Returns false when the app should quit.
    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Char('e') => self.toggle_editing(),
                KeyCode::Char('l') => {
                    self.session.clear_edits();
                    self.status = "Cleared pending edits".to_string();
                }
                KeyCode::Char('s') => self.export(),
                KeyCode::Char('w') => self.save_lesson(),
                KeyCode::Char('n') => self.add_block(),
                KeyCode::Char('x') => self.delete_block(),
                KeyCode::Char('k') => self.move_block(-1),
                KeyCode::Char('j') => self.move_block(1),
                _ => {}
            }
            return true;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Tab => self.next_section(),
            KeyCode::BackTab => self.previous_section(),
            KeyCode::Up | KeyCode::Down if !self.selected_is_editable() => {
                if key.code == KeyCode::Up {
                    self.previous_section();
                } else {
                    self.next_section();
                }
            }
            _ if !self.selected_is_editable() => {
                self.status = "Section has nested blocks and is read-only".to_string();
            }
            KeyCode::Char(c) => {
                self.input.type_text(c.encode_utf8(&mut [0; 4]));
            }
            KeyCode::Enter => {
                self.region_key(KeyInput { key: Key::Enter, shift });
            }
            KeyCode::Esc => {
                self.region_key(KeyInput::plain(Key::Escape));
            }
            KeyCode::Backspace => {
                self.region_key(KeyInput::plain(Key::Backspace));
            }
            KeyCode::Up => {
                if self.region_key(KeyInput::plain(Key::ArrowUp)) == KeyOutcome::Ignored {
                    self.previous_section();
                }
            }
            KeyCode::Down => {
                if self.region_key(KeyInput::plain(Key::ArrowDown)) == KeyOutcome::Ignored {
                    self.next_section();
                }
            }
            _ => {}
        }
        true
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    // The terminal belongs to the TUI, so logs go to a file
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <lesson.json>", args[0]);
        process::exit(1);
    }
    let lesson_path = PathBuf::from(&args[1]);

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    init_tracing(&config)?;

    let document = match io::read_lesson(&lesson_path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: Lesson '{}' is invalid: {e}", lesson_path.display());
            process::exit(1);
        }
    };
    info!(lesson = %lesson_path.display(), "lesson loaded");

    let clock = system_clock();
    let mut session = LessonSession::new(document, clock.clone());
    session.set_editing_enabled(config.editing_enabled);
    match &config.notifications_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            host::connect(&mut session, JsonLinesChannel::new(file));
        }
        None => host::connect(&mut session, NullChannel),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, clock, lesson_path, config.export_path.clone());

    // Main loop
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
            && !app.on_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Percentage(40),
        ])
        .split(columns[1]);

    // Outline panel
    let outline: Vec<ListItem> = app
        .sections
        .iter()
        .map(|id| {
            let kind = app
                .session
                .section_variant(id)
                .map_or("section", BlockVariant::as_str);
            let preview = app.session.section_text(id).unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{kind}] "), Style::default().fg(Color::DarkGray)),
                Span::raw(preview),
            ]))
        })
        .collect();
    let outline = List::new(outline)
        .block(Block::default().borders(Borders::ALL).title("Lesson"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(outline, columns[0], &mut app.section_state);

    // Input region
    let text = app.input.text();
    let input_line = if text.is_empty() {
        Line::from(Span::styled(
            app.input.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(text)
    };
    let title = match app.input.selected_variant() {
        _ if !app.selected_is_editable() => format!("{} (read-only)", app.input.region_id()),
        Some(variant) => format!("Edit {} ({variant})", app.input.region_id()),
        None => format!("Edit {}", app.input.region_id()),
    };
    f.render_widget(
        Paragraph::new(input_line).block(Block::default().borders(Borders::ALL).title(title)),
        right[0],
    );

    // Slash menu
    let mut menu_lines = Vec::new();
    if let Some(menu) = app.input.menu() {
        let highlighted = menu.highlighted().map(|c| c.id);
        let groups = categorize(menu.matches());
        for (heading, commands) in [("Blocks", groups.block), ("Widgets", groups.inline)] {
            if commands.is_empty() {
                continue;
            }
            menu_lines.push(Line::from(Span::styled(
                heading,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for command in commands {
                let style = if Some(command.id) == highlighted {
                    Style::default().bg(Color::Yellow).fg(Color::Black)
                } else {
                    Style::default()
                };
                menu_lines.push(Line::from(vec![
                    Span::styled(format!("  {}", command.label), style),
                    Span::styled(
                        format!("  {}", command.description),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
        }
        if menu.matches().is_empty() {
            menu_lines.push(Line::from("  No matching commands"));
        }
    }
    let menu_title = format!("/{}", app.input.active_query());
    f.render_widget(
        Paragraph::new(menu_lines).block(Block::default().borders(Borders::ALL).title(menu_title)),
        right[1],
    );

    // Pending edits
    let edits: Vec<ListItem> = app
        .session
        .ledger()
        .edits()
        .iter()
        .map(|edit| ListItem::new(describe_edit(edit)))
        .collect();
    let edits_title = format!("Pending edits ({})", app.session.ledger().len());
    f.render_widget(
        List::new(edits).block(Block::default().borders(Borders::ALL).title(edits_title)),
        right[2],
    );

    // Instructions
    let editing = if app.session.editing_enabled() {
        "editing on"
    } else {
        "editing off"
    };
    let help = vec![
        Line::from(
            "Tab: Next | Enter: Commit | /: Commands | ^N: Add | ^X: Delete | ^K/^J: Move | ^E: Editing | ^L: Clear | ^S: Export | ^W: Save | ^Q: Quit",
        ),
        Line::from(format!("{editing} | {}", app.status)),
    ];
    f.render_widget(Paragraph::new(help), rows[1]);
}

fn describe_edit(edit: &PendingEdit) -> String {
    match edit {
        PendingEdit::Text(e) => format!("text {} @{}: {}", e.section_id, e.element_path, e.new_text),
        PendingEdit::Equation(e) => format!("equation {}: {}", e.section_id, e.new_latex),
        PendingEdit::NumericWidget(e) => format!(
            "widget {} @{}: {}",
            e.section_id, e.element_path, e.new_props.variable_name
        ),
        PendingEdit::Structure(e) => format!(
            "{:?} {}",
            e.action,
            e.section_id
                .clone()
                .or_else(|| e.section_ids.as_ref().map(|ids| ids.join(",")))
                .unwrap_or_default()
        ),
    }
}
