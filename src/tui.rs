//! # Terminal UI
//!
//! The interactive Pokédex. Which screen opens is decided purely by
//! whether the database file exists:
//!
//! - **Setup screen** (no database yet): spawns `dex pipeline --yes` as a
//!   subprocess and streams its stdout/stderr into a scrolling log, then
//!   reports success or failure. The user restarts the app afterwards.
//! - **Browse screen**: a search input, the roster table, a detail pane,
//!   and an ASCII-art pane. Typing filters the table live (substring on
//!   name, exact on dex number); Enter loads the highlighted entry.
//!
//! Keys: `/` focuses the search field, `Esc` leaves it, Up/Down move the
//! table cursor, Enter selects, `q` (outside the search field) quits.

use crate::{
    backend,
    config::DexConfig,
    record::{DexRecord, RosterEntry, capitalize},
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Position},
    style::{Style, Stylize},
    text::{Line, Text},
    widgets::{Block, Paragraph, Row, Table, TableState, Wrap},
};
use std::{
    env,
    error::Error,
    io::{BufRead, BufReader, Read},
    path::Path,
    process::{Command, Stdio},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::warn;

/// Shown in the detail pane until an entry is selected.
const SELECT_HINT: &str = "Select a Pokémon and press Enter.";

/// Shown when a lookup fails on both the database and the dex file.
const DB_ERROR_MESSAGE: &str =
    "Database error. Run 'dex db rebuild' to create or rebuild the database.";

/// Run the TUI until the user quits.
///
/// # Errors
/// Returns an error when the terminal cannot be set up or the setup
/// subprocess cannot be spawned.
pub fn run(config: &DexConfig) -> Result<(), Box<dyn Error>> {
    let screen = if Path::new(&config.database_url).exists() {
        Screen::Browse(BrowseState::new(config))
    } else {
        Screen::Setup(SetupState::spawn()?)
    };

    let app = DexApp {
        config: config.clone(),
        screen,
        should_quit: false,
    };

    let mut terminal = ratatui::init();
    let result = app.main_loop(&mut terminal);
    ratatui::restore();
    result
}

enum Screen {
    Setup(SetupState),
    Browse(BrowseState),
}

struct DexApp {
    config: DexConfig,
    screen: Screen,
    should_quit: bool,
}

impl DexApp {
    fn main_loop(mut self, terminal: &mut DefaultTerminal) -> Result<(), Box<dyn Error>> {
        while !self.should_quit {
            if let Screen::Setup(setup) = &mut self.screen {
                setup.drain_events();
            }
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            Screen::Setup(setup) => render_setup(frame, setup),
            Screen::Browse(browse) => render_browse(frame, browse),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match &mut self.screen {
            Screen::Setup(_) => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            Screen::Browse(browse) => {
                if browse.search_active {
                    match key.code {
                        KeyCode::Esc => browse.search_active = false,
                        KeyCode::Enter => {
                            if !browse.filtered.is_empty() {
                                browse.table.select(Some(0));
                                browse.load_selected(&self.config);
                            }
                            browse.search_active = false;
                        }
                        KeyCode::Backspace => {
                            browse.search.pop();
                            browse.refilter();
                        }
                        KeyCode::Char(c) => {
                            browse.search.push(c);
                            browse.refilter();
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('/') => browse.search_active = true,
                        KeyCode::Up => browse.move_selection(-1),
                        KeyCode::Down => browse.move_selection(1),
                        KeyCode::Enter => browse.load_selected(&self.config),
                        _ => {}
                    }
                }
            }
        }
    }
}

// --- Setup screen -----------------------------------------------------------

enum SetupEvent {
    Line(String),
    Finished(Option<i32>),
}

struct SetupState {
    lines: Vec<String>,
    events: Receiver<SetupEvent>,
}

impl SetupState {
    /// Spawn the pipeline subprocess and the threads that stream its
    /// output into the log.
    fn spawn() -> Result<Self, Box<dyn Error>> {
        let exe = env::current_exe()?;
        let mut child = Command::new(&exe)
            .args(["pipeline", "--yes"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (tx, rx) = mpsc::channel();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let out_handle = stdout.map(|out| {
            let tx = tx.clone();
            thread::spawn(move || forward_lines(out, tx))
        });
        let err_handle = stderr.map(|err| {
            let tx = tx.clone();
            thread::spawn(move || forward_lines(err, tx))
        });

        // Readers hit EOF when the child exits; join them first so the
        // Finished event always arrives after the last output line.
        thread::spawn(move || {
            if let Some(handle) = out_handle {
                let _ = handle.join();
            }
            if let Some(handle) = err_handle {
                let _ = handle.join();
            }
            let code = child.wait().ok().and_then(|status| status.code());
            let _ = tx.send(SetupEvent::Finished(code));
        });

        Ok(Self {
            lines: vec![
                "Welcome to the Pokédex!".to_string(),
                "The local database was not found.".to_string(),
                "Starting automatic setup... (this takes a little while, we're not frozen)"
                    .to_string(),
                "-".repeat(30),
            ],
            events: rx,
        })
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SetupEvent::Line(line) => self.lines.push(line),
                SetupEvent::Finished(code) => {
                    self.lines.push("-".repeat(30));
                    if code == Some(0) {
                        self.lines.push("Setup complete!".to_string());
                        self.lines
                            .push("Restart the application to open the dex.".to_string());
                    } else {
                        let code = code.map_or_else(|| "unknown".to_string(), |c| c.to_string());
                        self.lines.push(format!("Setup failed with exit code: {code}"));
                        self.lines.push("Please check the errors above.".to_string());
                    }
                    self.lines.push("You can now exit with 'q'.".to_string());
                }
            }
        }
    }
}

fn forward_lines(reader: impl Read, tx: Sender<SetupEvent>) {
    for line in BufReader::new(reader).lines().map_while(Result::ok) {
        if tx.send(SetupEvent::Line(line)).is_err() {
            break;
        }
    }
}

fn render_setup(frame: &mut Frame, setup: &SetupState) {
    let area = frame.area();
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = setup.lines.len().saturating_sub(visible) as u16;

    let text: Vec<Line> = setup.lines.iter().map(|line| Line::from(line.as_str())).collect();
    let log = Paragraph::new(text)
        .block(Block::bordered().title(" Pokédex Setup "))
        .scroll((scroll, 0));
    frame.render_widget(log, area);
}

// --- Browse screen ----------------------------------------------------------

struct BrowseState {
    roster: Vec<RosterEntry>,
    filtered: Vec<RosterEntry>,
    table: TableState,
    search: String,
    search_active: bool,
    entry: Option<DexRecord>,
    status: String,
}

impl BrowseState {
    fn new(config: &DexConfig) -> Self {
        let roster = backend::all_entries(config);
        let mut table = TableState::default();
        if !roster.is_empty() {
            table.select(Some(0));
        }
        Self {
            filtered: roster.clone(),
            roster,
            table,
            search: String::new(),
            search_active: true,
            entry: None,
            status: SELECT_HINT.to_string(),
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter_roster(&self.roster, &self.search);
        self.table.select(if self.filtered.is_empty() {
            None
        } else {
            Some(0)
        });
    }

    fn move_selection(&mut self, delta: i32) {
        if self.filtered.is_empty() {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as i32;
        let last = self.filtered.len() as i32 - 1;
        self.table.select(Some((current + delta).clamp(0, last) as usize));
    }

    fn load_selected(&mut self, config: &DexConfig) {
        let Some(index) = self.table.selected() else {
            return;
        };
        let Some(selected) = self.filtered.get(index) else {
            return;
        };

        match backend::find_entry(config, &selected.id.to_string()) {
            Ok(Some(record)) => self.entry = Some(record),
            Ok(None) => {
                self.entry = None;
                self.status = format!("Entry '{}' not found.", selected.id);
            }
            Err(err) => {
                warn!("Entry lookup failed: {}", err);
                self.entry = None;
                self.status = DB_ERROR_MESSAGE.to_string();
            }
        }
    }
}

/// Filter the roster by the search term: substring on the lowercased name,
/// or exact match on the dex number. An empty term matches everything.
fn filter_roster(roster: &[RosterEntry], term: &str) -> Vec<RosterEntry> {
    let term = term.trim().to_lowercase();
    roster
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&term) || entry.id.to_string() == term)
        .cloned()
        .collect()
}

fn render_browse(frame: &mut Frame, browse: &mut BrowseState) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(frame.area());

    let search_title = if browse.search_active {
        " Search (Enter to select, Esc for table) "
    } else {
        " Search (press / to focus) "
    };
    let search_line = if browse.search.is_empty() && !browse.search_active {
        Line::from("Search by name or ID...".dim())
    } else {
        Line::from(browse.search.as_str())
    };
    frame.render_widget(
        Paragraph::new(search_line).block(Block::bordered().title(search_title)),
        chunks[0],
    );
    if browse.search_active {
        frame.set_cursor_position(Position::new(
            chunks[0].x + 1 + browse.search.len() as u16,
            chunks[0].y + 1,
        ));
    }

    let body = Layout::horizontal([
        Constraint::Percentage(32),
        Constraint::Percentage(40),
        Constraint::Percentage(28),
    ])
    .split(chunks[1]);

    let detail: Text = match &browse.entry {
        Some(record) => Text::from(entry_lines(record)),
        None => Text::from(browse.status.as_str()),
    };
    frame.render_widget(
        Paragraph::new(detail)
            .block(Block::bordered().title(" Dex Entry "))
            .wrap(Wrap { trim: false }),
        body[0],
    );

    let art = browse
        .entry
        .as_ref()
        .map(|record| record.ascii_art.clone())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(art).block(Block::bordered().title(" Art ")),
        body[1],
    );

    let rows = browse
        .filtered
        .iter()
        .map(|entry| Row::new(vec![entry.id.to_string(), capitalize(&entry.name)]));
    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(10)])
        .header(Row::new(vec!["ID", "Name"]).style(Style::new().bold()))
        .block(Block::bordered().title(format!(" Pokémon ({}) ", browse.filtered.len())))
        .row_highlight_style(Style::new().reversed())
        .highlight_symbol("> ");
    frame.render_stateful_widget(table, body[2], &mut browse.table);
}

/// The detail pane contents for one entry.
fn entry_lines(record: &DexRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("{} (#{})", record.display_name(), record.id).bold()),
        Line::from(""),
        Line::from(format!("Types: {}", record.types.join(", "))),
        Line::from(format!("Abilities: {}", record.abilities.join(", "))),
        Line::from(format!("Height: {:.1} m", record.height_m())),
        Line::from(format!("Weight: {:.1} kg", record.weight_kg())),
        Line::from(""),
        Line::from("Stats:".bold()),
    ];
    for (label, value) in record.stats.named() {
        lines.push(Line::from(format!("- {label}: {value}")));
    }
    if !record.flavor_text.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("Dex Entry:".bold()));
        lines.push(Line::from(record.flavor_text.clone()));
    }
    lines
}
