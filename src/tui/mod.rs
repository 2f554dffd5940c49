// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! The interactive shell (ratatui + crossterm) around the graph engine. One
//! simulation tick runs per frame; all input that arrived since the last
//! frame is drained and applied before the next draw, so a burst of mouse
//! moves never queues up extra frames.

use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph, Wrap},
};

use smol_str::SmolStr;

use crate::engine::{EngineConfig, GraphEngine};
use crate::filter::{ContentPredicate, DateBucket, SizeBucket};
use crate::model::{LinkKind, Note};
use crate::optimize::{OptimizationLevel, PerformanceMode};
use crate::render::{render_graph, Overlay, RenderError, RenderOptions, CELL_ASPECT};
use crate::store::{Preferences, PreferencesFolder, StoreError};
use crate::viewport::Viewport;

mod theme;

use theme::TuiTheme;

const FRAME_BUDGET: Duration = Duration::from_millis(16);
const PAN_STEP: f32 = 6.0;
/// Body length for the "long notes" content filter step.
const LONG_NOTE_MIN_LEN: usize = 400;

/// Runs the interactive viewer over `notes`.
///
/// Preferences (link mode, performance mode) are loaded from `prefs_folder`
/// before the first frame and written back on quit.
pub fn run(
    notes: Vec<Note>,
    prefs_folder: Option<PreferencesFolder>,
) -> Result<(), Box<dyn std::error::Error>> {
    let preferences = match &prefs_folder {
        Some(folder) => folder.load_or_default()?,
        None => Preferences::default(),
    };
    run_with_preferences(notes, preferences, prefs_folder)
}

/// Like [`run`] but with preferences the caller already resolved (CLI
/// flags win over the stored file).
pub fn run_with_preferences(
    notes: Vec<Note>,
    preferences: Preferences,
    prefs_folder: Option<PreferencesFolder>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(notes, preferences, unix_now())?;

    while !app.should_quit {
        let frame_start = Instant::now();
        app.engine.tick();
        terminal.draw(|frame| draw(frame, &mut app))?;

        let timeout = FRAME_BUDGET.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            // Drain everything pending so one frame absorbs a whole burst.
            loop {
                app.handle_event(event::read()?);
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }

    drop(terminal);

    if let Some(folder) = &prefs_folder {
        app.save_preferences(folder)?;
    }

    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    /// Typing a substring filter; applied live on every keystroke.
    Search,
    /// Typing a fuzzy jump-to-note query; applied on Enter.
    Jump,
    /// Typing a tag name; Enter toggles it in the tag filter set.
    Tag,
}

struct App {
    engine: GraphEngine,
    theme: TuiTheme,
    preferences: Preferences,
    should_quit: bool,
    input_mode: InputMode,
    input_buffer: String,
    show_help: bool,
    render_failed: Option<RenderError>,
    toast: Option<String>,
    // Mouse state. Coordinates are canvas-relative screen space.
    canvas: Rect,
    press: Option<(f32, f32)>,
    drag_moved: bool,
}

impl App {
    fn new(notes: Vec<Note>, preferences: Preferences, now: i64) -> Result<Self, theme::ThemeError> {
        let engine = GraphEngine::new(
            notes,
            preferences.render_mode,
            preferences.performance_mode,
            Viewport::new(80.0, 48.0),
            EngineConfig::default(),
            now,
        );
        Ok(Self {
            engine,
            theme: TuiTheme::from_env()?,
            preferences,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            show_help: false,
            render_failed: None,
            toast: None,
            canvas: Rect::default(),
            press: None,
            drag_moved: false,
        })
    }

    fn save_preferences(&self, folder: &PreferencesFolder) -> Result<(), StoreError> {
        folder.save(&self.preferences)
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_key_normal(key.code),
            InputMode::Search => self.handle_key_search(key.code),
            InputMode::Jump => self.handle_key_jump(key.code),
            InputMode::Tag => self.handle_key_tag(key.code),
        }
    }

    fn handle_key_normal(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('m') => self.cycle_mode(),
            KeyCode::Char('p') => self.cycle_performance_mode(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.engine.viewport.zoom_in(),
            KeyCode::Char('-') => self.engine.viewport.zoom_out(),
            KeyCode::Char('0') => self.engine.viewport.reset(),
            KeyCode::Up | KeyCode::Char('k') => self.engine.viewport.pan_by(0.0, PAN_STEP),
            KeyCode::Down | KeyCode::Char('j') => self.engine.viewport.pan_by(0.0, -PAN_STEP),
            KeyCode::Left | KeyCode::Char('h') => self.engine.viewport.pan_by(PAN_STEP, 0.0),
            KeyCode::Right | KeyCode::Char('l') => self.engine.viewport.pan_by(-PAN_STEP, 0.0),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.input_buffer =
                    self.engine.criteria().search.clone().unwrap_or_default();
            }
            KeyCode::Char('\\') => {
                self.input_mode = InputMode::Jump;
                self.input_buffer.clear();
            }
            KeyCode::Char('t') => {
                self.input_mode = InputMode::Tag;
                self.input_buffer.clear();
            }
            KeyCode::Char('d') => self.cycle_date_filter(),
            KeyCode::Char('c') => self.cycle_content_filter(),
            KeyCode::Char('s') => self.cycle_size_filter(),
            KeyCode::Char('x') => self.engine.set_criteria(Default::default()),
            KeyCode::Char('u') => {
                if let Some(id) = self.engine.selected().cloned() {
                    self.engine.release_override(&id);
                }
            }
            KeyCode::Char('U') => self.engine.clear_overrides(),
            KeyCode::Char('r') => {
                self.render_failed = None;
                self.engine.recompute();
            }
            KeyCode::Esc => self.engine.select(None),
            _ => {}
        }
    }

    fn handle_key_search(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.apply_search(None);
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.apply_search(Some(self.input_buffer.clone()));
            }
            KeyCode::Char(ch) => {
                self.input_buffer.push(ch);
                self.apply_search(Some(self.input_buffer.clone()));
            }
            _ => {}
        }
    }

    fn handle_key_jump(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                match self.engine.best_title_match(&self.input_buffer).cloned() {
                    Some(id) => {
                        self.engine.select(Some(id.clone()));
                        self.engine.focus_node(&id);
                    }
                    None => self.toast = Some(format!("no note matches {:?}", self.input_buffer)),
                }
                self.input_buffer.clear();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(ch) => self.input_buffer.push(ch),
            _ => {}
        }
    }

    fn handle_key_tag(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let entry = std::mem::take(&mut self.input_buffer);
                self.toggle_tag(&entry);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(ch) => self.input_buffer.push(ch),
            _ => {}
        }
    }

    fn apply_search(&mut self, search: Option<String>) {
        let mut criteria = self.engine.criteria().clone();
        criteria.search = search.filter(|s| !s.is_empty());
        self.engine.set_criteria(criteria);
    }

    /// Adds the tag to the filter set, or removes it when already present.
    /// An empty entry clears the whole set. Tags are stored lowercase.
    fn toggle_tag(&mut self, entry: &str) {
        let mut criteria = self.engine.criteria().clone();
        let tag = SmolStr::new(entry.trim().to_lowercase());
        if tag.is_empty() {
            criteria.tags.clear();
        } else if !criteria.tags.remove(&tag) {
            criteria.tags.insert(tag);
        }
        self.engine.set_criteria(criteria);
    }

    fn cycle_date_filter(&mut self) {
        let mut criteria = self.engine.criteria().clone();
        criteria.created_within = match criteria.created_within {
            None => Some(DateBucket::Today),
            Some(DateBucket::Today) => Some(DateBucket::Week),
            Some(DateBucket::Week) => Some(DateBucket::Month),
            Some(DateBucket::Month) => Some(DateBucket::Year),
            Some(DateBucket::Year) => None,
        };
        self.engine.set_criteria(criteria);
    }

    fn cycle_content_filter(&mut self) {
        let mut criteria = self.engine.criteria().clone();
        criteria.content = match criteria.content {
            None => Some(ContentPredicate::HasWikiRefs),
            Some(ContentPredicate::HasWikiRefs) => Some(ContentPredicate::HasTags),
            Some(ContentPredicate::HasTags) => {
                Some(ContentPredicate::MinBodyLen(LONG_NOTE_MIN_LEN))
            }
            Some(ContentPredicate::MinBodyLen(_)) => None,
        };
        self.engine.set_criteria(criteria);
    }

    fn cycle_size_filter(&mut self) {
        let mut criteria = self.engine.criteria().clone();
        criteria.size = match criteria.size {
            None => Some(SizeBucket::Small),
            Some(SizeBucket::Small) => Some(SizeBucket::Medium),
            Some(SizeBucket::Medium) => Some(SizeBucket::Large),
            Some(SizeBucket::Large) => None,
        };
        self.engine.set_criteria(criteria);
    }

    fn cycle_mode(&mut self) {
        let all = LinkKind::ALL;
        let idx = all.iter().position(|k| *k == self.engine.mode()).unwrap_or(0);
        let next = all[(idx + 1) % all.len()];
        self.engine.set_mode(next);
        self.preferences.render_mode = next;
    }

    fn cycle_performance_mode(&mut self) {
        let next = match self.engine.performance_mode() {
            PerformanceMode::Auto => PerformanceMode::Quality,
            PerformanceMode::Quality => PerformanceMode::Performance,
            PerformanceMode::Performance => PerformanceMode::Auto,
        };
        self.engine.set_performance_mode(next);
        self.preferences.performance_mode = next;
    }

    /// Cell position to canvas screen space; rows stretch by the cell
    /// aspect so the viewport math stays square.
    fn mouse_to_screen(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if column < self.canvas.x
            || row < self.canvas.y
            || column >= self.canvas.x + self.canvas.width
            || row >= self.canvas.y + self.canvas.height
        {
            return None;
        }
        let sx = f32::from(column - self.canvas.x);
        let sy = f32::from(row - self.canvas.y) * CELL_ASPECT;
        Some((sx, sy))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help || self.input_mode != InputMode::Normal {
            return;
        }
        let Some((sx, sy)) = self.mouse_to_screen(mouse.column, mouse.row) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some((sx, sy));
                self.drag_moved = false;
                self.engine.pointer_down(sx, sy);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((px, py)) = self.press {
                    if (sx - px).abs() >= 1.0 || (sy - py).abs() >= CELL_ASPECT {
                        self.drag_moved = true;
                    }
                }
                self.engine.pointer_drag(sx, sy);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.engine.pointer_up(sx, sy, self.drag_moved);
                self.press = None;
                self.drag_moved = false;
            }
            MouseEventKind::Moved => {
                self.engine.pointer_move(sx, sy);
            }
            MouseEventKind::ScrollUp => self.engine.viewport.zoom_in(),
            MouseEventKind::ScrollDown => self.engine.viewport.zoom_out(),
            _ => {}
        }
    }

    fn status_line(&self) -> Line<'static> {
        match self.input_mode {
            InputMode::Search => {
                return Line::from(vec![
                    Span::styled("search: ", self.theme.status_key_style()),
                    Span::styled(self.input_buffer.clone(), self.theme.status_style()),
                ]);
            }
            InputMode::Jump => {
                return Line::from(vec![
                    Span::styled("jump: ", self.theme.status_key_style()),
                    Span::styled(self.input_buffer.clone(), self.theme.status_style()),
                ]);
            }
            InputMode::Tag => {
                return Line::from(vec![
                    Span::styled("tag: ", self.theme.status_key_style()),
                    Span::styled(self.input_buffer.clone(), self.theme.status_style()),
                ]);
            }
            InputMode::Normal => {}
        }

        if let Some(toast) = &self.toast {
            return Line::from(Span::styled(toast.clone(), self.theme.error_style()));
        }

        let graph = self.engine.graph();
        let mut nodes_buf = itoa::Buffer::new();
        let mut links_buf = itoa::Buffer::new();
        let level = match self.engine.optimization_level() {
            OptimizationLevel::None => "",
            OptimizationLevel::Medium => "  opt:medium",
            OptimizationLevel::High => "  opt:high",
        };
        let selected = self
            .engine
            .selected()
            .and_then(|id| self.engine.note(id))
            .map(|note| format!("  [{}]", note.title))
            .unwrap_or_default();

        let filters = self.filter_summary();
        let summary = format!(
            "{}  {}  n:{}  l:{}{level}{filters}{selected}",
            self.engine.mode(),
            self.engine.performance_mode(),
            nodes_buf.format(graph.nodes.len()),
            links_buf.format(graph.links.len()),
        );
        Line::from(vec![
            Span::styled(summary, self.theme.status_style()),
            Span::raw("  "),
            Span::styled("? help  q quit", self.theme.status_key_style()),
        ])
    }

    /// Compact `tag:… d:… c:… s:…` summary of the active non-search
    /// filters; empty when none are set.
    fn filter_summary(&self) -> String {
        let criteria = self.engine.criteria();
        let mut parts = Vec::new();
        if !criteria.tags.is_empty() {
            let tags: Vec<&str> = criteria.tags.iter().map(SmolStr::as_str).collect();
            parts.push(format!("tag:{}", tags.join(",")));
        }
        if let Some(bucket) = criteria.created_within {
            let label = match bucket {
                DateBucket::Today => "today",
                DateBucket::Week => "week",
                DateBucket::Month => "month",
                DateBucket::Year => "year",
            };
            parts.push(format!("d:{label}"));
        }
        if let Some(content) = criteria.content {
            let label = match content {
                ContentPredicate::HasWikiRefs => "refs",
                ContentPredicate::HasTags => "tagged",
                ContentPredicate::MinBodyLen(_) => "long",
            };
            parts.push(format!("c:{label}"));
        }
        if let Some(bucket) = criteria.size {
            let label = match bucket {
                SizeBucket::Small => "small",
                SizeBucket::Medium => "medium",
                SizeBucket::Large => "large",
            };
            parts.push(format!("s:{label}"));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("  {}", parts.join("  "))
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let canvas_area = layout[0];
    let status_area = layout[1];

    app.canvas = canvas_area;
    app.engine.viewport.resize(
        f32::from(canvas_area.width),
        f32::from(canvas_area.height) * CELL_ASPECT,
    );

    if app.render_failed.is_none() {
        let overlay = Overlay {
            selected: app.engine.selected(),
            hovered: app.engine.hovered(),
        };
        match render_graph(
            app.engine.graph(),
            &app.engine.viewport,
            overlay,
            &RenderOptions::default(),
        ) {
            Ok(grid) => {
                let lines: Vec<Line<'_>> = grid
                    .rows()
                    .map(|row| {
                        Line::from(
                            row.iter()
                                .map(|cell| {
                                    Span::styled(
                                        cell.ch.to_string(),
                                        app.theme.cell_style(cell.style),
                                    )
                                })
                                .collect::<Vec<_>>(),
                        )
                    })
                    .collect();
                frame.render_widget(Paragraph::new(Text::from(lines)), canvas_area);
            }
            Err(err) => app.render_failed = Some(err),
        }
    }

    if let Some(err) = &app.render_failed {
        let message = Paragraph::new(vec![
            Line::from(Span::styled(
                "visualization unavailable",
                app.theme.error_style(),
            )),
            Line::from(Span::raw(err.to_string())),
            Line::from(Span::raw("press r to retry")),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(message, canvas_area);
    }

    frame.render_widget(Paragraph::new(app.status_line()), status_area);

    if app.show_help {
        draw_help(frame, area, &app.theme);
    }
}

fn draw_help(frame: &mut Frame<'_>, area: Rect, theme: &TuiTheme) {
    let lines = [
        "q        quit",
        "m        cycle link mode (internal/tag/similarity/hierarchical)",
        "p        cycle performance mode (auto/quality/performance)",
        "+ / -    zoom in / out (mouse wheel works too)",
        "0        reset zoom and pan",
        "arrows   pan (hjkl works too)",
        "/        filter notes by title or tag",
        "\\        fuzzy jump to a note by title",
        "t        toggle a tag filter (empty entry clears the tag set)",
        "d        cycle date filter (today/week/month/year/off)",
        "c        cycle content filter (wiki refs/tagged/long/off)",
        "s        cycle size filter (small/medium/large/off)",
        "x        clear all filters",
        "click    select a node; drag to reposition and pin it",
        "u        unpin the selected node",
        "U        unpin every node",
        "r        retry after a render failure",
        "esc      clear selection / leave a prompt",
    ];
    let width = (area.width.saturating_sub(4)).min(64);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let text: Vec<Line<'_>> = std::iter::once(Line::from(Span::styled(
        "keys",
        theme.status_key_style(),
    )))
    .chain(lines.iter().map(|line| Line::from(Span::raw(*line))))
    .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(Text::from(text)), popup);
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
