pub mod buffer;

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use mannsum_config::Settings;
use mannsum_engine::{codec, format, Tally};
use mannsum_location::{Debouncer, LocationStateStore, MemoryHistory};

use buffer::TextBuffer;

/// Upper bound on how long the loop blocks waiting for input
const MAX_POLL: Duration = Duration::from_millis(100);

struct EditorApp {
    store: LocationStateStore<MemoryHistory>,
    buffer: TextBuffer,
    /// Derived view for the current text, rebuilt on every change
    tally: Tally,
    /// Refreshes the URL preview line
    preview: Debouncer,
    preview_search: String,
    settings: Settings,
    scroll_row: usize,
    should_quit: bool,
    show_help: bool,
}

impl EditorApp {
    fn new(query: &str, settings: Settings) -> Self {
        let history = MemoryHistory::new(query);
        let mut store = LocationStateStore::with_debounce(history, settings.persist_debounce());
        store.load_initial();

        let buffer = TextBuffer::from_text(&store.display_text());
        let tally = store.tally();
        let preview_search = store.search();

        Self {
            store,
            buffer,
            tally,
            preview: Debouncer::new(settings.preview_debounce()),
            preview_search,
            settings,
            scroll_row: 0,
            should_quit: false,
            show_help: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.show_help {
            // Any key dismisses help
            self.show_help = false;
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('z') if ctrl => self.navigate(|store| store.back()),
            KeyCode::Char('y') if ctrl => self.navigate(|store| store.forward()),
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Home => self.buffer.home(),
            KeyCode::End => self.buffer.end(),
            // The delimiter can only ever mean a line break
            KeyCode::Enter | KeyCode::Char(codec::DELIMITER) => {
                self.buffer.insert_newline();
                self.text_changed(now);
            }
            KeyCode::Backspace => {
                if self.buffer.backspace() {
                    self.text_changed(now);
                }
            }
            KeyCode::Delete => {
                if self.buffer.delete() {
                    self.text_changed(now);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.buffer.insert_char(c);
                self.text_changed(now);
            }
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str, now: Instant) {
        let text = codec::normalize_newlines(text).replace(codec::DELIMITER, "\n");
        self.buffer.insert_str(&text);
        self.text_changed(now);
    }

    /// Push the buffer into the store and re-derive the view immediately.
    fn text_changed(&mut self, now: Instant) {
        self.store.update_at(&self.buffer.text(), now);
        self.tally = self.store.tally();
        self.preview.schedule(now);
    }

    /// Back/forward: the store restores synchronously, the buffer follows.
    fn navigate(&mut self, step: impl FnOnce(&mut LocationStateStore<MemoryHistory>) -> bool) {
        if step(&mut self.store) {
            self.buffer = TextBuffer::from_text(&self.store.display_text());
            self.tally = self.store.tally();
            self.preview.cancel();
            self.preview_search = self.store.search();
        }
    }

    /// Fire whichever debounce timers are due.
    fn tick(&mut self, now: Instant) {
        self.store.poll_at(now);
        if self.preview.fire_if_due(now) {
            self.preview_search = self.store.search();
        }
    }

    /// How long the event loop may block before a timer needs service.
    fn poll_timeout(&self, now: Instant) -> Duration {
        [self.store.next_write_in(now), self.preview.remaining(now)]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(MAX_POLL)
            .min(MAX_POLL)
    }

    fn gutter_width(&self) -> usize {
        if !self.settings.show_line_numbers {
            return 0;
        }
        self.tally.line_count().to_string().len().max(2) + 1
    }

    fn ensure_visible(&mut self, visible_rows: usize) {
        let (row, _) = self.buffer.cursor();
        if row < self.scroll_row {
            self.scroll_row = row;
        }
        if visible_rows > 0 && row >= self.scroll_row + visible_rows {
            self.scroll_row = row - visible_rows + 1;
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_text(frame, chunks[1]);
        self.draw_totals(frame, chunks[2]);
        self.draw_status(frame, chunks[3]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let history = self.store.location();
        let title = format!(
            " mannsum | {} lines | history {}/{} ",
            self.tally.line_count(),
            history.position() + 1,
            history.len()
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_text(&self, frame: &mut Frame, area: Rect) {
        let gutter = self.gutter_width();
        let visible_rows = area.height as usize;
        let end_row = (self.scroll_row + visible_rows).min(self.tally.line_count());
        let (cursor_row, _) = self.buffer.cursor();

        let mut lines: Vec<Line> = Vec::with_capacity(visible_rows);
        for r in self.scroll_row..end_row {
            let parsed = &self.tally.lines[r];
            let mut spans = Vec::with_capacity(2);

            if gutter > 0 {
                let number_style = if r == cursor_row {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                spans.push(Span::styled(
                    format!("{:>width$} ", self.tally.line_numbers[r], width = gutter - 1),
                    number_style,
                ));
            }

            // Invalid lines stay editable; they are only dimmed
            let text_style = if parsed.value.is_valid() || parsed.raw.is_empty() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(parsed.raw.clone(), text_style));
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);

        if !self.show_help && cursor_row >= self.scroll_row {
            let x = area.x as usize + gutter + self.buffer.cursor_display_col();
            let y = area.y as usize + (cursor_row - self.scroll_row);
            if x < (area.x + area.width) as usize && y < (area.y + area.height) as usize {
                frame.set_cursor_position(Position::new(x as u16, y as u16));
            }
        }
    }

    fn draw_totals(&self, frame: &mut Frame, area: Rect) {
        let result = &self.tally.result;
        let base = &self.settings.base_unit;
        let lines = vec![
            Line::from(Span::styled(
                format::total_line(result, base),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format::mann_line(result, &self.settings.coarse_unit, base)),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
            area,
        );
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let marker = match self.store.phase() {
            mannsum_location::Phase::Dirty => "*",
            mannsum_location::Phase::Idle => " ",
        };
        let status = format!("{} {}  (F1 help)", marker, self.preview_search);
        let para = Paragraph::new(status).style(Style::default().fg(Color::Gray).bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help = vec![
            Line::from("Type one number per line; totals update as you type."),
            Line::from(""),
            Line::from("  Ctrl-Z        back through history"),
            Line::from("  Ctrl-Y        forward through history"),
            Line::from("  Esc / Ctrl-Q  quit and print the query string"),
            Line::from("  F1            this help"),
            Line::from(""),
            Line::from("Press any key to close"),
        ];
        let width = 58.min(area.width);
        let height = (help.len() as u16 + 2).min(area.height);
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        let para = Paragraph::new(help).block(Block::default().borders(Borders::ALL).title(" Help "));
        frame.render_widget(para, popup);
    }
}

/// Run the interactive editor starting from `query`. Returns the final
/// `?`-prefixed query string.
pub fn run(query: &str, settings: Settings) -> Result<String, String> {
    let app = EditorApp::new(query, settings);
    run_app(app)
}

fn run_app(mut app: EditorApp) -> Result<String, String> {
    terminal::enable_raw_mode()
        .map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;
    let _ = stdout().execute(EnableBracketedPaste);

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(DisableBracketedPaste);
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        let height = terminal.size().map(|s| s.height).unwrap_or_default();
        // title + totals + status
        let visible_rows = height.saturating_sub(4) as usize;
        app.ensure_visible(visible_rows);

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        let timeout = app.poll_timeout(Instant::now());
        if event::poll(timeout).map_err(|e| format!("event poll error: {}", e))? {
            match event::read().map_err(|e| format!("event read error: {}", e))? {
                Event::Key(key) => app.handle_key(key, Instant::now()),
                Event::Paste(text) => app.handle_paste(&text, Instant::now()),
                _ => {}
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    app.store.flush();
    Ok(app.store.search())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mannsum_location::Location;

    fn app(query: &str) -> EditorApp {
        EditorApp::new(query, Settings::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut EditorApp, text: &str, now: Instant) {
        for c in text.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            app.handle_key(key(code), now);
        }
    }

    #[test]
    fn opens_with_query_text() {
        let app = app("?text=10~-5~20");
        assert_eq!(app.buffer.text(), "10\n-5\n20");
        assert_eq!(app.tally.result.sum, 25.0);
        assert_eq!(app.preview_search, "?text=10~-5~20");
    }

    #[test]
    fn typing_updates_totals_immediately() {
        let mut app = app("");
        let t0 = Instant::now();
        type_str(&mut app, "40\n45", t0);
        assert_eq!(app.tally.line_numbers, vec![1, 2]);
        assert_eq!(app.tally.result.units, 2);
        assert_eq!(app.tally.result.remainder, 5.0);
        // Location has not been written yet
        assert_eq!(app.store.location().query(), "text=");
    }

    #[test]
    fn tick_persists_after_debounce() {
        let mut app = app("");
        let t0 = Instant::now();
        type_str(&mut app, "1\n2\n3", t0);
        app.tick(t0 + Duration::from_millis(150));
        assert_eq!(app.preview_search, "?text=1~2~3");
        assert_eq!(app.store.writes(), 0);

        app.tick(t0 + Duration::from_millis(600));
        assert_eq!(app.store.writes(), 1);
        assert_eq!(app.store.location().query(), "text=1~2~3");
    }

    #[test]
    fn ctrl_z_restores_previous_entry() {
        let mut app = app("");
        let t0 = Instant::now();
        type_str(&mut app, "5", t0);
        app.tick(t0 + Duration::from_millis(600));

        type_str(&mut app, "\n6", t0 + Duration::from_millis(1000));
        app.handle_key(ctrl('z'), t0 + Duration::from_millis(1100));
        assert_eq!(app.buffer.text(), "");
        assert_eq!(app.tally.result.sum, 0.0);

        app.handle_key(ctrl('y'), t0 + Duration::from_millis(1200));
        assert_eq!(app.buffer.text(), "5");
        assert_eq!(app.preview_search, "?text=5");

        // The write cancelled by navigation never lands
        app.tick(t0 + Duration::from_millis(5000));
        assert_eq!(app.buffer.text(), "5");
        assert_eq!(app.store.writes(), 1);
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut app = app("");
        app.handle_paste("3\r\nx\r\n4.5", Instant::now());
        assert_eq!(app.buffer.text(), "3\nx\n4.5");
        assert_eq!(app.tally.result.sum, 7.5);
        assert_eq!(app.tally.line_count(), 3);
    }

    #[test]
    fn typed_delimiter_starts_a_new_line() {
        let mut app = app("");
        let t0 = Instant::now();
        type_str(&mut app, "1~2", t0);
        assert_eq!(app.buffer.text(), "1\n2");
        assert_eq!(app.buffer.lines().len(), app.tally.line_count());
        assert_eq!(app.buffer.cursor(), (1, 1));
        assert_eq!(app.tally.result.sum, 3.0);

        app.tick(t0 + Duration::from_millis(600));
        assert_eq!(app.store.location().query(), "text=1~2");
    }

    #[test]
    fn pasted_delimiter_splits_lines() {
        let mut app = app("");
        app.handle_paste("40~5\r\n7", Instant::now());
        assert_eq!(app.buffer.text(), "40\n5\n7");
        assert_eq!(app.buffer.lines().len(), app.tally.line_count());
        assert_eq!(app.tally.line_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn backspace_at_start_is_not_an_edit() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Backspace), Instant::now());
        assert_eq!(app.store.phase(), mannsum_location::Phase::Idle);
    }

    #[test]
    fn quit_keys() {
        let mut app = app("");
        app.handle_key(ctrl('q'), Instant::now());
        assert!(app.should_quit);

        let mut app2 = self::app("");
        app2.handle_key(key(KeyCode::Esc), Instant::now());
        assert!(app2.should_quit);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app("");
        app.handle_key(key(KeyCode::F(1)), Instant::now());
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Char('1')), Instant::now());
        assert!(!app.show_help);
        assert_eq!(app.buffer.text(), "");
    }

    #[test]
    fn poll_timeout_tracks_pending_timers() {
        let mut app = app("");
        let t0 = Instant::now();
        assert_eq!(app.poll_timeout(t0), MAX_POLL);
        type_str(&mut app, "1", t0);
        assert_eq!(app.poll_timeout(t0 + Duration::from_millis(60)), Duration::from_millis(40));
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut app = app("?text=1~2~3~4~5~6");
        app.ensure_visible(3);
        assert_eq!(app.scroll_row, 3);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Up), Instant::now());
        }
        app.ensure_visible(3);
        assert_eq!(app.scroll_row, 0);
    }
}
