use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{RecordFeed, RecordStore};
use crate::models::{Field, Record};
use crate::workflow::{EntryWorkflow, SaveEvent, Submission};

use super::forms::EntryForm;
use super::helpers::record_lines;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Four inputs, a blank line and the save button, plus the block borders.
const FORM_HEIGHT: u16 = 8;
/// Rows moved by PageUp/PageDown in the record list.
const PAGE_STEP: isize = 5;

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the single entry screen.
///
/// The app never reads the table directly. It subscribes once to the store
/// and to the workflow's saved signal, and [`App::sync`] drains both feeds
/// before every frame.
pub struct App {
    store: RecordStore,
    workflow: EntryWorkflow,
    form: EntryForm,
    records: Vec<Record>,
    record_feed: RecordFeed,
    saved_feed: Receiver<SaveEvent>,
    selected: usize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection) -> Result<Self> {
        Self::from_store(RecordStore::new(conn))
    }

    pub fn from_store(mut store: RecordStore) -> Result<Self> {
        let record_feed = store
            .subscribe()
            .context("failed to load stored people")?;
        let mut workflow = EntryWorkflow::new();
        let saved_feed = workflow.subscribe_saved();

        let mut app = Self {
            store,
            workflow,
            form: EntryForm::default(),
            records: Vec::new(),
            record_feed,
            saved_feed,
            selected: 0,
            status: None,
        };
        app.sync();
        Ok(app)
    }

    /// Pull the newest record snapshot and any pending save acknowledgement.
    /// Only the latest snapshot matters, so older ones are skipped.
    pub fn sync(&mut self) {
        if let Some(snapshot) = self.record_feed.try_iter().last() {
            self.records = snapshot;
            self.selected = self.selected.min(self.records.len().saturating_sub(1));
        }
        if self.saved_feed.try_iter().count() > 0 {
            self.set_status("Person saved.", StatusKind::Info);
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn workflow(&self) -> &EntryWorkflow {
        &self.workflow
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Backspace => self.form.backspace(&mut self.workflow),
            KeyCode::Enter => self.submit()?,
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.records.len().saturating_sub(1),
            KeyCode::Char(ch) => {
                if self.form.push_char(&mut self.workflow, ch) && !self.form.has_flags() {
                    self.clear_status();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Process a key pressed together with Ctrl. Only `Ctrl+C` (quit) and
    /// `Ctrl+R` (clear) do anything; other chords never reach the form.
    /// Returns `true` when the user asked to quit.
    pub fn handle_ctrl(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('c') => true,
            KeyCode::Char('r') => {
                self.handle_ctrl_r();
                false
            }
            _ => false,
        }
    }

    /// Clear every input without saving.
    pub fn handle_ctrl_r(&mut self) {
        self.workflow.reset();
        self.form.clear_flags();
        self.form.focus(Field::FirstName);
        self.set_status("Form cleared.", StatusKind::Info);
    }

    fn submit(&mut self) -> Result<()> {
        let outcome = self
            .workflow
            .submit(&mut self.store)
            .context("failed to save person")?;

        match outcome {
            Submission::Saved(_) => {
                self.form.clear_flags();
                self.form.focus(Field::FirstName);
                self.clear_status();
                self.sync();
                self.selected = self.records.len().saturating_sub(1);
            }
            Submission::Incomplete(missing) => {
                let names: Vec<&str> = missing.iter().map(|field| field.label()).collect();
                self.set_status(
                    format!("Fill in: {}.", names.join(", ")),
                    StatusKind::Error,
                );
                self.form.flag_missing(&missing);
            }
        }
        Ok(())
    }

    fn move_selection(&mut self, offset: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        self.draw_records(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![Span::styled(
            "People",
            Style::default().add_modifier(Modifier::BOLD),
        )]));
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Person details")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = Field::ALL
            .iter()
            .map(|field| self.form.build_line(&self.workflow, *field))
            .collect();
        lines.push(Line::from(""));

        let save_style = if self.workflow.validate() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled("[ Save ]", save_style)));

        frame.render_widget(Paragraph::new(lines), inner);

        if inner.width > 0 && inner.height > 0 {
            let (dx, dy) = self.form.cursor_offset(&self.workflow);
            let cursor_x = (inner.x + dx).min(inner.right().saturating_sub(1));
            let cursor_y = (inner.y + dy).min(inner.bottom().saturating_sub(1));
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_records(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("People list ({})", self.records.len()))
            .borders(Borders::ALL);

        if self.records.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No people saved yet.",
                Style::default().fg(Color::Gray),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .records
            .iter()
            .map(|record| ListItem::new(record_lines(record)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray));

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn footer_instructions() -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("[Tab]", key_style),
        Span::raw(" Next field   "),
        Span::styled("[Enter]", key_style),
        Span::raw(" Save   "),
        Span::styled("[Ctrl+R]", key_style),
        Span::raw(" Clear   "),
        Span::styled("[PgUp/PgDn]", key_style),
        Span::raw(" Scroll   "),
        Span::styled("[Esc]", key_style),
        Span::raw(" Quit"),
    ])
}
