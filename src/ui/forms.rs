use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Field;
use crate::workflow::EntryWorkflow;

/// Focus and highlight state for the entry form. The typed values live in
/// the [`EntryWorkflow`]; this only tracks which input has the cursor and
/// which inputs were empty on the last failed submit.
#[derive(Default, Clone)]
pub(crate) struct EntryForm {
    pub(crate) active: Field,
    flagged: Vec<Field>,
}

impl EntryForm {
    /// Switch focus to a particular field.
    pub(crate) fn focus(&mut self, field: Field) {
        self.active = field;
    }

    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Control characters are
    /// ignored; anything printable is accepted, digits or not.
    pub(crate) fn push_char(&mut self, workflow: &mut EntryWorkflow, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let mut value = workflow.field(self.active).to_string();
        value.push(ch);
        workflow.set_field(self.active, value);
        self.unflag(self.active);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self, workflow: &mut EntryWorkflow) {
        let mut value = workflow.field(self.active).to_string();
        if value.pop().is_some() {
            workflow.set_field(self.active, value);
        }
    }

    /// Mark fields that blocked a submit and move the cursor to the first.
    pub(crate) fn flag_missing(&mut self, missing: &[Field]) {
        self.flagged = missing.to_vec();
        if let Some(first) = missing.first() {
            self.active = *first;
        }
    }

    pub(crate) fn clear_flags(&mut self) {
        self.flagged.clear();
    }

    pub(crate) fn has_flags(&self) -> bool {
        !self.flagged.is_empty()
    }

    pub(crate) fn is_flagged(&self, field: Field) -> bool {
        self.flagged.contains(&field)
    }

    fn unflag(&mut self, field: Field) {
        self.flagged.retain(|flagged| *flagged != field);
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, workflow: &EntryWorkflow, field: Field) -> Line<'static> {
        let value = workflow.field(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if self.is_flagged(field) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(field_prefix(field)),
            Span::styled(display, style),
        ])
    }

    /// Column and row offsets of the text cursor inside the form area.
    /// Measured in terminal cells, so wide characters count double.
    pub(crate) fn cursor_offset(&self, workflow: &EntryWorkflow) -> (u16, u16) {
        let line = Line::from(vec![
            Span::raw(field_prefix(self.active)),
            Span::raw(workflow.field(self.active).to_string()),
        ]);
        let column = u16::try_from(line.width()).unwrap_or(u16::MAX);
        (column, self.active.index() as u16)
    }
}

/// Labels are padded to a common width so the inputs line up.
fn field_prefix(field: Field) -> String {
    let width = Field::ALL
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or_default();
    format!("{:<width$}: ", field.label())
}
