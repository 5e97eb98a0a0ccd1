use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Record;

/// Build the four text lines shown for a record in the list, followed by a
/// spacer so consecutive entries stay visually apart.
pub(crate) fn record_lines(record: &Record) -> Vec<Line<'static>> {
    let id = record
        .id
        .map(|id| format!("#{id} "))
        .unwrap_or_default();

    vec![
        Line::from(vec![
            Span::styled(id, Style::default().fg(Color::DarkGray)),
            Span::styled(
                record.first_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(record.last_name.clone()),
        Line::from(record.age.clone()),
        Line::from(record.phone_number.clone()),
        Line::from(""),
    ]
}
