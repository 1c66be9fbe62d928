//! Create/edit dialog.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};
use roster_core::EntityKind;

use crate::app::{FormField, FormState};

pub fn draw(f: &mut Frame, area: Rect, kind: EntityKind, state: &FormState) {
  let title = match state.editing {
    Some(_) => format!(" Edit {} ", kind.entity_name()),
    None => format!(" Add {} ", kind.entity_name()),
  };
  let height = FormField::ALL.len() as u16 + state.errors.len() as u16 + 2;
  let rect = super::centered(area, 70, height);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let mut lines = Vec::new();
  for (i, field) in FormField::ALL.into_iter().enumerate() {
    let focused = i == state.focus;
    let label_style = if focused {
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let value = match field.text(&state.form) {
      Some(text) if focused => format!("{text}_"),
      Some(text) => text.to_owned(),
      None if state.form.is_visible => "[x]".to_owned(),
      None => "[ ]".to_owned(),
    };
    lines.push(Line::from(vec![
      Span::styled(format!("{:<18}", field.label(kind)), label_style),
      Span::raw(value),
    ]));

    if let Some(message) = field.error_key().and_then(|k| state.errors.get(k)) {
      lines.push(Line::from(Span::styled(
        format!("{:<18}{message}", ""),
        Style::default().fg(Color::Red),
      )));
    }
  }

  f.render_widget(Clear, rect);
  f.render_widget(Paragraph::new(lines).block(block), rect);
}
