//! TUI rendering for the browser.

pub mod member_form;
pub mod member_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use roster_core::{EntityKind, form::DeletePrompt};
use roster_store::Tone;

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<G>(f: &mut Frame, app: &App<G>) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // list
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  member_list::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  match &app.mode {
    Mode::Form(state) => member_form::draw(f, area, app.kind, state),
    Mode::Confirm(prompt) => draw_confirm(f, area, prompt),
    Mode::Normal | Mode::Search => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<G>(f: &mut Frame, area: Rect, app: &App<G>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut spans = vec![Span::styled(
    " roster ",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  )];
  for kind in EntityKind::ALL {
    let label = format!(" {} ", kind.as_str());
    let style = if kind == app.kind {
      Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(label, style));
  }

  let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right = format!("{date} ");
  let pad = (area.width as usize).saturating_sub(used + right.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(right, Style::default().fg(Color::Gray)));

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<G>(f: &mut Frame, area: Rect, app: &App<G>) {
  let (mode_label, hints) = match &app.mode {
    Mode::Normal => (
      "LIST",
      "↑↓ move  ←→ page  / search  a add  e edit  d delete  v show/hide  Tab switch  q quit",
    ),
    Mode::Search => ("SEARCH", "type to filter  Enter keep  Esc clear"),
    Mode::Form(_) => ("FORM", "Tab next  Shift-Tab prev  Space toggle  Enter save  Esc cancel"),
    Mode::Confirm(_) => ("CONFIRM", "y delete  n cancel"),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let message = if app.loading {
    Span::styled("  Loading…", Style::default().fg(Color::Yellow))
  } else if let Some(notice) = &app.status {
    let colour = match notice.tone {
      Tone::Success => Color::Green,
      Tone::Removed | Tone::Error => Color::Red,
    };
    Span::styled(format!("  {}", notice.message), Style::default().fg(colour))
  } else {
    Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray))
  };

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, message]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Dialogs ──────────────────────────────────────────────────────────────────

/// A `width` × `height` rectangle centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

fn draw_confirm(f: &mut Frame, area: Rect, prompt: &DeletePrompt) {
  let rect = centered(area, 50, 6);
  let block = Block::default()
    .title(" Delete ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let lines = vec![
    Line::from(prompt.question()),
    Line::from(""),
    Line::from(Span::styled("[y] delete   [n] cancel", Style::default().fg(Color::DarkGray))),
  ];
  f.render_widget(Clear, rect);
  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
    rect,
  );
}
