//! Member list pane.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
  app::{App, Mode},
  render::{tenure, visibility_mark},
};

/// Render the current page into `area`.
pub fn draw<G>(f: &mut Frame, area: Rect, app: &App<G>) {
  let page = &app.page;
  let title = if app.browse.search().is_empty() {
    format!(" {} ({}) ", app.kind.as_str(), page.total)
  } else {
    format!(" {} ({}/{}) ", app.kind.as_str(), page.total_filtered, page.total)
  };
  let footer = format!(" page {}/{} ", page.page, page.page_count);

  let block = Block::default()
    .title(title)
    .title_bottom(Line::from(footer).right_aligned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  let searching = matches!(app.mode, Mode::Search);
  if (searching || !app.browse.search().is_empty()) && inner.height > 2 {
    let search_area = Rect { height: 1, ..inner };
    inner.y += 1;
    inner.height -= 1;
    let cursor = if searching { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("/{}{cursor}", app.browse.search()))
        .style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if page.items.is_empty() {
    let hint = if app.browse.search().is_empty() {
      format!("No {} yet. Press a to add one.", app.kind.as_str())
    } else {
      "Nothing matches.".to_owned()
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new(vec![
    Cell::from(""),
    Cell::from("Name"),
    Cell::from(app.kind.position_label()),
    Cell::from("Email"),
    Cell::from(app.kind.start_date_label()),
  ])
  .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let rows = page.items.iter().map(|m| {
    let mark_style = if m.is_visible {
      Style::default().fg(Color::Green)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    Row::new(vec![
      Cell::from(visibility_mark(m)).style(mark_style),
      Cell::from(m.name.clone()),
      Cell::from(m.position.clone()),
      Cell::from(m.contact_email.clone()),
      Cell::from(tenure(m)),
    ])
  });

  let widths = [
    Constraint::Length(2),
    Constraint::Percentage(25),
    Constraint::Percentage(22),
    Constraint::Percentage(28),
    Constraint::Min(24),
  ];

  let mut state = TableState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    inner,
    &mut state,
  );
}
