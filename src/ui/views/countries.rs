use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::types::Country;

use super::truncate;

pub fn draw_list(
  frame: &mut Frame,
  area: Rect,
  countries: &[&Country],
  selected: usize,
  loading: bool,
) {
  let title = if loading {
    " Countries (loading...) ".to_string()
  } else {
    format!(" Countries ({}) ", countries.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if countries.is_empty() && !loading {
    let paragraph = Paragraph::new("No countries recorded.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = countries
    .iter()
    .map(|country| {
      let line = Line::from(vec![
        Span::raw(format!("{:<30}", truncate(&country.name, 30))),
        Span::styled(
          country.region.clone().unwrap_or_default(),
          Style::default().fg(Color::DarkGray),
        ),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(countries.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}
