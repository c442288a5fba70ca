use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::api::types::Ingredient;

use super::truncate;

pub fn draw_list(
  frame: &mut Frame,
  area: Rect,
  ingredients: &[&Ingredient],
  selected: usize,
  loading: bool,
) {
  let title = if loading {
    " Ingredients (loading...) ".to_string()
  } else {
    format!(" Ingredients ({}) ", ingredients.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if ingredients.is_empty() && !loading {
    let paragraph = Paragraph::new("No ingredients recorded.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = ingredients
    .iter()
    .map(|ingredient| {
      let line = Line::from(vec![
        Span::raw(format!("{:<26}", truncate(&ingredient.name, 26))),
        Span::styled(
          format!("{:<10}", ingredient.unit.as_deref().unwrap_or("")),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(
          truncate(ingredient.notes.as_deref().unwrap_or(""), 40),
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
  state.select(Some(selected.min(ingredients.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}
