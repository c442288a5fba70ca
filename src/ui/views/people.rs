use chrono::Datelike;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::api::types::{Person, Recipe};

use super::truncate;

pub fn draw_list(frame: &mut Frame, area: Rect, people: &[&Person], selected: usize, loading: bool) {
  let title = if loading {
    " People (loading...) ".to_string()
  } else {
    format!(" People ({}) ", people.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if people.is_empty() && !loading {
    let paragraph = Paragraph::new("No family members recorded.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = people
    .iter()
    .map(|person| {
      let line = Line::from(vec![
        Span::raw(format!("{:<30}", truncate(&person.full_name(), 30))),
        Span::styled(years(person), Style::default().fg(Color::DarkGray)),
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
  state.select(Some(selected.min(people.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}

pub fn draw_detail(
  frame: &mut Frame,
  area: Rect,
  person: Option<&Person>,
  recipes: &[&Recipe],
) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let Some(person) = person else {
    let paragraph = Paragraph::new("Person not found.")
      .block(block.title(" Person "))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  };

  let mut lines: Vec<Line> = vec![Line::styled(
    years(person),
    Style::default().fg(Color::DarkGray),
  )];

  if let Some(notes) = &person.notes {
    lines.push(Line::raw(""));
    lines.push(Line::raw(notes.clone()));
  }

  if !recipes.is_empty() {
    lines.push(Line::raw(""));
    lines.push(Line::styled(
      "Recipes",
      Style::default().fg(Color::Cyan).bold(),
    ));
    for recipe in recipes {
      lines.push(Line::raw(format!("  - {}", recipe.title)));
    }
  }

  let paragraph = Paragraph::new(lines)
    .block(block.title(format!(" {} ", person.full_name())))
    .wrap(Wrap { trim: false });

  frame.render_widget(paragraph, area);
}

fn years(person: &Person) -> String {
  match (person.birth_date, person.death_date) {
    (Some(birth), Some(death)) => format!("{}–{}", birth.year(), death.year()),
    (Some(birth), None) => format!("b. {}", birth.year()),
    (None, Some(death)) => format!("d. {}", death.year()),
    (None, None) => String::new(),
  }
}
