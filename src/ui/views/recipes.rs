use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::api::duration::seconds_to_minutes;
use crate::api::types::Recipe;
use crate::store::DataStore;

use super::truncate;

pub fn draw_list(frame: &mut Frame, area: Rect, recipes: &[&Recipe], selected: usize, loading: bool) {
  let title = if loading {
    " Recipes (loading...) ".to_string()
  } else {
    format!(" Recipes ({}) ", recipes.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if recipes.is_empty() && !loading {
    let paragraph = Paragraph::new("No recipes found.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = recipes
    .iter()
    .map(|recipe| {
      let rating = recipe
        .rating
        .map(|r| format!("★ {:.1}", r))
        .unwrap_or_default();
      let total = recipe
        .total_time
        .map(|s| format!("{}m", seconds_to_minutes(s)))
        .unwrap_or_default();

      let line = Line::from(vec![
        Span::raw(format!("{:<34}", truncate(&recipe.title, 34))),
        Span::styled(
          format!("{:<10}", recipe.meal_type.as_deref().unwrap_or("")),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{:<7}", rating), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<6}", total), Style::default().fg(Color::Green)),
        Span::styled(
          format!("cooked ×{}", recipe.times_cooked),
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
  state.select(Some(selected.min(recipes.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}

pub fn draw_detail(frame: &mut Frame, area: Rect, recipe: Option<&Recipe>, store: &DataStore) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let Some(recipe) = recipe else {
    let paragraph = Paragraph::new("Recipe not found.")
      .block(block.title(" Recipe "))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  };

  let mut lines: Vec<Line> = Vec::new();

  if let Some(description) = &recipe.description {
    lines.push(Line::raw(description.clone()));
    lines.push(Line::raw(""));
  }

  lines.push(meta_line("Meal", recipe.meal_type.as_deref()));
  lines.push(meta_line("Cuisine", recipe.cuisine_type.as_deref()));
  lines.push(meta_line("Difficulty", recipe.difficulty.as_deref()));
  lines.push(meta_line(
    "Servings",
    recipe.servings.map(|s| s.to_string()).as_deref(),
  ));
  lines.push(meta_line("Prep", minutes(recipe.prep_time).as_deref()));
  lines.push(meta_line("Cook", minutes(recipe.cook_time).as_deref()));
  lines.push(meta_line("Total", minutes(recipe.total_time).as_deref()));
  lines.push(meta_line(
    "Rating",
    recipe.rating.map(|r| format!("{:.1} / 5", r)).as_deref(),
  ));
  lines.push(meta_line(
    "Times cooked",
    Some(recipe.times_cooked.to_string()).as_deref(),
  ));

  let person = recipe
    .person
    .as_ref()
    .and_then(|id| store.people.get(id))
    .map(|p| p.full_name());
  lines.push(meta_line("From", person.as_deref()));

  let country = recipe
    .country
    .as_ref()
    .and_then(|id| store.countries.get(id))
    .map(|c| c.name.clone());
  lines.push(meta_line("Country", country.as_deref()));

  if recipe.source_name.is_some() || recipe.source_url.is_some() {
    lines.push(Line::raw(""));
    lines.push(meta_line("Source", recipe.source_name.as_deref()));
    lines.push(meta_line("URL", recipe.source_url.as_deref()));
  }

  let links: Vec<_> = store
    .links
    .items
    .iter()
    .filter(|l| l.recipe == recipe.id)
    .collect();
  if !links.is_empty() {
    lines.push(Line::raw(""));
    lines.push(Line::styled(
      "Ingredients",
      Style::default().fg(Color::Cyan).bold(),
    ));
    for link in links {
      let ingredient = store.ingredients.get(&link.ingredient);
      let name = ingredient.map(|i| i.name.as_str()).unwrap_or("(unknown)");
      let unit = ingredient.and_then(|i| i.unit.as_deref()).unwrap_or("");
      let quantity = link.quantity.map(|q| q.to_string()).unwrap_or_default();
      lines.push(Line::raw(format!(
        "  - {} {} {}",
        quantity, unit, name
      )));
    }
  }

  let paragraph = Paragraph::new(lines)
    .block(block.title(format!(" {} ", recipe.title)))
    .wrap(Wrap { trim: false });

  frame.render_widget(paragraph, area);
}

fn minutes(seconds: Option<u32>) -> Option<String> {
  seconds.map(|s| format!("{} min", seconds_to_minutes(s)))
}

fn meta_line(label: &str, value: Option<&str>) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{:<14}", label),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw(value.unwrap_or("-").to_string()),
  ])
}
